//! Infrastructure layer: persistence and file formats

pub mod board_file;
pub mod load_csv;
pub mod persistence;
pub mod report;

pub use board_file::{load_board, sample_board, save_board};
pub use load_csv::import_loads;
pub use persistence::{
    FileFavoriteDriverRepository, FileFilterPresetRepository, FileRatingReminderRepository,
};
pub use report::{export_completed_loads, report_file_name};
