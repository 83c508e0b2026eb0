//! Persistence implementations
//!
//! File-based implementations of the domain repository traits. Each list is
//! kept as a JSON array in the data directory.

mod file_favorite_driver_repo;
mod file_filter_preset_repo;
mod file_rating_reminder_repo;

pub use file_favorite_driver_repo::FileFavoriteDriverRepository;
pub use file_filter_preset_repo::FileFilterPresetRepository;
pub use file_rating_reminder_repo::FileRatingReminderRepository;
