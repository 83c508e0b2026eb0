//! Repository adapters for persistence layer

use std::path::Path;

use connectcargo_infra::{
    FileFavoriteDriverRepository, FileFilterPresetRepository, FileRatingReminderRepository,
};
use connectcargo_types::Result;

use crate::config::Config;

/// Open file-based favorite driver repository
pub fn open_favorites_repo(config: &Config) -> Result<FileFavoriteDriverRepository> {
    FileFavoriteDriverRepository::open(&config.data_dir()?)
}

/// Open file-based rating reminder repository
pub fn open_reminders_repo(config: &Config) -> Result<FileRatingReminderRepository> {
    FileRatingReminderRepository::open(&config.data_dir()?)
}

/// Open file-based filter preset repository
pub fn open_presets_repo(config: &Config) -> Result<FileFilterPresetRepository> {
    FileFilterPresetRepository::open(&config.data_dir()?)
}

/// Open favorite driver repository at a custom directory
pub fn open_favorites_repo_at(store_dir: &Path) -> Result<FileFavoriteDriverRepository> {
    FileFavoriteDriverRepository::open(store_dir)
}

/// Open rating reminder repository at a custom directory
pub fn open_reminders_repo_at(store_dir: &Path) -> Result<FileRatingReminderRepository> {
    FileRatingReminderRepository::open(store_dir)
}

/// Open filter preset repository at a custom directory
pub fn open_presets_repo_at(store_dir: &Path) -> Result<FileFilterPresetRepository> {
    FileFilterPresetRepository::open(store_dir)
}
