//! Services over the user's saved lists
//!
//! Favorites, filter presets and rating reminders outlive a session, so they
//! sit beside the board session rather than inside it.

pub mod favorites;
pub mod presets;
pub mod reminders;

pub use favorites::FavoritesService;
pub use presets::PresetService;
pub use reminders::ReminderService;
