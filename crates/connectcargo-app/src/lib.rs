//! Application service layer - board sessions, config, backend, task control

pub mod backend;
pub mod config;
pub mod debounce;
pub mod repository;
pub mod service;
pub mod session;
pub mod tasks;
pub mod toasts;

pub use backend::{Backend, SimulatedBackend};
pub use config::Config;
pub use debounce::Debouncer;
pub use service::{FavoritesService, PresetService, ReminderService};
pub use session::{form_from_toml, BoardSession};
pub use tasks::TaskRegistry;
pub use toasts::ToastCenter;
