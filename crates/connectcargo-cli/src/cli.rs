//! CLI definition using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use connectcargo_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "connectcargo")]
#[command(version)]
#[command(about = "Freight load board: find loads and drivers, publish and track shipments")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Board file to read and update. Defaults to board.json in the data directory.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available loads (carrier board)
    Loads {
        #[command(flatten)]
        filters: LoadFilterArgs,

        /// Start from a saved preset; filter flags are applied on top. With
        /// no filters at all the default preset, if any, is used.
        #[arg(long)]
        preset: Option<String>,

        /// Sort key (newest, price-high, price-low, distance, urgency, volume)
        #[arg(long, default_value = "newest")]
        sort: String,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Manage saved load filter presets
    Presets {
        #[command(subcommand)]
        action: PresetsAction,
    },

    /// Accept a load from the board
    Accept {
        /// Load id
        id: u32,
    },

    /// Find drivers
    Drivers {
        #[arg(long, short = 's')]
        search: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        vehicle: Option<String>,

        #[arg(long)]
        specialty: Option<String>,

        #[arg(long, default_value = "")]
        min_rating: String,

        /// Include drivers that are not verified
        #[arg(long)]
        all: bool,

        /// Only drivers available now
        #[arg(long)]
        available: bool,

        /// Sort key (rating, experience, completed, price, recent)
        #[arg(long, default_value = "rating")]
        sort: String,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Manage favorite drivers
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// List completed loads
    Completed {
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Time window (today, week)
        #[arg(long)]
        time: Option<String>,

        #[arg(long, default_value = "")]
        min_rating: String,

        #[arg(long)]
        driver: Option<String>,

        /// Only loads waiting for a rating
        #[arg(long)]
        unrated: bool,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Rate the driver of a completed load
    Rate {
        /// Load reference (e.g., CC-2024-008)
        reference: String,

        /// Stars, 1 to 5
        stars: u8,

        #[arg(long)]
        review: Option<String>,
    },

    /// Remind me to rate a load later, or list reminders
    Remind {
        /// Load reference. Lists reminders when omitted.
        reference: Option<String>,

        /// Only reminders that are due now
        #[arg(long)]
        due: bool,
    },

    /// List the company's published loads
    Published {
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Status (pending, quotes, assigned, in_progress, completed, cancelled)
        #[arg(long)]
        status: Option<String>,

        /// Hide completed and cancelled loads
        #[arg(long)]
        active: bool,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Move a published load through its lifecycle
    Advance {
        /// Load reference
        reference: String,

        event: TripEventArg,

        /// Driver name, required for assign
        #[arg(long)]
        driver: Option<String>,
    },

    /// List the carrier's pending trips
    Trips {
        /// Status (pending, confirmed, negotiation)
        #[arg(long)]
        status: Option<String>,

        /// Date band (today, tomorrow, week)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        cargo_type: Option<String>,

        /// Price band (low, medium, high)
        #[arg(long)]
        price_band: Option<String>,

        /// Sort key (newest, oldest, price-high, price-low)
        #[arg(long, default_value = "newest")]
        sort: String,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Act on a pending trip
    Trip {
        action: TripAction,

        /// Trip id
        id: u32,

        /// Counter offer in COP, for negotiate
        #[arg(long)]
        offer: Option<u64>,
    },

    /// List the carrier's accepted trips
    Accepted {
        /// Status (ready, active, paused, completed)
        #[arg(long)]
        status: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Drive an accepted trip: schedule a confirmed trip, start, pause,
    /// resume, complete or report an issue
    Drive {
        action: DriveAction,

        /// Trip id
        id: u32,

        /// Issue type (mechanical, traffic, weather, client, other), for report
        #[arg(long)]
        kind: Option<String>,

        /// What happened, for report
        #[arg(long)]
        description: Option<String>,

        /// Estimated delay (30min, 1h, 2h, 3h, unknown), for report
        #[arg(long, default_value = "unknown")]
        delay: String,
    },

    /// The carrier's completed trips
    History {
        /// Matches trip id, cities or client
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Period (week, month, quarter, year, all)
        #[arg(long, default_value = "month")]
        period: String,

        /// Minimum stars from the client
        #[arg(long, default_value = "")]
        min_rating: String,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Notification inbox
    Notifications {
        /// Tab (all, unread, important, or a category)
        #[arg(long, default_value = "all")]
        view: String,

        /// Sort key (newest, oldest, important)
        #[arg(long, default_value = "newest")]
        sort: String,

        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Mark one notification read
        #[arg(long)]
        read: Option<u32>,

        /// Mark every notification read
        #[arg(long)]
        read_all: bool,

        /// Delete one notification
        #[arg(long)]
        delete: Option<u32>,

        /// Delete every notification
        #[arg(long)]
        clear: bool,
    },

    /// Publish a load from a TOML draft
    Publish {
        /// Draft file
        draft: PathBuf,

        /// Accept the terms and conditions
        #[arg(long)]
        accept_terms: bool,

        /// Only validate and show the confirmation summary
        #[arg(long)]
        dry_run: bool,
    },

    /// Export completed loads to Excel
    Export {
        /// Output directory. Defaults to the data directory.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Import loads from CSV onto the board
    ImportLoads {
        /// CSV file (origin,destination,weight_kg,volume_m3,cargo_type,price,urgency,distance_km)
        csv: PathBuf,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set records per page
        #[arg(long)]
        set_page_size: Option<usize>,

        /// Set simulated backend latency (ms)
        #[arg(long)]
        set_latency: Option<u64>,

        /// Set simulated backend failure rate (0.0 - 1.0)
        #[arg(long)]
        set_failure_rate: Option<f64>,

        /// Set search debounce (ms)
        #[arg(long)]
        set_debounce: Option<u64>,

        /// Set toast queue capacity
        #[arg(long)]
        set_toast_capacity: Option<usize>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Load board filters, shared by `loads` and `presets save`
#[derive(Args, Debug, Clone)]
pub struct LoadFilterArgs {
    /// Quick filter (all, nearby, urgent, matching)
    #[arg(long, default_value = "all")]
    pub quick: String,

    #[arg(long)]
    pub origin: Option<String>,

    #[arg(long)]
    pub destination: Option<String>,

    /// Minimum weight in kg
    #[arg(long, default_value = "")]
    pub weight_min: String,

    /// Maximum weight in kg
    #[arg(long, default_value = "")]
    pub weight_max: String,

    /// Minimum price in COP
    #[arg(long, default_value = "")]
    pub price_min: String,

    /// Maximum price in COP
    #[arg(long, default_value = "")]
    pub price_max: String,

    /// Cargo types to include (repeatable)
    #[arg(long = "cargo-type")]
    pub cargo_types: Vec<String>,

    /// Free-text search over cities and cargo type
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

#[derive(Subcommand)]
pub enum PresetsAction {
    /// List saved presets; the default one is marked with *
    List,
    /// Save the given filters under a name
    Save {
        name: String,

        /// Use this preset when the board opens without filters
        #[arg(long)]
        default: bool,

        #[command(flatten)]
        filters: LoadFilterArgs,
    },
    /// Show the filters of one preset
    Show { name: String },
    /// Delete a preset
    Delete { name: String },
}

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List saved drivers
    List,
    /// Save a driver by name
    Add { name: String },
    /// Remove a saved driver
    Remove { name: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TripEventArg {
    Quote,
    Assign,
    Start,
    Complete,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TripAction {
    Confirm,
    Reject,
    Negotiate,
    AcceptCounter,
    CancelNegotiation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DriveAction {
    Schedule,
    Start,
    Pause,
    Resume,
    Complete,
    Report,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_defaults() {
        let cli = Cli::try_parse_from(["connectcargo", "loads"]).unwrap();
        match cli.command {
            Commands::Loads {
                filters,
                preset,
                sort,
                page,
            } => {
                assert_eq!(filters.quick, "all");
                assert_eq!(filters.weight_min, "");
                assert!(preset.is_none());
                assert_eq!(sort, "newest");
                assert_eq!(page, 1);
            }
            _ => panic!("expected loads"),
        }
        assert!(cli.format.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "connectcargo",
            "trip",
            "negotiate",
            "4",
            "--offer",
            "950000",
            "--format",
            "json",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(cli.verbose);
        match cli.command {
            Commands::Trip { action, id, offer } => {
                assert_eq!(action, TripAction::Negotiate);
                assert_eq!(id, 4);
                assert_eq!(offer, Some(950_000));
            }
            _ => panic!("expected trip"),
        }
    }

    #[test]
    fn test_preset_save_takes_load_filters() {
        let cli = Cli::try_parse_from([
            "connectcargo",
            "presets",
            "save",
            "Rutas Frecuentes",
            "--default",
            "--origin",
            "Bogotá",
            "--cargo-type",
            "general",
        ])
        .unwrap();
        match cli.command {
            Commands::Presets {
                action: PresetsAction::Save { name, default, filters },
            } => {
                assert_eq!(name, "Rutas Frecuentes");
                assert!(default);
                assert_eq!(filters.origin.as_deref(), Some("Bogotá"));
                assert_eq!(filters.cargo_types, vec!["general"]);
            }
            _ => panic!("expected presets save"),
        }
    }

    #[test]
    fn test_drive_report_flags() {
        let cli = Cli::try_parse_from([
            "connectcargo",
            "drive",
            "report",
            "6",
            "--kind",
            "traffic",
            "--description",
            "Cierre vial",
        ])
        .unwrap();
        match cli.command {
            Commands::Drive { action, id, kind, delay, .. } => {
                assert_eq!(action, DriveAction::Report);
                assert_eq!(id, 6);
                assert_eq!(kind.as_deref(), Some("traffic"));
                assert_eq!(delay, "unknown");
            }
            _ => panic!("expected drive"),
        }
    }

    #[test]
    fn test_rate_requires_stars() {
        assert!(Cli::try_parse_from(["connectcargo", "rate", "CC-2024-008"]).is_err());
        assert!(Cli::try_parse_from(["connectcargo", "advance", "CC-2024-001", "teleport"]).is_err());
    }
}
