//! Command handlers

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, Utc};
use connectcargo_app::repository::{open_favorites_repo, open_presets_repo, open_reminders_repo};
use connectcargo_app::{
    form_from_toml, BoardSession, Config, FavoritesService, PresetService, ReminderService,
    SimulatedBackend,
};
use connectcargo_domain::model::TripEvent;
use connectcargo_domain::query::{
    parse_bound, AcceptedCriteria, CompletedCriteria, DriverCriteria, LoadCriteria,
    NotificationCriteria, PendingCriteria, PublishedCriteria, QuickFilter, TripHistoryCriteria,
};
use connectcargo_domain::wizard::format_currency;
use connectcargo_infra::{import_loads, load_board, sample_board, save_board};
use connectcargo_types::{Error, OutputFormat, Result};

use crate::cli::{
    Cli, Commands, DriveAction, FavoritesAction, LoadFilterArgs, PresetsAction, TripAction,
    TripEventArg,
};
use crate::output::*;

const BOARD_FILE: &str = "board.json";

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    if let Commands::Config {
        show,
        set_output,
        set_data_dir,
        set_page_size,
        set_latency,
        set_failure_rate,
        set_debounce,
        set_toast_capacity,
        reset,
    } = &cli.command
    {
        return cmd_config(ConfigChanges {
            show: *show,
            output: *set_output,
            data_dir: set_data_dir.clone(),
            page_size: *set_page_size,
            latency: *set_latency,
            failure_rate: *set_failure_rate,
            debounce: *set_debounce,
            toast_capacity: *set_toast_capacity,
            reset: *reset,
        });
    }

    let config = Config::load()?;
    let format = cli.format.unwrap_or(config.output_format);
    let board_path = board_path(&cli, &config)?;

    if let Commands::ImportLoads { csv } = &cli.command {
        return cmd_import_loads(&board_path, csv);
    }

    let session = open_session(&board_path, &config)?;
    let result = run(&cli.command, &session, &config, format).await;

    output_toasts(&session.toasts().drain());
    if result.as_ref().is_ok_and(|changed| *changed) {
        save_board(&board_path, &session.snapshot().await)?;
        tracing::debug!(path = %board_path.display(), "board saved");
    }
    result.map(|_| ())
}

fn board_path(cli: &Cli, config: &Config) -> Result<PathBuf> {
    match &cli.data {
        Some(path) => Ok(path.clone()),
        None => Ok(config.data_dir()?.join(BOARD_FILE)),
    }
}

fn open_session(board_path: &Path, config: &Config) -> Result<BoardSession> {
    let board = if board_path.exists() {
        load_board(board_path)?
    } else {
        tracing::debug!(path = %board_path.display(), "no board file, using sample board");
        sample_board()?
    };
    let backend = SimulatedBackend::from_config(config);
    Ok(BoardSession::new(board, Arc::new(backend), config))
}

/// Run a board command; returns whether the board changed
async fn run(command: &Commands, session: &BoardSession, config: &Config, format: OutputFormat) -> Result<bool> {
    match command {
        Commands::Loads {
            filters,
            preset,
            sort,
            page,
        } => {
            let presets = PresetService::new(open_presets_repo(config)?);
            let flags = load_criteria(filters)?;
            let criteria = match preset {
                Some(name) => {
                    let (base, message) = presets.load(name)?;
                    session.toasts().success(message);
                    overlay(base, flags)
                }
                None if flags.is_unconstrained() => presets.default_criteria()?.unwrap_or(flags),
                None => flags,
            };
            let sort = sort.parse()?;
            let listed = session.loads(&criteria, sort, *page).await;
            output_loads(format, &listed)?;
            if format == OutputFormat::Table {
                output_filters(&criteria);
                let stats = session.load_stats(&criteria).await;
                println!("{} cargas disponibles, {} cercanas", stats.total, stats.nearby);
            }
            Ok(false)
        }

        Commands::Presets { action } => {
            let presets = PresetService::new(open_presets_repo(config)?);
            match action {
                PresetsAction::List => output_presets(format, &presets.list()?)?,
                PresetsAction::Save {
                    name,
                    default,
                    filters,
                } => {
                    let criteria = load_criteria(filters)?;
                    match presets.save(name, &criteria, *default, Utc::now()) {
                        Ok(message) => session.toasts().success(message),
                        Err(e) => {
                            match &e {
                                Error::MissingField(_) => session
                                    .toasts()
                                    .error("Por favor ingresa un nombre para el preset"),
                                Error::NoActiveFilters => session
                                    .toasts()
                                    .warning("No hay filtros activos para guardar como preset"),
                                _ => {}
                            }
                            return Err(e);
                        }
                    }
                }
                PresetsAction::Show { name } => {
                    let (criteria, _) = presets.load(name)?;
                    if format == OutputFormat::Json {
                        output_json(&criteria)?;
                    } else {
                        output_filters(&criteria);
                    }
                }
                PresetsAction::Delete { name } => session.toasts().info(presets.delete(name)?),
            }
            Ok(false)
        }

        Commands::Accept { id } => {
            let trip = session.accept_load(*id).await?;
            if format == OutputFormat::Json {
                output_json(&trip)?;
            }
            Ok(true)
        }

        Commands::Drivers {
            search,
            location,
            vehicle,
            specialty,
            min_rating,
            all,
            available,
            sort,
            page,
        } => {
            let criteria = DriverCriteria {
                search: search.clone(),
                location: location.clone(),
                vehicle_type: vehicle.clone(),
                specialty: specialty.clone(),
                min_rating: parse_bound("min_rating", min_rating)?,
                verified_only: !all,
                available_now: *available,
            };
            let listed = session.drivers(&criteria, sort.parse()?, *page).await;
            output_drivers(format, &listed)?;
            Ok(false)
        }

        Commands::Favorites { action } => {
            let favorites = FavoritesService::new(open_favorites_repo(config)?);
            match action {
                FavoritesAction::List => output_favorites(format, &favorites.list()?)?,
                FavoritesAction::Add { name } => {
                    let driver = session.driver_named(name).await?;
                    session.toasts().success(favorites.add(&driver)?);
                }
                FavoritesAction::Remove { name } => {
                    session.toasts().info(favorites.remove(name)?);
                }
            }
            Ok(false)
        }

        Commands::Completed {
            search,
            time,
            min_rating,
            driver,
            unrated,
            page,
        } => {
            let criteria = CompletedCriteria {
                search: search.clone(),
                time: time.as_deref().map(str::parse).transpose()?,
                min_rating: parse_bound("min_rating", min_rating)?,
                driver: driver.clone(),
                unrated_only: *unrated,
            };
            let listed = session.completed(&criteria, *page).await;
            output_completed(format, &listed)?;
            Ok(false)
        }

        Commands::Rate {
            reference,
            stars,
            review,
        } => {
            let rated = session.rate(reference, *stars, review.as_deref()).await?;
            let reminders = ReminderService::new(open_reminders_repo(config)?);
            reminders.rated(rated.id)?;
            if format == OutputFormat::Json {
                output_json(&rated)?;
            }
            Ok(true)
        }

        Commands::Remind { reference, due } => {
            let reminders = ReminderService::new(open_reminders_repo(config)?);
            match reference {
                Some(reference) => {
                    let board = session.snapshot().await;
                    let load = board
                        .completed
                        .iter()
                        .find(|c| c.reference.eq_ignore_ascii_case(reference))
                        .ok_or_else(|| Error::NotFound(format!("completed load {}", reference)))?;
                    session.toasts().info(reminders.remind_later(load, Utc::now())?);
                }
                None => {
                    let listed = if *due {
                        reminders.due(Utc::now())?
                    } else {
                        reminders.all()?
                    };
                    output_reminders(format, &listed)?;
                }
            }
            Ok(false)
        }

        Commands::Published {
            search,
            status,
            active,
            page,
        } => {
            let criteria = PublishedCriteria {
                search: search.clone(),
                status: status.as_deref().map(str::parse).transpose()?,
                active_only: *active,
            };
            let listed = session.published(&criteria, *page).await;
            output_published(format, &listed)?;
            Ok(false)
        }

        Commands::Advance {
            reference,
            event,
            driver,
        } => {
            let event = match event {
                TripEventArg::Quote => TripEvent::ReceiveQuote,
                TripEventArg::Assign => TripEvent::Assign,
                TripEventArg::Start => TripEvent::Start,
                TripEventArg::Complete => TripEvent::Complete,
                TripEventArg::Cancel => TripEvent::Cancel,
            };
            let updated = session.advance(reference, event, driver.as_deref()).await?;
            if format == OutputFormat::Json {
                output_json(&updated)?;
            }
            Ok(true)
        }

        Commands::Trips {
            status,
            date,
            cargo_type,
            price_band,
            sort,
            page,
        } => {
            let criteria = PendingCriteria {
                status: status.as_deref().map(str::parse).transpose()?,
                date: date.clone(),
                cargo_type: cargo_type.as_deref().map(str::parse).transpose()?,
                price_band: price_band.clone(),
            };
            let listed = session.pending_trips(&criteria, sort.parse()?, *page).await;
            output_trips(format, &listed)?;
            Ok(false)
        }

        Commands::Trip { action, id, offer } => {
            let trip = match action {
                TripAction::Confirm => session.confirm_trip(*id).await?,
                TripAction::Negotiate => {
                    session.negotiate_trip(*id, offer.unwrap_or(0)).await?
                }
                TripAction::AcceptCounter => session.accept_counter_offer(*id).await?,
                TripAction::Reject => session.reject_trip(*id).await?,
                TripAction::CancelNegotiation => session.cancel_negotiation(*id).await?,
            };
            if format == OutputFormat::Json {
                output_json(&trip)?;
            }
            Ok(true)
        }

        Commands::Accepted { status, page } => {
            let criteria = AcceptedCriteria {
                status: status.as_deref().map(str::parse).transpose()?,
            };
            let listed = session.accepted_trips(&criteria, *page).await;
            output_accepted(format, &listed)?;
            Ok(false)
        }

        Commands::Drive {
            action,
            id,
            kind,
            description,
            delay,
        } => {
            let today = Local::now().date_naive();
            let trip = match action {
                DriveAction::Schedule => session.schedule_trip(*id).await?,
                DriveAction::Start => session.start_trip(*id, today).await?,
                DriveAction::Pause => session.pause_trip(*id, today).await?,
                DriveAction::Resume => session.resume_trip(*id, today).await?,
                DriveAction::Complete => session.complete_trip(*id, today).await?,
                DriveAction::Report => {
                    let kind = kind.as_deref().map(str::parse).transpose()?;
                    let description = description.as_deref().unwrap_or_default();
                    let issue = session
                        .report_issue(*id, kind, description, delay.parse()?, Utc::now())
                        .await?;
                    if format == OutputFormat::Json {
                        output_json(&issue)?;
                    }
                    return Ok(true);
                }
            };
            if format == OutputFormat::Json {
                output_json(&trip)?;
            }
            Ok(true)
        }

        Commands::History {
            search,
            period,
            min_rating,
            page,
        } => {
            let criteria = TripHistoryCriteria {
                search: search.clone(),
                period: period.parse()?,
                min_rating: parse_bound("min_rating", min_rating)?,
                today: Local::now().date_naive(),
            };
            let listed = session.trip_history(&criteria, *page).await;
            output_history(format, &listed)?;
            Ok(false)
        }

        Commands::Notifications {
            view,
            sort,
            page,
            read,
            read_all,
            delete,
            clear,
        } => {
            let mut changed = false;
            if let Some(id) = read {
                session.mark_read(*id).await?;
                changed = true;
            }
            if *read_all {
                changed |= session.mark_all_read().await > 0;
            }
            if let Some(id) = delete {
                session.delete_notification(*id).await?;
                changed = true;
            }
            if *clear {
                changed |= session.clear_notifications().await > 0;
            }

            let criteria = NotificationCriteria { view: view.parse()? };
            let listed = session.notifications(&criteria, sort.parse()?, *page).await;
            output_notifications(format, &listed)?;
            if format == OutputFormat::Table {
                if let Some(badge) = session.unread_badge().await {
                    println!("Sin leer: {}", badge);
                }
            }
            Ok(changed)
        }

        Commands::Publish {
            draft,
            accept_terms,
            dry_run,
        } => {
            let text = std::fs::read_to_string(draft)?;
            let mut form = form_from_toml(&text, Local::now().date_naive())?;
            output_summary(format, &form.summary())?;
            if let Some(commission) = form.commission() {
                if format == OutputFormat::Table {
                    println!("Comisión:     {}", format_currency(commission));
                }
            }
            if *dry_run {
                return Ok(false);
            }
            let published = session.publish(&mut form, *accept_terms, Utc::now()).await?;
            if format == OutputFormat::Json {
                output_json(&published)?;
            } else {
                println!("\nReferencia:   {}", published.reference);
            }
            Ok(true)
        }

        Commands::Export { output } => {
            let dir = match output {
                Some(dir) => dir.clone(),
                None => config.data_dir()?,
            };
            std::fs::create_dir_all(&dir)?;
            let path = session.export_report(&dir, Local::now().date_naive()).await?;
            println!("{}", path.display());
            Ok(false)
        }

        Commands::ImportLoads { .. } | Commands::Config { .. } => Ok(false),
    }
}

fn load_criteria(filters: &LoadFilterArgs) -> Result<LoadCriteria> {
    Ok(LoadCriteria {
        quick: filters.quick.parse()?,
        origin: filters.origin.clone(),
        destination: filters.destination.clone(),
        weight_min: parse_bound("weight_min", &filters.weight_min)?,
        weight_max: parse_bound("weight_max", &filters.weight_max)?,
        price_min: parse_bound("price_min", &filters.price_min)?,
        price_max: parse_bound("price_max", &filters.price_max)?,
        cargo_types: filters
            .cargo_types
            .iter()
            .map(|t| t.parse())
            .collect::<Result<Vec<_>>>()?,
        search: filters.search.clone(),
    })
}

/// Flags given next to `--preset` win over the preset's own values
fn overlay(mut base: LoadCriteria, flags: LoadCriteria) -> LoadCriteria {
    if flags.quick != QuickFilter::All {
        base.quick = flags.quick;
    }
    if flags.origin.is_some() {
        base.origin = flags.origin;
    }
    if flags.destination.is_some() {
        base.destination = flags.destination;
    }
    base.weight_min = flags.weight_min.or(base.weight_min);
    base.weight_max = flags.weight_max.or(base.weight_max);
    base.price_min = flags.price_min.or(base.price_min);
    base.price_max = flags.price_max.or(base.price_max);
    if !flags.cargo_types.is_empty() {
        base.cargo_types = flags.cargo_types;
    }
    if flags.search.is_some() {
        base.search = flags.search;
    }
    base
}

fn cmd_import_loads(board_path: &Path, csv: &Path) -> Result<()> {
    let mut board = if board_path.exists() {
        load_board(board_path)?
    } else {
        sample_board()?
    };
    let loads = import_loads(csv, board.next_load_id())?;
    let count = loads.len();
    board.loads.extend(loads);
    save_board(board_path, &board)?;

    tracing::info!(count, path = %board_path.display(), "loads imported");
    println!("{} cargas importadas", count);
    Ok(())
}

struct ConfigChanges {
    show: bool,
    output: Option<OutputFormat>,
    data_dir: Option<PathBuf>,
    page_size: Option<usize>,
    latency: Option<u64>,
    failure_rate: Option<f64>,
    debounce: Option<u64>,
    toast_capacity: Option<usize>,
    reset: bool,
}

fn cmd_config(changes: ConfigChanges) -> Result<()> {
    if changes.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(output_format) = changes.output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(dir) = changes.data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(page_size) = changes.page_size {
        config.page_size = page_size;
        modified = true;
    }

    if let Some(latency) = changes.latency {
        config.latency_ms = latency;
        modified = true;
    }

    if let Some(rate) = changes.failure_rate {
        config.failure_rate = rate;
        modified = true;
    }

    if let Some(debounce) = changes.debounce {
        config.debounce_ms = debounce;
        modified = true;
    }

    if let Some(capacity) = changes.toast_capacity {
        config.toast_capacity = capacity;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if changes.show || !modified {
        println!("{}", config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_import_appends_to_sample_board() {
        let dir = tempfile::tempdir().unwrap();
        let board_path = dir.path().join(BOARD_FILE);
        let csv = dir.path().join("loads.csv");
        fs::write(
            &csv,
            "origin,destination,weight_kg,volume_m3,cargo_type,price,urgency,distance_km\n\
             Bogotá,Tunja,1500,10.5,general,700000,medium,18\n\
             Cali,Buga,900,6,fragile,450000,low,40\n",
        )
        .unwrap();

        cmd_import_loads(&board_path, &csv).unwrap();

        let board = load_board(&board_path).unwrap();
        assert_eq!(board.loads.len(), 6);
        assert_eq!(board.loads[4].id, 5);
        assert_eq!(board.loads[5].destination.city, "Buga");
    }

    #[tokio::test]
    async fn test_nan_min_rating_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            latency_ms: 0,
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let session = open_session(&dir.path().join(BOARD_FILE), &config).unwrap();
        let command = Commands::Drivers {
            search: None,
            location: None,
            vehicle: None,
            specialty: None,
            min_rating: "NaN".to_string(),
            all: true,
            available: false,
            sort: "rating".to_string(),
            page: 1,
        };

        let err = run(&command, &session, &config, OutputFormat::Json)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFilterValue { field: "min_rating", .. }));
    }

    fn quiet_config(dir: &Path) -> Config {
        Config {
            latency_ms: 0,
            failure_rate: 0.0,
            data_dir: Some(dir.to_path_buf()),
            ..Config::default()
        }
    }

    fn no_filters() -> LoadFilterArgs {
        LoadFilterArgs {
            quick: "all".to_string(),
            origin: None,
            destination: None,
            weight_min: String::new(),
            weight_max: String::new(),
            price_min: String::new(),
            price_max: String::new(),
            cargo_types: Vec::new(),
            search: None,
        }
    }

    #[test]
    fn test_flags_override_preset() {
        let preset = LoadCriteria {
            origin: Some("Bogotá".to_string()),
            price_max: Some(2_000_000),
            ..LoadCriteria::default()
        };
        let flags = LoadCriteria {
            quick: QuickFilter::Urgent,
            price_max: Some(1_000_000),
            ..LoadCriteria::default()
        };
        let merged = overlay(preset, flags);
        assert_eq!(merged.quick, QuickFilter::Urgent);
        assert_eq!(merged.origin.as_deref(), Some("Bogotá"));
        assert_eq!(merged.price_max, Some(1_000_000));
    }

    #[tokio::test]
    async fn test_preset_without_filters_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let config = quiet_config(dir.path());
        let session = open_session(&dir.path().join(BOARD_FILE), &config).unwrap();
        let command = Commands::Presets {
            action: PresetsAction::Save {
                name: "Todo".to_string(),
                default: false,
                filters: no_filters(),
            },
        };

        let err = run(&command, &session, &config, OutputFormat::Json)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoActiveFilters));
        let toasts = session.toasts().drain();
        assert_eq!(toasts[0].message, "No hay filtros activos para guardar como preset");

        let command = Commands::Presets {
            action: PresetsAction::Save {
                name: "Desde Bogotá".to_string(),
                default: true,
                filters: LoadFilterArgs {
                    origin: Some("Bogotá".to_string()),
                    ..no_filters()
                },
            },
        };
        run(&command, &session, &config, OutputFormat::Json).await.unwrap();
        let presets = PresetService::new(open_presets_repo(&config).unwrap());
        assert_eq!(
            presets.default_criteria().unwrap().and_then(|c| c.origin),
            Some("Bogotá".to_string())
        );
    }

    #[tokio::test]
    async fn test_schedule_then_start() {
        let dir = tempfile::tempdir().unwrap();
        let config = quiet_config(dir.path());
        let session = open_session(&dir.path().join(BOARD_FILE), &config).unwrap();
        for action in [DriveAction::Schedule, DriveAction::Start] {
            let command = Commands::Drive {
                action,
                id: 3,
                kind: None,
                description: None,
                delay: "unknown".to_string(),
            };
            assert!(run(&command, &session, &config, OutputFormat::Json).await.unwrap());
        }

        let board = session.snapshot().await;
        let trip = board.accepted_trips.iter().find(|t| t.id == 3).unwrap();
        assert_eq!(trip.status.as_str(), "active");
    }

    #[tokio::test]
    async fn test_changed_board_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let board_path = dir.path().join(BOARD_FILE);
        let config = Config {
            latency_ms: 0,
            failure_rate: 0.0,
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };

        let session = open_session(&board_path, &config).unwrap();
        let changed = run(
            &Commands::Accept { id: 2 },
            &session,
            &config,
            OutputFormat::Json,
        )
        .await
        .unwrap();
        assert!(changed);
        save_board(&board_path, &session.snapshot().await).unwrap();

        let reopened = open_session(&board_path, &config).unwrap();
        assert!(reopened.snapshot().await.find_load(2).is_none());
    }
}
