//! Output formatting module

use connectcargo_domain::model::{
    AcceptedTrip, CompletedLoad, Driver, DriverSummary, Load, Notification, PendingTrip,
    PublishedLoad,
};
use connectcargo_domain::notifier::Toast;
use connectcargo_domain::query::{LoadCriteria, Page};
use connectcargo_domain::repository::{FilterPreset, RatingReminder};
use connectcargo_domain::wizard::{format_currency, ConfirmationSummary};
use connectcargo_types::{OutputFormat, Result};
use serde::Serialize;

pub fn output_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn page_footer<T>(page: &Page<T>, noun: &str) {
    println!();
    println!("{}", page.summary(noun));
    if page.total_pages > 1 {
        println!("Página {} de {}", page.page, page.total_pages);
    }
}

/// Print a page in the chosen format, calling `table` for table mode
fn output_page<T: Serialize>(
    format: OutputFormat,
    page: &Page<T>,
    noun: &str,
    empty: &str,
    table: impl FnOnce(&[T]),
) -> Result<()> {
    if format == OutputFormat::Json {
        return output_json(page);
    }
    if page.is_empty() {
        println!("{}", empty);
        page_footer(page, noun);
        return Ok(());
    }
    table(&page.items);
    page_footer(page, noun);
    Ok(())
}

pub fn output_loads(format: OutputFormat, page: &Page<Load>) -> Result<()> {
    output_page(format, page, "cargas", "No se encontraron cargas.", |loads| {
        println!(
            "{:>4} {:<22} {:<22} {:>8} {:<13} {:>16} {:>6} {:<6}",
            "ID", "Origen", "Destino", "Peso", "Tipo", "Precio", "km", "Urg."
        );
        println!("{}", "-".repeat(104));
        for load in loads {
            println!(
                "{:>4} {:<22} {:<22} {:>6}kg {:<13} {:>16} {:>6} {:<6}",
                load.id,
                truncate(&load.origin.city, 22),
                truncate(&load.destination.city, 22),
                load.weight_kg,
                load.cargo_type.label(),
                format_currency(load.price),
                load.distance_km,
                load.urgency.as_str(),
            );
        }
    })
}

pub fn output_drivers(format: OutputFormat, page: &Page<Driver>) -> Result<()> {
    output_page(format, page, "conductores", "No se encontraron conductores.", |drivers| {
        println!(
            "{:>4} {:<22} {:>6} {:<16} {:>5} {:>7} {:<10}",
            "ID", "Nombre", "Rating", "Ubicación", "Años", "Viajes", "Estado"
        );
        println!("{}", "-".repeat(76));
        for driver in drivers {
            let status = match (driver.verified, driver.available) {
                (true, true) => "disponible",
                (true, false) => "ocupado",
                (false, _) => "sin verif.",
            };
            println!(
                "{:>4} {:<22} {:>6.1} {:<16} {:>5} {:>7} {:<10}",
                driver.id,
                truncate(&driver.name, 22),
                driver.rating,
                truncate(&driver.location, 16),
                driver.experience_years,
                driver.completed_trips,
                status,
            );
        }
    })
}

pub fn output_completed(format: OutputFormat, page: &Page<CompletedLoad>) -> Result<()> {
    output_page(format, page, "cargas completadas", "No hay cargas completadas.", |loads| {
        println!(
            "{:<12} {:<16} {:<20} {:<28} {:>16} {:>8}",
            "Referencia", "Completada", "Conductor", "Ruta", "Precio", "Rating"
        );
        println!("{}", "-".repeat(104));
        for load in loads {
            let rating = load
                .user_rating
                .as_ref()
                .map(|r| format!("{:.1}", r.value))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<12} {:<16} {:<20} {:<28} {:>16} {:>8}",
                load.reference,
                truncate(load.completed.label(), 16),
                truncate(&load.driver.name, 20),
                truncate(&format!("{} → {}", load.route.origin, load.route.destination), 28),
                format_currency(load.route.price),
                rating,
            );
        }
    })
}

pub fn output_published(format: OutputFormat, page: &Page<PublishedLoad>) -> Result<()> {
    output_page(format, page, "cargas publicadas", "No tienes cargas publicadas.", |loads| {
        println!(
            "{:<12} {:<17} {:<28} {:<14} {:>16} {:>5} {:<20}",
            "Referencia", "Estado", "Ruta", "Recogida", "Presupuesto", "Cot.", "Conductor"
        );
        println!("{}", "-".repeat(118));
        for load in loads {
            let driver = load
                .driver
                .as_ref()
                .map(|d| d.name.as_str())
                .unwrap_or("-");
            println!(
                "{:<12} {:<17} {:<28} {:<14} {:>16} {:>5} {:<20}",
                load.reference,
                load.status.label(),
                truncate(
                    &format!("{} → {}", load.origin.place.city, load.destination.place.city),
                    28
                ),
                truncate(&load.origin.date, 14),
                format_currency(load.budget),
                load.quotes,
                truncate(driver, 20),
            );
        }
    })
}

pub fn output_trips(format: OutputFormat, page: &Page<PendingTrip>) -> Result<()> {
    output_page(format, page, "viajes", "No tienes viajes pendientes.", |trips| {
        println!(
            "{:>4} {:<28} {:<15} {:<10} {:<13} {:>16} {:>16}",
            "ID", "Ruta", "Estado", "Fecha", "Tipo", "Precio", "Contraoferta"
        );
        println!("{}", "-".repeat(108));
        for trip in trips {
            let counter = trip
                .counter_offer
                .map(format_currency)
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:>4} {:<28} {:<15} {:<10} {:<13} {:>16} {:>16}",
                trip.id,
                truncate(&format!("{} → {}", trip.origin, trip.destination), 28),
                trip.status.label(),
                trip.date,
                trip.cargo_type.label(),
                format_currency(trip.price),
                counter,
            );
        }
    })
}

fn accepted_table(trips: &[AcceptedTrip]) {
    println!(
        "{:>4} {:<28} {:<18} {:<24} {:>16} {:<10} {:>5}",
        "ID", "Ruta", "Estado", "Cliente", "Precio", "Completado", "★"
    );
    println!("{}", "-".repeat(111));
    for trip in trips {
        let client = if trip.client.is_empty() { "-" } else { trip.client.as_str() };
        let completed = trip
            .completed_on
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let rating = trip
            .rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4} {:<28} {:<18} {:<24} {:>16} {:<10} {:>5}",
            trip.id,
            truncate(&format!("{} → {}", trip.origin, trip.destination), 28),
            trip.status.label(),
            truncate(client, 24),
            format_currency(trip.price),
            completed,
            rating,
        );
        for issue in &trip.issues {
            println!(
                "       ! {}: {} (retraso: {})",
                issue.kind.label(),
                issue.description,
                issue.delay.label()
            );
        }
    }
}

pub fn output_accepted(format: OutputFormat, page: &Page<AcceptedTrip>) -> Result<()> {
    output_page(format, page, "viajes", "No tienes viajes aceptados.", accepted_table)
}

pub fn output_history(format: OutputFormat, page: &Page<AcceptedTrip>) -> Result<()> {
    output_page(
        format,
        page,
        "viajes completados",
        "No se encontraron viajes completados.",
        accepted_table,
    )
}

/// Active filter tags and the one-line summary under the load list
pub fn output_filters(criteria: &LoadCriteria) {
    let tags = criteria.active_tags();
    if !tags.is_empty() {
        let line: Vec<String> = tags.iter().map(|t| format!("[{}]", t.label)).collect();
        println!("{}", line.join(" "));
    }
    println!("{}", criteria.summary());
}

pub fn output_presets(format: OutputFormat, presets: &[FilterPreset]) -> Result<()> {
    if format == OutputFormat::Json {
        return output_json(presets);
    }
    if presets.is_empty() {
        println!("No tienes presets guardados.");
        return Ok(());
    }
    for preset in presets {
        let marker = if preset.is_default { "*" } else { " " };
        println!(
            "{} {:<24} {}",
            marker,
            truncate(&preset.name, 24),
            preset.criteria.summary()
        );
    }
    Ok(())
}

pub fn output_notifications(format: OutputFormat, page: &Page<Notification>) -> Result<()> {
    output_page(format, page, "notificaciones", "No hay notificaciones.", |notifications| {
        for n in notifications {
            let marker = if n.shows_priority_dot() { "●" } else { " " };
            let read = if n.read { " " } else { "*" };
            println!("{}{} [{:>3}] {} ({})", marker, read, n.id, n.title, n.time);
            println!("        {}", n.message);
        }
    })
}

pub fn output_favorites(format: OutputFormat, drivers: &[DriverSummary]) -> Result<()> {
    if format == OutputFormat::Json {
        return output_json(drivers);
    }
    if drivers.is_empty() {
        println!("No tienes conductores favoritos.");
        return Ok(());
    }
    println!("{:<24} {:>6} {:>7}", "Conductor", "Rating", "Viajes");
    println!("{}", "-".repeat(39));
    for driver in drivers {
        println!("{:<24} {:>6.1} {:>7}", truncate(&driver.name, 24), driver.rating, driver.trips);
    }
    Ok(())
}

pub fn output_reminders(format: OutputFormat, reminders: &[RatingReminder]) -> Result<()> {
    if format == OutputFormat::Json {
        return output_json(reminders);
    }
    if reminders.is_empty() {
        println!("No hay recordatorios de calificación.");
        return Ok(());
    }
    println!("{:<12} {:<20}", "Referencia", "Recordar");
    println!("{}", "-".repeat(33));
    for reminder in reminders {
        println!(
            "{:<12} {:<20}",
            reminder.reference,
            reminder.remind_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub fn output_summary(format: OutputFormat, summary: &ConfirmationSummary) -> Result<()> {
    if format == OutputFormat::Json {
        return output_json(summary);
    }
    println!("\nConfirmación");
    println!("============");
    println!("Origen:       {}", summary.origin);
    println!("Destino:      {}", summary.destination);
    println!("Fechas:       {}", summary.dates);
    println!("Tipo:         {}", summary.cargo_type);
    println!("Peso:         {}", summary.weight);
    println!("Dimensiones:  {}", summary.dimensions);
    println!("Vehículo:     {}", summary.vehicle);
    println!("Presupuesto:  {}", summary.budget);
    if !summary.equipment.is_empty() {
        println!("Equipo:       {}", summary.equipment);
    }
    Ok(())
}

/// Toasts go to stderr so JSON output stays parseable
pub fn output_toasts(toasts: &[Toast]) {
    for toast in toasts {
        eprintln!("[{}] {}", toast.severity, toast.message);
    }
}
