//! CSV import of carrier board loads
//!
//! Columns: origin, destination, weight_kg, volume_m3, cargo_type, price,
//! urgency, distance_km. A header row is optional.

use std::path::Path;

use connectcargo_domain::model::{Load, Place, PriceType};
use connectcargo_types::{Error, Result};

const COLUMNS: usize = 8;

/// Read loads from a CSV file, numbering them from `first_id`
pub fn import_loads(path: &Path, first_id: u32) -> Result<Vec<Load>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut loads = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row = row_idx + 1;

        if row == 1 && is_header(&record) {
            continue;
        }
        if record.iter().all(str::is_empty) {
            continue;
        }

        let id = first_id + loads.len() as u32;
        loads.push(parse_record(&record, row, id)?);
    }

    tracing::info!(path = %path.display(), count = loads.len(), "loads imported");
    Ok(loads)
}

fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|first| first.eq_ignore_ascii_case("origin"))
}

fn parse_record(record: &csv::StringRecord, row: usize, id: u32) -> Result<Load> {
    if record.len() < COLUMNS {
        return Err(Error::InvalidRecord {
            row,
            reason: format!("expected {} columns, found {}", COLUMNS, record.len()),
        });
    }

    let text = |idx: usize| record.get(idx).unwrap_or("");
    let number = |idx: usize, name: &str| -> Result<f64> {
        text(idx).parse::<f64>().map_err(|_| Error::InvalidRecord {
            row,
            reason: format!("{} is not a number: {:?}", name, text(idx)),
        })
    };

    let origin = text(0);
    let destination = text(1);
    if origin.is_empty() || destination.is_empty() {
        return Err(Error::InvalidRecord {
            row,
            reason: "origin and destination are required".to_string(),
        });
    }

    Ok(Load {
        id,
        origin: Place::new(origin, ""),
        destination: Place::new(destination, ""),
        weight_kg: number(2, "weight_kg")?.round() as u32,
        volume_m3: number(3, "volume_m3")?,
        cargo_type: text(4).parse()?,
        pickup_time: String::new(),
        delivery_time: String::new(),
        price: number(5, "price")?.round() as u64,
        price_type: PriceType::Fixed,
        distance_km: number(7, "distance_km")?.round() as u32,
        urgency: text(6).parse()?,
        matches_route: false,
        is_new: true,
        is_express: false,
    })
}
