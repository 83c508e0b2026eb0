//! Excel report of completed loads

use std::path::Path;

use chrono::NaiveDate;
use connectcargo_domain::model::CompletedLoad;
use connectcargo_types::{Error, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

/// `reporte_cargas_completadas_<YYYY-MM-DD>.xlsx`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("reporte_cargas_completadas_{}.xlsx", date.format("%Y-%m-%d"))
}

/// Write the completed loads report to `output_path`
pub fn export_completed_loads(
    loads: &[CompletedLoad],
    generated_on: NaiveDate,
    output_path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, loads, generated_on)?;

    let details_sheet = workbook.add_worksheet();
    write_details_sheet(details_sheet, loads)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    tracing::info!(path = %output_path.display(), rows = loads.len(), "report written");
    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    loads: &[CompletedLoad],
    generated_on: NaiveDate,
) -> Result<()> {
    sheet
        .set_name("Resumen")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "Reporte de cargas completadas", &header_format)
        .map_err(|e| Error::Excel(e.to_string()))?;

    let rated: Vec<f64> = loads
        .iter()
        .filter_map(|l| l.user_rating.as_ref().map(|r| r.value))
        .collect();
    let average = if rated.is_empty() {
        0.0
    } else {
        rated.iter().sum::<f64>() / rated.len() as f64
    };
    let total_paid: u64 = loads.iter().map(|l| l.route.price).sum();
    let total_km: u32 = loads.iter().map(|l| l.route.distance_km).sum();

    let rows: [(&str, f64); 5] = [
        ("Cargas completadas:", loads.len() as f64),
        ("Calificadas:", rated.len() as f64),
        ("Calificación promedio:", average),
        ("Total pagado (COP):", total_paid as f64),
        ("Distancia total (km):", f64::from(total_km)),
    ];

    sheet
        .write_string(2, 0, "Generado:")
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .write_string(2, 1, generated_on.format("%Y-%m-%d").to_string())
        .map_err(|e| Error::Excel(e.to_string()))?;

    for (offset, (label, value)) in rows.iter().enumerate() {
        let row = 3 + offset as u32;
        sheet
            .write_string(row, 0, *label)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 1, *value)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    Ok(())
}

fn write_details_sheet(sheet: &mut Worksheet, loads: &[CompletedLoad]) -> Result<()> {
    sheet
        .set_name("Detalle")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();
    let headers = [
        "Referencia",
        "Completado",
        "Duración",
        "Conductor",
        "Origen",
        "Destino",
        "Distancia (km)",
        "Precio (COP)",
        "Calificación",
        "Retraso",
    ];

    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    for (idx, load) in loads.iter().enumerate() {
        let row = (idx + 1) as u32;
        let texts = [
            (0, load.reference.as_str()),
            (1, load.completed.label()),
            (2, load.duration.as_str()),
            (3, load.driver.name.as_str()),
            (4, load.route.origin.as_str()),
            (5, load.route.destination.as_str()),
            (9, load.delay.as_deref().unwrap_or("")),
        ];
        for (col, text) in texts {
            sheet
                .write_string(row, col, text)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }

        sheet
            .write_number(row, 6, f64::from(load.route.distance_km))
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 7, load.route.price as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;
        match &load.user_rating {
            Some(rating) => sheet
                .write_number(row, 8, rating.value)
                .map_err(|e| Error::Excel(e.to_string()))?,
            None => sheet
                .write_string(row, 8, "Sin calificar")
                .map_err(|e| Error::Excel(e.to_string()))?,
        };
    }

    sheet.autofit();

    Ok(())
}
