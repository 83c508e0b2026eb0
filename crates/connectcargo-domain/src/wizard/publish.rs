//! The four-step "publish load" form

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use connectcargo_types::{Error, Result};
use serde::{Deserialize, Serialize};

use super::field::{parse_date, FieldKind, FieldSpec};
use super::{Step, StepState, Wizard};
use crate::model::{
    CargoSummary, CargoType, Place, Priority, PublishedLoad, Stop, TripStatus,
};

/// Platform commission over the budget, in percent
pub const COMMISSION_PERCENT: u64 = 5;

pub const MAX_WEIGHT_KG: f64 = 40_000.0;

/// Largest budget the form accepts, in COP
pub const MAX_BUDGET_COP: f64 = 1_000_000_000_000.0;

pub const VEHICLE_TYPES: &[&str] = &[
    "van",
    "truck_small",
    "truck_medium",
    "truck_large",
    "refrigerated",
    "flatbed",
];

pub const EQUIPMENT: &[&str] = &["gps", "tarp", "straps", "ramp", "thermometer", "forklift"];

fn vehicle_label(vehicle: &str) -> &str {
    match vehicle {
        "van" => "Van/Camión 3.5T",
        "truck_small" => "Camiones 3.5T-5T",
        "truck_medium" => "Camiones 5T-10T",
        "truck_large" => "Tractomula",
        "refrigerated" => "Camiones Refrigerados 3.5T",
        "flatbed" => "Plataforma",
        other => other,
    }
}

fn steps() -> Vec<Step> {
    let dimension = || FieldKind::Number {
        min: Some(0.1),
        max: None,
    };

    vec![
        Step {
            title: "Origen y destino",
            fields: vec![
                FieldSpec::required("originCity", "Ciudad de origen", FieldKind::Text),
                FieldSpec::required("originAddress", "Dirección de recogida", FieldKind::Text),
                FieldSpec::required("destinationCity", "Ciudad de destino", FieldKind::Text),
                FieldSpec::required("destinationAddress", "Dirección de entrega", FieldKind::Text),
                FieldSpec::required(
                    "pickupDate",
                    "Fecha de recogida",
                    FieldKind::Date {
                        not_before_today: true,
                        not_before: None,
                    },
                ),
                FieldSpec::required(
                    "deliveryDate",
                    "Fecha de entrega",
                    FieldKind::Date {
                        not_before_today: true,
                        not_before: Some("pickupDate"),
                    },
                ),
            ],
        },
        Step {
            title: "Detalles de la carga",
            fields: vec![
                FieldSpec::required(
                    "cargoType",
                    "Tipo de carga",
                    FieldKind::Choice(CargoType::ALL.iter().map(|c| c.as_str()).collect()),
                ),
                FieldSpec::required(
                    "totalWeight",
                    "Peso total (kg)",
                    FieldKind::Number {
                        min: Some(1.0),
                        max: Some(MAX_WEIGHT_KG),
                    },
                ),
                FieldSpec::optional("length", "Largo (m)", dimension()),
                FieldSpec::optional("width", "Ancho (m)", dimension()),
                FieldSpec::optional("height", "Alto (m)", dimension()),
            ],
        },
        Step {
            title: "Requisitos",
            fields: vec![
                FieldSpec::required(
                    "vehicleType",
                    "Tipo de vehículo",
                    FieldKind::Choice(VEHICLE_TYPES.to_vec()),
                ),
                FieldSpec::required(
                    "budget",
                    "Presupuesto (COP)",
                    FieldKind::Number {
                        min: Some(1.0),
                        max: Some(MAX_BUDGET_COP),
                    },
                ),
                FieldSpec::optional("equipment", "Equipo requerido", FieldKind::Multi(EQUIPMENT.to_vec())),
                FieldSpec::required("contactEmail", "Email de contacto", FieldKind::Email),
                FieldSpec::optional("referenceUrl", "URL de referencia", FieldKind::Url),
                FieldSpec::optional("notes", "Instrucciones especiales", FieldKind::Text),
            ],
        },
        Step {
            title: "Confirmación",
            fields: vec![],
        },
    ]
}

/// Keep only the digits of a money input
fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Parse a budget as typed by a user, e.g. `1.200.000` or `$1,200,000`
pub fn parse_budget(raw: &str) -> Option<u64> {
    digits(raw).parse().ok()
}

/// Group thousands with `.` the way es-CO does. Non-digits are dropped;
/// input without digits yields an empty string.
pub fn format_budget(raw: &str) -> String {
    let digits = digits(raw);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return if raw.chars().any(|c| c.is_ascii_digit()) {
            "0".to_string()
        } else {
            String::new()
        };
    }

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// `$1.200.000 COP`
pub fn format_currency(amount: u64) -> String {
    format!("${} COP", format_budget(&amount.to_string()))
}

fn format_date_long(date: NaiveDate) -> String {
    const MONTHS: [&str; 12] = [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ];
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

fn format_date_short(date: NaiveDate) -> String {
    const MONTHS: [&str; 12] = [
        "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
    ];
    format!("{} {}", date.day(), MONTHS[date.month0() as usize])
}

/// What the last step shows before publishing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmationSummary {
    pub origin: String,
    pub destination: String,
    pub dates: String,
    pub cargo_type: String,
    pub weight: String,
    pub dimensions: String,
    pub vehicle: String,
    pub budget: String,
    pub equipment: String,
}

/// A submitted load, ready to be listed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadDraft {
    pub origin: Place,
    pub destination: Place,
    pub pickup_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub cargo_type: CargoType,
    pub weight_kg: u32,
    pub length_m: Option<f64>,
    pub width_m: Option<f64>,
    pub height_m: Option<f64>,
    pub vehicle_type: String,
    /// COP
    pub budget: u64,
    /// COP
    pub commission: u64,
    pub equipment: Vec<String>,
    pub contact_email: String,
    pub reference_url: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

impl LoadDraft {
    /// List the draft on the company's published loads
    pub fn into_published(self, id: u32) -> PublishedLoad {
        PublishedLoad {
            id,
            reference: format!("CC-{}-{:03}", self.submitted_at.year(), id),
            status: TripStatus::Pending,
            priority: Priority::Normal,
            origin: Stop {
                place: self.origin,
                date: format_date_short(self.pickup_date),
            },
            destination: Stop {
                place: self.destination,
                date: format_date_short(self.delivery_date),
            },
            cargo: CargoSummary {
                cargo_type: self.cargo_type.label().to_string(),
                weight: format!("{} kg", format_budget(&self.weight_kg.to_string())),
                vehicle: vehicle_label(&self.vehicle_type).to_string(),
            },
            budget: self.budget,
            published: "Hace un momento".to_string(),
            quotes: 0,
            best_quote: None,
            driver: None,
        }
    }
}

/// Commission rounded down to the peso. Never overflows.
pub fn commission_for(budget: u64) -> u64 {
    budget / 100 * COMMISSION_PERCENT + budget % 100 * COMMISSION_PERCENT / 100
}

/// Company form for publishing a new load
#[derive(Debug, Clone)]
pub struct PublishLoadForm {
    wizard: Wizard,
}

impl PublishLoadForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            wizard: Wizard::new(steps(), today),
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn current_step(&self) -> usize {
        self.wizard.current_step()
    }

    pub fn step_state(&self, step: usize) -> StepState {
        self.wizard.step_state(step)
    }

    /// Money fields are stored as bare digits
    pub fn set_value(&mut self, name: &str, value: &str) -> Result<()> {
        if name == "budget" {
            let normalized = digits(value);
            let stored = if normalized.is_empty() {
                value.trim().to_string()
            } else {
                normalized
            };
            return self.wizard.set_value(name, stored);
        }
        self.wizard.set_value(name, value)
    }

    /// Fill several fields at once, in order
    pub fn fill(&mut self, values: &BTreeMap<String, String>) -> Result<()> {
        for (name, value) in values {
            self.set_value(name, value)?;
        }
        Ok(())
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.wizard.error(name)
    }

    pub fn next_step(&mut self, target: usize) -> Result<()> {
        self.wizard.next_step(target)
    }

    pub fn previous_step(&mut self, target: usize) -> Result<()> {
        self.wizard.previous_step(target)
    }

    /// Budget shown with es-CO grouping
    pub fn budget_display(&self) -> String {
        format_budget(self.wizard.value("budget").unwrap_or(""))
    }

    pub fn commission(&self) -> Option<u64> {
        self.wizard
            .value("budget")
            .and_then(parse_budget)
            .map(commission_for)
    }

    fn text(&self, name: &str) -> &str {
        self.wizard.value(name).map(str::trim).unwrap_or("")
    }

    fn number(&self, name: &str) -> Option<f64> {
        self.wizard
            .value(name)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|n| n.is_finite())
    }

    fn equipment(&self) -> Vec<String> {
        self.text("equipment")
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn summary(&self) -> ConfirmationSummary {
        let date = |name: &str| {
            parse_date(self.text(name))
                .map(format_date_long)
                .unwrap_or_else(|| "-".to_string())
        };

        let dimensions: Vec<&str> = ["length", "width", "height"]
            .into_iter()
            .map(|name| self.text(name))
            .filter(|v| !v.is_empty())
            .collect();

        let cargo_type = self
            .text("cargoType")
            .parse::<CargoType>()
            .map(|c| c.label().to_string())
            .unwrap_or_else(|_| "-".to_string());

        let vehicle = match self.text("vehicleType") {
            "" => "-".to_string(),
            v => vehicle_label(v).to_string(),
        };

        let budget = match self.wizard.value("budget").and_then(parse_budget) {
            Some(amount) => format_currency(amount),
            None => "-".to_string(),
        };

        ConfirmationSummary {
            origin: format!("{} - {}", self.text("originCity"), self.text("originAddress")),
            destination: format!(
                "{} - {}",
                self.text("destinationCity"),
                self.text("destinationAddress")
            ),
            dates: format!("{} al {}", date("pickupDate"), date("deliveryDate")),
            cargo_type,
            weight: format!("{} kg", self.text("totalWeight")),
            dimensions: if dimensions.is_empty() {
                "No especificado".to_string()
            } else {
                format!("{} m", dimensions.join(" x "))
            },
            vehicle,
            budget,
            equipment: self.equipment().join(", "),
        }
    }

    /// Publish the load. Requires the terms to be accepted and every step valid.
    pub fn submit(&mut self, consent: bool, now: DateTime<Utc>) -> Result<LoadDraft> {
        self.wizard.finish(consent)?;

        let invalid = |step: usize, name: &str| Error::StepInvalid {
            step,
            fields: vec![name.to_string()],
        };
        let pickup_date =
            parse_date(self.text("pickupDate")).ok_or_else(|| invalid(1, "pickupDate"))?;
        let delivery_date =
            parse_date(self.text("deliveryDate")).ok_or_else(|| invalid(1, "deliveryDate"))?;
        let cargo_type: CargoType = self.text("cargoType").parse()?;
        let weight_kg = self
            .number("totalWeight")
            .filter(|w| (1.0..=MAX_WEIGHT_KG).contains(w))
            .map(|w| w.round() as u32)
            .ok_or_else(|| invalid(2, "totalWeight"))?;
        let budget = parse_budget(self.text("budget")).ok_or_else(|| invalid(3, "budget"))?;
        let optional = |name: &str| Some(self.text(name)).filter(|v| !v.is_empty()).map(str::to_string);

        Ok(LoadDraft {
            origin: Place::new(self.text("originCity"), self.text("originAddress")),
            destination: Place::new(self.text("destinationCity"), self.text("destinationAddress")),
            pickup_date,
            delivery_date,
            cargo_type,
            weight_kg,
            length_m: self.number("length"),
            width_m: self.number("width"),
            height_m: self.number("height"),
            vehicle_type: self.text("vehicleType").to_string(),
            budget,
            commission: commission_for(budget),
            equipment: self.equipment(),
            contact_email: self.text("contactEmail").to_string(),
            reference_url: optional("referenceUrl"),
            notes: optional("notes"),
            status: "published".to_string(),
            submitted_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 15).unwrap()
    }

    fn filled() -> PublishLoadForm {
        let mut form = PublishLoadForm::new(today());
        for (name, value) in [
            ("originCity", "Bogotá"),
            ("originAddress", "Calle 13 # 68-45"),
            ("destinationCity", "Medellín"),
            ("destinationAddress", "Carrera 50 # 10-20"),
            ("pickupDate", "2024-12-18"),
            ("deliveryDate", "2024-12-19"),
            ("cargoType", "refrigerated"),
            ("totalWeight", "800"),
            ("vehicleType", "refrigerated"),
            ("budget", "1.200.000"),
            ("equipment", "gps,thermometer"),
            ("contactEmail", "logistica@frescos.co"),
        ] {
            form.set_value(name, value).unwrap();
        }
        form
    }

    #[test]
    fn test_format_budget() {
        assert_eq!(format_budget("1200000"), "1.200.000");
        assert_eq!(format_budget("$ 950,000"), "950.000");
        assert_eq!(format_budget("999"), "999");
        assert_eq!(format_budget("abc"), "");
        assert_eq!(format_currency(2_500_000), "$2.500.000 COP");
    }

    #[test]
    fn test_blank_first_step_blocks() {
        let mut form = PublishLoadForm::new(today());
        let err = form.next_step(2).unwrap_err();
        assert!(matches!(err, Error::StepInvalid { step: 1, ref fields } if fields.len() == 6));
        assert_eq!(form.current_step(), 1);
        assert_eq!(form.error("originCity"), Some("Este campo es requerido"));
    }

    #[test]
    fn test_delivery_before_pickup_rejected() {
        let mut form = filled();
        form.set_value("deliveryDate", "2024-12-17").unwrap();
        assert!(form.next_step(2).is_err());
        assert_eq!(
            form.error("deliveryDate"),
            Some("La fecha de entrega debe ser posterior a la de recogida")
        );
    }

    #[test]
    fn test_walks_all_steps() {
        let mut form = filled();
        form.next_step(2).unwrap();
        form.next_step(3).unwrap();
        form.next_step(4).unwrap();
        assert_eq!(form.step_state(3), StepState::Completed);
        assert_eq!(form.budget_display(), "1.200.000");
        assert_eq!(form.commission(), Some(60_000));
    }

    #[test]
    fn test_nan_weight_blocks_details_step() {
        let mut form = filled();
        form.set_value("totalWeight", "NaN").unwrap();
        form.next_step(2).unwrap();
        assert!(matches!(
            form.next_step(3),
            Err(Error::StepInvalid { step: 2, ref fields }) if fields == &vec!["totalWeight".to_string()]
        ));
        assert_eq!(form.error("totalWeight"), Some("Ingresa un número válido"));

        let now = Utc.with_ymd_and_hms(2024, 12, 15, 10, 0, 0).unwrap();
        assert!(form.submit(true, now).is_err());
    }

    #[test]
    fn test_nan_budget_blocks_requirements_step() {
        let mut form = filled();
        form.set_value("budget", "NaN").unwrap();
        form.next_step(2).unwrap();
        form.next_step(3).unwrap();
        assert!(form.next_step(4).is_err());
        assert_eq!(form.error("budget"), Some("Ingresa un número válido"));
    }

    #[test]
    fn test_huge_budget_is_rejected_not_overflowed() {
        let mut form = filled();
        form.set_value("budget", "18446744073709551615").unwrap();
        assert_eq!(form.commission(), Some(commission_for(u64::MAX)));
        form.next_step(2).unwrap();
        form.next_step(3).unwrap();
        assert!(form.next_step(4).is_err());
        assert_eq!(form.error("budget"), Some("El valor máximo es 1000000000000"));

        let now = Utc.with_ymd_and_hms(2024, 12, 15, 10, 0, 0).unwrap();
        assert!(matches!(form.submit(true, now), Err(Error::StepInvalid { step: 3, .. })));
    }

    #[test]
    fn test_commission_rounds_down_without_overflow() {
        assert_eq!(commission_for(1_200_000), 60_000);
        assert_eq!(commission_for(199), 9);
        assert_eq!(commission_for(19), 0);
        assert_eq!(commission_for(u64::MAX), u64::MAX / 100 * 5 + 15 * 5 / 100);
    }

    #[test]
    fn test_summary() {
        let form = filled();
        let summary = form.summary();
        assert_eq!(summary.origin, "Bogotá - Calle 13 # 68-45");
        assert_eq!(summary.dates, "18 de diciembre de 2024 al 19 de diciembre de 2024");
        assert_eq!(summary.cargo_type, "Refrigerada");
        assert_eq!(summary.dimensions, "No especificado");
        assert_eq!(summary.budget, "$1.200.000 COP");
        assert_eq!(summary.equipment, "gps, thermometer");
    }

    #[test]
    fn test_partial_dimensions() {
        let mut form = filled();
        form.set_value("length", "2.5").unwrap();
        form.set_value("height", "1.8").unwrap();
        assert_eq!(form.summary().dimensions, "2.5 x 1.8 m");
    }

    #[test]
    fn test_submit_requires_consent() {
        let mut form = filled();
        let now = Utc.with_ymd_and_hms(2024, 12, 15, 10, 0, 0).unwrap();
        assert!(matches!(form.submit(false, now), Err(Error::ConsentRequired)));

        let draft = form.submit(true, now).unwrap();
        assert_eq!(draft.status, "published");
        assert_eq!(draft.budget, 1_200_000);
        assert_eq!(draft.commission, 60_000);
        assert_eq!(draft.weight_kg, 800);
        assert_eq!(draft.reference_url, None);

        let listed = draft.into_published(7);
        assert_eq!(listed.reference, "CC-2024-007");
        assert_eq!(listed.status, TripStatus::Pending);
        assert_eq!(listed.origin.date, "18 Dic");
        assert_eq!(listed.cargo.vehicle, "Camiones Refrigerados 3.5T");
    }
}
