//! Form field definitions and single-field validation

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldKind {
    Text,
    Email,
    Url,
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    /// `YYYY-MM-DD`; optionally not before today and/or not before another date field
    Date {
        not_before_today: bool,
        not_before: Option<&'static str>,
    },
    /// One of a fixed set of options
    Choice(Vec<&'static str>),
    /// Comma separated subset of a fixed set of options
    Multi(Vec<&'static str>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn url_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s/?#]+[^\s]*$").expect("valid url regex")
    })
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn format_bound(bound: f64) -> String {
    format!("{bound}")
}

/// Validate one value against its spec.
///
/// `lookup` resolves other fields for cross-field date rules. Returns the
/// inline error message on failure.
pub fn validate_field<'a>(
    spec: &FieldSpec,
    value: &str,
    today: NaiveDate,
    lookup: impl Fn(&str) -> Option<&'a str>,
) -> Result<(), String> {
    let value = value.trim();

    if value.is_empty() {
        return if spec.required {
            Err("Este campo es requerido".to_string())
        } else {
            Ok(())
        };
    }

    match &spec.kind {
        FieldKind::Text => Ok(()),
        FieldKind::Email => {
            if email_regex().is_match(value) {
                Ok(())
            } else {
                Err("Ingresa un email válido".to_string())
            }
        }
        FieldKind::Url => {
            if url_regex().is_match(value) {
                Ok(())
            } else {
                Err("Ingresa una URL válida".to_string())
            }
        }
        FieldKind::Number { min, max } => {
            let number = value
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| "Ingresa un número válido".to_string())?;
            if let Some(min) = min {
                if number < *min {
                    return Err(format!("El valor mínimo es {}", format_bound(*min)));
                }
            }
            if let Some(max) = max {
                if number > *max {
                    return Err(format!("El valor máximo es {}", format_bound(*max)));
                }
            }
            Ok(())
        }
        FieldKind::Date {
            not_before_today,
            not_before,
        } => {
            let date = parse_date(value).ok_or_else(|| "Ingresa una fecha válida".to_string())?;
            if *not_before_today && date < today {
                return Err("La fecha no puede ser anterior a hoy".to_string());
            }
            if let Some(other) = not_before {
                if let Some(other_date) = lookup(other).and_then(parse_date) {
                    if date < other_date {
                        return Err("La fecha de entrega debe ser posterior a la de recogida".to_string());
                    }
                }
            }
            Ok(())
        }
        FieldKind::Choice(options) => {
            if options.contains(&value) {
                Ok(())
            } else {
                Err("Selecciona una opción válida".to_string())
            }
        }
        FieldKind::Multi(options) => {
            let all_known = value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .all(|v| options.contains(&v));
            if all_known {
                Ok(())
            } else {
                Err("Selecciona opciones válidas".to_string())
            }
        }
    }
}
