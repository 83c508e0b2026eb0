//! Publishing a new load from the wizard

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use connectcargo_domain::model::PublishedLoad;
use connectcargo_domain::wizard::PublishLoadForm;
use connectcargo_types::{Error, Result};

use super::BoardSession;

/// `origin_city` -> `originCity`
fn field_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' || c == '-' {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

fn field_value(key: &str, value: &toml::Value) -> Result<String> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Datetime(d) => Ok(d.to_string()),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| field_value(key, item))
            .collect::<Result<Vec<_>>>()
            .map(|parts| parts.join(",")),
        _ => Err(Error::InvalidRecord {
            row: 0,
            reason: format!("unsupported value for {}", key),
        }),
    }
}

/// Build a publish form from a TOML draft such as
///
/// ```toml
/// origin_city = "Bogotá"
/// total_weight = 800
/// equipment = ["gps", "thermometer"]
/// ```
pub fn form_from_toml(text: &str, today: NaiveDate) -> Result<PublishLoadForm> {
    let table: toml::Table = toml::from_str(text)?;
    let values = table
        .iter()
        .map(|(key, value)| Ok((field_name(key), field_value(key, value)?)))
        .collect::<Result<BTreeMap<String, String>>>()?;

    let mut form = PublishLoadForm::new(today);
    form.fill(&values)?;
    Ok(form)
}

impl BoardSession {
    /// Submit the form and list the load on the published loads page
    pub async fn publish(
        &self,
        form: &mut PublishLoadForm,
        consent: bool,
        now: DateTime<Utc>,
    ) -> Result<PublishedLoad> {
        let draft = match form.submit(consent, now) {
            Ok(draft) => draft,
            Err(e) => {
                match &e {
                    Error::ConsentRequired => {
                        self.toasts.error("Debes aceptar los términos y condiciones")
                    }
                    Error::StepInvalid { .. } => {
                        self.toasts.error("Por favor completa todos los campos")
                    }
                    _ => {}
                }
                return Err(e);
            }
        };

        if let Err(e) = self.call("publish-load".to_string(), "publish-load").await {
            self.report_failure(&e, "publicar la carga");
            return Err(e);
        }

        let mut board = self.board.write().await;
        let published = draft.into_published(board.next_published_id());
        board.published.push(published.clone());
        drop(board);

        tracing::info!(reference = %published.reference, budget = published.budget, "load published");
        self.toasts.success("¡Carga publicada exitosamente!");
        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use chrono::TimeZone;
    use connectcargo_domain::model::TripStatus;

    const DRAFT: &str = r#"
origin_city = "Bogotá"
origin_address = "Calle 13 # 68-45"
destination_city = "Medellín"
destination_address = "Carrera 50 # 10-20"
pickup_date = "2024-12-18"
delivery_date = "2024-12-19"
cargo_type = "refrigerated"
total_weight = 800
vehicle_type = "refrigerated"
budget = "1.200.000"
equipment = ["gps", "thermometer"]
contact_email = "logistica@frescos.co"
"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 17).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 17, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_field_names() {
        assert_eq!(field_name("origin_city"), "originCity");
        assert_eq!(field_name("reference-url"), "referenceUrl");
        assert_eq!(field_name("budget"), "budget");
    }

    #[test]
    fn test_form_from_toml() {
        let form = form_from_toml(DRAFT, today()).unwrap();
        assert_eq!(form.budget_display(), "1.200.000");
        assert_eq!(form.commission(), Some(60_000));
        assert_eq!(form.summary().equipment, "gps, thermometer");
    }

    #[test]
    fn test_unknown_draft_field() {
        let err = form_from_toml("colour = \"red\"", today()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_publish_lists_the_load() {
        let session = session();
        let mut form = form_from_toml(DRAFT, today()).unwrap();

        let published = session.publish(&mut form, true, now()).await.unwrap();
        assert_eq!(published.reference, "CC-2024-005");
        assert_eq!(published.status, TripStatus::Pending);
        assert_eq!(published.budget, 1_200_000);
        assert_eq!(session.snapshot().await.published.len(), 5);
        assert_eq!(messages(&session), vec!["¡Carga publicada exitosamente!"]);
    }

    #[tokio::test]
    async fn test_publish_requires_consent() {
        let session = session();
        let mut form = form_from_toml(DRAFT, today()).unwrap();

        assert!(matches!(
            session.publish(&mut form, false, now()).await,
            Err(Error::ConsentRequired)
        ));
        assert_eq!(session.snapshot().await.published.len(), 4);
        assert_eq!(messages(&session), vec!["Debes aceptar los términos y condiciones"]);
    }

    #[tokio::test]
    async fn test_incomplete_form_is_rejected() {
        let session = session();
        let mut form = form_from_toml("origin_city = \"Cali\"", today()).unwrap();
        assert!(matches!(
            session.publish(&mut form, true, now()).await,
            Err(Error::StepInvalid { step: 1, .. })
        ));
    }
}
