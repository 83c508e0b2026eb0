//! Completed loads: ratings and the report export

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use connectcargo_domain::model::{CompletedLoad, UserRating};
use connectcargo_domain::query::{CompletedCriteria, InputOrder, Page};
use connectcargo_infra::{export_completed_loads, report_file_name};
use connectcargo_types::{Error, Result};

use super::BoardSession;

impl BoardSession {
    pub async fn completed(&self, criteria: &CompletedCriteria, page: usize) -> Page<CompletedLoad> {
        let board = self.board.read().await;
        self.page_of(&board.completed, criteria, &InputOrder, page)
    }

    /// Rate the driver of a completed load with 1 to 5 stars
    pub async fn rate(&self, reference: &str, stars: u8, review: Option<&str>) -> Result<CompletedLoad> {
        if !(1..=5).contains(&stars) {
            return Err(Error::InvalidRating(stars));
        }
        let known = self
            .board
            .read()
            .await
            .completed
            .iter()
            .any(|c| c.reference.eq_ignore_ascii_case(reference));
        if !known {
            return Err(Error::NotFound(format!("completed load {}", reference)));
        }

        if let Err(e) = self.call(format!("rate:{}", reference), "rate-driver").await {
            self.report_failure(&e, "enviar la calificación");
            return Err(e);
        }

        let mut board = self.board.write().await;
        let load = board
            .find_completed_mut(reference)
            .ok_or_else(|| Error::NotFound(format!("completed load {}", reference)))?;
        load.user_rating = Some(UserRating {
            value: f64::from(stars),
            review: review.unwrap_or_default().trim().to_string(),
            tags: Vec::new(),
        });
        let rated = load.clone();
        drop(board);

        tracing::info!(reference = %rated.reference, stars, "driver rated");
        self.toasts.success(format!(
            "Calificación de {} estrellas enviada para {}",
            stars, rated.reference
        ));
        Ok(rated)
    }

    /// Export every completed load to `<dir>/reporte_cargas_completadas_<date>.xlsx`
    pub async fn export_report(&self, dir: &Path, today: NaiveDate) -> Result<PathBuf> {
        if let Err(e) = self.call("export-report".to_string(), "export-report").await {
            if matches!(e, Error::Backend(_)) {
                self.toasts.error("Error al exportar el reporte");
            } else {
                self.report_failure(&e, "exportar el reporte");
            }
            return Err(e);
        }

        let loads = self.board.read().await.completed.clone();
        let path = dir.join(report_file_name(today));
        if let Err(e) = export_completed_loads(&loads, today, &path) {
            self.toasts.error("Error al exportar el reporte");
            return Err(e);
        }

        self.toasts.success("Reporte exportado exitosamente");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_unrated_filter() {
        let session = session();
        let criteria = CompletedCriteria {
            unrated_only: true,
            ..CompletedCriteria::default()
        };
        let page = session.completed(&criteria, 1).await;
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].reference, "CC-2024-008");
    }

    #[tokio::test]
    async fn test_rate_records_stars() {
        let session = session();
        let rated = session.rate("cc-2024-008", 5, Some(" Muy puntual ")).await.unwrap();
        let rating = rated.user_rating.unwrap();
        assert_eq!(rating.value, 5.0);
        assert_eq!(rating.review, "Muy puntual");
        assert_eq!(
            messages(&session),
            vec!["Calificación de 5 estrellas enviada para CC-2024-008"]
        );
    }

    #[tokio::test]
    async fn test_rate_rejects_out_of_range() {
        let session = session();
        assert!(matches!(session.rate("CC-2024-008", 0, None).await, Err(Error::InvalidRating(0))));
        assert!(matches!(session.rate("CC-2024-008", 6, None).await, Err(Error::InvalidRating(6))));
        assert!(matches!(session.rate("CC-1999-001", 3, None).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_export_report() {
        let dir = tempfile::tempdir().unwrap();
        let session = session();
        let today = NaiveDate::from_ymd_opt(2024, 12, 18).unwrap();

        let path = session.export_report(dir.path(), today).await.unwrap();
        assert!(path.ends_with("reporte_cargas_completadas_2024-12-18.xlsx"));
        assert!(path.exists());
        assert_eq!(messages(&session), vec!["Reporte exportado exitosamente"]);
    }

    #[tokio::test]
    async fn test_failed_export_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(failing());
        let today = NaiveDate::from_ymd_opt(2024, 12, 18).unwrap();

        assert!(session.export_report(dir.path(), today).await.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(messages(&session), vec!["Error al exportar el reporte"]);
    }
}
