//! Find drivers

use connectcargo_domain::model::{Driver, DriverSummary};
use connectcargo_domain::query::{contains_ci, DriverCriteria, DriverSort, Page};
use connectcargo_types::{Error, Result};

use super::BoardSession;

impl BoardSession {
    pub async fn drivers(&self, criteria: &DriverCriteria, sort: DriverSort, page: usize) -> Page<Driver> {
        let board = self.board.read().await;
        self.page_of(&board.drivers, criteria, &sort, page)
    }

    pub async fn driver(&self, id: u32) -> Result<Driver> {
        self.board
            .read()
            .await
            .find_driver(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("driver {}", id)))
    }

    /// Look a driver up by (part of) their name
    pub async fn driver_named(&self, name: &str) -> Result<DriverSummary> {
        let board = self.board.read().await;
        board
            .drivers
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name.trim()))
            .or_else(|| board.drivers.iter().find(|d| contains_ci(&d.name, name.trim())))
            .map(Driver::summary)
            .ok_or_else(|| Error::NotFound(format!("driver {}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_default_criteria_hide_unverified() {
        let session = session();
        let verified = session.drivers(&DriverCriteria::default(), DriverSort::default(), 1).await;
        let everyone = session.drivers(&DriverCriteria::any(), DriverSort::default(), 1).await;
        assert_eq!(verified.total_matching, 3);
        assert_eq!(everyone.total_matching, 4);
        assert_eq!(verified.summary("conductores"), "Mostrando 3 de 4 conductores");
    }

    #[tokio::test]
    async fn test_driver_lookup() {
        let session = session();
        assert_eq!(session.driver(2).await.unwrap().name, "María González");
        assert_eq!(session.driver_named("javier").await.unwrap().name, "Javier López");
        assert!(matches!(session.driver(42).await, Err(Error::NotFound(_))));
    }
}
