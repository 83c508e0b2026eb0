//! Favorite drivers

use connectcargo_domain::model::DriverSummary;
use connectcargo_domain::repository::FavoriteDriverRepository;
use connectcargo_types::{Error, Result};

pub struct FavoritesService<R> {
    repo: R,
}

impl<R: FavoriteDriverRepository> FavoritesService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Save a driver. Saving the same name twice is not an error; the
    /// returned message says so.
    pub fn add(&self, driver: &DriverSummary) -> Result<String> {
        if self.repo.add(driver)? {
            tracing::info!(driver = %driver.name, "driver saved to favorites");
            Ok(format!("Conductor {} guardado en favoritos", driver.name))
        } else {
            Ok(format!("{} ya está en tus favoritos", driver.name))
        }
    }

    pub fn remove(&self, name: &str) -> Result<String> {
        if self.repo.remove(name)? {
            Ok(format!("Conductor {} eliminado de favoritos", name))
        } else {
            Err(Error::NotFound(format!("favorite driver {}", name)))
        }
    }

    pub fn list(&self) -> Result<Vec<DriverSummary>> {
        self.repo.find_all()
    }

    pub fn is_favorite(&self, name: &str) -> Result<bool> {
        Ok(self.repo.find_all()?.iter().any(|d| d.name == name))
    }
}
