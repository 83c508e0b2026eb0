//! File-based favorite driver repository

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use connectcargo_domain::model::DriverSummary;
use connectcargo_domain::repository::FavoriteDriverRepository;
use connectcargo_types::{Error, Result};

pub const FAVORITES_FILE: &str = "favorite_drivers.json";

/// Favorite drivers stored in `favorite_drivers.json`, unique by name
pub struct FileFavoriteDriverRepository {
    store_path: PathBuf,
    drivers: RefCell<Vec<DriverSummary>>,
}

impl FileFavoriteDriverRepository {
    /// Create or load the repository in `store_dir`
    pub fn open(store_dir: &Path) -> Result<Self> {
        fs::create_dir_all(store_dir)?;
        let store_path = store_dir.join(FAVORITES_FILE);

        let drivers = if store_path.exists() {
            let reader = BufReader::new(File::open(&store_path)?);
            serde_json::from_reader(reader)?
        } else {
            Vec::new()
        };

        Ok(Self {
            store_path,
            drivers: RefCell::new(drivers),
        })
    }

    fn persist(&self) -> Result<()> {
        let writer = BufWriter::new(File::create(&self.store_path)?);
        serde_json::to_writer_pretty(writer, &*self.drivers.borrow())?;
        Ok(())
    }
}

impl FavoriteDriverRepository for FileFavoriteDriverRepository {
    fn add(&self, driver: &DriverSummary) -> std::result::Result<bool, Error> {
        {
            let mut drivers = self.drivers.borrow_mut();
            if drivers.iter().any(|d| d.name == driver.name) {
                return Ok(false);
            }
            drivers.push(driver.clone());
        }
        self.persist()?;
        tracing::debug!(driver = %driver.name, "favorite saved");
        Ok(true)
    }

    fn remove(&self, name: &str) -> std::result::Result<bool, Error> {
        let removed = {
            let mut drivers = self.drivers.borrow_mut();
            let before = drivers.len();
            drivers.retain(|d| d.name != name);
            drivers.len() != before
        };
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    fn find_all(&self) -> std::result::Result<Vec<DriverSummary>, Error> {
        Ok(self.drivers.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn carlos() -> DriverSummary {
        DriverSummary {
            name: "Carlos Rodríguez".to_string(),
            rating: 4.8,
            trips: 347,
        }
    }

    #[test]
    fn test_add_dedupes_by_name() {
        let dir = TempDir::new().unwrap();
        let repo = FileFavoriteDriverRepository::open(dir.path()).unwrap();

        assert!(repo.add(&carlos()).unwrap());
        let mut again = carlos();
        again.trips = 348;
        assert!(!repo.add(&again).unwrap());

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].trips, 347);
    }

    #[test]
    fn test_persists_across_open() {
        let dir = TempDir::new().unwrap();
        {
            let repo = FileFavoriteDriverRepository::open(dir.path()).unwrap();
            repo.add(&carlos()).unwrap();
        }
        let repo = FileFavoriteDriverRepository::open(dir.path()).unwrap();
        assert_eq!(repo.find_all().unwrap(), vec![carlos()]);

        assert!(repo.remove("Carlos Rodríguez").unwrap());
        assert!(!repo.remove("Carlos Rodríguez").unwrap());
        let reopened = FileFavoriteDriverRepository::open(dir.path()).unwrap();
        assert!(reopened.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(FAVORITES_FILE), "{not json").unwrap();
        assert!(matches!(
            FileFavoriteDriverRepository::open(dir.path()),
            Err(Error::Json(_))
        ));
    }
}
