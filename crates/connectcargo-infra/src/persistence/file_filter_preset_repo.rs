//! File-based filter preset repository

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use connectcargo_domain::repository::{FilterPreset, FilterPresetRepository};
use connectcargo_types::{Error, Result};

pub const PRESETS_FILE: &str = "filter_presets.json";

/// Presets stored in `filter_presets.json`, unique by name, at most one default
pub struct FileFilterPresetRepository {
    store_path: PathBuf,
    presets: RefCell<Vec<FilterPreset>>,
}

impl FileFilterPresetRepository {
    pub fn open(store_dir: &Path) -> Result<Self> {
        fs::create_dir_all(store_dir)?;
        let store_path = store_dir.join(PRESETS_FILE);

        let presets = if store_path.exists() {
            let reader = BufReader::new(File::open(&store_path)?);
            serde_json::from_reader(reader)?
        } else {
            Vec::new()
        };

        Ok(Self {
            store_path,
            presets: RefCell::new(presets),
        })
    }

    fn persist(&self) -> Result<()> {
        let writer = BufWriter::new(File::create(&self.store_path)?);
        serde_json::to_writer_pretty(writer, &*self.presets.borrow())?;
        Ok(())
    }
}

impl FilterPresetRepository for FileFilterPresetRepository {
    fn save(&self, preset: &FilterPreset) -> std::result::Result<(), Error> {
        {
            let mut presets = self.presets.borrow_mut();
            if preset.is_default {
                for p in presets.iter_mut() {
                    p.is_default = false;
                }
            }
            match presets
                .iter_mut()
                .find(|p| p.name.eq_ignore_ascii_case(&preset.name))
            {
                Some(existing) => *existing = preset.clone(),
                None => presets.push(preset.clone()),
            }
        }
        self.persist()
    }

    fn find_all(&self) -> std::result::Result<Vec<FilterPreset>, Error> {
        Ok(self.presets.borrow().clone())
    }

    fn remove(&self, name: &str) -> std::result::Result<bool, Error> {
        let removed = {
            let mut presets = self.presets.borrow_mut();
            let before = presets.len();
            presets.retain(|p| !p.name.eq_ignore_ascii_case(name.trim()));
            presets.len() != before
        };
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}
