//! File-based rating reminder repository

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use connectcargo_domain::repository::{RatingReminder, RatingReminderRepository};
use connectcargo_types::{Error, Result};

pub const REMINDERS_FILE: &str = "rating_reminders.json";

/// Reminders stored in `rating_reminders.json`, at most one per load
pub struct FileRatingReminderRepository {
    store_path: PathBuf,
    reminders: RefCell<Vec<RatingReminder>>,
}

impl FileRatingReminderRepository {
    pub fn open(store_dir: &Path) -> Result<Self> {
        fs::create_dir_all(store_dir)?;
        let store_path = store_dir.join(REMINDERS_FILE);

        let reminders = if store_path.exists() {
            let reader = BufReader::new(File::open(&store_path)?);
            serde_json::from_reader(reader)?
        } else {
            Vec::new()
        };

        Ok(Self {
            store_path,
            reminders: RefCell::new(reminders),
        })
    }

    fn persist(&self) -> Result<()> {
        let writer = BufWriter::new(File::create(&self.store_path)?);
        serde_json::to_writer_pretty(writer, &*self.reminders.borrow())?;
        Ok(())
    }
}

impl RatingReminderRepository for FileRatingReminderRepository {
    fn save(&self, reminder: &RatingReminder) -> std::result::Result<(), Error> {
        {
            let mut reminders = self.reminders.borrow_mut();
            reminders.retain(|r| r.load_id != reminder.load_id);
            reminders.push(reminder.clone());
        }
        self.persist()
    }

    fn find_all(&self) -> std::result::Result<Vec<RatingReminder>, Error> {
        let mut reminders = self.reminders.borrow().clone();
        reminders.sort_by_key(|r| r.remind_at);
        Ok(reminders)
    }

    fn remove(&self, load_id: u32) -> std::result::Result<bool, Error> {
        let removed = {
            let mut reminders = self.reminders.borrow_mut();
            let before = reminders.len();
            reminders.retain(|r| r.load_id != load_id);
            reminders.len() != before
        };
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}
