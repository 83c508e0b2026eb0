//! "Rate later" reminders

use chrono::{DateTime, Utc};
use connectcargo_domain::model::CompletedLoad;
use connectcargo_domain::repository::{RatingReminder, RatingReminderRepository};
use connectcargo_types::Result;

pub struct ReminderService<R> {
    repo: R,
}

impl<R: RatingReminderRepository> ReminderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Schedule a reminder to rate `load`, a day from `now`
    pub fn remind_later(&self, load: &CompletedLoad, now: DateTime<Utc>) -> Result<String> {
        let reminder = RatingReminder::new(load.id, load.reference.clone(), now);
        self.repo.save(&reminder)?;
        tracing::info!(reference = %load.reference, remind_at = %reminder.remind_at, "rating reminder saved");
        Ok(format!("Te recordaremos calificar {} más tarde", load.reference))
    }

    pub fn due(&self, now: DateTime<Utc>) -> Result<Vec<RatingReminder>> {
        self.repo.find_due(now)
    }

    pub fn all(&self) -> Result<Vec<RatingReminder>> {
        self.repo.find_all()
    }

    /// The load was rated, its reminder is no longer needed
    pub fn rated(&self, load_id: u32) -> Result<bool> {
        self.repo.remove(load_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use connectcargo_infra::sample_board;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryRepo {
        reminders: RefCell<Vec<RatingReminder>>,
    }

    impl RatingReminderRepository for MemoryRepo {
        fn save(&self, reminder: &RatingReminder) -> Result<()> {
            let mut reminders = self.reminders.borrow_mut();
            reminders.retain(|r| r.load_id != reminder.load_id);
            reminders.push(reminder.clone());
            Ok(())
        }

        fn find_all(&self) -> Result<Vec<RatingReminder>> {
            Ok(self.reminders.borrow().clone())
        }

        fn remove(&self, load_id: u32) -> Result<bool> {
            let mut reminders = self.reminders.borrow_mut();
            let before = reminders.len();
            reminders.retain(|r| r.load_id != load_id);
            Ok(reminders.len() < before)
        }
    }

    #[test]
    fn test_reminder_lifecycle() {
        let board = sample_board().unwrap();
        let unrated = &board.completed[1];
        let now = Utc.with_ymd_and_hms(2024, 12, 18, 10, 0, 0).unwrap();
        let service = ReminderService::new(MemoryRepo::default());

        assert_eq!(
            service.remind_later(unrated, now).unwrap(),
            "Te recordaremos calificar CC-2024-008 más tarde"
        );
        assert!(service.due(now + Duration::hours(1)).unwrap().is_empty());
        assert_eq!(service.due(now + Duration::hours(24)).unwrap().len(), 1);

        // asking again pushes the reminder back instead of duplicating it
        service.remind_later(unrated, now + Duration::hours(5)).unwrap();
        assert_eq!(service.all().unwrap().len(), 1);
        assert!(service.due(now + Duration::hours(24)).unwrap().is_empty());

        assert!(service.rated(unrated.id).unwrap());
        assert!(!service.rated(unrated.id).unwrap());
    }
}
