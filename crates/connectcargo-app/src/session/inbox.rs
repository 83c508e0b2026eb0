//! Notification inbox

use connectcargo_domain::model::Notification;
use connectcargo_domain::query::{NotificationCriteria, NotificationSort, Page};
use connectcargo_domain::service::{badge_text, notification_counts, NotificationCounts};
use connectcargo_types::{Error, Result};

use super::BoardSession;

impl BoardSession {
    pub async fn notifications(
        &self,
        criteria: &NotificationCriteria,
        sort: NotificationSort,
        page: usize,
    ) -> Page<Notification> {
        let board = self.board.read().await;
        self.page_of(&board.notifications, criteria, &sort, page)
    }

    pub async fn notification_counts(&self) -> NotificationCounts {
        notification_counts(&self.board.read().await.notifications)
    }

    /// Sidebar badge for unread notifications
    pub async fn unread_badge(&self) -> Option<String> {
        badge_text(self.notification_counts().await.unread)
    }

    pub async fn mark_read(&self, id: u32) -> Result<()> {
        let mut board = self.board.write().await;
        let notification = board
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::NotFound(format!("notification {}", id)))?;
        notification.read = true;
        drop(board);

        self.toasts.success("Notificación marcada como leída");
        Ok(())
    }

    /// Mark everything read, returning how many changed
    pub async fn mark_all_read(&self) -> usize {
        let mut board = self.board.write().await;
        let mut marked = 0;
        for notification in board.notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            marked += 1;
        }
        drop(board);

        if marked == 0 {
            self.toasts.info("No hay notificaciones sin leer");
        } else {
            tracing::info!(marked, "notifications marked read");
            self.toasts
                .success(format!("{} notificaciones marcadas como leídas", marked));
        }
        marked
    }

    pub async fn delete_notification(&self, id: u32) -> Result<Notification> {
        let mut board = self.board.write().await;
        let position = board
            .notifications
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| Error::NotFound(format!("notification {}", id)))?;
        let removed = board.notifications.remove(position);
        drop(board);

        self.toasts.info("Notificación eliminada");
        Ok(removed)
    }

    pub async fn clear_notifications(&self) -> usize {
        let removed = std::mem::take(&mut self.board.write().await.notifications).len();
        if removed == 0 {
            self.toasts.info("No hay notificaciones para limpiar");
        } else {
            self.toasts
                .success("Todas las notificaciones han sido eliminadas");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use connectcargo_domain::query::NotificationView;

    #[tokio::test]
    async fn test_unread_view_newest_first() {
        let session = session();
        let criteria = NotificationCriteria {
            view: NotificationView::Unread,
        };
        let page = session.notifications(&criteria, NotificationSort::Newest, 1).await;
        assert_eq!(page.total_matching, 3);
        assert_eq!(page.items.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_mark_read_updates_badge() {
        let session = session();
        assert_eq!(session.unread_badge().await.as_deref(), Some("3"));

        session.mark_read(1).await.unwrap();
        assert_eq!(session.unread_badge().await.as_deref(), Some("2"));

        assert_eq!(session.mark_all_read().await, 2);
        assert_eq!(session.unread_badge().await, None);
        assert_eq!(session.mark_all_read().await, 0);
        assert!(messages(&session).contains(&"No hay notificaciones sin leer".to_string()));
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let session = session();
        assert!(matches!(session.delete_notification(9).await, Err(Error::NotFound(_))));
        session.delete_notification(5).await.unwrap();
        assert_eq!(session.notification_counts().await.all, 4);

        assert_eq!(session.clear_notifications().await, 4);
        assert_eq!(session.clear_notifications().await, 0);
    }
}
