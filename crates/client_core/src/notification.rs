//! Transient, dismissible user notifications raised by the session.

use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub title: String,
    pub description: Option<String>,
    pub raised_at: DateTime<Utc>,
    /// `None` keeps the notification until it is dismissed.
    pub ttl: Option<Duration>,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        description: Option<String>,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            title: title.into(),
            description,
            raised_at: Utc::now(),
            ttl,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title, None, Some(NOTIFICATION_TTL))
    }

    pub fn error(title: impl Into<String>, description: Option<String>) -> Self {
        Self::new(
            NotificationLevel::Error,
            title,
            description,
            Some(NOTIFICATION_TTL),
        )
    }

    pub fn sticky_info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            NotificationLevel::Info,
            title,
            Some(description.into()),
            None,
        )
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let ttl = chrono::Duration::from_std(self.ttl?).ok()?;
        self.raised_at.checked_add_signed(ttl)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires_at| expires_at <= now)
    }
}

/// Active notifications as a front end keeps them between renders.
#[derive(Debug, Default, Clone)]
pub struct NotificationTray {
    active: Vec<Notification>,
}

impl NotificationTray {
    pub fn push(&mut self, notification: Notification) {
        self.active.push(notification);
    }

    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.active.len();
        self.active.retain(|notification| notification.id != id);
        self.active.len() != before
    }

    /// Drops the most recent notification, returning it.
    pub fn dismiss_latest(&mut self) -> Option<Notification> {
        self.active.pop()
    }

    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.active.len();
        self.active.retain(|notification| !notification.is_expired(now));
        before - self.active.len()
    }

    pub fn active(&self) -> &[Notification] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_notifications_expire_after_their_ttl() {
        let notification = Notification::success("Connected to server");
        let raised_at = notification.raised_at;
        assert!(!notification.is_expired(raised_at));
        assert!(!notification.is_expired(raised_at + chrono::Duration::milliseconds(1999)));
        assert!(notification.is_expired(raised_at + chrono::Duration::seconds(2)));
    }

    #[test]
    fn sticky_notifications_never_expire() {
        let notification = Notification::sticky_info("Recording gesture...", "hold still");
        assert_eq!(notification.expires_at(), None);
        assert!(!notification.is_expired(notification.raised_at + chrono::Duration::days(365)));
    }

    #[test]
    fn tray_prunes_expired_and_dismisses_by_id() {
        let mut tray = NotificationTray::default();
        let timed = Notification::error("Disconnected from server", None);
        let sticky = Notification::sticky_info("Recording gesture...", "hold still");
        let later = timed.raised_at + chrono::Duration::seconds(5);
        let sticky_id = sticky.id;
        tray.push(timed);
        tray.push(sticky);

        assert_eq!(tray.prune_expired(later), 1);
        assert_eq!(tray.active().len(), 1);
        assert!(tray.dismiss(sticky_id));
        assert!(!tray.dismiss(sticky_id));
        assert!(tray.is_empty());
    }
}
