//! Text panels for the console front end.

use chrono::{DateTime, Utc};
use client_core::{Notification, NotificationTray, SessionEvent, SessionState};
use shared::domain::ModeId;

pub fn status_panel(state: &SessionState) -> String {
    let connection = if state.connected {
        "Connected"
    } else {
        "Disconnected"
    };
    let recording = if state.recording { "on" } else { "off" };
    format!(
        "== Current Status ==\n\
         Connection:      {connection}\n\
         Mode:            {}\n\
         Current Gesture: {}\n\
         Recording:       {recording}",
        state.mode,
        state.gesture_label(),
    )
}

pub fn instruction_panel(mode: ModeId) -> String {
    let mut out = format!("== Mode Instructions ({}) ==", mode.display_name());
    for line in mode.instructions() {
        out.push_str("\n  \u{2022} ");
        out.push_str(line);
    }
    out
}

pub fn notification_line(notification: &Notification) -> String {
    let mut line = format!("[{}] {}", notification.level.as_str(), notification.title);
    if let Some(description) = &notification.description {
        line.push_str(": ");
        line.push_str(description);
    }
    line
}

/// Console-side view state; the session itself stays authoritative.
#[derive(Debug, Default)]
pub struct ConsoleView {
    tray: NotificationTray,
}

impl ConsoleView {
    /// Returns the text to print for `event`, if any.
    pub fn on_event(
        &mut self,
        event: &SessionEvent,
        state: &SessionState,
        now: DateTime<Utc>,
    ) -> Option<String> {
        self.tray.prune_expired(now);
        match event {
            SessionEvent::Notification(notification) => {
                self.tray.push(notification.clone());
                Some(notification_line(notification))
            }
            SessionEvent::ModeChanged(mode) => Some(format!(
                "{}\n{}",
                status_panel(state),
                instruction_panel(*mode)
            )),
            SessionEvent::Connected
            | SessionEvent::Disconnected
            | SessionEvent::GestureDetected(_)
            | SessionEvent::RecordingChanged(_) => Some(status_panel(state)),
        }
    }

    pub fn overview(&mut self, state: &SessionState, now: DateTime<Utc>) -> String {
        self.tray.prune_expired(now);
        let mut out = status_panel(state);
        for notification in self.tray.active() {
            out.push('\n');
            out.push_str(&notification_line(notification));
        }
        out
    }

    pub fn dismiss_latest(&mut self) -> Option<Notification> {
        self.tray.dismiss_latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(connected: bool, mode: ModeId, gesture: Option<&str>) -> SessionState {
        SessionState {
            connected,
            mode,
            last_gesture: gesture.map(str::to_string),
            recording: false,
        }
    }

    #[test]
    fn status_panel_shows_placeholder_before_any_gesture() {
        let panel = status_panel(&state(false, ModeId::Normal, None));
        assert!(panel.contains("Connection:      Disconnected"));
        assert!(panel.contains("Mode:            normal"));
        assert!(panel.contains("Current Gesture: None"));
    }

    #[test]
    fn status_panel_shows_latest_gesture_verbatim() {
        let panel = status_panel(&state(true, ModeId::Mouse, Some("Custom: wave")));
        assert!(panel.contains("Connection:      Connected"));
        assert!(panel.contains("Current Gesture: Custom: wave"));
    }

    #[test]
    fn instruction_panel_lists_every_line_for_mode() {
        let panel = instruction_panel(ModeId::Volume);
        assert!(panel.starts_with("== Mode Instructions (Volume Control) =="));
        assert_eq!(panel.lines().count(), 1 + ModeId::Volume.instructions().len());
        assert!(panel.contains("Further apart = Volume up"));
    }

    #[test]
    fn notifications_are_printed_and_tracked_until_expiry() {
        let mut view = ConsoleView::default();
        let session_state = state(true, ModeId::Normal, None);
        let notification = Notification::success("Connected to server");
        let raised_at = notification.raised_at;

        let printed = view
            .on_event(
                &SessionEvent::Notification(notification),
                &session_state,
                raised_at,
            )
            .expect("printed");
        assert_eq!(printed, "[success] Connected to server");
        assert!(view
            .overview(&session_state, raised_at)
            .contains("[success] Connected to server"));

        let later = raised_at + chrono::Duration::seconds(3);
        assert!(!view.overview(&session_state, later).contains("[success]"));
    }

    #[test]
    fn mode_change_prints_instructions() {
        let mut view = ConsoleView::default();
        let session_state = state(false, ModeId::Drawing, None);
        let printed = view
            .on_event(
                &SessionEvent::ModeChanged(ModeId::Drawing),
                &session_state,
                Utc::now(),
            )
            .expect("printed");
        assert!(printed.contains("Mode:            drawing"));
        assert!(printed.contains("Press 'x' to clear canvas"));
    }

    #[test]
    fn dismiss_removes_sticky_notification() {
        let mut view = ConsoleView::default();
        let session_state = state(false, ModeId::Normal, None);
        let notice = Notification::sticky_info("Recording gesture...", "go");
        view.on_event(
            &SessionEvent::Notification(notice.clone()),
            &session_state,
            Utc::now(),
        );
        assert_eq!(view.dismiss_latest(), Some(notice));
        assert_eq!(view.dismiss_latest(), None);
    }
}
