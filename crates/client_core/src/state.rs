//! Session state and the transitions that drive it.
//!
//! Transitions are applied under the session lock and return the events to
//! broadcast, so observers always see state that already reflects the event.

use shared::domain::ModeId;

use crate::{notification::Notification, SessionEvent};

pub const NO_GESTURE_LABEL: &str = "None";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub connected: bool,
    /// Last mode this client requested; never reconciled from the server.
    pub mode: ModeId,
    pub last_gesture: Option<String>,
    pub recording: bool,
}

impl SessionState {
    pub fn gesture_label(&self) -> &str {
        self.last_gesture.as_deref().unwrap_or(NO_GESTURE_LABEL)
    }

    pub fn apply(&mut self, transition: Transition) -> Vec<SessionEvent> {
        match transition {
            Transition::ConnectionEstablished => {
                self.connected = true;
                vec![
                    SessionEvent::Connected,
                    SessionEvent::Notification(Notification::success("Connected to server")),
                ]
            }
            Transition::ConnectionLost => {
                if !self.connected {
                    return Vec::new();
                }
                self.connected = false;
                vec![
                    SessionEvent::Disconnected,
                    SessionEvent::Notification(Notification::error(
                        "Disconnected from server",
                        None,
                    )),
                ]
            }
            Transition::Closed => {
                if !self.connected {
                    return Vec::new();
                }
                self.connected = false;
                vec![SessionEvent::Disconnected]
            }
            Transition::GestureDetected(label) => {
                self.last_gesture = Some(label.clone());
                vec![SessionEvent::GestureDetected(label)]
            }
            Transition::ModeRequested(mode) => {
                self.mode = mode;
                vec![SessionEvent::ModeChanged(mode)]
            }
            Transition::RecordingToggled => {
                self.recording = !self.recording;
                let mut events = vec![SessionEvent::RecordingChanged(self.recording)];
                if self.recording {
                    events.push(SessionEvent::Notification(Notification::sticky_info(
                        "Recording gesture...",
                        "Make a gesture and press stop when ready",
                    )));
                }
                events
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    ConnectionEstablished,
    /// The socket dropped underneath the session.
    ConnectionLost,
    /// The session closed its own socket.
    Closed,
    GestureDetected(String),
    ModeRequested(ModeId),
    RecordingToggled,
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
