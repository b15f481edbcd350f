use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interaction context shared by the gesture service and the UI.
///
/// The wire name (`as_str`) is what travels in `change_mode` payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeId {
    #[default]
    Normal,
    Mouse,
    Volume,
    Drawing,
}

impl ModeId {
    pub const ALL: [ModeId; 4] = [
        ModeId::Normal,
        ModeId::Mouse,
        ModeId::Volume,
        ModeId::Drawing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Mouse => "mouse",
            Self::Volume => "volume",
            Self::Drawing => "drawing",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal Mode",
            Self::Mouse => "Mouse Control",
            Self::Volume => "Volume Control",
            Self::Drawing => "Drawing Mode",
        }
    }

    /// Instruction lines shown while this mode is active.
    pub fn instructions(&self) -> &'static [&'static str] {
        match self {
            Self::Normal => &[
                "Open Palm: Spotlight search",
                "Closed Fist: Close window",
                "2 Fingers: App switcher",
                "3 Fingers: Minimize window",
                "4 Fingers: Quit application",
            ],
            Self::Mouse => &[
                "Move index finger to control cursor",
                "Pinch (thumb + index) to click",
            ],
            Self::Volume => &[
                "Thumb-pinky distance controls volume",
                "Further apart = Volume up",
                "Closer together = Volume down",
            ],
            Self::Drawing => &[
                "Use index finger to draw",
                "Press 'c' to change colors",
                "Press 'x' to clear canvas",
            ],
        }
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode '{0}'; expected one of normal, mouse, volume, drawing")]
pub struct ParseModeError(pub String);

impl FromStr for ModeId {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ModeId::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseModeError(trimmed.to_string()))
    }
}
