//! The three block kinds a script is built from

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::core::types::{CommandId, Point};

/// Text spoken by a `Say` block when it has none of its own
pub const DEFAULT_SPEECH: &str = "Hello!";

/// Seconds a `Say` block holds its speech when no duration is set
pub const DEFAULT_SAY_SECONDS: i64 = 2;

/// Which kind of block to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    GoTo,
    GlideTo,
    Say,
}

impl CommandKind {
    /// Label shown on the block in the palette
    pub fn label(&self) -> &'static str {
        match self {
            CommandKind::GoTo => "go to",
            CommandKind::GlideTo => "glide to",
            CommandKind::Say => "say",
        }
    }
}

/// One instruction in a script
///
/// Coordinates and the say duration are `None` while unset. Unset coordinates
/// become 0 only when the command executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    GoTo {
        #[serde(default)]
        x: Option<i32>,
        #[serde(default)]
        y: Option<i32>,
    },
    GlideTo {
        #[serde(default)]
        x: Option<i32>,
        #[serde(default)]
        y: Option<i32>,
    },
    Say {
        #[serde(default = "default_speech")]
        text: String,
        #[serde(default = "default_say_seconds")]
        duration: Option<i64>,
    },
}

fn default_speech() -> String {
    DEFAULT_SPEECH.to_string()
}

fn default_say_seconds() -> Option<i64> {
    Some(DEFAULT_SAY_SECONDS)
}

impl Command {
    /// A fresh block of the given kind with its palette defaults
    pub fn new(kind: CommandKind) -> Self {
        match kind {
            CommandKind::GoTo => Command::GoTo { x: None, y: None },
            CommandKind::GlideTo => Command::GlideTo { x: None, y: None },
            CommandKind::Say => Command::Say {
                text: default_speech(),
                duration: default_say_seconds(),
            },
        }
    }

    pub fn go_to(x: i32, y: i32) -> Self {
        Command::GoTo {
            x: Some(x),
            y: Some(y),
        }
    }

    pub fn glide_to(x: i32, y: i32) -> Self {
        Command::GlideTo {
            x: Some(x),
            y: Some(y),
        }
    }

    pub fn say(text: impl Into<String>, seconds: i64) -> Self {
        Command::Say {
            text: text.into(),
            duration: Some(seconds),
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::GoTo { .. } => CommandKind::GoTo,
            Command::GlideTo { .. } => CommandKind::GlideTo,
            Command::Say { .. } => CommandKind::Say,
        }
    }

    /// Final position of a motion block, unset coordinates resolved to 0
    pub fn destination(&self) -> Option<Point> {
        match self {
            Command::GoTo { x, y } | Command::GlideTo { x, y } => {
                Some(Point::new(x.unwrap_or(0), y.unwrap_or(0)))
            }
            Command::Say { .. } => None,
        }
    }

    /// Text a `Say` block puts in the speech bubble
    pub fn speech(&self) -> Option<&str> {
        match self {
            Command::Say { text, .. } if text.is_empty() => Some(DEFAULT_SPEECH),
            Command::Say { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    /// Nominal wait for this block before the next one starts
    pub fn wait(&self, config: &EngineConfig) -> Duration {
        match self {
            Command::GoTo { .. } => config.scaled(config.go_to_ms),
            Command::GlideTo { .. } => config.scaled(config.glide_ms),
            Command::Say { duration, .. } => {
                // Zero counts as unset, negative waits are clamped.
                let seconds = match duration {
                    None | Some(0) => DEFAULT_SAY_SECONDS,
                    Some(s) => (*s).max(0),
                };
                config.scaled(seconds.unsigned_abs().saturating_mul(1000))
            }
        }
    }
}

/// A command placed in a script, with the id used for editing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: CommandId,
    pub command: Command,
}

impl Block {
    pub fn new(command: Command) -> Self {
        Self {
            id: CommandId::new(),
            command,
        }
    }
}

impl From<Command> for Block {
    fn from(command: Command) -> Self {
        Block::new(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_blocks_have_palette_defaults() {
        assert_eq!(
            Command::new(CommandKind::GoTo),
            Command::GoTo { x: None, y: None }
        );
        assert_eq!(
            Command::new(CommandKind::GlideTo),
            Command::GlideTo { x: None, y: None }
        );
        assert_eq!(Command::new(CommandKind::Say), Command::say("Hello!", 2));
    }

    #[test]
    fn test_unset_coordinates_resolve_to_zero() {
        let cmd = Command::GlideTo {
            x: Some(40),
            y: None,
        };
        assert_eq!(cmd.destination(), Some(Point::new(40, 0)));
        assert_eq!(Command::new(CommandKind::Say).destination(), None);
    }

    #[test]
    fn test_empty_speech_falls_back() {
        let cmd = Command::say("", 1);
        assert_eq!(cmd.speech(), Some(DEFAULT_SPEECH));
        assert_eq!(Command::say("Hi", 1).speech(), Some("Hi"));
    }

    #[test]
    fn test_waits() {
        let config = EngineConfig::default();
        assert_eq!(Command::go_to(1, 1).wait(&config), Duration::from_millis(600));
        assert_eq!(
            Command::glide_to(1, 1).wait(&config),
            Duration::from_millis(1500)
        );
        assert_eq!(Command::say("a", 3).wait(&config), Duration::from_secs(3));
        assert_eq!(Command::say("a", 0).wait(&config), Duration::from_secs(2));
        assert_eq!(Command::say("a", -5).wait(&config), Duration::ZERO);
        let unset = Command::Say {
            text: "a".into(),
            duration: None,
        };
        assert_eq!(unset.wait(&config), Duration::from_secs(2));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let cmds: Vec<Command> = serde_json::from_str(
            r#"[{"kind":"go_to","x":5},{"kind":"say"},{"kind":"glide_to","x":1,"y":2}]"#,
        )
        .unwrap();
        assert_eq!(
            cmds[0],
            Command::GoTo {
                x: Some(5),
                y: None
            }
        );
        assert_eq!(cmds[1], Command::say("Hello!", 2));
        assert_eq!(cmds[2], Command::glide_to(1, 2));
    }
}
