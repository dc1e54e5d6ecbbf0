//! Loading scripts from disk
//!
//! TOML files hold a `[[commands]]` array; JSON files hold either a bare array
//! of commands or an object with a `commands` field.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SandboxError};
use crate::script::command::Command;
use crate::script::edit::Script;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptFile {
    #[serde(default)]
    pub commands: Vec<Command>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonScript {
    Bare(Vec<Command>),
    Wrapped(ScriptFile),
}

impl ScriptFile {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let commands = match serde_json::from_str(text)? {
            JsonScript::Bare(commands) => commands,
            JsonScript::Wrapped(file) => file.commands,
        };
        Ok(Self { commands })
    }

    /// Read a script, picking the format from the file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => Err(SandboxError::UnsupportedScript(path.display().to_string())),
        }
    }

    pub fn into_script(self) -> Script {
        self.commands.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_script() {
        let file = ScriptFile::from_toml_str(
            r#"
            [[commands]]
            kind = "go_to"
            x = 10
            y = -20

            [[commands]]
            kind = "say"
            text = "Hi"
            duration = 1

            [[commands]]
            kind = "glide_to"
            "#,
        )
        .unwrap();

        assert_eq!(
            file.commands,
            vec![
                Command::go_to(10, -20),
                Command::say("Hi", 1),
                Command::GlideTo { x: None, y: None },
            ]
        );
    }

    #[test]
    fn test_json_bare_and_wrapped() {
        let bare = ScriptFile::from_json_str(r#"[{"kind":"go_to","x":1,"y":2}]"#).unwrap();
        let wrapped =
            ScriptFile::from_json_str(r#"{"commands":[{"kind":"go_to","x":1,"y":2}]}"#).unwrap();
        assert_eq!(bare.commands, wrapped.commands);
        assert_eq!(bare.into_script().len(), 1);
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        assert!(ScriptFile::from_json_str(r#"[{"kind":"jump"}]"#).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = std::env::temp_dir().join(format!("cq-script-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("script.yaml");
        std::fs::write(&path, "commands: []").unwrap();

        let err = ScriptFile::load(&path).unwrap_err();
        assert!(matches!(err, SandboxError::UnsupportedScript(_)));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
