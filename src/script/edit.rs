//! The editable command list
//!
//! Edits never fail. Numeric input that does not start with an integer, or is
//! cleared, leaves the field unset so the zero default applies at run time.

use serde::{Deserialize, Serialize};

use crate::core::types::CommandId;
use crate::script::command::{Block, Command, CommandKind};

/// A field of a block that the editor can change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandField {
    X,
    Y,
    Text,
    Duration,
}

/// Parse the integer prefix of an input box
///
/// Leading whitespace and a sign are accepted and anything after the digits
/// is ignored, so `"12px"` is 12 and `"3.9"` is 3. Returns `None` when no
/// digits lead the input.
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_coordinate(input: &str) -> Option<i32> {
    parse_int_prefix(input).and_then(|v| i32::try_from(v).ok())
}

impl Command {
    /// Copy of this command with one field replaced
    ///
    /// Returns `None` when the field does not exist on this kind of block.
    pub fn with_field(&self, field: CommandField, value: &str) -> Option<Command> {
        match (self, field) {
            (Command::GoTo { y, .. }, CommandField::X) => Some(Command::GoTo {
                x: parse_coordinate(value),
                y: *y,
            }),
            (Command::GoTo { x, .. }, CommandField::Y) => Some(Command::GoTo {
                x: *x,
                y: parse_coordinate(value),
            }),
            (Command::GlideTo { y, .. }, CommandField::X) => Some(Command::GlideTo {
                x: parse_coordinate(value),
                y: *y,
            }),
            (Command::GlideTo { x, .. }, CommandField::Y) => Some(Command::GlideTo {
                x: *x,
                y: parse_coordinate(value),
            }),
            (Command::Say { duration, .. }, CommandField::Text) => Some(Command::Say {
                text: value.to_string(),
                duration: *duration,
            }),
            (Command::Say { text, .. }, CommandField::Duration) => Some(Command::Say {
                text: text.clone(),
                duration: parse_int_prefix(value),
            }),
            _ => None,
        }
    }
}

/// Ordered list of blocks making up a script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    blocks: Vec<Block>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fresh block of `kind` and return its id
    pub fn add(&mut self, kind: CommandKind) -> CommandId {
        self.push(Command::new(kind))
    }

    /// Append an already-built command and return its id
    pub fn push(&mut self, command: Command) -> CommandId {
        let block = Block::new(command);
        let id = block.id;
        self.blocks.push(block);
        id
    }

    /// Replace one field of a block
    ///
    /// Returns false if no block has `id` or the field does not apply.
    pub fn edit(&mut self, id: CommandId, field: CommandField, value: &str) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        match block.command.with_field(field, value) {
            Some(command) => {
                block.command = command;
                true
            }
            None => false,
        }
    }

    /// Remove a block, preserving the order of the rest
    pub fn remove(&mut self, id: CommandId) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        self.blocks.len() != before
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn find(&self, id: CommandId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }
}

impl FromIterator<Command> for Script {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().map(Block::new).collect(),
        }
    }
}

impl From<Vec<Command>> for Script {
    fn from(commands: Vec<Command>) -> Self {
        commands.into_iter().collect()
    }
}
