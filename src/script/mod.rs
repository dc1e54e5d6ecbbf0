//! Command model and script editing
//!
//! A script is an ordered list of blocks. The runner reads it by index, so
//! edits made while a run is in flight affect only blocks not yet reached.

pub mod command;
pub mod edit;
pub mod file;

pub use command::{Block, Command, CommandKind, DEFAULT_SAY_SECONDS, DEFAULT_SPEECH};
pub use edit::{parse_int_prefix, CommandField, Script};
pub use file::ScriptFile;
