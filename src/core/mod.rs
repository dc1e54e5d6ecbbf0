pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{Result, SandboxError};
pub use types::{ActorId, CommandId, Point};
