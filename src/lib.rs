#![allow(clippy::collapsible_if)]
#![deny(dead_code)]

pub mod arbitrator;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod languages;
pub mod members;
pub mod resolver;
pub mod session;
pub mod syntax;

pub use commands::{Command, ElementCommands, Outcome};
pub use config::Settings;
pub use editor::{EditorService, MemoryEditor, Position, Range, Selection, TextDocument};
pub use error::CommandError;
