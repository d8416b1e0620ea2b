pub mod commands;
pub mod progress;

pub use commands::{Cli, Commands, OutputFormat};
pub use progress::ConsoleProgress;
