//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes argument parsing, the command runner that drives the screens, and the interactive
//! prompts (tab menu, city search with suggestions, day and view pickers).

mod commands;
mod prompts;

pub use commands::*;
pub use prompts::*;
