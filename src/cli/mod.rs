/// Argument Parsing
pub mod args;
/// Logging setup
pub mod logging;
/// Main audio-tag-copy code.
pub mod main;

pub use self::args::{Args, Options};
pub use self::main::{main, run};
