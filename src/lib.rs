#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

//! Copies the tags of one audio file to another.
//!
//! Optionally marks the copy as edited, and replaces the original with the
//! retagged file after backing it up. Ableton Live's `.asd` analysis files
//! follow the audio file they belong to.

/// Backs up files before they are replaced
pub mod backup;
/// Controls the command line interface
pub mod cli;
mod error;
/// Paired media paths and container detection
pub mod file;
/// Replaces files
pub mod overwrite;
/// Reads, edits and writes tags
pub mod tags;

pub use error::{Error, Result};
