use std::path::PathBuf;
use thiserror::Error;

/// Wrapper for Result
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
/// Error relating to copying tags and replacing files.
pub enum Error {
    /// Malformed `--edit-tag` value.
    #[error("Edit tag requires zero values or two values \"tag_name,tag_value\", got \"{0}\"")]
    Usage(String),

    /// The tag libraries can't interpret this file.
    #[error("Unsupported file format: \"{0}\"")]
    UnsupportedFormat(PathBuf),

    /// The container's tag mapping doesn't accept this key.
    #[error("Unsupported file type when trying to add tag \"{key}\" to {tag_type} tags")]
    UnsupportedTagOperation {
        /// Requested tag name
        key: String,
        /// Name of the tag family
        tag_type: &'static str,
    },

    /// The source's tags can't be stored in the destination container.
    #[error("Unable to store {tag_type} tags in \"{}\" ({media_type})", .destination.display())]
    IncompatibleTags {
        /// Name of the source's tag family
        tag_type: &'static str,
        /// Destination path
        destination: PathBuf,
        /// Destination media type
        media_type: &'static str,
    },

    /// Copying the source file to its backup location failed.
    #[error("Unable to backup source file \"{}\" to \"{}\". Aborting remaining actions: {source}", .path.display(), .backup.display())]
    BackupFailure {
        /// File being backed up
        path: PathBuf,
        /// Backup location
        backup: PathBuf,
        /// Original error
        source: std::io::Error,
    },

    /// Sidecar file doesn't exist.
    #[error("Sidecar file \"{}\" does not exist", .0.display())]
    SidecarMissing(PathBuf),

    /// Copying an existing sidecar file to its backup location failed.
    #[error("Unable to backup asd file \"{}\" to \"{}\". Aborting remaining actions: {source}", .path.display(), .backup.display())]
    SidecarBackup {
        /// Sidecar being backed up
        path: PathBuf,
        /// Backup location
        backup: PathBuf,
        /// Original error
        source: std::io::Error,
    },

    /// Moving a file failed.
    #[error("Unable to move \"{}\" to \"{}\": {source}", .source_path.display(), .target.display())]
    Move {
        /// Path being moved
        source_path: PathBuf,
        /// Target path
        target: PathBuf,
        /// Original error
        source: std::io::Error,
    },

    /// Represents std::io::Error
    #[error("I/O error: {0}")]
    IO(#[from] std::io::Error),

    /// Represents lofty::error::LoftyError
    #[error("Tag error: {0}")]
    Lofty(#[from] lofty::error::LoftyError),

    /// Represents id3::Error
    #[error("ID3 error: {0}")]
    Id3(#[from] id3::Error),
}

impl Error {
    /// Whether this error only reports a missing sidecar file.
    pub fn is_sidecar_missing(&self) -> bool {
        matches!(self, Error::SidecarMissing(_))
    }
}
