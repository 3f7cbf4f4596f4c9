use crate::file::{resolve_path, with_suffix, MediaPath};
use crate::{Error, Result};
use std::io::{self, ErrorKind};
use std::path::Path;

/// Suffix of the default backup file.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Determines where `source` is backed up to.
///
/// An existing directory receives a file named after `source`, any other
/// location is used as the full backup path. Without a location, the
/// backup is placed next to `source`.
pub fn resolve_backup_location(
    source: &MediaPath,
    location: Option<&Path>,
) -> MediaPath {
    match location {
        Some(dir) if dir.is_dir() => match source.file_name() {
            Some(file_name) => MediaPath::new(dir.join(file_name)),
            None => MediaPath::new(dir),
        },
        Some(path) => MediaPath::new(path),
        None => MediaPath::new(with_suffix(source.media(), BACKUP_SUFFIX)),
    }
}

/// Copies the media file of `source` to `backup`.
///
/// A backup location that resolves to `source` itself is a failure.
pub fn backup_source_file(
    source: &MediaPath,
    backup: &MediaPath,
) -> Result<u64> {
    let failure = |err: io::Error| Error::BackupFailure {
        path: source.media().into(),
        backup: backup.media().into(),
        source: err,
    };

    if resolve_path(backup.media())? == resolve_path(source.media())? {
        return Err(failure(io::Error::new(
            ErrorKind::AlreadyExists,
            "backup location is the source file",
        )));
    }

    let bytes =
        std::fs::copy(source.media(), backup.media()).map_err(failure)?;

    log::debug!("Backed up \"{}\" to \"{}\"", source, backup);

    Ok(bytes)
}

/// Copies the sidecar file of `source` to the sidecar path of `backup`.
pub fn backup_asd(source: &MediaPath, backup: &MediaPath) -> Result<u64> {
    let bytes = std::fs::copy(source.sidecar(), backup.sidecar()).map_err(
        |err| match err.kind() {
            ErrorKind::NotFound if !source.sidecar().exists() => {
                Error::SidecarMissing(source.sidecar().into())
            }
            _ => Error::SidecarBackup {
                path: source.sidecar().into(),
                backup: backup.sidecar().into(),
                source: err,
            },
        },
    )?;

    log::debug!(
        "Backed up \"{}\" to \"{}\"",
        source.sidecar().display(),
        backup.sidecar().display()
    );

    Ok(bytes)
}
