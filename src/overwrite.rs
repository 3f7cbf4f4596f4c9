use crate::file::MediaPath;
use crate::{Error, Result};
use log::trace;
use std::io::ErrorKind;
use std::path::Path;

/// Replaces `source` with `destination`, reconciling their sidecar files.
///
/// Afterwards `destination` no longer exists. The sidecar of `source` is
/// removed, and the sidecar of `destination`, if any, takes its place.
pub fn overwrite_file(
    source: &MediaPath,
    destination: &MediaPath,
) -> Result<()> {
    move_file(destination.media(), source.media())?;

    match std::fs::remove_file(source.sidecar()) {
        Ok(()) => trace!("Removed \"{}\"", source.sidecar().display()),
        Err(err) if err.kind() == ErrorKind::NotFound => (),
        Err(err) => return Err(err.into()),
    }

    if destination.sidecar().is_file() {
        move_file(destination.sidecar(), source.sidecar())?;
    }

    log::debug!("Overwrote \"{}\" with \"{}\"", source, destination);

    Ok(())
}

/// Moves `source` to `target`, replacing `target` if it exists.
fn move_file(source: &Path, target: &Path) -> Result<()> {
    let wrap = |err| Error::Move {
        source_path: source.into(),
        target: target.into(),
        source: err,
    };

    if let Err(err) = std::fs::rename(source, target) {
        // Can't rename across filesystem boundaries.
        if err.kind() != ErrorKind::CrossesDevices {
            return Err(wrap(err));
        }

        std::fs::copy(source, target).map_err(wrap)?;
        std::fs::remove_file(source).map_err(wrap)?;
    }

    trace!(
        "Moved:\n\"{}\"\n\"{}\"",
        source.display(),
        target.display()
    );

    Ok(())
}
