use crate::backup::{backup_asd, backup_source_file};
use crate::cli::args::{parse_args, Options};
use crate::cli::logging::setup_logger;
use crate::overwrite::overwrite_file;
use crate::tags::copy_tags;
use anyhow::Result;

/// Copies tags from source to destination, then backs up and overwrites the
/// source if requested.
pub fn run(options: &Options) -> crate::Result<()> {
    copy_tags(
        &options.source,
        &options.destination,
        options.edit_tag.as_ref(),
    )?;

    log::info!(
        "Copied tags from \"{}\" to \"{}\"",
        options.source,
        options.destination
    );

    if !options.overwrite {
        for flag in options.ineffective_flags() {
            log::warn!("{flag} has no effect without --overwrite");
        }

        return Ok(());
    }

    if let Some(backup) = options.backup_target() {
        backup_source_file(&options.source, &backup)?;

        if !options.disable_asd_backup {
            match backup_asd(&options.source, &backup) {
                Ok(_) => (),
                Err(err) if err.is_sidecar_missing() => log::debug!("{err}"),
                Err(err) => return Err(err),
            }
        }
    }

    overwrite_file(&options.source, &options.destination)?;

    log::info!(
        "Replaced \"{}\" with \"{}\"",
        options.source,
        options.destination
    );

    Ok(())
}

/// Main entrypoint for audio-tag-copy
pub fn main() -> Result<()> {
    let args = parse_args();

    setup_logger(args.verbosity(), env!("CARGO_PKG_NAME"))?;

    let result = Options::from_args(args).and_then(|options| run(&options));

    if let Err(err) = &result {
        log::error!("{err}");
    }

    Ok(result?)
}
