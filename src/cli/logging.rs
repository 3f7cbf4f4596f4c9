use anyhow::{bail, Result};
use log::{Level, LevelFilter};
use std::fs;
use std::path::PathBuf;

static LOG_LEVELS: [log::LevelFilter; 6] = [
    LevelFilter::Off,
    LevelFilter::Error,
    LevelFilter::Warn,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];

/// Directory the log file is written to.
pub fn get_log_dir() -> PathBuf {
    std::env::temp_dir().join(env!("CARGO_PKG_NAME"))
}

/// Warnings about the run itself always go to stderr. Errors are reported by
/// the entry point.
fn stderr_dispatch() -> fern::Dispatch {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message));
        })
        .filter(|metadata| {
            metadata.level() == Level::Warn
                && metadata.target().starts_with(env!("CARGO_CRATE_NAME"))
        })
        .chain(std::io::stderr())
}

/// Log file in [`get_log_dir`], truncated on every run.
fn file_dispatch(level: LevelFilter, filename: &str) -> Result<fern::Dispatch> {
    let path = get_log_dir();

    fs::create_dir_all(&path)?;

    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:.1}][{}][{}:{}] {}",
                record.level(),
                chrono::Local::now().format("%H:%M:%S.%6f"),
                record.target().rsplit("::").next().unwrap_or_default(),
                record.line().unwrap_or(0),
                message
            ));
        })
        .level(level)
        .chain(
            fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path.join(format!("{filename}.log")))?,
        );

    Ok(dispatch)
}

/// Setup logger. A verbosity of 0 disables the log file, not the warnings
/// on stderr.
pub fn setup_logger(verbosity: usize, filename: &str) -> Result<()> {
    let Some(&level) = LOG_LEVELS.get(verbosity) else {
        bail!(
            "Verbosity must be between 0 and {}, not {}!",
            LOG_LEVELS.len() - 1,
            verbosity
        );
    };

    let mut dispatch = fern::Dispatch::new()
        .level(level.max(LevelFilter::Warn))
        .chain(stderr_dispatch());

    if level != LevelFilter::Off {
        dispatch = dispatch.chain(file_dispatch(level, filename)?);
    }

    dispatch.apply()?;

    log::info!("Log started");

    Ok(())
}
