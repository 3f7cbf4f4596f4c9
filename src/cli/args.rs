use crate::backup::resolve_backup_location;
use crate::file::{resolve_path, MediaPath};
use crate::tags::EditTag;
use crate::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]

/// Holds the command line arguments.
pub struct Args {
    /// File to copy tags from.
    source_file: PathBuf,

    /// File to copy tags to.
    destination_file: PathBuf,

    #[arg(short, long)]
    /// Replace the source file with the destination file.
    overwrite: bool,

    #[arg(short, long, value_name = "PATH")]
    /// Backup file or directory. Defaults to "<source_file>.bak".
    backup_location: Option<PathBuf>,

    #[arg(short = 'D', long)]
    /// Don't back up the source file before overwriting it.
    disable_backup: bool,

    #[arg(long)]
    /// Don't back up the source's .asd file.
    no_backup_asd: bool,

    #[arg(
        short,
        long,
        value_name = "tag_name,tag_value",
        value_parser = parse_edit_tag
    )]
    /// Add a tag marking the file as edited. Defaults to
    /// "edited_retagged,<current time>".
    edit_tag: Option<Option<EditTag>>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    /// Increase log verbosity.
    verbose: u8,
}

impl Args {
    /// Requested log verbosity.
    pub fn verbosity(&self) -> usize {
        usize::from(self.verbose)
    }
}

fn parse_edit_tag(s: &str) -> std::result::Result<EditTag, String> {
    s.parse().map_err(|err: crate::Error| err.to_string())
}

/// Validated options for a single run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Resolved source file.
    pub source: MediaPath,
    /// Resolved destination file.
    pub destination: MediaPath,
    /// Whether to replace the source with the destination.
    pub overwrite: bool,
    /// Resolved custom backup location.
    pub backup_location: Option<PathBuf>,
    /// Skip backing up the source.
    pub disable_backup: bool,
    /// Skip backing up the source's sidecar.
    pub disable_asd_backup: bool,
    /// Tag to add to the destination.
    pub edit_tag: Option<EditTag>,
    /// Log verbosity.
    pub verbosity: usize,
}

impl Options {
    /// Resolves all paths in `args`.
    pub fn from_args(args: Args) -> Result<Self> {
        let backup_location = match &args.backup_location {
            Some(location) => Some(resolve_path(location)?),
            None => None,
        };

        let verbosity = args.verbosity();

        Ok(Self {
            source: MediaPath::resolve(&args.source_file)?,
            destination: MediaPath::resolve(&args.destination_file)?,
            overwrite: args.overwrite,
            backup_location,
            disable_backup: args.disable_backup,
            disable_asd_backup: args.no_backup_asd,
            edit_tag: args
                .edit_tag
                .map(|edit_tag| edit_tag.unwrap_or_else(EditTag::now)),
            verbosity,
        })
    }

    /// Where the source is backed up to, if it is backed up at all.
    pub fn backup_target(&self) -> Option<MediaPath> {
        if self.overwrite && !self.disable_backup {
            Some(resolve_backup_location(
                &self.source,
                self.backup_location.as_deref(),
            ))
        } else {
            None
        }
    }

    /// Options that only matter when overwriting.
    pub fn ineffective_flags(&self) -> Vec<&'static str> {
        if self.overwrite {
            return Vec::new();
        }

        [
            (self.backup_location.is_some(), "--backup-location"),
            (self.disable_backup, "--disable-backup"),
            (self.disable_asd_backup, "--no-backup-asd"),
        ]
        .into_iter()
        .filter_map(|(set, flag)| set.then_some(flag))
        .collect()
    }
}

/// Parses arguments
pub(crate) fn parse_args() -> Args {
    Args::parse()
}
