use crate::{Error, Result};
use lofty::file::FileType;
use lofty::probe::Probe;
use lofty::tag::TagType;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A media file and the sidecar file that belongs to it by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPath {
    media: PathBuf,
    sidecar: PathBuf,
}

impl MediaPath {
    /// Suffix appended to a media file's full name to get its sidecar.
    pub const SIDECAR_SUFFIX: &'static str = ".asd";

    /// Pairs `media` with its sidecar path.
    pub fn new<P: AsRef<Path>>(media: P) -> Self {
        let media = media.as_ref().to_path_buf();
        let sidecar = with_suffix(&media, Self::SIDECAR_SUFFIX);

        Self { media, sidecar }
    }

    /// Resolves `path` to an absolute, symlink-free path and pairs it.
    pub fn resolve<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(resolve_path(path)?))
    }

    /// Path of the media file.
    pub fn media(&self) -> &Path {
        &self.media
    }

    /// Path of the sidecar file.
    pub fn sidecar(&self) -> &Path {
        &self.sidecar
    }

    /// Base filename of the media file.
    pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
        self.media.file_name()
    }
}

impl std::fmt::Display for MediaPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.media.display())
    }
}

/// Appends `suffix` to the full file name of `path`, keeping any extension.
pub(crate) fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Makes `path` absolute and resolves symlinks.
///
/// Paths that don't exist yet are resolved through their nearest existing
/// ancestor, with the remaining components appended as given.
pub fn resolve_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();

    if let Ok(resolved) = dunce::canonicalize(path) {
        return Ok(resolved);
    }

    let absolute = std::path::absolute(path)?;

    for ancestor in absolute.ancestors().skip(1) {
        if let Ok(resolved) = dunce::canonicalize(ancestor) {
            if let Ok(remainder) = absolute.strip_prefix(ancestor) {
                return Ok(resolved.join(remainder));
            }
        }
    }

    Ok(absolute)
}

/// A media file whose container type has been detected.
#[derive(Debug, Clone)]
pub struct MediaFile {
    path: MediaPath,
    file_type: FileType,
    tag_type: TagType,
}

impl MediaFile {
    /// Detects the container of the file at `path`.
    ///
    /// The file content takes precedence, the extension is used when the
    /// content is inconclusive.
    pub fn probe(path: &MediaPath) -> Result<Self> {
        let probe = Probe::open(path.media())?.guess_file_type()?;

        let (file_type, tag_type) = match probe.file_type() {
            Some(file_type) => match tag_family(file_type) {
                Some(tag_type) => (file_type, tag_type),
                None => {
                    return Err(Error::UnsupportedFormat(path.media().into()))
                }
            },
            None => return Err(Error::UnsupportedFormat(path.media().into())),
        };

        log::debug!(
            "Detected {} ({:?}) for \"{}\"",
            media_type(file_type),
            file_type,
            path
        );

        Ok(Self {
            path: path.clone(),
            file_type,
            tag_type,
        })
    }

    /// Paired path of this file.
    pub fn path(&self) -> &MediaPath {
        &self.path
    }

    /// Detected container.
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Declared media type of the container.
    pub fn media_type(&self) -> &'static str {
        media_type(self.file_type)
    }

    /// The tag family this container stores its primary tags in.
    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }
}

/// Primary tag type of a container, if it has one we can handle.
fn tag_family(file_type: FileType) -> Option<TagType> {
    match file_type {
        FileType::Custom(_) => None,
        file_type => match file_type.primary_tag_type() {
            tag_type @ (TagType::Id3v2
            | TagType::VorbisComments
            | TagType::Ape
            | TagType::Mp4Ilst) => Some(tag_type),
            _ => None,
        },
    }
}

/// MIME type of a container.
pub fn media_type(file_type: FileType) -> &'static str {
    match file_type {
        FileType::Aac => "audio/aac",
        FileType::Aiff => "audio/aiff",
        FileType::Ape => "audio/ape",
        FileType::Flac => "audio/flac",
        FileType::Mpeg => "audio/mpeg",
        FileType::Mp4 => "audio/mp4",
        FileType::Mpc => "audio/musepack",
        FileType::Opus => "audio/opus",
        FileType::Vorbis => "audio/vorbis",
        FileType::Speex => "audio/speex",
        FileType::Wav => "audio/wav",
        FileType::WavPack => "audio/wavpack",
        _ => "application/octet-stream",
    }
}
