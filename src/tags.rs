use crate::file::{MediaFile, MediaPath};
use crate::{Error, Result};
use id3::frame::ExtendedText;
use id3::Frame;
use lofty::ape::{ApeFile, ApeItem, ApeTag};
use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::{AudioFile, FileType};
use lofty::flac::FlacFile;
use lofty::mp4::{Atom, AtomData, AtomIdent, Ilst, Mp4File};
use lofty::musepack::MpcFile;
use lofty::ogg::{OpusFile, SpeexFile, VorbisComments, VorbisFile};
use lofty::tag::{ItemValue, TagExt, TagType};
use lofty::wavpack::WavPackFile;
use std::borrow::Cow;
use std::path::Path;
use std::str::FromStr;

mod id3v2;

/// A synthetic tag marking a file as an edited derivative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTag {
    name: String,
    value: String,
}

impl EditTag {
    /// Name used when no name is given.
    pub const DEFAULT_NAME: &'static str = "edited_retagged";

    /// Creates an edit tag.
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The default edit tag, stamped with the current local time.
    pub fn now() -> Self {
        Self::new(
            Self::DEFAULT_NAME,
            chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
        )
    }

    /// Tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FromStr for EditTag {
    type Err = Error;

    /// Parses "tag_name,tag_value".
    fn from_str(s: &str) -> Result<Self> {
        match s.split(',').collect::<Vec<&str>>().as_slice() {
            [name, value] => Ok(EditTag::new(*name, *value)),
            _ => Err(Error::Usage(s.to_owned())),
        }
    }
}

impl std::fmt::Display for EditTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// The complete tag set of a file, in its tag library's own representation.
#[derive(Debug, Clone)]
pub enum TagSet {
    /// Frame-based ID3v2 tags (MPEG, AAC, WAV, AIFF).
    Id3v2(id3::Tag),
    /// Vorbis comments (FLAC, Ogg Vorbis, Opus, Speex).
    VorbisComments(VorbisComments),
    /// APE tags (Monkey's Audio, WavPack, Musepack).
    Ape(ApeTag),
    /// MP4 ilst atoms.
    Mp4Ilst(Ilst),
}

impl TagSet {
    /// Mean of the freeform MP4 atoms used for custom keys.
    pub const MP4_FREEFORM_MEAN: &'static str = "com.apple.iTunes";

    /// Reads all tags of `file`'s primary tag family.
    ///
    /// A file without tags yields an empty tag set.
    pub fn read(file: &MediaFile) -> Result<Self> {
        let path = file.path().media();

        let tag_set = match file.tag_type() {
            TagType::Id3v2 => TagSet::Id3v2(id3v2::read_tag(path)?),
            TagType::VorbisComments => {
                let tag = match file.file_type() {
                    FileType::Flac => read_native::<FlacFile>(path)?
                        .remove_vorbis_comments()
                        .unwrap_or_default(),
                    FileType::Opus => {
                        read_native::<OpusFile>(path)?.remove_vorbis_comments()
                    }
                    FileType::Speex => {
                        read_native::<SpeexFile>(path)?.remove_vorbis_comments()
                    }
                    _ => read_native::<VorbisFile>(path)?
                        .remove_vorbis_comments(),
                };

                TagSet::VorbisComments(tag)
            }
            TagType::Ape => {
                let tag = match file.file_type() {
                    FileType::WavPack => {
                        read_native::<WavPackFile>(path)?.remove_ape()
                    }
                    FileType::Mpc => read_native::<MpcFile>(path)?.remove_ape(),
                    _ => read_native::<ApeFile>(path)?.remove_ape(),
                };

                TagSet::Ape(tag.unwrap_or_default())
            }
            TagType::Mp4Ilst => TagSet::Mp4Ilst(
                read_native::<Mp4File>(path)?.remove_ilst().unwrap_or_default(),
            ),
            _ => return Err(Error::UnsupportedFormat(path.into())),
        };

        Ok(tag_set)
    }

    /// Tag family of this set.
    pub fn tag_type(&self) -> TagType {
        match self {
            TagSet::Id3v2(_) => TagType::Id3v2,
            TagSet::VorbisComments(_) => TagType::VorbisComments,
            TagSet::Ape(_) => TagType::Ape,
            TagSet::Mp4Ilst(_) => TagType::Mp4Ilst,
        }
    }

    /// Human-readable name of the tag family.
    pub fn name(&self) -> &'static str {
        match self {
            TagSet::Id3v2(_) => "ID3v2",
            TagSet::VorbisComments(_) => "Vorbis comment",
            TagSet::Ape(_) => "APE",
            TagSet::Mp4Ilst(_) => "MP4",
        }
    }

    /// Number of items in the set.
    pub fn len(&self) -> usize {
        match self {
            TagSet::Id3v2(tag) => tag.frames().count(),
            TagSet::VorbisComments(tag) => tag.len(),
            TagSet::Ape(tag) => tag.len(),
            TagSet::Mp4Ilst(tag) => tag.len(),
        }
    }

    /// Whether the set holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds `edit_tag` to the set.
    ///
    /// ID3v2 gets an additional `TXXX` frame, even if one with the same
    /// description exists. Every other family replaces the value stored
    /// under the key.
    pub fn insert_edit_tag(&mut self, edit_tag: &EditTag) -> Result<()> {
        let tag_type = self.name();
        let unsupported = || Error::UnsupportedTagOperation {
            key: edit_tag.name().to_owned(),
            tag_type,
        };

        match self {
            TagSet::Id3v2(tag) => {
                // `add_frame` would drop a frame with the same description.
                tag.extend(std::iter::once(Frame::from(ExtendedText {
                    description: edit_tag.name().to_owned(),
                    value: edit_tag.value().to_owned(),
                })));
            }
            TagSet::VorbisComments(tag) => {
                if !is_vorbis_key(edit_tag.name()) {
                    return Err(unsupported());
                }

                tag.insert(
                    edit_tag.name().to_owned(),
                    edit_tag.value().to_owned(),
                );
            }
            TagSet::Ape(tag) => {
                let item = ApeItem::new(
                    edit_tag.name().to_owned(),
                    ItemValue::Text(edit_tag.value().to_owned()),
                );

                match item {
                    Ok(item) => tag.insert(item),
                    Err(_) => return Err(unsupported()),
                }
            }
            TagSet::Mp4Ilst(tag) => {
                if edit_tag.name().is_empty() {
                    return Err(unsupported());
                }

                tag.replace_atom(Atom::new(
                    AtomIdent::Freeform {
                        mean: Cow::Borrowed(Self::MP4_FREEFORM_MEAN),
                        name: Cow::Owned(edit_tag.name().to_owned()),
                    },
                    AtomData::UTF8(edit_tag.value().to_owned()),
                ));
            }
        }

        log::debug!("Added {} tag \"{}\"", self.name(), edit_tag);

        Ok(())
    }

    /// Replaces all tags of `destination` with this set and saves it.
    pub fn write(&self, destination: &MediaFile) -> Result<()> {
        if destination.tag_type() != self.tag_type() {
            return Err(Error::IncompatibleTags {
                tag_type: self.name(),
                destination: destination.path().media().into(),
                media_type: destination.media_type(),
            });
        }

        let path = destination.path().media();
        let write_options = WriteOptions::new().remove_others(true);

        match self {
            TagSet::Id3v2(tag) => {
                let strip_v1 = matches!(
                    destination.file_type(),
                    FileType::Mpeg | FileType::Aac
                );

                if strip_v1 && id3::v1::Tag::remove_from_path(path)? {
                    log::debug!(
                        "Removed ID3v1 tag from \"{}\"",
                        path.display()
                    );
                }

                tag.write_to_path(path, id3::Version::Id3v24)?;
            }
            TagSet::VorbisComments(tag) => {
                tag.save_to_path(path, write_options)?;
            }
            TagSet::Ape(tag) => tag.save_to_path(path, write_options)?,
            TagSet::Mp4Ilst(tag) => tag.save_to_path(path, write_options)?,
        }

        log::debug!(
            "Wrote {} {} tags to \"{}\"",
            self.len(),
            self.name(),
            path.display()
        );

        Ok(())
    }
}

fn read_native<F: AudioFile>(path: &Path) -> Result<F> {
    let mut file = std::fs::File::open(path)?;

    Ok(F::read_from(
        &mut file,
        ParseOptions::new().read_properties(false),
    )?)
}

/// Vorbis comment field names are printable ASCII without '='.
fn is_vorbis_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|byte| (0x20..=0x7D).contains(&byte) && byte != b'=')
}

/// Copies all tags from `source` to `destination`, optionally adding
/// `edit_tag`.
///
/// Any tags already in `destination` are discarded. `source` is never
/// modified.
pub fn copy_tags(
    source: &MediaPath,
    destination: &MediaPath,
    edit_tag: Option<&EditTag>,
) -> Result<()> {
    let source_file = MediaFile::probe(source)?;
    let destination_file = MediaFile::probe(destination)?;

    let mut tags = TagSet::read(&source_file)?;

    log::debug!(
        "Read {} {} tags from \"{}\" ({})",
        tags.len(),
        tags.name(),
        source,
        source_file.media_type()
    );

    if let Some(edit_tag) = edit_tag {
        tags.insert_edit_tag(edit_tag)?;
    }

    tags.write(&destination_file)
}
