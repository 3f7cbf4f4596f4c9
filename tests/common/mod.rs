use anyhow::Result;
use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use id3::TagLike;
use lofty::config::WriteOptions;
use lofty::ogg::VorbisComments;
use lofty::tag::TagExt;
use std::path::Path;

const MPEG_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];
const MPEG_FRAME_LENGTH: usize = 417;

/// A few silent-enough MPEG frames, distinguishable by `fill`.
pub fn mpeg_audio(fill: u8) -> Vec<u8> {
    (0..4u8)
        .flat_map(|index| {
            let mut frame = MPEG_FRAME_HEADER.to_vec();
            frame.resize(MPEG_FRAME_LENGTH, fill.wrapping_add(index));
            frame
        })
        .collect()
}

/// A FLAC stream with a STREAMINFO and a PADDING block.
#[allow(dead_code)]
pub fn flac_audio() -> Vec<u8> {
    let mut data = b"fLaC".to_vec();
    data.extend([0x00, 0x00, 0x00, 0x22]);
    data.extend([0x10, 0x00, 0x10, 0x00]);
    data.resize(data.len() + 30, 0);
    data.extend([0x81, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00]);
    data.extend([0xFF, 0xF8, 0x69, 0x08]);
    data.resize(data.len() + 60, 0x5A);
    data
}

/// Writes an MP3 file with `fill` audio and the given title and artist.
pub fn create_mp3(
    dir: &TempDir,
    name: &str,
    fill: u8,
    title: &str,
    artist: &str,
) -> Result<()> {
    let file = dir.child(name);
    file.write_binary(&mpeg_audio(fill))?;

    let mut tag = id3::Tag::new();
    tag.set_title(title);
    tag.set_artist(artist);
    tag.write_to_path(file.path(), id3::Version::Id3v24)?;

    Ok(())
}

/// Writes a FLAC file with the given title.
#[allow(dead_code)]
pub fn create_flac(dir: &TempDir, name: &str, title: &str) -> Result<()> {
    let file = dir.child(name);
    file.write_binary(&flac_audio())?;

    let mut comments = VorbisComments::new();
    comments.push("TITLE".to_owned(), title.to_owned());
    comments.save_to_path(file.path(), WriteOptions::new())?;

    Ok(())
}

/// Reads the ID3v2 tag of `path`.
pub fn read_id3(path: &Path) -> Result<id3::Tag> {
    Ok(id3::Tag::read_from_path(path)?)
}

/// Command running the binary inside `dir`.
pub fn audio_tag_copy(dir: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("audio-tag-copy")?;
    cmd.current_dir(dir.path());
    Ok(cmd)
}
