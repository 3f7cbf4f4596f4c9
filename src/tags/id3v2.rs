use crate::Result;
use id3::{Frame, Tag};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

const HEADER_LEN: usize = 10;
const FLAG_UNSYNCHRONISATION: u8 = 0x80;
const FLAG_EXTENDED_HEADER: u8 = 0x40;

/// Reads the ID3v2 tag of `path` with every frame it holds.
///
/// `id3::Tag` merges frames it considers duplicates while reading, such as
/// two `TXXX` frames with the same description. Those are kept here.
pub(super) fn read_tag(path: &Path) -> Result<Tag> {
    let tag = id3::no_tag_ok(Tag::read_from_path(path))?.unwrap_or_default();

    match read_frames(path)? {
        Some(frames) if frames.len() >= tag.frames().count() => {
            Ok(frames.into_iter().collect())
        }
        _ => Ok(tag),
    }
}

/// Decodes each frame of a v2.3 or v2.4 tag at the start of `path` on its
/// own.
///
/// Returns `None` for layouts that aren't split: other versions, tag-wide
/// unsynchronisation, extended headers and tags inside WAV or AIFF chunks.
fn read_frames(path: &Path) -> Result<Option<Vec<Frame>>> {
    let mut file = File::open(path)?;
    let mut header = [0u8; HEADER_LEN];

    if file.read_exact(&mut header).is_err() || &header[..3] != b"ID3" {
        return Ok(None);
    }

    let version = header[3];
    let flags = header[5];

    if !matches!(version, 3 | 4)
        || flags & (FLAG_UNSYNCHRONISATION | FLAG_EXTENDED_HEADER) != 0
    {
        return Ok(None);
    }

    let mut body = vec![0u8; decode_synchsafe(&header[6..10])];

    if file.read_exact(&mut body).is_err() {
        return Ok(None);
    }

    let mut frames = Vec::new();
    let mut offset = 0;

    while let Some(frame_header) = body.get(offset..offset + HEADER_LEN) {
        // Padding
        if frame_header[0] == 0 {
            break;
        }

        let size = if version == 4 {
            decode_synchsafe(&frame_header[4..8])
        } else {
            frame_header[4..8]
                .iter()
                .fold(0usize, |acc, byte| (acc << 8) | usize::from(*byte))
        };

        let end = offset + HEADER_LEN + size;

        let Some(frame) =
            body.get(offset..end).and_then(|raw| decode_frame(version, raw))
        else {
            return Ok(None);
        };

        frames.push(frame);
        offset = end;
    }

    Ok(Some(frames))
}

/// Wraps a single raw frame in a tag header and lets `id3` decode it.
fn decode_frame(version: u8, raw_frame: &[u8]) -> Option<Frame> {
    let size = encode_synchsafe(raw_frame.len())?;

    let mut data = Vec::with_capacity(HEADER_LEN + raw_frame.len());
    data.extend_from_slice(&[b'I', b'D', b'3', version, 0, 0]);
    data.extend_from_slice(&size);
    data.extend_from_slice(raw_frame);

    let tag = Tag::read_from2(Cursor::new(data)).ok()?;
    let frame = tag.frames().next().cloned();
    frame
}

fn decode_synchsafe(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .fold(0usize, |acc, byte| (acc << 7) | usize::from(byte & 0x7F))
}

fn encode_synchsafe(value: usize) -> Option<[u8; 4]> {
    if value >= 1 << 28 {
        return None;
    }

    let byte = |shift: usize| u8::try_from((value >> shift) & 0x7F).ok();

    Some([byte(21)?, byte(14)?, byte(7)?, byte(0)?])
}
