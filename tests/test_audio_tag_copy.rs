use anyhow::Result;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use common::{audio_tag_copy, create_flac, create_mp3, mpeg_audio, read_id3};
use id3::frame::ExtendedText;
use id3::{Frame, TagLike};
use predicates::prelude::*;

mod common;

const SOURCE: &str = "Dune - MASTER BOOT RECORD.mp3";
const DESTINATION: &str = "Dune - MASTER BOOT RECORD (edit).mp3";

fn init() -> Result<TempDir> {
    let dir = TempDir::new()?;

    create_mp3(&dir, SOURCE, 1, "Dune", "MASTER BOOT RECORD")?;
    create_mp3(&dir, DESTINATION, 100, "Untitled", "Unknown")?;

    Ok(dir)
}

fn backup_name(name: &str) -> String {
    format!("{name}.bak")
}

fn sidecar_name(name: &str) -> String {
    format!("{name}.asd")
}

#[test]
fn test_copy_tags() -> Result<()> {
    let dir = init()?;
    let source_bytes = std::fs::read(dir.child(SOURCE).path())?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION])
        .assert()
        .success();

    let tag = read_id3(dir.child(DESTINATION).path())?;
    assert_eq!(tag.title(), Some("Dune"));
    assert_eq!(tag.artist(), Some("MASTER BOOT RECORD"));

    assert!(std::fs::read(dir.child(DESTINATION).path())?
        .ends_with(&mpeg_audio(100)));
    assert_eq!(std::fs::read(dir.child(SOURCE).path())?, source_bytes);
    dir.child(backup_name(SOURCE))
        .assert(predicate::path::missing());

    Ok(())
}

#[test]
fn test_default_edit_tag() -> Result<()> {
    let dir = init()?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "-e"])
        .assert()
        .success();

    let tag = read_id3(dir.child(DESTINATION).path())?;
    let edit_tag = tag
        .extended_texts()
        .find(|text| text.description == "edited_retagged");

    assert!(edit_tag.is_some_and(|text| chrono::NaiveDateTime::parse_from_str(
        &text.value,
        "%Y-%m-%dT%H:%M:%S%.6f"
    )
    .is_ok()));

    Ok(())
}

#[test]
fn test_custom_edit_tag() -> Result<()> {
    let dir = init()?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "--edit-tag=remixed,yes"])
        .assert()
        .success();

    let tag = read_id3(dir.child(DESTINATION).path())?;

    assert!(tag
        .extended_texts()
        .any(|text| text.description == "remixed" && text.value == "yes"));
    assert_eq!(read_id3(dir.child(SOURCE).path())?.extended_texts().count(), 0);

    Ok(())
}

#[test]
fn test_edit_tag_keeps_duplicate_source_frames() -> Result<()> {
    let dir = init()?;
    let source = dir.child(SOURCE);

    let mut tag = read_id3(source.path())?;
    tag.extend(["first", "second"].map(|value| {
        Frame::from(ExtendedText {
            description: "edited_retagged".to_owned(),
            value: value.to_owned(),
        })
    }));
    tag.write_to_path(source.path(), id3::Version::Id3v24)?;

    let source_bytes = std::fs::read(source.path())?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "-e"])
        .assert()
        .success();

    let destination_bytes = std::fs::read(dir.child(DESTINATION).path())?;
    let frames = destination_bytes
        .windows(4)
        .filter(|window| *window == b"TXXX")
        .count();

    assert_eq!(frames, 3);
    assert_eq!(std::fs::read(source.path())?, source_bytes);

    Ok(())
}

#[test]
fn test_invalid_edit_tag() -> Result<()> {
    let dir = init()?;
    let destination_bytes = std::fs::read(dir.child(DESTINATION).path())?;

    for value in ["--edit-tag=remixed", "--edit-tag=remixed,yes,no"] {
        audio_tag_copy(&dir)?
            .args([SOURCE, DESTINATION, "-o", value])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("tag_name,tag_value"));
    }

    assert_eq!(
        std::fs::read(dir.child(DESTINATION).path())?,
        destination_bytes
    );
    dir.child(backup_name(SOURCE))
        .assert(predicate::path::missing());

    Ok(())
}

#[test]
fn test_overwrite() -> Result<()> {
    let dir = init()?;
    let source_bytes = std::fs::read(dir.child(SOURCE).path())?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "-o"])
        .assert()
        .success();

    let tag = read_id3(dir.child(SOURCE).path())?;
    assert_eq!(tag.title(), Some("Dune"));
    assert!(std::fs::read(dir.child(SOURCE).path())?
        .ends_with(&mpeg_audio(100)));

    dir.child(DESTINATION).assert(predicate::path::missing());
    assert_eq!(
        std::fs::read(dir.child(backup_name(SOURCE)).path())?,
        source_bytes
    );

    Ok(())
}

#[test]
fn test_overwrite_backup_directory() -> Result<()> {
    let dir = init()?;
    let source_bytes = std::fs::read(dir.child(SOURCE).path())?;
    dir.child("backups").create_dir_all()?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "-o", "-b", "backups"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read(dir.child("backups").child(SOURCE).path())?,
        source_bytes
    );
    dir.child(backup_name(SOURCE))
        .assert(predicate::path::missing());

    Ok(())
}

#[test]
fn test_overwrite_backup_file() -> Result<()> {
    let dir = init()?;
    let source_bytes = std::fs::read(dir.child(SOURCE).path())?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "-o", "-b", "original.mp3"])
        .assert()
        .success();

    assert_eq!(std::fs::read(dir.child("original.mp3").path())?, source_bytes);
    dir.child(backup_name(SOURCE))
        .assert(predicate::path::missing());

    Ok(())
}

#[test]
fn test_overwrite_disable_backup() -> Result<()> {
    let dir = init()?;
    dir.child(sidecar_name(SOURCE)).write_str("source markers")?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "-o", "-D"])
        .assert()
        .success();

    dir.child(DESTINATION).assert(predicate::path::missing());
    dir.child(backup_name(SOURCE))
        .assert(predicate::path::missing());
    dir.child(sidecar_name(&backup_name(SOURCE)))
        .assert(predicate::path::missing());
    dir.child(sidecar_name(SOURCE))
        .assert(predicate::path::missing());

    Ok(())
}

#[test]
fn test_overwrite_sidecars() -> Result<()> {
    let dir = init()?;
    dir.child(sidecar_name(SOURCE)).write_str("source markers")?;
    dir.child(sidecar_name(DESTINATION))
        .write_str("destination markers")?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "-o"])
        .assert()
        .success();

    dir.child(sidecar_name(&backup_name(SOURCE)))
        .assert("source markers");
    dir.child(sidecar_name(SOURCE))
        .assert("destination markers");
    dir.child(sidecar_name(DESTINATION))
        .assert(predicate::path::missing());

    Ok(())
}

#[test]
fn test_overwrite_no_backup_asd() -> Result<()> {
    let dir = init()?;
    dir.child(sidecar_name(SOURCE)).write_str("source markers")?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "-o", "--no-backup-asd"])
        .assert()
        .success();

    dir.child(backup_name(SOURCE)).assert(predicate::path::is_file());
    dir.child(sidecar_name(&backup_name(SOURCE)))
        .assert(predicate::path::missing());
    dir.child(sidecar_name(SOURCE))
        .assert(predicate::path::missing());

    Ok(())
}

#[test]
fn test_overwrite_without_sidecars() -> Result<()> {
    let dir = init()?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "-o"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    dir.child(sidecar_name(&backup_name(SOURCE)))
        .assert(predicate::path::missing());
    dir.child(sidecar_name(SOURCE))
        .assert(predicate::path::missing());

    Ok(())
}

#[test]
fn test_backup_failure_prevents_overwrite() -> Result<()> {
    let dir = init()?;
    let source_bytes = std::fs::read(dir.child(SOURCE).path())?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "-o", "-b", "missing/original.mp3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unable to backup source file"));

    assert_eq!(std::fs::read(dir.child(SOURCE).path())?, source_bytes);
    dir.child(DESTINATION).assert(predicate::path::is_file());

    Ok(())
}

#[test]
fn test_backup_onto_source_prevents_overwrite() -> Result<()> {
    let dir = init()?;
    let source_bytes = std::fs::read(dir.child(SOURCE).path())?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "-o", "-b", "."])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unable to backup source file"));

    assert_eq!(std::fs::read(dir.child(SOURCE).path())?, source_bytes);
    dir.child(DESTINATION).assert(predicate::path::is_file());

    Ok(())
}

#[test]
fn test_ineffective_flags_warn() -> Result<()> {
    let dir = init()?;

    audio_tag_copy(&dir)?
        .args([SOURCE, DESTINATION, "-D"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "--disable-backup has no effect without --overwrite",
        ));

    dir.child(DESTINATION).assert(predicate::path::is_file());

    Ok(())
}

#[test]
fn test_unsupported_format() -> Result<()> {
    let dir = init()?;
    dir.child("notes.txt").write_str("Not audio.")?;

    audio_tag_copy(&dir)?
        .args([SOURCE, "notes.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported file format"));

    dir.child("notes.txt").assert("Not audio.");

    Ok(())
}

#[test]
fn test_incompatible_tags() -> Result<()> {
    let dir = init()?;
    create_flac(&dir, "Dune.flac", "Untitled")?;

    audio_tag_copy(&dir)?
        .args([SOURCE, "Dune.flac", "-o"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unable to store ID3v2 tags"));

    dir.child("Dune.flac").assert(predicate::path::is_file());
    dir.child(backup_name(SOURCE))
        .assert(predicate::path::missing());

    Ok(())
}

#[test]
fn test_missing_source() -> Result<()> {
    let dir = init()?;

    audio_tag_copy(&dir)?
        .args(["missing.mp3", DESTINATION])
        .assert()
        .code(1);

    Ok(())
}
