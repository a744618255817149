//! JSONL snapshots: one record per line.
//!
//! The CLI keeps bugs and users between invocations in two JSONL files.
//! Blank lines and `#` comments are skipped on read; writes replace the
//! file atomically (temp file, fsync, rename, then fsync of the directory).

use crate::bug::Bug;
use crate::user::User;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Read records from a JSONL reader.
pub fn read_records<T: DeserializeOwned>(reader: impl BufRead) -> Result<Vec<T>, JsonlError> {
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| JsonlError::Io(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record: T = serde_json::from_str(trimmed)
            .map_err(|e| JsonlError::Parse(line_no + 1, e.to_string()))?;
        records.push(record);
    }
    Ok(records)
}

/// Write records to a JSONL writer.
pub fn write_records<T: Serialize>(
    writer: &mut impl Write,
    records: &[T],
) -> Result<(), JsonlError> {
    for record in records {
        let line =
            serde_json::to_string(record).map_err(|e| JsonlError::Serialize(e.to_string()))?;
        writeln!(writer, "{line}").map_err(|e| JsonlError::Io(0, e.to_string()))?;
    }
    Ok(())
}

/// Read bugs from a JSONL file path.
pub fn read_bugs_from_path(path: impl AsRef<Path>) -> Result<Vec<Bug>, JsonlError> {
    read_records_from_path(path)
}

/// Write bugs to a JSONL file path.
pub fn write_bugs_to_path(path: impl AsRef<Path>, bugs: &[Bug]) -> Result<(), JsonlError> {
    write_records_to_path(path, bugs)
}

/// Read users from a JSONL file path.
pub fn read_users_from_path(path: impl AsRef<Path>) -> Result<Vec<User>, JsonlError> {
    read_records_from_path(path)
}

/// Write users to a JSONL file path.
pub fn write_users_to_path(path: impl AsRef<Path>, users: &[User]) -> Result<(), JsonlError> {
    write_records_to_path(path, users)
}

fn read_records_from_path<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<Vec<T>, JsonlError> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).map_err(|e| JsonlError::Io(0, format!("{}: {e}", path.display())))?;
    validate_bytes(path, &bytes)?;
    read_records(BufReader::new(bytes.as_slice()))
}

fn write_records_to_path<T: Serialize>(
    path: impl AsRef<Path>,
    records: &[T],
) -> Result<(), JsonlError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", parent.display())))?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), JsonlError> {
        let file = File::create(&tmp_path)
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        let mut writer = BufWriter::new(file);
        write_records(&mut writer, records)?;
        let file = writer
            .into_inner()
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        file.sync_all()
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        JsonlError::Io(
            0,
            format!("{} -> {}: {e}", tmp_path.display(), path.display()),
        )
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        let dir = File::open(parent)
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", parent.display())))?;
        dir.sync_all()
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", parent.display())))?;
    }

    tracing::debug!(path = %path.display(), records = records.len(), "snapshot written");
    Ok(())
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

fn validate_bytes(path: &Path, bytes: &[u8]) -> Result<(), JsonlError> {
    if bytes.contains(&0) {
        return Err(JsonlError::Corrupt(format!(
            "{}: contains NUL byte(s)",
            path.display()
        )));
    }
    if std::str::from_utf8(bytes).is_err() {
        return Err(JsonlError::Corrupt(format!(
            "{}: contains non-UTF-8 byte sequence(s)",
            path.display()
        )));
    }
    Ok(())
}

/// Errors from JSONL operations.
#[derive(Debug, thiserror::Error)]
pub enum JsonlError {
    #[error("line {0}: I/O error: {1}")]
    Io(usize, String),

    #[error("line {0}: parse error: {1}")]
    Parse(usize, String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("corrupted snapshot: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{demo_bugs, demo_users};

    fn temp_path(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "bugboard-jsonl-{prefix}-{}-{unique}.jsonl",
            std::process::id()
        ))
    }

    #[test]
    fn read_records_skips_blank_and_comment_lines() {
        let raw = "# demo users\n\n{\"id\":\"USR-9\",\"name\":\"N\",\"email\":\"n@x\",\"role\":\"tester\"}\n";
        let users: Vec<User> = read_records(raw.as_bytes()).expect("users should parse");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "USR-9");
    }

    #[test]
    fn read_records_reports_line_of_parse_error() {
        let raw = "{\"id\":\"USR-9\",\"name\":\"N\",\"email\":\"n@x\",\"role\":\"tester\"}\n{not json}\n";
        let err = read_records::<User>(raw.as_bytes()).expect_err("second line is invalid");
        assert!(matches!(err, JsonlError::Parse(2, _)));
    }

    #[test]
    fn read_bugs_from_path_rejects_nul_payload() {
        let path = temp_path("nul");
        fs::write(&path, b"{\"id\":\"BUG-1\"}\n\0garbage").expect("fixture should write");

        match read_bugs_from_path(&path) {
            Err(JsonlError::Corrupt(message)) => assert!(message.contains("contains NUL")),
            other => panic!("expected corrupt snapshot error, got {other:?}"),
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn read_bugs_from_path_rejects_non_utf8_payload() {
        let path = temp_path("non-utf8");
        fs::write(&path, [0xff, 0xfe, 0xfd]).expect("fixture should write");

        match read_bugs_from_path(&path) {
            Err(JsonlError::Corrupt(message)) => assert!(message.contains("non-UTF-8")),
            other => panic!("expected corrupt snapshot error, got {other:?}"),
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn snapshot_round_trips_and_replaces_file() {
        let path = temp_path("round-trip");
        write_users_to_path(&path, &demo_users()).expect("first write should succeed");

        let bugs = demo_bugs();
        write_bugs_to_path(&path, &bugs).expect("second write should succeed");

        let raw = fs::read_to_string(&path).expect("jsonl should exist");
        assert!(!raw.contains("admin@example.com"));
        assert_eq!(read_bugs_from_path(&path).expect("bugs should load"), bugs);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn snapshot_write_creates_parent_and_leaves_no_temp_files() {
        let dir = temp_path("nested").with_extension("");
        let path = dir.join("data").join("bugs.jsonl");

        write_bugs_to_path(&path, &demo_bugs()).expect("write should create parents");
        assert_eq!(read_bugs_from_path(&path).expect("bugs should load").len(), 3);

        let entries: Vec<String> = fs::read_dir(path.parent().expect("parent"))
            .expect("data dir should exist")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(entries, vec!["bugs.jsonl".to_string()]);

        let _ = fs::remove_dir_all(dir);
    }
}
