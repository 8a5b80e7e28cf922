//! PID file tracking for the gateway process.
//!
//! One file per port, so a later run can find and stop a gateway an earlier
//! run left behind. Format is two lines:
//! ```text
//! <pid>
//! <port>
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// PID file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PidFileData {
    pub pid: u32,
    pub port: u16,
}

/// Location of the PID file for the gateway on `port`.
pub fn pidfile_path(dir: &Path, port: u16) -> PathBuf {
    dir.join(format!("mcpo-{port}.pid"))
}

/// Write the PID file atomically (temp file, then rename).
pub fn write_pidfile(dir: &Path, data: PidFileData) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let final_path = pidfile_path(dir, data.port);
    let temp_path = final_path.with_extension("pid.tmp");

    fs::write(&temp_path, format!("{}\n{}\n", data.pid, data.port))?;
    fs::rename(&temp_path, &final_path)?;

    Ok(final_path)
}

pub fn read_pidfile(path: &Path) -> io::Result<PidFileData> {
    parse_pidfile_content(&fs::read_to_string(path)?)
}

/// Delete the PID file (idempotent).
pub fn delete_pidfile(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn parse_pidfile_content(content: &str) -> io::Result<PidFileData> {
    let mut lines = content.lines();

    let pid = lines
        .next()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing or invalid PID"))?;

    let port = lines
        .next()
        .and_then(|s| s.trim().parse::<u16>().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing or invalid port"))?;

    Ok(PidFileData { pid, port })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let data = PidFileData {
            pid: 4242,
            port: 9000,
        };

        let path = write_pidfile(dir.path(), data).unwrap();
        assert_eq!(path, dir.path().join("mcpo-9000.pid"));
        assert_eq!(read_pidfile(&path).unwrap(), data);
        assert!(!dir.path().join("mcpo-9000.pid.tmp").exists());

        delete_pidfile(&path).unwrap();
        assert!(!path.exists());
        delete_pidfile(&path).unwrap();
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state").join("pids");

        let path = write_pidfile(&nested, PidFileData { pid: 1, port: 9100 }).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcpo-9000.pid");

        fs::write(&path, "not-a-pid\n9000\n").unwrap();
        assert_eq!(
            read_pidfile(&path).unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );

        fs::write(&path, "1234\n").unwrap();
        assert_eq!(
            read_pidfile(&path).unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_pidfile(&pidfile_path(dir.path(), 9000)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
