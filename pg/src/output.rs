//! Output file writing
//!
//! Rendered text goes to a temporary file next to the target and is then
//! renamed over it, so the target is either fully replaced or left alone.
//! The parent directory must already exist. An existing target keeps its
//! permissions; a new one gets what a plain create would give it.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::error::{GenerateError, GenerateResult};

/// Atomically replace `path` with `contents`
pub fn write_atomic(path: &Path, contents: &str) -> GenerateResult<()> {
    debug!(?path, bytes = contents.len(), "write_atomic: called");
    let write_err = |source| GenerateError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = temp_file_in(parent).map_err(write_err)?;
    if let Ok(meta) = fs::metadata(path)
        && meta.is_file()
    {
        debug!(?path, "write_atomic: keeping existing permissions");
        tmp.as_file().set_permissions(meta.permissions()).map_err(write_err)?;
    }
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!(?path, "write_atomic: persisted");
    Ok(())
}

// Temp files default to 0600; ask for 0666 so the umask decides, as it
// would for `File::create`.
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_new_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.yaml");
        write_atomic(&path, "services: {}\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "services: {}\n");
    }

    #[test]
    fn test_overwrites_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.yaml");
        fs::write(&path, "a much longer previous body that must not survive").unwrap();
        write_atomic(&path, "short").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_missing_parent_directory_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("no-such-dir").join("out.yaml");
        let err = write_atomic(&path, "x").unwrap_err();
        assert!(matches!(err, GenerateError::OutputWrite { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_directory_target_fails_and_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.yaml");
        fs::create_dir(&path).unwrap();
        let err = write_atomic(&path, "x").unwrap_err();
        assert!(matches!(err, GenerateError::OutputWrite { .. }));
        assert!(path.is_dir());

        let leftovers: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_plain_create_mode() {
        let temp = TempDir::new().unwrap();
        let reference = temp.path().join("reference.yaml");
        fs::File::create(&reference).unwrap();

        let path = temp.path().join("out.yaml");
        write_atomic(&path, "x").unwrap();
        assert_eq!(mode_of(&path), mode_of(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        for mode in [0o644, 0o640, 0o600] {
            let path = temp.path().join(format!("out-{:o}.yaml", mode));
            fs::write(&path, "old").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();

            write_atomic(&path, "new").unwrap();
            assert_eq!(fs::read_to_string(&path).unwrap(), "new");
            assert_eq!(mode_of(&path), mode);
        }
    }
}
