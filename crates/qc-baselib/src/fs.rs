//! Document files: scoped loading and atomic writing.
//!
//! Writes serialize the whole document in memory first, then go through a
//! temporary file in the target directory that is persisted over the
//! target. A failed write leaves any existing file untouched.

use crate::Error;
use qc_baselib_core::{CheckerResults, CodecError, Configuration, WriterSettings};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Loads a result document from a file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Codec`]
/// if its content is not a valid result document.
pub fn load_result(path: impl AsRef<Path>) -> Result<CheckerResults, Error> {
    let path = path.as_ref();
    let doc = CheckerResults::from_xml(&read(path)?)?;
    info!(
        path = %path.display(),
        bundles = doc.get_checker_bundle_names().len(),
        issues = doc.get_issue_count(),
        "loaded result document"
    );
    Ok(doc)
}

/// Writes a result document to a file with default settings.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written.
pub fn write_result(path: impl AsRef<Path>, doc: &CheckerResults) -> Result<(), Error> {
    write_result_with(path, doc, &WriterSettings::default())
}

/// Writes a result document to a file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written.
pub fn write_result_with(
    path: impl AsRef<Path>,
    doc: &CheckerResults,
    settings: &WriterSettings,
) -> Result<(), Error> {
    let path = path.as_ref();
    let xml = doc.to_xml_with(settings)?;
    write_atomic(path, xml.as_bytes())?;
    info!(
        path = %path.display(),
        bundles = doc.get_checker_bundle_names().len(),
        issues = doc.get_issue_count(),
        "wrote result document"
    );
    Ok(())
}

/// Loads a configuration document from a file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Codec`]
/// if its content is not a valid configuration document.
pub fn load_configuration(path: impl AsRef<Path>) -> Result<Configuration, Error> {
    let path = path.as_ref();
    let config = Configuration::from_xml(&read(path)?)?;
    info!(
        path = %path.display(),
        bundles = config.get_checker_bundles().len(),
        "loaded configuration document"
    );
    Ok(config)
}

/// Writes a configuration document to a file with default settings.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written.
pub fn write_configuration(path: impl AsRef<Path>, config: &Configuration) -> Result<(), Error> {
    write_configuration_with(path, config, &WriterSettings::default())
}

/// Writes a configuration document to a file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written.
pub fn write_configuration_with(
    path: impl AsRef<Path>,
    config: &Configuration,
    settings: &WriterSettings,
) -> Result<(), Error> {
    let path = path.as_ref();
    let xml = config.to_xml_with(settings)?;
    write_atomic(path, xml.as_bytes())?;
    info!(
        path = %path.display(),
        bundles = config.get_checker_bundles().len(),
        "wrote configuration document"
    );
    Ok(())
}

/// Reads a file as UTF-8 text. Invalid UTF-8 is a syntax error, not I/O.
fn read(path: &Path) -> Result<String, Error> {
    debug!("Reading document: {}", path.display());
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| {
        let position = e.utf8_error().valid_up_to();
        Error::Codec(CodecError::Syntax {
            position: u64::try_from(position).unwrap_or(u64::MAX),
            message: format!("invalid UTF-8: {}", e.utf8_error()),
        })
    })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let io_error = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(bytes).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;
    debug!("Persisted {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_result(tmp.path().join("absent.xqar")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("no/such/dir/Result.xqar");
        let err = write_result(&target, &CheckerResults::new()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("Result.xqar");
        std::fs::write(&target, "stale").unwrap();

        write_result(&target, &CheckerResults::with_version("2.0.0")).unwrap();

        let loaded = load_result(&target).unwrap();
        assert_eq!(loaded.version(), "2.0.0");
        let leftovers: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_malformed_file_is_codec_error() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("Broken.xqar");
        std::fs::write(&target, "<CheckerResults version=\"1\">").unwrap();
        let err = load_result(&target).unwrap_err();
        assert!(matches!(err, Error::Codec(CodecError::Syntax { .. })));
    }

    #[test]
    fn test_invalid_utf8_is_codec_error() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("Latin1.xqar");
        std::fs::write(&target, b"<CheckerResults version=\"\xe9\"/>").unwrap();
        let err = load_result(&target).unwrap_err();
        match err {
            Error::Codec(CodecError::Syntax { position, .. }) => assert_eq!(position, 25),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}
