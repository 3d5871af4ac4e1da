//! Record extraction from dropped files
//!
//! A dropped file holds one or more JSON objects separated only by
//! whitespace. The first directory below the drop share root names the
//! destination index and the file's base name names the document type:
//! `root/Github/MyDataFile.2024.json` becomes (`github`, `mydatafile`).

use crate::core::audit::RunLog;
use crate::domain::{ExtractError, Record};
use serde_json::{Deserializer, Value};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Read every record out of a file, reporting failures to the run log
///
/// A file either yields all of its records or none: any open, routing or
/// parse failure writes one Error audit entry naming the file and returns an
/// empty list. The read runs on the blocking pool so a slow share does not
/// stall the runtime.
pub async fn extract_records(path: &Path, root: &Path, log: &RunLog) -> Vec<Record> {
    let (file, base) = (path.to_path_buf(), root.to_path_buf());
    match tokio::task::spawn_blocking(move || read_records(&file, &base)).await {
        Ok(Ok(records)) => records,
        Ok(Err(e)) => {
            log.error(format!("Exception - {e}")).await;
            Vec::new()
        }
        Err(e) => {
            log.error(format!(
                "Exception - reading {} failed: {e}",
                path.display()
            ))
            .await;
            Vec::new()
        }
    }
}

/// Read every record out of a file
///
/// # Errors
///
/// - [`ExtractError::Routing`] if the file is outside the root or directly in it
/// - [`ExtractError::Open`] if the file cannot be opened or read
/// - [`ExtractError::Parse`] if the content is not a sequence of JSON objects
pub fn read_records(path: &Path, root: &Path) -> Result<Vec<Record>, ExtractError> {
    let (collection, kind) = route(path, root)?;

    let bytes = read_shared(path).map_err(|source| ExtractError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);

    let mut records = Vec::new();
    for (position, document) in Deserializer::from_slice(content)
        .into_iter::<Value>()
        .enumerate()
    {
        let document = document.map_err(|e| ExtractError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if !document.is_object() {
            return Err(ExtractError::Parse {
                path: path.to_path_buf(),
                message: format!("document {} is not a JSON object", position + 1),
            });
        }

        records.push(Record::new(document.to_string(), &collection, &kind));
    }

    tracing::debug!(
        path = %path.display(),
        collection = %collection,
        kind = %kind,
        count = records.len(),
        "Extracted records"
    );

    Ok(records)
}

/// Derive the (collection, kind) pair for a file below `root`
///
/// # Errors
///
/// Returns [`ExtractError::Routing`] if the file is not below a collection
/// directory or its base name is empty.
pub fn route(path: &Path, root: &Path) -> Result<(String, String), ExtractError> {
    let routing_error = |reason: &str| ExtractError::Routing {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let relative = path
        .strip_prefix(root)
        .map_err(|_| routing_error("file is outside the drop share root"))?;

    let mut components = relative.components().filter_map(|component| match component {
        Component::Normal(part) => Some(part),
        _ => None,
    });
    let collection = components
        .next()
        .ok_or_else(|| routing_error("path has no components below the root"))?;
    if components.next().is_none() {
        return Err(routing_error(
            "file sits directly in the drop share root, expected a collection directory",
        ));
    }

    let kind = base_name(relative).ok_or_else(|| routing_error("file has an empty base name"))?;

    Ok((
        collection.to_string_lossy().to_lowercase(),
        kind.to_lowercase(),
    ))
}

/// File name with every extension removed (`a.b.c.json` -> `a`)
fn base_name(path: &Path) -> Option<String> {
    let mut name = PathBuf::from(path.file_name()?);
    while name.extension().is_some() {
        name = PathBuf::from(name.file_stem()?);
    }

    let name = name.to_string_lossy().into_owned();
    (!name.is_empty()).then_some(name)
}

#[cfg(windows)]
fn open_shared(path: &Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    const FILE_SHARE_READ: u32 = 0x1;
    const FILE_SHARE_WRITE: u32 = 0x2;
    const FILE_SHARE_DELETE: u32 = 0x4;

    std::fs::OpenOptions::new()
        .read(true)
        .share_mode(FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE)
        .open(path)
}

#[cfg(not(windows))]
fn open_shared(path: &Path) -> io::Result<File> {
    File::open(path)
}

fn read_shared(path: &Path) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    open_shared(path)?.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test_case("Github/MyDataFile.2024.json", "github", "mydatafile" ; "strips every extension")]
    #[test_case("Github/deep/er/Issues.json", "github", "issues" ; "ignores intermediate directories")]
    #[test_case("STATS/Weekly.Report.v2.JSON", "stats", "weekly" ; "case folds routing")]
    fn test_route(relative: &str, collection: &str, kind: &str) {
        let root = Path::new("/drop");
        let (c, k) = route(&root.join(relative), root).unwrap();
        assert_eq!(c, collection);
        assert_eq!(k, kind);
    }

    #[test]
    fn test_route_file_in_root() {
        let root = Path::new("/drop");
        let err = route(&root.join("orphan.json"), root).unwrap_err();
        assert!(matches!(err, ExtractError::Routing { .. }));
    }

    #[test]
    fn test_route_outside_root() {
        let err = route(Path::new("/elsewhere/a/b.json"), Path::new("/drop")).unwrap_err();
        assert!(matches!(err, ExtractError::Routing { .. }));
    }

    #[test]
    fn test_read_whitespace_separated_objects() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("github")).unwrap();
        let file = dir.path().join("github/repos.json");
        fs::write(&file, "{\"b\":2,\"a\":1}\r\n\n  {\"_id\":\"x\"}").unwrap();

        let records = read_records(&file, dir.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].payload(), r#"{"a":1,"b":2}"#);
        assert_eq!(records[1].payload(), r#"{"_id":"x"}"#);
        assert!(records
            .iter()
            .all(|r| r.collection() == "github" && r.kind() == "repos"));
    }

    #[test]
    fn test_read_keeps_large_integers_exact() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("accounts")).unwrap();
        let file = dir.path().join("accounts/ledger.json");
        fs::write(
            &file,
            "{\"account\":12345678901234567890123,\"v\":1}\n{\"_id\":98765432109876543210}",
        )
        .unwrap();

        let records = read_records(&file, dir.path()).unwrap();
        assert_eq!(
            records[0].payload(),
            r#"{"account":12345678901234567890123,"v":1}"#
        );
        assert_eq!(records[1].payload(), r#"{"_id":98765432109876543210}"#);
    }

    #[test]
    fn test_read_strips_bom() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("github")).unwrap();
        let file = dir.path().join("github/repos.json");
        fs::write(&file, b"\xEF\xBB\xBF{\"a\":1}").unwrap();

        assert_eq!(read_records(&file, dir.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_read_empty_file_yields_nothing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("github")).unwrap();
        let file = dir.path().join("github/empty.json");
        fs::write(&file, "  \n").unwrap();

        assert!(read_records(&file, dir.path()).unwrap().is_empty());
    }

    #[test_case("{\"a\":1} [1,2]" ; "array document")]
    #[test_case("{\"a\":1},{\"b\":2}" ; "comma separated")]
    #[test_case("{\"a\":" ; "truncated")]
    #[test_case("42" ; "scalar document")]
    fn test_read_malformed(content: &str) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("github")).unwrap();
        let file = dir.path().join("github/bad.json");
        fs::write(&file, content).unwrap();

        let err = read_records(&file, dir.path()).unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }));
        assert_eq!(err.path(), file.as_path());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("github/gone.json");

        let err = read_records(&file, dir.path()).unwrap_err();
        assert!(matches!(err, ExtractError::Open { .. }));
    }
}
