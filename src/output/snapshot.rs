use crate::output::MatchRecord;
use crate::MktError;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the result collection to `destination` as a pretty-printed JSON
/// array
///
/// The records are written to a sibling temporary file which is flushed,
/// synced and then renamed over `destination`. A reader therefore sees
/// either the previous file or the complete new one, never a prefix.
///
/// # Arguments
///
/// * `records` - The final result collection, in discovery order
/// * `destination` - Path of the JSON file to produce
///
/// # Returns
///
/// * `Ok(())` - The file is complete at `destination`
/// * `Err(MktError::Persistence)` - Nothing was published; `records` is
///   untouched and may be written elsewhere
pub fn persist(records: &[MatchRecord], destination: &Path) -> crate::Result<()> {
    let tmp_path = temp_path_for(destination);

    let result = write_json(records, &tmp_path).and_then(|_| fs::rename(&tmp_path, destination));

    if let Err(source) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(MktError::Persistence {
            path: destination.to_path_buf(),
            source,
        });
    }

    tracing::debug!(
        "Wrote {} records to {}",
        records.len(),
        destination.display()
    );
    Ok(())
}

/// Reads a snapshot written by [`persist`]
pub fn load_snapshot(path: &Path) -> crate::Result<Vec<MatchRecord>> {
    let file = File::open(path)?;
    let records = serde_json::from_reader(BufReader::new(file))?;
    Ok(records)
}

/// A fallback location next to `destination`, tagged with the current time
///
/// Falls back to the system temp directory when the destination's directory
/// does not exist.
pub fn fallback_path(destination: &Path) -> PathBuf {
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    let stem = destination
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    let name = format!("{}-{}.json", stem, stamp);

    let dir = match destination.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::new(),
        Some(parent) if parent.is_dir() => parent.to_path_buf(),
        _ => std::env::temp_dir(),
    };
    dir.join(name)
}

fn write_json(records: &[MatchRecord], path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn temp_path_for(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results.json".to_string());
    destination.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(k: usize) -> Vec<MatchRecord> {
        (0..k)
            .map(|i| MatchRecord {
                url: format!("https://a.test/blog/post{}", i),
                source_host: "a.test".to_string(),
                found_on_page: "https://a.test/".to_string(),
                timestamp: format!("2026-10-18T12:00:{:02}Z", i % 60),
            })
            .collect()
    }

    #[test]
    fn test_persist_and_load_preserves_records_and_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("marketing_urls.json");
        let records = sample(25);

        persist(&records, &path).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_persist_empty_collection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");

        persist(&[], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[test]
    fn test_output_is_indented_json_with_wire_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        persist(&sample(1), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n  {"));
        assert!(content.contains("\"sourceHost\": \"a.test\""));
        assert!(content.contains("\"foundOnPage\": \"https://a.test/\""));
    }

    #[test]
    fn test_persist_replaces_existing_file_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "stale").unwrap();

        persist(&sample(3), &path).unwrap();

        assert_eq!(load_snapshot(&path).unwrap().len(), 3);
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_persist_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("out.json");
        let records = sample(2);

        let err = persist(&records, &path).unwrap_err();

        assert!(matches!(err, MktError::Persistence { .. }));
        assert!(!path.exists());
        // The caller still owns the collection and can retry elsewhere
        let retry = dir.path().join("out.json");
        persist(&records, &retry).unwrap();
        assert_eq!(load_snapshot(&retry).unwrap(), records);
    }

    #[test]
    fn test_fallback_path_when_parent_missing() {
        let path = Path::new("/definitely/not/here/marketing_urls.json");
        let fallback = fallback_path(path);
        let name = fallback.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("marketing_urls-"));
        assert!(name.ends_with(".json"));
        assert!(fallback.parent().unwrap().exists());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "[{\"url\": 1}]").unwrap();
        assert!(matches!(load_snapshot(&path), Err(MktError::Json(_))));
    }
}
