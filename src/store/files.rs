use flate2::read::GzDecoder;
use glob::glob;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, StatsError};
use crate::{Author, Publication};

const AUTHORS_STEM: &str = "authors";
const PUBLICATIONS_STEM: &str = "publications";

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read_authors(&self) -> Result<Vec<Author>> {
        self.read_collection(AUTHORS_STEM)
    }

    pub fn read_publications(&self) -> Result<Vec<Publication>> {
        self.read_collection(PUBLICATIONS_STEM)
    }

    fn read_collection<T: DeserializeOwned>(&self, stem: &str) -> Result<Vec<T>> {
        if !self.root.is_dir() {
            return Err(StatsError::Storage(format!(
                "snapshot directory {} does not exist",
                self.root.display()
            )));
        }

        let mut records = Vec::new();
        for path in find_snapshot_files(&self.root, stem)? {
            let (mut batch, skipped) = read_jsonl::<T>(&path)?;
            if skipped > 0 {
                warn!("Skipped {} malformed records in {}", skipped, path.display());
            }
            debug!("Read {} {} from {}", batch.len(), stem, path.display());
            records.append(&mut batch);
        }
        Ok(records)
    }
}

/// `{stem}*.jsonl` and `{stem}*.jsonl.gz` anywhere under `directory`, sorted.
pub fn find_snapshot_files<P: AsRef<Path>>(directory: P, stem: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for suffix in ["jsonl", "jsonl.gz"] {
        let pattern = directory
            .as_ref()
            .join(format!("**/{}*.{}", stem, suffix));
        let pattern_str = pattern.to_string_lossy();
        let paths = glob(&pattern_str)
            .map_err(|e| StatsError::Storage(format!("bad snapshot pattern: {}", e)))?;
        files.extend(paths.filter_map(std::result::Result::ok));
    }
    files.sort();
    Ok(files)
}

/// Reads one record per line, transparently gunzipping `.gz` files. Blank
/// lines are ignored; lines that do not parse are counted and skipped.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, usize)> {
    let file = File::open(path).map_err(|e| {
        StatsError::Storage(format!("failed to open {}: {}", path.display(), e))
    })?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for line in BufReader::new(reader).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(_) => skipped += 1,
        }
    }

    Ok((records, skipped))
}
