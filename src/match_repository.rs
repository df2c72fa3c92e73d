use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use encoding_rs::GBK;
use rayon::prelude::*;
use serde_json::Value;

use crate::match_record::{MatchRecord, RawMatchRecord};

const MATCH_FILE_EXT: &str = "json";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Decode files on the rayon pool. Output order is the same either way.
    pub parallel: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub matches: Vec<MatchRecord>,
    pub directories_total: usize,
    pub files_total: usize,
    pub files_loaded: usize,
    pub errors: Vec<String>,
}

impl LoadSummary {
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Gbk,
}

/// Loads every match file under `directories`, in directory, file-name and
/// record order. Unreadable directories and files are recorded in
/// `LoadSummary::errors` and skipped.
pub fn load(directories: &[PathBuf], options: LoadOptions) -> LoadSummary {
    let mut summary = LoadSummary {
        directories_total: directories.len(),
        ..LoadSummary::default()
    };

    let mut files = Vec::new();
    for dir in directories {
        match list_match_files(dir) {
            Ok(found) => files.extend(found),
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "skipping match directory");
                summary.errors.push(format!("{}: {err:#}", dir.display()));
            }
        }
    }
    summary.files_total = files.len();

    let results: Vec<(PathBuf, Result<Vec<MatchRecord>>)> = if options.parallel {
        files
            .par_iter()
            .map(|path| (path.clone(), load_file(path)))
            .collect()
    } else {
        files
            .iter()
            .map(|path| (path.clone(), load_file(path)))
            .collect()
    };

    for (path, result) in results {
        match result {
            Ok(rows) => {
                tracing::debug!(file = %path.display(), rows = rows.len(), "loaded match file");
                summary.files_loaded += 1;
                summary.matches.extend(rows);
            }
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "skipping match file");
                summary.errors.push(format!("{}: {err:#}", path.display()));
            }
        }
    }

    if summary.files_loaded == 0 {
        tracing::error!(
            files = summary.files_total,
            errors = summary.errors.len(),
            "no match file could be loaded"
        );
    } else {
        tracing::info!(
            matches = summary.matches.len(),
            files = summary.files_loaded,
            skipped = summary.files_total - summary.files_loaded,
            "match load complete"
        );
    }
    summary
}

/// Parses one match file. A file holds either a JSON array of match objects
/// or a single object.
pub fn load_file(path: &Path) -> Result<Vec<MatchRecord>> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let (text, _) = decode_text(&bytes)?;
    parse_match_json(&text)
}

pub fn parse_match_json(text: &str) -> Result<Vec<MatchRecord>> {
    let value: Value = serde_json::from_str(text.trim()).context("invalid match json")?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    };
    Ok(items
        .iter()
        .filter_map(RawMatchRecord::from_json)
        .map(|raw| MatchRecord::from_raw(&raw))
        .collect())
}

/// UTF-8 first (BOM stripped), then GBK. Fails when neither decodes cleanly.
pub fn decode_text(bytes: &[u8]) -> Result<(String, TextEncoding)> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Ok((text.to_string(), TextEncoding::Utf8));
    }
    GBK.decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| (text.into_owned(), TextEncoding::Gbk))
        .ok_or_else(|| anyhow!("content is neither utf-8 nor gbk"))
}

fn list_match_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.context("read dir entry")?.path();
        let is_match_file = path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(MATCH_FILE_EXT));
        if is_match_file {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Stable ascending sort on the ISO-like date strings.
pub fn sort_by_date(matches: &mut [MatchRecord]) {
    matches.sort_by(|a, b| a.date.cmp(&b.date));
}
