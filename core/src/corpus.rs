//! Loads a directory of `.txt` files into a [`SearchEngine`].

use crate::SearchEngine;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A text file split into the title and content handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFile {
    pub title: String,
    pub content: String,
}

/// Title is `"{file stem} - {first line}"`; content is everything after the first line.
pub fn split_text_file(stem: &str, body: &str) -> TextFile {
    let (first_line, rest) = match body.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (body, ""),
    };
    let first_line = first_line.trim();
    let title = if first_line.is_empty() { stem.to_string() } else { format!("{stem} - {first_line}") };
    TextFile { title, content: rest.to_string() }
}

/// The `.txt` files directly inside `dir`, sorted by file name so ids are stable across runs.
///
/// Subdirectories are not searched. Entries that cannot be read are logged and skipped.
pub fn text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("corpus directory {} does not exist", dir.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "skipping unreadable corpus entry");
                continue;
            }
        };
        let path = entry.into_path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("txt") {
            files.push(path);
        }
    }
    Ok(files)
}

/// Adds every `.txt` file in `dir` to `engine` and returns how many were added.
pub fn load_directory(engine: &mut SearchEngine, dir: &Path) -> Result<usize> {
    let files = text_files(dir)?;
    for path in &files {
        let body = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let doc = split_text_file(stem, &body);
        engine
            .add_document(&doc.title, &doc.content)
            .with_context(|| format!("indexing {}", path.display()))?;
    }
    tracing::info!(dir = %dir.display(), num_docs = files.len(), "loaded corpus");
    Ok(files.len())
}
