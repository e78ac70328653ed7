use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ConfscopeError, Result};
use crate::models::{AuthorIndex, Paper};

/// Read a JSON document, mapping a missing file to `FileNotFound`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(ConfscopeError::FileNotFound(path.display().to_string()));
    }
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| ConfscopeError::InvalidDataset {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Write a value as pretty-printed UTF-8 JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

pub fn load_papers(path: &Path) -> Result<Vec<Paper>> {
    let papers: Vec<Paper> = read_json(path)?;
    tracing::debug!(count = papers.len(), path = %path.display(), "loaded papers");
    Ok(papers)
}

pub fn save_papers(path: &Path, papers: &[Paper]) -> Result<()> {
    write_json(path, papers)?;
    tracing::info!(count = papers.len(), path = %path.display(), "saved papers");
    Ok(())
}

pub fn load_authors(path: &Path) -> Result<AuthorIndex> {
    let authors: AuthorIndex = read_json(path)?;
    tracing::debug!(count = authors.len(), path = %path.display(), "loaded authors");
    Ok(authors)
}

pub fn save_authors(path: &Path, authors: &AuthorIndex) -> Result<()> {
    write_json(path, authors)?;
    tracing::info!(count = authors.len(), path = %path.display(), "saved authors");
    Ok(())
}
