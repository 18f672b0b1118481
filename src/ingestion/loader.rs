//! Corpus loading: directory walk and per-page text extraction

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Separator between extracted units (pages) and between files
const UNIT_SEPARATOR: &str = "\n\n";

/// Reads a directory of source documents and extracts their raw text
pub struct DocumentLoader {
    extensions: Vec<String>,
}

impl DocumentLoader {
    /// Create a loader recognizing the given file extensions
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    /// Enumerate supported files under `dir` in deterministic order
    pub fn supported_files(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .map(|ext| self.extensions.contains(&ext.to_string_lossy().to_lowercase()))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect()
    }

    /// Extract all text under `dir` into one concatenated string
    ///
    /// Pages within a file and files within the corpus are separated by a
    /// blank line. Files that fail to parse are logged and skipped; the
    /// whole load fails with [`Error::NotFound`] when nothing yields
    /// extractable text. Source files are never modified.
    pub fn load_dir(&self, dir: &Path) -> Result<String> {
        let files = self.supported_files(dir);
        if files.is_empty() {
            return Err(Error::NotFound(dir.to_path_buf()));
        }

        let mut units: Vec<String> = Vec::new();
        for path in &files {
            match self.extract_units(path) {
                Ok(file_units) => {
                    let extracted = file_units
                        .into_iter()
                        .filter(|unit| !unit.trim().is_empty())
                        .collect::<Vec<_>>();
                    tracing::debug!(
                        "Extracted {} unit(s) from {}",
                        extracted.len(),
                        path.display()
                    );
                    units.extend(extracted);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                }
            }
        }

        if units.is_empty() {
            return Err(Error::NotFound(dir.to_path_buf()));
        }

        Ok(units.join(UNIT_SEPARATOR))
    }

    /// Extract the text of one file, split into logical units (pages)
    fn extract_units(&self, path: &Path) -> Result<Vec<String>> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => {
                let data = std::fs::read(path)?;
                let text = pdf_extract::extract_text_from_mem(&data)
                    .map_err(|e| Error::file_parse(path.display().to_string(), e.to_string()))?;
                // pdf-extract emits a form feed between pages.
                Ok(text.split('\u{0C}').map(str::to_string).collect())
            }
            "txt" | "md" => Ok(vec![std::fs::read_to_string(path)?]),
            other => Err(Error::UnsupportedFileType(other.to_string())),
        }
    }
}
