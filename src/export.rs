//! Batch export
//!
//! Translates every JSON schema under a source directory and writes:
//!
//! ```text
//! out/
//! ├── Order.definition.json
//! ├── Pet.definition.json
//! ├── store/
//! │   └── Pet.definition.json
//! ├── checksums.sha256
//! └── manifest.json
//! ```
//!
//! Subdirectories of the source are mirrored, and entry names carry the
//! relative directory (`store/Pet`), so equal file names never collide.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::checksum::Checksum;
use crate::config::ExportConfig;
use crate::error::Result;
use crate::translate::Translator;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const CHECKSUMS_FILE: &str = "checksums.sha256";
pub const DEFINITION_SUFFIX: &str = ".definition.json";

/// One exported schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// Schema name: relative directory plus file stem without `.schema`
    pub name: String,
    pub source_path: String,
    /// Written definition file, relative to the output directory
    pub output_file: String,
    /// Checksum of the compact definition JSON
    pub checksum: Checksum,
}

/// Summary of an export run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportManifest {
    pub created_at: DateTime<Utc>,
    pub annotation_key: String,
    pub entries: Vec<ExportEntry>,
}

impl ExportManifest {
    pub fn get(&self, name: &str) -> Option<&ExportEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

/// Collect `*.json` schema files, skipping previous export output.
///
/// Unreadable entries fail the walk.
pub fn collect_schema_files(source: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            warn!(source = %source.display(), error = %err, "failed to walk schema directory");
            io::Error::from(err)
        })?;

        let path = entry.into_path();
        let filename = path.file_name().map(|f| f.to_string_lossy()).unwrap_or_default();
        if path.is_file()
            && filename.ends_with(".json")
            && filename != MANIFEST_FILE
            && !filename.ends_with(DEFINITION_SUFFIX)
        {
            files.push(path);
        }
    }
    Ok(files)
}

/// Schema name from a path like `schemas/Order.schema.json`
pub fn schema_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
        .trim_end_matches(".schema")
        .to_string()
}

/// Entry name of `path` under `source`, e.g. `store/Pet` for `store/Pet.json`
pub fn relative_schema_name(source: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(source).unwrap_or(path);
    let mut parts: Vec<String> = relative
        .parent()
        .map(|dir| {
            dir.components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    parts.push(schema_name(path));
    parts.join("/")
}

/// Translate every schema under `source` into `output`.
///
/// All-or-nothing per file: the first failing schema aborts the run.
pub fn export_directory(
    source: &Path,
    output: &Path,
    translator: &Translator,
    settings: &ExportConfig,
) -> Result<ExportManifest> {
    fs::create_dir_all(output)?;

    let files = collect_schema_files(source)?;
    if files.is_empty() {
        warn!(source = %source.display(), "no schema files found");
    }

    let mut entries = Vec::with_capacity(files.len());
    for path in files {
        let name = relative_schema_name(source, &path);
        let schema: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        let definition = translator.translate_value(&schema)?;

        let output_file = format!("{}{}", name, DEFINITION_SUFFIX);
        let target = output.join(&output_file);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, settings.output_format.render(&definition)?)?;

        let checksum = Checksum::of_definition(&definition)?;
        info!(schema = %name, fields = definition.len(), %checksum, "exported definition");

        entries.push(ExportEntry {
            name,
            source_path: path.to_string_lossy().to_string(),
            output_file,
            checksum,
        });
    }

    let manifest = ExportManifest {
        created_at: Utc::now(),
        annotation_key: translator.options().annotation_key.clone(),
        entries,
    };

    if settings.include_checksums {
        let lines: String = manifest
            .entries
            .iter()
            .map(|e| format!("{}  {}\n", e.checksum, e.output_file))
            .collect();
        fs::write(output.join(CHECKSUMS_FILE), lines)?;
    }

    if settings.include_manifest {
        fs::write(output.join(MANIFEST_FILE), serde_json::to_string_pretty(&manifest)?)?;
    }

    Ok(manifest)
}
