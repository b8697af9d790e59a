//! JSON fixture import.
//!
//! Each `<Collection>.json` file in the data folder is imported into the
//! collection named by its file stem. A JSON array imports every element, an
//! object imports a single document. Imports are unordered: a document that
//! fails (duplicate key, missing `_id`, bad numeric field) is recorded in the
//! report and the rest of the file still goes in.

use std::fs;
use std::path::Path;

use dex_core::{Document, Value};
use tracing::{info, warn};

use crate::config::LoaderConfig;
use crate::dataset::Dataset;
use crate::{StoreError, StoreResult};

/// Outcome of importing one file (or one in-memory JSON string).
#[derive(Debug, Clone, Default)]
pub struct FileReport {
    pub file: String,
    pub collection: String,
    pub inserted: usize,
    pub errors: Vec<String>,
}

/// Outcome of a whole folder import.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub files: Vec<FileReport>,
}

impl ImportSummary {
    pub fn total_inserted(&self) -> usize {
        self.files.iter().map(|f| f.inserted).sum()
    }

    pub fn total_errors(&self) -> usize {
        self.files.iter().map(|f| f.errors.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.total_errors() == 0
    }
}

/// Import every JSON file of the configured data folder.
pub fn load_dir(dataset: &mut Dataset, config: &LoaderConfig) -> StoreResult<ImportSummary> {
    let folder = &config.data_folder;
    if !folder.is_dir() {
        return Err(StoreError::DataFolderNotFound {
            path: folder.clone(),
        });
    }

    let entries = fs::read_dir(folder).map_err(|source| StoreError::Io {
        path: folder.clone(),
        source,
    })?;

    let mut files: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| StoreError::Io {
            path: folder.clone(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".json") && config.includes_file(&name) {
            files.push(name);
        }
    }
    files.sort();

    let mut summary = ImportSummary::default();
    for file in files {
        let path = folder.join(&file);
        let collection = file.trim_end_matches(".json").to_string();
        let json = read_json(&path)?;

        if config.drop_existing && !config.dry_run && dataset.has_collection(&collection) {
            dataset.clear_collection(&collection)?;
            info!(collection = %collection, "dropped existing collection");
        }

        let mut report = import_json(dataset, &collection, json, config.dry_run);
        report.file = file;
        info!(
            file = %report.file,
            collection = %report.collection,
            inserted = report.inserted,
            errors = report.errors.len(),
            dry_run = config.dry_run,
            "imported fixture file"
        );
        summary.files.push(report);
    }

    Ok(summary)
}

/// Import documents from an in-memory JSON string.
pub fn load_str(dataset: &mut Dataset, collection: &str, json: &str) -> StoreResult<FileReport> {
    let parsed: serde_json::Value =
        serde_json::from_str(json).map_err(|source| StoreError::Json {
            path: format!("<{}>", collection).into(),
            source,
        })?;
    Ok(import_json(dataset, collection, parsed, false))
}

fn read_json(path: &Path) -> StoreResult<serde_json::Value> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn import_json(
    dataset: &mut Dataset,
    collection: &str,
    json: serde_json::Value,
    dry_run: bool,
) -> FileReport {
    let mut report = FileReport {
        file: String::new(),
        collection: collection.to_string(),
        inserted: 0,
        errors: Vec::new(),
    };

    let documents: Vec<Value> = match Value::from(json) {
        Value::Array(items) => items,
        doc @ Value::Document(_) => vec![doc],
        other => {
            report
                .errors
                .push(format!("Unsupported JSON root type: {}", other.type_name()));
            return report;
        }
    };

    if dry_run {
        report.inserted = documents.len();
        return report;
    }

    dataset.register(collection);
    for (position, value) in documents.into_iter().enumerate() {
        match into_document(value) {
            Ok(doc) => match dataset.insert(collection, doc) {
                Ok(()) => report.inserted += 1,
                Err(e) => {
                    warn!(collection, position, error = %e, "skipped fixture document");
                    report.errors.push(e.to_string());
                }
            },
            Err(type_name) => {
                let message = format!("Element {} is a {}, not a document", position, type_name);
                warn!(collection, position, "{}", message);
                report.errors.push(message);
            }
        }
    }

    report
}

fn into_document(value: Value) -> Result<Document, &'static str> {
    match value {
        Value::Document(doc) => Ok(doc),
        other => Err(other.type_name()),
    }
}
