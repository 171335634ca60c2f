//! JSON persistence for record datasets.
//!
//! A dataset is a single file holding a JSON array of financial records. Rows that do not
//! decode are dropped with a warning so one bad entry never hides the rest of the data.

use std::{
    fs,
    path::{Path, PathBuf},
};

use cashflow_core::{storage::RecordSource, CoreError};
use cashflow_domain::FinancialRecord;
use serde_json::Value;
use tracing::{debug, warn};

const DATASET_EXTENSION: &str = "json";
const STAGING_EXTENSION: &str = "json.tmp";
const FALLBACK_DATASET_NAME: &str = "dataset";

/// Directory of named datasets, one `<slug>.json` file each.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    datasets_dir: PathBuf,
}

impl JsonRecordStore {
    pub fn new(datasets_dir: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&datasets_dir)?;
        Ok(Self { datasets_dir })
    }

    pub fn dataset_path(&self, name: &str) -> PathBuf {
        self.datasets_dir
            .join(dataset_slug(name))
            .with_extension(DATASET_EXTENSION)
    }
}

impl RecordSource for JsonRecordStore {
    fn load_records(&self, name: &str) -> Result<Vec<FinancialRecord>, CoreError> {
        let path = self.dataset_path(name);
        if !path.is_file() {
            return Err(CoreError::Storage(format!("dataset `{name}` not found")));
        }
        load_records_from_path(&path)
    }

    fn save_records(&self, name: &str, records: &[FinancialRecord]) -> Result<(), CoreError> {
        save_records_to_path(records, &self.dataset_path(name))
    }

    fn list_datasets(&self) -> Result<Vec<String>, CoreError> {
        if !self.datasets_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.datasets_dir)? {
            let path = entry?.path();
            let is_dataset = path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(DATASET_EXTENSION);
            if !is_dataset {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Writes `records` to `path` through a staging file so readers never see a partial dataset.
pub fn save_records_to_path(records: &[FinancialRecord], path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json =
        serde_json::to_string_pretty(records).map_err(|err| CoreError::Serde(err.to_string()))?;
    let staging = path.with_extension(STAGING_EXTENSION);
    fs::write(&staging, json)?;
    fs::rename(&staging, path)?;
    debug!(path = %path.display(), count = records.len(), "records saved");
    Ok(())
}

pub fn load_records_from_path(path: &Path) -> Result<Vec<FinancialRecord>, CoreError> {
    let data = fs::read_to_string(path)?;
    let records = parse_records(&data)?;
    debug!(path = %path.display(), count = records.len(), "records loaded");
    Ok(records)
}

/// Decodes a JSON array of records, skipping rows that do not decode.
///
/// Anything other than a top-level array is a [`CoreError::Serde`].
pub fn parse_records(data: &str) -> Result<Vec<FinancialRecord>, CoreError> {
    let rows: Vec<Value> =
        serde_json::from_str(data).map_err(|err| CoreError::Serde(err.to_string()))?;
    let records = rows
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, row)| match serde_json::from_value::<FinancialRecord>(row) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(index, error = %err, "skipping undecodable record");
                    None
                }
            },
        )
        .collect();
    Ok(records)
}

/// File-system safe form of a dataset name: lowercase ASCII, digits and dashes.
fn dataset_slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            lower @ ('a'..='z' | '0'..='9' | '-') => lower,
            _ => '_',
        })
        .collect();
    if slug.trim_matches('_').is_empty() {
        FALLBACK_DATASET_NAME.into()
    } else {
        slug
    }
}
