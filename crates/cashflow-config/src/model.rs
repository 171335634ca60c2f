use serde::{de::Deserializer, Deserialize, Serialize};
use std::{fmt, path::PathBuf};

use cashflow_core::{DEFAULT_HORIZON_MONTHS, MAX_HORIZON_MONTHS};

use crate::ConfigError;

/// Stores user-configurable forecast preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_horizon_months_value")]
    pub default_horizon_months: u32,
    #[serde(default)]
    pub low_balance_threshold: f64,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub default_export_format: ExportFormat,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional directory holding record datasets. Defaults to `~/Documents/Cashflow`.
    pub default_data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            default_horizon_months: Self::default_horizon_months_value(),
            low_balance_threshold: 0.0,
            ui_color_enabled: Self::default_ui_color_enabled(),
            default_export_format: ExportFormat::default(),
            default_data_root: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 7] = [
        "locale",
        "currency",
        "horizon",
        "low-balance-threshold",
        "color",
        "export-format",
        "data-root",
    ];

    pub fn default_horizon_months_value() -> u32 {
        DEFAULT_HORIZON_MONTHS
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_default_data_root(&self) -> PathBuf {
        if let Some(path) = &self.default_data_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Cashflow")
    }

    /// Updates a single setting from its textual form, validating the value.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: trimmed.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "locale" => {
                if trimmed.is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.locale = trimmed.to_string();
            }
            "currency" => {
                if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(invalid("expected a three-letter currency code"));
                }
                self.currency = trimmed.to_ascii_uppercase();
            }
            "horizon" => {
                let months: u32 = trimmed
                    .parse()
                    .map_err(|_| invalid("expected a whole number of months"))?;
                if !(1..=MAX_HORIZON_MONTHS).contains(&months) {
                    return Err(invalid(&format!(
                        "must be between 1 and {MAX_HORIZON_MONTHS} months"
                    )));
                }
                self.default_horizon_months = months;
            }
            "low-balance-threshold" => {
                let threshold: f64 = trimmed
                    .parse()
                    .map_err(|_| invalid("expected a number"))?;
                if !threshold.is_finite() {
                    return Err(invalid("must be finite"));
                }
                self.low_balance_threshold = threshold;
            }
            "color" => {
                self.ui_color_enabled = match trimmed.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    _ => return Err(invalid("expected on/off")),
                };
            }
            "export-format" => {
                self.default_export_format = ExportFormat::parse(trimmed)
                    .ok_or_else(|| invalid("expected table, csv or json"))?;
            }
            "data-root" => {
                self.default_data_root = if trimmed.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(trimmed))
                };
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Textual form of every setting, in `KEYS` order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("locale", self.locale.clone()),
            ("currency", self.currency.clone()),
            ("horizon", self.default_horizon_months.to_string()),
            (
                "low-balance-threshold",
                format!("{:.2}", self.low_balance_threshold),
            ),
            (
                "color",
                if self.ui_color_enabled { "on" } else { "off" }.to_string(),
            ),
            ("export-format", self.default_export_format.to_string()),
            (
                "data-root",
                self.resolve_default_data_root().display().to_string(),
            ),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "table" | "text" => Some(ExportFormat::Table),
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExportFormat::Table => "table",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for ExportFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .and_then(ExportFormat::parse)
            .unwrap_or_default())
    }
}
