use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use cashflow_config::{Config, ConfigManager, ExportFormat};
use cashflow_core::{
    storage::{record_warnings, RecordSource},
    AgingBucket, AgingService, AlertService, Clock, FixedClock, ForecastService,
};
use cashflow_domain::{FinancialRecord, ForecastReport};
use cashflow_storage_json::{load_records_from_path, JsonRecordStore};

use super::{
    output::{self, OutputPreferences},
    system_clock::SystemClock,
    Cli, Commands, ConfigAction, SourceArgs, WindowArgs,
};
use crate::{errors::ForecastError, export, utils::build_info};

/// Everything a command needs besides its own arguments.
struct Session {
    manager: ConfigManager,
    config: Config,
}

impl Session {
    fn open(cli: &Cli) -> Result<Self, ForecastError> {
        let manager = match &cli.config_dir {
            Some(dir) => ConfigManager::with_base_dir(dir.clone())?,
            None => ConfigManager::default_location()?,
        };
        let config = manager.load()?;
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && !cli.no_color,
        });
        Ok(Self { manager, config })
    }

    fn store(&self) -> Result<JsonRecordStore, ForecastError> {
        Ok(JsonRecordStore::new(self.config.resolve_default_data_root())?)
    }

    fn load_records(&self, source: &SourceArgs) -> Result<Vec<FinancialRecord>, ForecastError> {
        let records = match (&source.input, &source.dataset) {
            (Some(path), _) => load_records_from_path(path)?,
            (None, Some(name)) => self.store()?.load_records(name)?,
            (None, None) => {
                return Err(ForecastError::InvalidArgument(
                    "either --input or --dataset is required".into(),
                ))
            }
        };
        for message in record_warnings(&records) {
            warn!("{message}");
        }
        debug!(count = records.len(), "records loaded");
        Ok(records)
    }

    fn forecast(
        &self,
        records: &[FinancialRecord],
        window: &WindowArgs,
    ) -> Result<ForecastReport, ForecastError> {
        let horizon = window
            .horizon
            .unwrap_or(self.config.default_horizon_months);
        let clock = clock_for(window.today);
        Ok(ForecastService::forecast_now(
            clock.as_ref(),
            records,
            horizon,
        )?)
    }

    fn format(&self, requested: Option<&str>) -> Result<ExportFormat, ForecastError> {
        match requested {
            Some(raw) => ExportFormat::parse(raw).ok_or_else(|| {
                ForecastError::InvalidArgument(format!(
                    "unknown format `{raw}` (expected table, csv or json)"
                ))
            }),
            None => Ok(self.config.default_export_format),
        }
    }
}

fn clock_for(today: Option<NaiveDate>) -> Box<dyn Clock> {
    match today {
        Some(date) => Box::new(FixedClock::new(date)),
        None => Box::new(SystemClock),
    }
}

pub fn dispatch(cli: Cli) -> Result<(), ForecastError> {
    if let Commands::Version = cli.command {
        println!("{}", build_info::current().summary());
        return Ok(());
    }

    let session = Session::open(&cli)?;
    match &cli.command {
        Commands::Forecast {
            source,
            window,
            format,
        } => {
            let records = session.load_records(source)?;
            let report = session.forecast(&records, window)?;
            let format = session.format(format.as_deref())?;
            print!(
                "{}",
                export::render(&report, format, &session.config.currency)?
            );
        }
        Commands::Summary { source, window } => {
            let records = session.load_records(source)?;
            let report = session.forecast(&records, window)?;
            output::section(format!(
                "Forecast summary from {} ({} months)",
                report.reference_date, report.horizon_months
            ));
            print!(
                "{}",
                export::render_summary(&report.summary, &session.config.currency)
            );
        }
        Commands::Alerts {
            source,
            window,
            threshold,
        } => {
            let records = session.load_records(source)?;
            let report = session.forecast(&records, window)?;
            let threshold = threshold.unwrap_or(session.config.low_balance_threshold);
            let alerts = AlertService::balance_alerts(&report.projections, threshold);
            if alerts.is_empty() {
                output::success("No balance alerts in the forecast horizon");
            }
            for alert in &alerts {
                output::alert(alert.severity, &alert.message);
            }
        }
        Commands::Aging { source, today } => {
            let records = session.load_records(source)?;
            let reference = clock_for(*today).today();
            let report = AgingService::analyze(&records, reference);
            output::section(format!("Aging as of {}", report.reference_date));
            println!(
                "{:<10} {:>16} {:>16}",
                "Bucket", "Receivables", "Payables"
            );
            for bucket in AgingBucket::ALL {
                let receivable = report.receivables.bucket(bucket).map_or(0.0, |b| b.total);
                let payable = report.payables.bucket(bucket).map_or(0.0, |b| b.total);
                println!("{:<10} {:>16.2} {:>16.2}", bucket, receivable, payable);
            }
            println!(
                "{:<10} {:>16.2} {:>16.2}",
                "Total", report.receivables.total, report.payables.total
            );
        }
        Commands::Export {
            source,
            window,
            output: destination,
            format,
        } => {
            let records = session.load_records(source)?;
            let report = session.forecast(&records, window)?;
            let format = match format.as_deref() {
                Some(raw) => session.format(Some(raw))?,
                None => format_from_extension(destination).unwrap_or(ExportFormat::Csv),
            };
            export::export_to_path(&report, format, &session.config.currency, destination)?;
            info!(path = %destination.display(), %format, "forecast exported");
            output::success(format!(
                "Exported {} months to {}",
                report.projections.len(),
                destination.display()
            ));
        }
        Commands::Import { input, name } => {
            let records = load_records_from_path(input)?;
            let store = session.store()?;
            store.save_records(name, &records)?;
            output::success(format!(
                "Stored {} records as dataset `{}`",
                records.len(),
                name
            ));
        }
        Commands::Datasets => {
            let names = session.store()?.list_datasets()?;
            if names.is_empty() {
                output::info("No datasets stored yet");
            }
            for name in names {
                println!("{name}");
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                for (key, value) in session.config.entries() {
                    println!("{key:<22} {value}");
                }
            }
            ConfigAction::Set { key, value } => {
                let updated = session.manager.update(key, value)?;
                let shown = updated
                    .entries()
                    .into_iter()
                    .find(|(entry, _)| *entry == key.as_str())
                    .map(|(_, shown)| shown)
                    .unwrap_or_else(|| value.clone());
                output::success(format!("{key} set to {shown}"));
            }
            ConfigAction::Path => {
                println!("{}", session.manager.config_path().display());
            }
        },
        Commands::Version => {}
    }
    Ok(())
}

fn format_from_extension(path: &Path) -> Option<ExportFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(ExportFormat::Table),
            other => ExportFormat::parse(other),
        })
}
