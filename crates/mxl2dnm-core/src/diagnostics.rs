use mxl2dnm_domain_timeline::{ConversionReport, PartSummary, ScoreFormat};
use mxl2dnm_ports::settings::{ConvertSettings, SettingsError};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
struct AppVersion {
    name: String,
    version: String,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum PartDiagnostic<'a> {
    Converted { summary: &'a PartSummary },
    Failed { part_id: &'a str, error: String },
}

#[derive(Serialize)]
struct ReportDiagnostic<'a> {
    app: AppVersion,
    settings: &'a ConvertSettings,
    format: ScoreFormat,
    title: Option<&'a str>,
    parts: Vec<PartDiagnostic<'a>>,
}

pub fn report_to_json(
    report: &ConversionReport,
    settings: &ConvertSettings,
) -> Result<Vec<u8>, SettingsError> {
    let parts = report
        .parts
        .iter()
        .map(|part| match &part.result {
            Ok(summary) => PartDiagnostic::Converted { summary },
            Err(err) => PartDiagnostic::Failed {
                part_id: &part.part_id,
                error: err.to_string(),
            },
        })
        .collect();

    let diagnostic = ReportDiagnostic {
        app: AppVersion {
            name: "mxl2dnm".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        settings,
        format: report.format,
        title: report.title.as_deref(),
        parts,
    };
    serde_json::to_vec_pretty(&diagnostic).map_err(|e| SettingsError::Serde(e.to_string()))
}

pub fn export_report(
    path: &Path,
    report: &ConversionReport,
    settings: &ConvertSettings,
) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SettingsError::Io(e.to_string()))?;
    }
    let data = report_to_json(report, settings)?;
    fs::write(path, data).map_err(|e| SettingsError::Io(e.to_string()))
}
