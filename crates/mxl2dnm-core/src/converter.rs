use mxl2dnm_domain_timeline::{convert_score, ConversionReport, TimelineError};
use mxl2dnm_infra_xml_roxmltree::{read_musicxml_path, MusicXmlDocument};
use mxl2dnm_ports::event::{EventSink, NoteEvent};
use mxl2dnm_ports::settings::{ConvertSettings, SettingsError};
use mxl2dnm_ports::source::SourceError;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("timeline error: {0}")]
    Timeline(#[from] TimelineError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

pub struct Converter {
    settings: ConvertSettings,
}

impl Converter {
    pub fn new(settings: ConvertSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ConvertSettings {
        &self.settings
    }

    pub fn convert_str<S>(&self, xml: &str, sink: &mut S) -> Result<ConversionReport, ConvertError>
    where
        S: EventSink + ?Sized,
    {
        let doc = MusicXmlDocument::parse(xml)?;
        let report = convert_score(doc.root(), &self.settings, sink)?;
        log_report(&report);
        Ok(report)
    }

    pub fn convert_path<S>(&self, path: &Path, sink: &mut S) -> Result<ConversionReport, ConvertError>
    where
        S: EventSink + ?Sized,
    {
        log::info!("converting {}", path.display());
        let xml = read_musicxml_path(path)?;
        self.convert_str(&xml, sink)
    }

    /// Collects every event into memory.
    pub fn collect_path(&self, path: &Path) -> Result<(ConversionReport, Vec<NoteEvent>), ConvertError> {
        let mut events = Vec::new();
        let report = self.convert_path(path, &mut events)?;
        Ok((report, events))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertSettings::default())
    }
}

fn log_report(report: &ConversionReport) {
    let failed = report.failed_parts().count();
    log::info!(
        "{:?} score{}: {} parts, {} failed",
        report.format,
        report
            .title
            .as_deref()
            .map(|title| format!(" \"{title}\""))
            .unwrap_or_default(),
        report.parts.len(),
        failed
    );
    for part in report.failed_parts() {
        if let Err(err) = &part.result {
            log::error!("part {}: {}", part.part_id, err);
        }
    }
}
