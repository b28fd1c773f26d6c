use anyhow::Context;
use clap::Parser;
use mxl2dnm_core::{export_report, load_settings, Converter};
use mxl2dnm_ports::event::{EventSink, NoteEvent};
use mxl2dnm_ports::settings::{ConvertSettings, FailurePolicy};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Converts a partwise MusicXML score into timed note events")]
struct Args {
    /// MusicXML file (.xml, .musicxml or compressed .mxl)
    path: PathBuf,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Stop at the first part that fails to convert
    #[arg(long)]
    abort_on_first_error: bool,

    #[arg(long)]
    skip_grace_notes: bool,

    /// Write a JSON conversion report here
    #[arg(long)]
    report: Option<PathBuf>,
}

/// Writes one JSON object per line.
struct JsonLinesSink<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn accept(&mut self, event: NoteEvent) {
        if self.error.is_some() {
            return;
        }
        let written = serde_json::to_writer(&mut self.out, &event)
            .map_err(io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        if let Err(err) = written {
            self.error = Some(err);
        }
    }
}

fn resolve_settings(args: &Args) -> anyhow::Result<ConvertSettings> {
    let mut settings = match &args.settings {
        Some(path) => load_settings(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => ConvertSettings::default(),
    };
    if args.abort_on_first_error {
        settings.failure_policy = FailurePolicy::AbortOnFirstError;
    }
    if args.skip_grace_notes {
        settings.skip_grace_notes = true;
    }
    Ok(settings)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    let converter = Converter::new(settings);

    let stdout = io::stdout();
    let mut sink = JsonLinesSink {
        out: BufWriter::new(stdout.lock()),
        error: None,
    };
    let report = converter
        .convert_path(&args.path, &mut sink)
        .with_context(|| format!("converting {}", args.path.display()))?;
    if let Some(err) = sink.error.take() {
        return Err(err).context("writing events");
    }
    sink.out.flush().context("writing events")?;

    if let Some(path) = &args.report {
        export_report(path, &report, converter.settings())
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    let failed = report.failed_parts().count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} parts failed to convert", report.parts.len());
    }
    Ok(())
}
