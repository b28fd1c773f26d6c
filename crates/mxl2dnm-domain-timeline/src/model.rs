use crate::error::TimelineError;
use mxl2dnm_ports::event::NoteContent;
use mxl2dnm_ports::types::{Divisions, Lane, Tick};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFormat {
    Partwise,
    Timewise,
}

/// A `note` element as read, before it is placed on the timeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub content: NoteContent,
    pub duration: Tick,
    pub voice: u32,
    pub staff: u32,
    /// Carries `<chord/>`: starts with the previous note instead of after it.
    pub chord: bool,
    pub grace: bool,
}

impl Note {
    pub fn lane(&self) -> Lane {
        Lane::new(self.voice, self.staff)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MeasureItem {
    AttributesChange { divisions: Option<Divisions> },
    Backup { duration: Tick },
    Forward { duration: Tick, lane: Option<Lane> },
    NoteItem(Note),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneEnd {
    pub voice: u32,
    pub staff: u32,
    pub tick: Tick,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSummary {
    pub part_id: String,
    pub name: Option<String>,
    pub measure_count: u32,
    pub event_count: usize,
    /// Cursor head after the last measure.
    pub end_tick: Tick,
    pub final_divisions: Divisions,
    pub lane_ends: Vec<LaneEnd>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartOutcome {
    pub part_id: String,
    pub result: Result<PartSummary, TimelineError>,
}

impl PartOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionReport {
    pub format: ScoreFormat,
    pub title: Option<String>,
    pub parts: Vec<PartOutcome>,
}

impl ConversionReport {
    pub fn failed_parts(&self) -> impl Iterator<Item = &PartOutcome> {
        self.parts.iter().filter(|part| !part.is_ok())
    }

    pub fn is_complete(&self) -> bool {
        self.parts.iter().all(PartOutcome::is_ok)
    }
}
