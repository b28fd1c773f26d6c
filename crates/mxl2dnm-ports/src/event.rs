use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpelledPitch {
    pub step: String,
    pub alter: i32,
    pub octave: i32,
}

impl SpelledPitch {
    pub fn new(step: impl Into<String>, alter: i32, octave: i32) -> Self {
        Self {
            step: step.into(),
            alter,
            octave,
        }
    }
}

/// A chord is a single `Event` carrying more than one pitch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "pitches")]
pub enum NoteContent {
    Rest,
    Event(Vec<SpelledPitch>),
}

impl NoteContent {
    pub fn is_rest(&self) -> bool {
        matches!(self, NoteContent::Rest)
    }

    pub fn pitches(&self) -> &[SpelledPitch] {
        match self {
            NoteContent::Rest => &[],
            NoteContent::Event(pitches) => pitches,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub part_id: String,
    pub voice: u32,
    pub staff: u32,
    pub start_tick: Tick,
    pub duration: Tick,
    /// Divisions in force when `duration` was read.
    pub divisions: Divisions,
    pub measure_index: u32,
    pub content: NoteContent,
}

impl NoteEvent {
    pub fn end_tick(&self) -> Tick {
        self.start_tick.saturating_add(self.duration)
    }
}

/// Downstream consumer of converted events. Events arrive grouped by part, in
/// document order within a part.
pub trait EventSink {
    fn accept(&mut self, event: NoteEvent);
}

impl EventSink for Vec<NoteEvent> {
    fn accept(&mut self, event: NoteEvent) {
        self.push(event);
    }
}
