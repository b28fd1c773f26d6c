use mxl2dnm_ports::types::{Lane, Tick};
use std::collections::BTreeMap;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rewinding {by} from tick {position} would move before tick 0")]
pub struct CursorUnderflow {
    pub position: Tick,
    pub by: Tick,
}

/// Time position of one part.
///
/// The head is shared by every voice and staff of the part; `backup` and
/// `forward` move it between them. Each lane remembers where its last note
/// (or lane-tagged forward) ended.
#[derive(Clone, Debug, Default)]
pub struct Cursor {
    position: Tick,
    chord_anchor: Option<Tick>,
    lanes: BTreeMap<Lane, Tick>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Tick {
        self.position
    }

    pub fn advance(&mut self, by: Tick) {
        self.position = self.position.saturating_add(by);
        self.chord_anchor = None;
    }

    pub fn rewind(&mut self, by: Tick) -> Result<Tick, CursorUnderflow> {
        if by > self.position {
            return Err(CursorUnderflow {
                position: self.position,
                by,
            });
        }
        self.position -= by;
        self.chord_anchor = None;
        Ok(self.position)
    }

    pub fn reset(&mut self) {
        self.position = 0;
        self.chord_anchor = None;
        self.lanes.clear();
    }

    /// `forward`: like `advance`, and also moves the lane when the directive names one.
    pub fn skip(&mut self, by: Tick, lane: Option<Lane>) {
        self.advance(by);
        if let Some(lane) = lane {
            self.lanes.insert(lane, self.position);
        }
    }

    /// Places a note at the head and moves past it. Returns the start tick.
    pub fn place(&mut self, lane: Lane, duration: Tick) -> Tick {
        let start = self.position;
        self.advance(duration);
        self.chord_anchor = Some(start);
        self.lanes.insert(lane, start.saturating_add(duration));
        start
    }

    /// Places a `<chord/>` note alongside the previous note without moving the head.
    pub fn place_chord_member(&mut self, lane: Lane, duration: Tick) -> Tick {
        let start = self.chord_anchor.unwrap_or(self.position);
        self.chord_anchor = Some(start);
        let end = start.saturating_add(duration);
        let lane_end = self.lanes.entry(lane).or_insert(end);
        *lane_end = (*lane_end).max(end);
        start
    }

    pub fn lane_position(&self, lane: Lane) -> Option<Tick> {
        self.lanes.get(&lane).copied()
    }

    pub fn lanes(&self) -> impl Iterator<Item = (Lane, Tick)> + '_ {
        self.lanes.iter().map(|(lane, tick)| (*lane, *tick))
    }
}
