use serde::{Deserialize, Serialize};

pub type Tick = i64; // part-local time, in the divisions unit current when read
pub type Divisions = u32; // time units per quarter note

pub const DEFAULT_STAFF: u32 = 1;

/// One voice on one staff of a part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Lane {
    pub voice: u32,
    pub staff: u32,
}

impl Lane {
    pub fn new(voice: u32, staff: u32) -> Self {
        Self { voice, staff }
    }
}
