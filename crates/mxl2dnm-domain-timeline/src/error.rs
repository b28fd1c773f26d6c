use mxl2dnm_ports::types::Tick;
use std::fmt;

/// Where in a part an item was read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub part: String,
    /// `number` attribute of the measure, if any.
    pub measure: Option<String>,
    pub measure_index: u32,
    /// Zero-based index of the element among the measure's element children.
    pub item_index: usize,
}

impl Location {
    pub fn part_level(part: &str) -> Self {
        Self {
            part: part.to_string(),
            measure: None,
            measure_index: 0,
            item_index: 0,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.measure {
            Some(number) => write!(
                f,
                "part {} measure {} item {}",
                self.part, number, self.item_index
            ),
            None => write!(
                f,
                "part {} measure #{} item {}",
                self.part, self.measure_index, self.item_index
            ),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    #[error("unrecognized format: root has neither score-partwise nor score-timewise")]
    UnrecognizedFormat,
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("part #{index} has no id")]
    MissingPartIdentifier { index: usize },
    #[error("part id {part} is used more than once")]
    DuplicatePartIdentifier { part: String },
    #[error("part {part}: first measure declares no divisions")]
    MissingDivisions { part: String },
    #[error("{at}: invalid divisions {value:?}")]
    InvalidDivisions { at: Location, value: String },
    #[error("{at}: <{element}> has a missing or invalid duration")]
    MissingDuration { at: Location, element: String },
    #[error("{at}: note has a missing or invalid voice")]
    MissingVoice { at: Location },
    #[error("{at}: invalid staff {value:?}")]
    InvalidStaff { at: Location, value: String },
    #[error("{at}: invalid pitch: {reason}")]
    InvalidPitch { at: Location, reason: String },
    #[error("{at}: backup of {by} from tick {position} moves before the start of the part")]
    CursorUnderflow { at: Location, position: Tick, by: Tick },
}
