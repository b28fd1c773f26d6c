use crate::error::{Location, TimelineError};
use mxl2dnm_ports::tree::TreeNode;
use mxl2dnm_ports::types::Divisions;
use std::collections::BTreeMap;

/// Divisions currently in force, per part id.
#[derive(Clone, Debug, Default)]
pub struct DivisionsTable {
    entries: BTreeMap<String, Divisions>,
}

impl DivisionsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, part_id: &str) -> Option<Divisions> {
        self.entries.get(part_id).copied()
    }

    pub fn set(&mut self, part_id: &str, divisions: Divisions) {
        self.entries.insert(part_id.to_string(), divisions);
    }

    /// Applies an `attributes` change. Returns true if the entry changed.
    pub fn maybe_update(&mut self, part_id: &str, divisions: Option<Divisions>) -> bool {
        let Some(divisions) = divisions else {
            return false;
        };
        let previous = self.entries.insert(part_id.to_string(), divisions);
        previous != Some(divisions)
    }
}

pub fn parse_divisions(text: &str, at: &Location) -> Result<Divisions, TimelineError> {
    match text.trim().parse::<Divisions>() {
        Ok(divisions) if divisions > 0 => Ok(divisions),
        _ => Err(TimelineError::InvalidDivisions {
            at: at.clone(),
            value: text.to_string(),
        }),
    }
}

/// Divisions declared by the first `attributes` of the part's first measure
/// that carries one.
pub fn initial_divisions<N: TreeNode>(part: N, part_id: &str) -> Result<Divisions, TimelineError> {
    let missing = || TimelineError::MissingDivisions {
        part: part_id.to_string(),
    };
    let measure = part.child_named("measure").ok_or_else(missing)?;

    for (item_index, element) in measure.element_children().enumerate() {
        if element.tag_name() != "attributes" {
            continue;
        }
        if let Some(text) = element.child_text("divisions") {
            let at = Location {
                part: part_id.to_string(),
                measure: measure.attribute("number").map(|n| n.to_string()),
                measure_index: 0,
                item_index,
            };
            return parse_divisions(&text, &at);
        }
    }

    Err(missing())
}
