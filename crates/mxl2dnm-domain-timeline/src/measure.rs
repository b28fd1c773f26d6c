use crate::cursor::Cursor;
use crate::divisions::{parse_divisions, DivisionsTable};
use crate::error::{Location, TimelineError};
use crate::model::{MeasureItem, Note};
use crate::readers::{read_duration, read_forward_lane, read_note};
use mxl2dnm_ports::event::NoteEvent;
use mxl2dnm_ports::tree::TreeNode;

/// Reads one measure child. Elements other than `attributes`, `backup`,
/// `forward` and `note` yield `None`.
pub fn read_measure_item<N: TreeNode>(
    element: N,
    at: &Location,
) -> Result<Option<MeasureItem>, TimelineError> {
    let item = match element.tag_name() {
        "attributes" => {
            let divisions = match element.child_text("divisions") {
                Some(text) => Some(parse_divisions(&text, at)?),
                None => None,
            };
            MeasureItem::AttributesChange { divisions }
        }
        "backup" => MeasureItem::Backup {
            duration: read_duration(element, at)?,
        },
        "forward" => MeasureItem::Forward {
            duration: read_duration(element, at)?,
            lane: read_forward_lane(element, at)?,
        },
        "note" => MeasureItem::NoteItem(read_note(element, at)?),
        _ => return Ok(None),
    };
    Ok(Some(item))
}

/// Walks the measures of one part, feeding the cursor and collecting events.
pub struct MeasureDispatcher<'a> {
    part_id: &'a str,
    cursor: &'a mut Cursor,
    divisions: &'a mut DivisionsTable,
    events: &'a mut Vec<NoteEvent>,
    skip_grace_notes: bool,
}

impl<'a> MeasureDispatcher<'a> {
    pub fn new(
        part_id: &'a str,
        cursor: &'a mut Cursor,
        divisions: &'a mut DivisionsTable,
        events: &'a mut Vec<NoteEvent>,
    ) -> Self {
        Self {
            part_id,
            cursor,
            divisions,
            events,
            skip_grace_notes: false,
        }
    }

    pub fn skip_grace_notes(mut self, skip: bool) -> Self {
        self.skip_grace_notes = skip;
        self
    }

    pub fn dispatch<N: TreeNode>(
        &mut self,
        measure: N,
        measure_index: u32,
    ) -> Result<(), TimelineError> {
        let number = measure.attribute("number").map(|n| n.trim().to_string());
        for (item_index, element) in measure.element_children().enumerate() {
            let at = Location {
                part: self.part_id.to_string(),
                measure: number.clone(),
                measure_index,
                item_index,
            };
            if let Some(item) = read_measure_item(element, &at)? {
                self.apply(item, &at)?;
            }
        }
        Ok(())
    }

    pub fn apply(&mut self, item: MeasureItem, at: &Location) -> Result<(), TimelineError> {
        match item {
            MeasureItem::AttributesChange { divisions } => {
                if self.divisions.maybe_update(self.part_id, divisions) {
                    log::debug!("{at}: divisions now {divisions:?}");
                }
            }
            MeasureItem::Backup { duration } => {
                self.cursor
                    .rewind(duration)
                    .map_err(|underflow| TimelineError::CursorUnderflow {
                        at: at.clone(),
                        position: underflow.position,
                        by: underflow.by,
                    })?;
            }
            MeasureItem::Forward { duration, lane } => {
                self.cursor.skip(duration, lane);
            }
            MeasureItem::NoteItem(note) => self.place_note(note, at)?,
        }
        Ok(())
    }

    fn place_note(&mut self, note: Note, at: &Location) -> Result<(), TimelineError> {
        if note.grace && self.skip_grace_notes {
            return Ok(());
        }
        let divisions =
            self.divisions
                .get(self.part_id)
                .ok_or_else(|| TimelineError::MissingDivisions {
                    part: self.part_id.to_string(),
                })?;

        let lane = note.lane();
        let start_tick = if note.chord {
            self.cursor.place_chord_member(lane, note.duration)
        } else {
            self.cursor.place(lane, note.duration)
        };

        self.events.push(NoteEvent {
            part_id: self.part_id.to_string(),
            voice: note.voice,
            staff: note.staff,
            start_tick,
            duration: note.duration,
            divisions,
            measure_index: at.measure_index,
            content: note.content,
        });
        Ok(())
    }
}
