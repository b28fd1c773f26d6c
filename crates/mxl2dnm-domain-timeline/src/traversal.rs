use crate::cursor::Cursor;
use crate::divisions::{initial_divisions, DivisionsTable};
use crate::error::TimelineError;
use crate::format::{detect_format, part_names, score_title};
use crate::measure::MeasureDispatcher;
use crate::model::{ConversionReport, LaneEnd, PartOutcome, PartSummary, ScoreFormat};
use mxl2dnm_ports::event::{EventSink, NoteEvent};
use mxl2dnm_ports::settings::{ConvertSettings, FailurePolicy};
use mxl2dnm_ports::tree::TreeNode;
use std::collections::HashSet;

/// Converts a parsed document into events, pushed to `sink` part by part.
///
/// A part's events reach the sink only once the whole part has been read, so
/// a failed part never contributes partial output.
pub fn convert_score<N, S>(
    root: N,
    settings: &ConvertSettings,
    sink: &mut S,
) -> Result<ConversionReport, TimelineError>
where
    N: TreeNode,
    S: EventSink + ?Sized,
{
    let (score, format) = detect_format(root)?;
    if format == ScoreFormat::Timewise {
        return Err(TimelineError::UnsupportedFormat(
            "score-timewise documents cannot be traversed".to_string(),
        ));
    }

    let parts = identified_parts(score)?;
    let names = part_names(score);
    let mut divisions = DivisionsTable::new();
    let mut cursor = Cursor::new();
    let mut outcomes = Vec::with_capacity(parts.len());

    for (part, part_id) in parts {
        log::debug!("part {part_id}: start");
        let name = names.get(&part_id).cloned();
        match traverse_part(part, &part_id, name, settings, &mut cursor, &mut divisions) {
            Ok((events, summary)) => {
                log::debug!(
                    "part {part_id}: {} events, ends at tick {}",
                    summary.event_count,
                    summary.end_tick
                );
                for event in events {
                    sink.accept(event);
                }
                outcomes.push(PartOutcome {
                    part_id,
                    result: Ok(summary),
                });
            }
            Err(err) => {
                log::warn!("part {part_id} failed: {err}");
                if settings.failure_policy == FailurePolicy::AbortOnFirstError {
                    return Err(err);
                }
                outcomes.push(PartOutcome {
                    part_id,
                    result: Err(err),
                });
            }
        }
    }

    Ok(ConversionReport {
        format,
        title: score_title(score),
        parts: outcomes,
    })
}

/// Every part paired with its id. Runs before any part is traversed so that a
/// missing or repeated id stops the run without output.
fn identified_parts<N: TreeNode>(score: N) -> Result<Vec<(N, String)>, TimelineError> {
    let mut seen = HashSet::new();
    let mut parts = Vec::new();
    for (index, part) in score.children_named("part").into_iter().enumerate() {
        let id = part
            .attribute("id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(TimelineError::MissingPartIdentifier { index })?
            .to_string();
        if !seen.insert(id.clone()) {
            return Err(TimelineError::DuplicatePartIdentifier { part: id });
        }
        parts.push((part, id));
    }
    Ok(parts)
}

pub fn traverse_part<N: TreeNode>(
    part: N,
    part_id: &str,
    name: Option<String>,
    settings: &ConvertSettings,
    cursor: &mut Cursor,
    divisions: &mut DivisionsTable,
) -> Result<(Vec<NoteEvent>, PartSummary), TimelineError> {
    let initial = initial_divisions(part, part_id)?;
    divisions.set(part_id, initial);
    cursor.reset();

    let mut events = Vec::new();
    let mut measure_count = 0u32;
    {
        let mut dispatcher = MeasureDispatcher::new(part_id, cursor, divisions, &mut events)
            .skip_grace_notes(settings.skip_grace_notes);
        for measure in part.children_named("measure") {
            dispatcher.dispatch(measure, measure_count)?;
            measure_count += 1;
        }
    }

    let summary = PartSummary {
        part_id: part_id.to_string(),
        name,
        measure_count,
        event_count: events.len(),
        end_tick: cursor.position(),
        final_divisions: divisions.get(part_id).unwrap_or(initial),
        lane_ends: cursor
            .lanes()
            .map(|(lane, tick)| LaneEnd {
                voice: lane.voice,
                staff: lane.staff,
                tick,
            })
            .collect(),
    };
    Ok((events, summary))
}
