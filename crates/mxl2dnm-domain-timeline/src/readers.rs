use crate::error::{Location, TimelineError};
use crate::model::Note;
use mxl2dnm_ports::event::{NoteContent, SpelledPitch};
use mxl2dnm_ports::tree::TreeNode;
use mxl2dnm_ports::types::{Lane, Tick, DEFAULT_STAFF};

fn parse_int<T: std::str::FromStr>(text: &str) -> Option<T> {
    text.trim().parse::<T>().ok()
}

pub fn read_pitch<N: TreeNode>(pitch: N, at: &Location) -> Result<SpelledPitch, TimelineError> {
    let invalid = |reason: String| TimelineError::InvalidPitch {
        at: at.clone(),
        reason,
    };

    let step = pitch
        .child_text("step")
        .filter(|step| !step.is_empty())
        .ok_or_else(|| invalid("missing step".to_string()))?;
    let octave_text = pitch
        .child_text("octave")
        .ok_or_else(|| invalid("missing octave".to_string()))?;
    let octave = parse_int::<i32>(&octave_text)
        .ok_or_else(|| invalid(format!("octave {octave_text:?} is not an integer")))?;
    let alter = match pitch.child_text("alter") {
        Some(text) => parse_int::<i32>(&text)
            .ok_or_else(|| invalid(format!("alter {text:?} is not an integer")))?,
        None => 0,
    };

    Ok(SpelledPitch {
        step,
        alter,
        octave,
    })
}

/// `duration` child of a `note`, `backup` or `forward`.
pub fn read_duration<N: TreeNode>(element: N, at: &Location) -> Result<Tick, TimelineError> {
    element
        .child_text("duration")
        .and_then(|text| parse_int::<Tick>(&text))
        .filter(|duration| *duration >= 0)
        .ok_or_else(|| TimelineError::MissingDuration {
            at: at.clone(),
            element: element.tag_name().to_string(),
        })
}

pub fn read_voice<N: TreeNode>(note: N, at: &Location) -> Result<u32, TimelineError> {
    note.child_text("voice")
        .and_then(|text| parse_int::<u32>(&text))
        .ok_or_else(|| TimelineError::MissingVoice { at: at.clone() })
}

pub fn read_staff<N: TreeNode>(note: N, at: &Location) -> Result<u32, TimelineError> {
    match note.child_text("staff") {
        None => Ok(DEFAULT_STAFF),
        Some(text) => parse_int::<u32>(&text).ok_or_else(|| TimelineError::InvalidStaff {
            at: at.clone(),
            value: text,
        }),
    }
}

pub fn read_note_content<N: TreeNode>(
    note: N,
    at: &Location,
) -> Result<NoteContent, TimelineError> {
    if note.has_child("rest") {
        return Ok(NoteContent::Rest);
    }
    let pitches = note
        .children_named("pitch")
        .into_iter()
        .map(|pitch| read_pitch(pitch, at))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NoteContent::Event(pitches))
}

pub fn read_note<N: TreeNode>(note: N, at: &Location) -> Result<Note, TimelineError> {
    let content = read_note_content(note, at)?;
    let grace = note.has_child("grace");
    // Grace notes normally carry no duration of their own.
    let duration = if grace && !note.has_child("duration") {
        0
    } else {
        read_duration(note, at)?
    };
    let voice = read_voice(note, at)?;
    let staff = read_staff(note, at)?;

    Ok(Note {
        content,
        duration,
        voice,
        staff,
        chord: note.has_child("chord"),
        grace,
    })
}

/// Lane named by a `forward`, if it names a voice.
pub fn read_forward_lane<N: TreeNode>(
    forward: N,
    at: &Location,
) -> Result<Option<Lane>, TimelineError> {
    if !forward.has_child("voice") {
        return Ok(None);
    }
    let voice = read_voice(forward, at)?;
    let staff = read_staff(forward, at)?;
    Ok(Some(Lane::new(voice, staff)))
}
