use mxl2dnm_domain_timeline::{convert_score, ConversionReport, ScoreFormat, TimelineError};
use mxl2dnm_infra_xml_roxmltree::MusicXmlDocument;
use mxl2dnm_ports::event::{NoteContent, NoteEvent, SpelledPitch};
use mxl2dnm_ports::settings::{ConvertSettings, FailurePolicy};
use pretty_assertions::assert_eq;

fn convert_with(
    xml: &str,
    settings: &ConvertSettings,
) -> (Result<ConversionReport, TimelineError>, Vec<NoteEvent>) {
    let doc = MusicXmlDocument::parse(xml).expect("parse ok");
    let mut events = Vec::new();
    let report = convert_score(doc.root(), settings, &mut events);
    (report, events)
}

fn convert(xml: &str) -> (ConversionReport, Vec<NoteEvent>) {
    let (report, events) = convert_with(xml, &ConvertSettings::default());
    (report.expect("convert ok"), events)
}

fn summary_of(report: &ConversionReport, part_id: &str) -> mxl2dnm_domain_timeline::PartSummary {
    report
        .parts
        .iter()
        .find(|part| part.part_id == part_id)
        .and_then(|part| part.result.clone().ok())
        .expect("part summary")
}

fn starts(events: &[NoteEvent]) -> Vec<(u32, i64, i64)> {
    events
        .iter()
        .map(|e| (e.voice, e.start_tick, e.duration))
        .collect()
}

#[test]
fn note_then_rest_are_laid_end_to_end() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>4</divisions></attributes>
      <note>
        <pitch><step>C</step><octave>4</octave></pitch>
        <duration>4</duration>
        <voice>1</voice>
      </note>
      <note>
        <rest/>
        <duration>4</duration>
        <voice>1</voice>
      </note>
    </measure>
  </part>
</score-partwise>
"#;

    let (report, events) = convert(xml);
    assert_eq!(report.format, ScoreFormat::Partwise);
    assert_eq!(
        events,
        vec![
            NoteEvent {
                part_id: "P1".to_string(),
                voice: 1,
                staff: 1,
                start_tick: 0,
                duration: 4,
                divisions: 4,
                measure_index: 0,
                content: NoteContent::Event(vec![SpelledPitch::new("C", 0, 4)]),
            },
            NoteEvent {
                part_id: "P1".to_string(),
                voice: 1,
                staff: 1,
                start_tick: 4,
                duration: 4,
                divisions: 4,
                measure_index: 0,
                content: NoteContent::Rest,
            },
        ]
    );
    assert_eq!(events[1].end_tick(), 8);
    assert_eq!(summary_of(&report, "P1").end_tick, 8);
}

#[test]
fn backup_moves_second_voice_to_measure_start() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>2</divisions></attributes>
      <note>
        <pitch><step>C</step><octave>4</octave></pitch>
        <duration>8</duration>
        <voice>1</voice>
      </note>
      <backup><duration>8</duration></backup>
      <note>
        <pitch><step>G</step><octave>4</octave></pitch>
        <duration>4</duration>
        <voice>2</voice>
      </note>
    </measure>
  </part>
</score-partwise>
"#;

    let (report, events) = convert(xml);
    assert_eq!(starts(&events), vec![(1, 0, 8), (2, 0, 4)]);

    let summary = summary_of(&report, "P1");
    assert_eq!(summary.end_tick, 4);
    let lane_ticks: Vec<(u32, i64)> = summary
        .lane_ends
        .iter()
        .map(|lane| (lane.voice, lane.tick))
        .collect();
    assert_eq!(lane_ticks, vec![(1, 8), (2, 4)]);
}

#[test]
fn pitches_under_one_note_form_a_single_chord_event() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note>
        <pitch><step>C</step><octave>4</octave></pitch>
        <pitch><step>E</step><alter>-1</alter><octave>4</octave></pitch>
        <pitch><step>G</step><octave>4</octave></pitch>
        <duration>2</duration>
        <voice>1</voice>
      </note>
      <note>
        <pitch><step>D</step><octave>4</octave></pitch>
        <duration>1</duration>
        <voice>1</voice>
      </note>
    </measure>
  </part>
</score-partwise>
"#;

    let (_, events) = convert(xml);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].start_tick, 0);
    assert_eq!(
        events[0].content.pitches(),
        &[
            SpelledPitch::new("C", 0, 4),
            SpelledPitch::new("E", -1, 4),
            SpelledPitch::new("G", 0, 4),
        ]
    );
    assert_eq!(events[1].start_tick, 2);
}

#[test]
fn chord_flagged_notes_start_with_the_previous_note() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note>
        <pitch><step>C</step><octave>4</octave></pitch>
        <duration>1</duration>
        <voice>1</voice>
      </note>
      <note>
        <chord/>
        <pitch><step>E</step><octave>4</octave></pitch>
        <duration>1</duration>
        <voice>1</voice>
      </note>
      <note>
        <pitch><step>F</step><octave>4</octave></pitch>
        <duration>1</duration>
        <voice>1</voice>
      </note>
    </measure>
  </part>
</score-partwise>
"#;

    let (report, events) = convert(xml);
    assert_eq!(starts(&events), vec![(1, 0, 1), (1, 0, 1), (1, 1, 1)]);
    assert_eq!(summary_of(&report, "P1").end_tick, 2);
}

#[test]
fn rests_advance_the_cursor() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><rest/><duration>3</duration><voice>1</voice></note>
      <note>
        <pitch><step>A</step><octave>3</octave></pitch>
        <duration>1</duration>
        <voice>1</voice>
      </note>
    </measure>
  </part>
</score-partwise>
"#;

    let (_, events) = convert(xml);
    assert!(events[0].content.is_rest());
    assert!(events[0].content.pitches().is_empty());
    assert_eq!(events[1].start_tick, 3);
}

#[test]
fn forward_and_backup_across_measures_accumulate() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>2</divisions></attributes>
      <note><rest/><duration>4</duration><voice>1</voice></note>
      <forward><duration>4</duration></forward>
    </measure>
    <measure number="2">
      <note>
        <pitch><step>B</step><octave>4</octave></pitch>
        <duration>2</duration>
        <voice>1</voice>
        <staff>2</staff>
      </note>
      <backup><duration>6</duration></backup>
      <note>
        <pitch><step>B</step><octave>2</octave></pitch>
        <duration>2</duration>
        <voice>2</voice>
        <staff>2</staff>
      </note>
    </measure>
  </part>
</score-partwise>
"#;

    let (report, events) = convert(xml);
    assert_eq!(starts(&events), vec![(1, 0, 4), (1, 8, 2), (2, 4, 2)]);
    assert_eq!(events[1].staff, 2);
    assert_eq!(events[1].measure_index, 1);

    let summary = summary_of(&report, "P1");
    assert_eq!(summary.measure_count, 2);
    assert_eq!(summary.end_tick, 4 + 4 + 2 - 6 + 2);
}

#[test]
fn divisions_change_applies_only_to_later_events() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note>
        <pitch><step>C</step><octave>4</octave></pitch>
        <duration>1</duration>
        <voice>1</voice>
      </note>
    </measure>
    <measure number="2">
      <attributes><divisions>4</divisions></attributes>
      <note>
        <pitch><step>D</step><octave>4</octave></pitch>
        <duration>4</duration>
        <voice>1</voice>
      </note>
    </measure>
  </part>
</score-partwise>
"#;

    let (report, events) = convert(xml);
    assert_eq!(
        events
            .iter()
            .map(|e| (e.start_tick, e.duration, e.divisions))
            .collect::<Vec<_>>(),
        vec![(0, 1, 1), (1, 4, 4)]
    );
    assert_eq!(summary_of(&report, "P1").final_divisions, 4);
}

#[test]
fn grace_notes_take_no_time() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note>
        <grace/>
        <pitch><step>D</step><octave>5</octave></pitch>
        <voice>1</voice>
      </note>
      <note>
        <pitch><step>C</step><octave>5</octave></pitch>
        <duration>1</duration>
        <voice>1</voice>
      </note>
    </measure>
  </part>
</score-partwise>
"#;

    let (_, events) = convert(xml);
    assert_eq!(starts(&events), vec![(1, 0, 0), (1, 0, 1)]);

    let settings = ConvertSettings {
        skip_grace_notes: true,
        ..ConvertSettings::default()
    };
    let (report, events) = convert_with(xml, &settings);
    assert!(report.expect("convert ok").is_complete());
    assert_eq!(starts(&events), vec![(1, 0, 1)]);
}

const TWO_PARTS_FIRST_MISSING_VOICE: &str = r#"
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Flute</part-name></score-part>
    <score-part id="P2"><part-name>Cello</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note>
        <pitch><step>C</step><octave>5</octave></pitch>
        <duration>1</duration>
        <voice>1</voice>
      </note>
      <note>
        <pitch><step>D</step><octave>5</octave></pitch>
        <duration>1</duration>
      </note>
    </measure>
  </part>
  <part id="P2">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note>
        <pitch><step>C</step><octave>3</octave></pitch>
        <duration>2</duration>
        <voice>1</voice>
      </note>
    </measure>
  </part>
</score-partwise>
"#;

#[test]
fn missing_voice_fails_only_that_part() {
    let (report, events) = convert(TWO_PARTS_FIRST_MISSING_VOICE);

    assert!(!report.is_complete());
    let failed: Vec<&str> = report
        .failed_parts()
        .map(|part| part.part_id.as_str())
        .collect();
    assert_eq!(failed, vec!["P1"]);
    assert!(matches!(
        report.parts[0].result,
        Err(TimelineError::MissingVoice { .. })
    ));

    // No partial output from the failed part.
    assert!(events.iter().all(|e| e.part_id == "P2"));
    assert_eq!(events.len(), 1);
    assert_eq!(summary_of(&report, "P2").name.as_deref(), Some("Cello"));
}

#[test]
fn abort_policy_stops_at_the_first_failed_part() {
    let settings = ConvertSettings {
        failure_policy: FailurePolicy::AbortOnFirstError,
        ..ConvertSettings::default()
    };
    let (report, events) = convert_with(TWO_PARTS_FIRST_MISSING_VOICE, &settings);

    match report {
        Err(TimelineError::MissingVoice { at }) => {
            assert_eq!(at.part, "P1");
            assert_eq!(at.measure.as_deref(), Some("1"));
            assert_eq!(at.item_index, 2);
        }
        other => panic!("expected missing voice, got {other:?}"),
    }
    assert!(events.is_empty());
}

#[test]
fn timewise_scores_are_rejected_before_any_event() {
    let xml = r#"
<score-timewise version="3.1">
  <measure number="1">
    <part id="P1">
      <attributes><divisions>1</divisions></attributes>
      <note><rest/><duration>1</duration><voice>1</voice></note>
    </part>
  </measure>
</score-timewise>
"#;

    let (report, events) = convert_with(xml, &ConvertSettings::default());
    assert!(matches!(report, Err(TimelineError::UnsupportedFormat(_))));
    assert!(events.is_empty());
}

#[test]
fn unknown_root_is_unrecognized() {
    let (report, _) = convert_with("<opus><title>x</title></opus>", &ConvertSettings::default());
    assert_eq!(report, Err(TimelineError::UnrecognizedFormat));
}

#[test]
fn part_without_id_aborts_the_run_without_output() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><rest/><duration>1</duration><voice>1</voice></note>
    </measure>
  </part>
  <part>
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
    </measure>
  </part>
</score-partwise>
"#;

    let (report, events) = convert_with(xml, &ConvertSettings::default());
    assert_eq!(
        report,
        Err(TimelineError::MissingPartIdentifier { index: 1 })
    );
    assert!(events.is_empty());
}

#[test]
fn repeated_part_id_aborts_the_run() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1"><measure number="1"><attributes><divisions>1</divisions></attributes></measure></part>
  <part id="P1"><measure number="1"><attributes><divisions>1</divisions></attributes></measure></part>
</score-partwise>
"#;

    let (report, _) = convert_with(xml, &ConvertSettings::default());
    assert_eq!(
        report,
        Err(TimelineError::DuplicatePartIdentifier {
            part: "P1".to_string()
        })
    );
}

#[test]
fn first_measure_without_divisions_fails_the_part() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <note><rest/><duration>1</duration><voice>1</voice></note>
    </measure>
  </part>
</score-partwise>
"#;

    let (report, events) = convert(xml);
    assert_eq!(
        report.parts[0].result,
        Err(TimelineError::MissingDivisions {
            part: "P1".to_string()
        })
    );
    assert!(events.is_empty());
}

#[test]
fn backup_past_part_start_is_an_underflow() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><rest/><duration>1</duration><voice>1</voice></note>
      <backup><duration>2</duration></backup>
    </measure>
  </part>
</score-partwise>
"#;

    let (report, _) = convert(xml);
    assert!(matches!(
        report.parts[0].result,
        Err(TimelineError::CursorUnderflow {
            position: 1,
            by: 2,
            ..
        })
    ));
}

#[test]
fn invalid_pitch_fails_the_part() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note>
        <pitch><step>C</step><octave>four</octave></pitch>
        <duration>1</duration>
        <voice>1</voice>
      </note>
    </measure>
  </part>
</score-partwise>
"#;

    let (report, events) = convert(xml);
    assert!(matches!(
        report.parts[0].result,
        Err(TimelineError::InvalidPitch { .. })
    ));
    assert!(events.is_empty());
}

#[test]
fn cursor_restarts_for_every_part() {
    let xml = r#"
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><rest/><duration>4</duration><voice>1</voice></note>
    </measure>
  </part>
  <part id="P2">
    <measure number="1">
      <attributes><divisions>8</divisions></attributes>
      <note><rest/><duration>8</duration><voice>1</voice></note>
    </measure>
  </part>
</score-partwise>
"#;

    let (report, events) = convert(xml);
    assert_eq!(events[1].part_id, "P2");
    assert_eq!(events[1].start_tick, 0);
    assert_eq!(events[1].divisions, 8);
    assert_eq!(summary_of(&report, "P1").final_divisions, 1);
}

#[test]
fn converting_twice_gives_identical_events() {
    let (first_report, first) = convert(TWO_PARTS_FIRST_MISSING_VOICE);
    let (second_report, second) = convert(TWO_PARTS_FIRST_MISSING_VOICE);
    assert_eq!(first, second);
    assert_eq!(first_report, second_report);
}

#[test]
fn work_title_is_reported() {
    let xml = r#"
<score-partwise version="3.1">
  <work><work-title>Im wunderschönen Monat Mai</work-title></work>
  <movement-title>ignored</movement-title>
  <part id="P1">
    <measure number="1"><attributes><divisions>1</divisions></attributes></measure>
  </part>
</score-partwise>
"#;

    let (report, events) = convert(xml);
    assert_eq!(report.title.as_deref(), Some("Im wunderschönen Monat Mai"));
    assert!(events.is_empty());
    assert_eq!(summary_of(&report, "P1").end_tick, 0);
}
