use crate::error::TimelineError;
use crate::model::ScoreFormat;
use mxl2dnm_ports::tree::TreeNode;
use std::collections::HashMap;

/// Picks the score element under the document root.
pub fn detect_format<N: TreeNode>(root: N) -> Result<(N, ScoreFormat), TimelineError> {
    if root.tag_name() == "score-partwise" {
        return Ok((root, ScoreFormat::Partwise));
    }
    if root.tag_name() == "score-timewise" {
        return Ok((root, ScoreFormat::Timewise));
    }
    if let Some(score) = root.child_named("score-partwise") {
        return Ok((score, ScoreFormat::Partwise));
    }
    if let Some(score) = root.child_named("score-timewise") {
        return Ok((score, ScoreFormat::Timewise));
    }
    Err(TimelineError::UnrecognizedFormat)
}

pub fn score_title<N: TreeNode>(score: N) -> Option<String> {
    score
        .child_named("work")
        .and_then(|work| work.child_text("work-title"))
        .or_else(|| score.child_text("movement-title"))
        .filter(|title| !title.is_empty())
}

/// `score-part` id to `part-name`, from the part list.
pub fn part_names<N: TreeNode>(score: N) -> HashMap<String, String> {
    let Some(part_list) = score.child_named("part-list") else {
        return HashMap::new();
    };
    part_list
        .children_named("score-part")
        .into_iter()
        .filter_map(|score_part| {
            let id = score_part.attribute("id")?.trim().to_string();
            let name = score_part.child_text("part-name")?;
            Some((id, name))
        })
        .collect()
}
