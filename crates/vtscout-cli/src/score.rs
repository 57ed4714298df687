//! `score` command: runs the classifier over a record given on the command
//! line.

use serde::Serialize;
use vtscout_core::Platform;
use vtscout_discovery::{has_performer_tags, Candidate, Classifier, ScoreResult};

use crate::print_json;

#[derive(Debug, Clone)]
pub(crate) struct ScoreInput {
    pub name: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoreReport {
    platform: Platform,
    base: ScoreResult,
    base_accepted: bool,
    adaptive: ScoreResult,
    adaptive_accepted: bool,
    performer_tags: Vec<String>,
    language_focus: String,
}

pub(crate) fn build_report(input: ScoreInput, platform: Platform) -> ScoreReport {
    let classifier = Classifier::new();
    let candidate = Candidate {
        id: input.name.clone(),
        display_name: input.name,
        title: input.title,
        description: input.description,
        tags: input.tags,
        ..Candidate::default()
    };

    let (tag_hit, performer_tags) = has_performer_tags(&candidate.tags);
    let base = if tag_hit {
        classifier.score_with_tags(&candidate, platform)
    } else {
        classifier.score(&candidate, platform)
    };
    let adaptive = classifier.adaptive_score(&candidate, platform);

    ScoreReport {
        platform,
        base_accepted: base.passes(),
        adaptive_accepted: classifier.accepts_adaptive(&adaptive, platform),
        base,
        adaptive,
        performer_tags,
        language_focus: classifier.language_focus(&candidate),
    }
}

pub(crate) fn run_score(input: ScoreInput, platform: Platform) -> anyhow::Result<()> {
    print_json(&build_report(input, platform), false)
}
