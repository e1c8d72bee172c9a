use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{SafetyRule, ScoreBand, SurveyDefinition, SurveyKind};

/// Applied once when an answer is ingested, so stored answers are final scores.
pub fn reverse_transform(
    raw_score: u8,
    question_number: usize,
    reverse_items: &BTreeSet<usize>,
    max_score: u8,
) -> u8 {
    if reverse_items.contains(&question_number) {
        max_score.saturating_sub(raw_score)
    } else {
        raw_score
    }
}

pub fn total(answers: &[u8]) -> u16 {
    answers.iter().map(|&score| u16::from(score)).sum()
}

/// Returns the first band whose upper bound covers `total`; totals past the
/// last bound fall into the last band.
pub fn classify(total: u16, bands: &[ScoreBand]) -> Option<&'static str> {
    bands
        .iter()
        .find(|band| band.upper_bound >= total)
        .or_else(|| bands.last())
        .map(|band| band.label)
}

pub fn safety_flag(answers: &[u8], rule: &SafetyRule) -> bool {
    answers
        .get(rule.question_index)
        .is_some_and(|&score| score >= rule.minimum_score)
}

/// Scored summary of a completed survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub survey: SurveyKind,
    pub total: u16,
    pub max_total: u16,
    pub level: &'static str,
    /// `None` when the survey declares no safety-sensitive item.
    pub safety_flag: Option<bool>,
}

impl Assessment {
    pub fn from_answers(definition: &SurveyDefinition, answers: &[u8]) -> Self {
        let total = total(answers);
        Self {
            survey: definition.kind,
            total,
            max_total: definition.max_total(),
            level: classify(total, &definition.bands).unwrap_or("Unclassified"),
            safety_flag: definition
                .safety
                .as_ref()
                .map(|rule| safety_flag(answers, rule)),
        }
    }

    pub fn needs_safety_notice(&self) -> bool {
        self.safety_flag.unwrap_or(false)
    }
}
