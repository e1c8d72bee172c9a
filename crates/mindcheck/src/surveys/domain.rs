use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of questionnaires the bot can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyKind {
    Phq9,
    Gad7,
    Cesd,
    Cbi,
}

impl SurveyKind {
    pub const COUNT: usize = 4;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [Self::Phq9, Self::Gad7, Self::Cesd, Self::Cbi]
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Phq9 => 0,
            Self::Gad7 => 1,
            Self::Cesd => 2,
            Self::Cbi => 3,
        }
    }

    /// Short code used as the prefix of every command token.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Phq9 => "PHQ9",
            Self::Gad7 => "GAD7",
            Self::Cesd => "CESD",
            Self::Cbi => "CBI",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Phq9 => "PHQ-9",
            Self::Gad7 => "GAD-7",
            Self::Cesd => "CES-D",
            Self::Cbi => "Burnout (CBI)",
        }
    }

    /// Path segment used by the per-survey skill endpoints.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Phq9 => "phq9",
            Self::Gad7 => "gad7",
            Self::Cesd => "cesd",
            Self::Cbi => "cbi",
        }
    }

    pub fn start_token(self) -> String {
        format!("{}_START", self.code())
    }

    pub fn answer_token(self, raw_score: u8) -> String {
        format!("{}_A{}", self.code(), raw_score)
    }

    /// Utterances that start the survey besides the start token.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Phq9 => &["PHQ-9", "PHQ9"],
            Self::Gad7 => &["GAD-7", "GAD7"],
            Self::Cesd => &["CES-D", "CESD"],
            Self::Cbi => &["CBI"],
        }
    }
}

impl fmt::Display for SurveyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown survey '{0}'")]
pub struct UnknownSurvey(pub String);

impl FromStr for SurveyKind {
    type Err = UnknownSurvey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "");
        Self::ordered()
            .into_iter()
            .find(|kind| kind.slug() == normalized)
            .ok_or_else(|| UnknownSurvey(value.to_string()))
    }
}

/// A selectable answer and the raw score it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub label: &'static str,
    pub score: u8,
}

/// Inclusive upper bound of a severity band. The last band of a survey
/// also absorbs every total above its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBand {
    pub upper_bound: u16,
    pub label: &'static str,
}

/// Flags a completed survey when the stored score of one item reaches
/// `minimum_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetyRule {
    pub question_index: usize,
    pub minimum_score: u8,
    pub notice: &'static str,
}

/// Declarative description of one questionnaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyDefinition {
    pub kind: SurveyKind,
    pub title: &'static str,
    pub questions: Vec<&'static str>,
    pub choices: Vec<Choice>,
    /// 1-based question numbers scored as `max_score - raw`.
    pub reverse_items: BTreeSet<usize>,
    pub bands: Vec<ScoreBand>,
    pub safety: Option<SafetyRule>,
    pub result_heading: &'static str,
    pub disclaimer: &'static str,
    /// Surveys offered after completion besides retaking this one.
    pub follow_ups: Vec<SurveyKind>,
}

impl SurveyDefinition {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, index: usize) -> Option<&'static str> {
        self.questions.get(index).copied()
    }

    pub fn max_score(&self) -> u8 {
        self.choices
            .iter()
            .map(|choice| choice.score)
            .max()
            .unwrap_or(0)
    }

    pub fn accepts_score(&self, raw_score: u8) -> bool {
        self.choices.iter().any(|choice| choice.score == raw_score)
    }

    pub fn max_total(&self) -> u16 {
        u16::from(self.max_score()) * self.question_count() as u16
    }
}
