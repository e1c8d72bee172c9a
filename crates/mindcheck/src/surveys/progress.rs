use serde::Serialize;

use super::domain::SurveyDefinition;
use super::scoring::reverse_transform;

/// Per-user, per-survey cursor. `answers.len() == question_index` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressionRecord {
    question_index: usize,
    answers: Vec<u8>,
    started: bool,
}

impl ProgressionRecord {
    pub const fn unstarted() -> Self {
        Self {
            question_index: 0,
            answers: Vec::new(),
            started: false,
        }
    }

    /// Record installed by a start command: positioned on the first question.
    pub fn started() -> Self {
        Self {
            question_index: 0,
            answers: Vec::new(),
            started: true,
        }
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// Stored scores, already reverse-transformed where the survey requires it.
    pub fn answers(&self) -> &[u8] {
        &self.answers
    }

    pub fn phase(&self, definition: &SurveyDefinition) -> SurveyPhase {
        if !self.started {
            SurveyPhase::AwaitingStart
        } else if self.question_index >= definition.question_count() {
            SurveyPhase::Completed
        } else {
            SurveyPhase::InProgress {
                question_index: self.question_index,
            }
        }
    }

    fn record_answer(&mut self, score: u8) {
        self.answers.push(score);
        self.question_index += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum SurveyPhase {
    AwaitingStart,
    InProgress { question_index: usize },
    Completed,
}

/// Input to the progression state machine for a single survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyStep {
    Start,
    Answer { raw_score: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    NextQuestion { index: usize },
    Completed { answers: Vec<u8> },
}

/// Result of a transition that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub record: ProgressionRecord,
    pub progress: Progress,
}

/// Why no transition fired; the record is left untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionRejected {
    #[error("survey has not been started")]
    NotStarted,
    #[error("survey is already completed")]
    AlreadyCompleted,
    #[error("score {raw_score} is not one of the survey's choices")]
    InvalidScore { raw_score: u8 },
}

/// Pure state machine over one survey definition.
#[derive(Debug, Clone, Copy)]
pub struct SurveyEngine<'a> {
    definition: &'a SurveyDefinition,
}

impl<'a> SurveyEngine<'a> {
    pub fn new(definition: &'a SurveyDefinition) -> Self {
        Self { definition }
    }

    pub fn advance(
        &self,
        record: &ProgressionRecord,
        step: SurveyStep,
    ) -> Result<Transition, TransitionRejected> {
        match step {
            SurveyStep::Start => Ok(Transition {
                record: ProgressionRecord::started(),
                progress: Progress::NextQuestion { index: 0 },
            }),
            SurveyStep::Answer { raw_score } => self.answer(record, raw_score),
        }
    }

    fn answer(
        &self,
        record: &ProgressionRecord,
        raw_score: u8,
    ) -> Result<Transition, TransitionRejected> {
        let index = match record.phase(self.definition) {
            SurveyPhase::AwaitingStart => return Err(TransitionRejected::NotStarted),
            SurveyPhase::Completed => return Err(TransitionRejected::AlreadyCompleted),
            SurveyPhase::InProgress { question_index } => question_index,
        };
        if !self.definition.accepts_score(raw_score) {
            return Err(TransitionRejected::InvalidScore { raw_score });
        }

        let score = reverse_transform(
            raw_score,
            index + 1,
            &self.definition.reverse_items,
            self.definition.max_score(),
        );

        let mut next = record.clone();
        next.record_answer(score);

        let progress = if next.question_index == self.definition.question_count() {
            Progress::Completed {
                answers: next.answers.clone(),
            }
        } else {
            Progress::NextQuestion {
                index: next.question_index,
            }
        };

        Ok(Transition {
            record: next,
            progress,
        })
    }
}
