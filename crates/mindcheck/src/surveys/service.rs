use std::sync::Arc;

use tracing::{debug, info, warn};

use super::assembler::{
    fallback_message, help_message, home_message, question_message, result_message,
    MessageDescriptor,
};
use super::catalog::SurveyCatalog;
use super::command::Command;
use super::domain::SurveyKind;
use super::progress::{Progress, SurveyEngine, SurveyStep};
use super::scoring::Assessment;
use super::session::{SessionStore, UserId};

/// Decoded inbound chat event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundEvent {
    /// Identifier fields in priority order.
    pub user_identifier_candidates: Vec<Option<String>>,
    pub utterance: String,
}

impl InboundEvent {
    pub fn new(user_id: impl Into<String>, utterance: impl Into<String>) -> Self {
        Self {
            user_identifier_candidates: vec![Some(user_id.into())],
            utterance: utterance.into(),
        }
    }

    pub fn user_id(&self) -> UserId {
        UserId::resolve(self.user_identifier_candidates.iter().map(Option::as_deref))
    }
}

/// Which survey commands an endpoint accepts. Help and Home are always accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkillScope {
    #[default]
    AllSurveys,
    Survey(SurveyKind),
}

impl SkillScope {
    fn admit(self, command: Command) -> Command {
        match (self, command.survey()) {
            (SkillScope::Survey(scope), Some(survey)) if scope != survey => Command::Unknown,
            _ => command,
        }
    }
}

/// Dispatcher tying the session store, the progression engine, scoring and
/// the response assembler together. One call handles one inbound event.
#[derive(Debug)]
pub struct SurveyService {
    catalog: Arc<SurveyCatalog>,
    sessions: Arc<SessionStore>,
}

impl SurveyService {
    pub fn new(catalog: Arc<SurveyCatalog>, sessions: Arc<SessionStore>) -> Self {
        Self { catalog, sessions }
    }

    pub fn catalog(&self) -> &SurveyCatalog {
        &self.catalog
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Always produces exactly one message; unrecognised input yields the
    /// fallback message and leaves every progression untouched.
    pub fn handle(&self, event: &InboundEvent, scope: SkillScope) -> MessageDescriptor {
        let user_id = event.user_id();
        let command = scope.admit(Command::parse(&event.utterance, &self.catalog));

        let step = match command {
            Command::Start(survey) => Some((survey, SurveyStep::Start)),
            Command::Answer { survey, raw_score } => {
                Some((survey, SurveyStep::Answer { raw_score }))
            }
            Command::Help | Command::Home | Command::Unknown => None,
        };

        self.sessions.with_session(&user_id, |session| {
            let Some((survey, step)) = step else {
                return match command {
                    Command::Help => help_message(),
                    Command::Home => home_message(),
                    _ => {
                        debug!(utterance = %event.utterance, "unrecognised command");
                        fallback_message()
                    }
                };
            };

            let definition = self.catalog.definition(survey);
            let engine = SurveyEngine::new(definition);
            let transition = match engine.advance(session.progression(survey), step) {
                Ok(transition) => transition,
                Err(rejected) => {
                    debug!(%survey, reason = %rejected, "answer ignored");
                    return fallback_message();
                }
            };
            session.install(survey, transition.record);

            match transition.progress {
                Progress::NextQuestion { index } => question_message(definition, index),
                Progress::Completed { answers } => {
                    let assessment = Assessment::from_answers(definition, &answers);
                    info!(
                        %survey,
                        total = assessment.total,
                        level = assessment.level,
                        safety_flag = assessment.needs_safety_notice(),
                        "survey completed"
                    );
                    if assessment.needs_safety_notice() {
                        warn!(%survey, "safety item endorsed; crisis resources included");
                    }
                    result_message(definition, &assessment)
                }
            }
        })
    }
}
