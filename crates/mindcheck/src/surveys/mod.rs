//! Conversational screening surveys: catalog, per-user progression, scoring
//! and chat replies.

pub mod assembler;
pub(crate) mod catalog;
pub mod command;
pub mod domain;
pub mod progress;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod skill;
pub mod sweeper;

#[cfg(test)]
mod tests;

pub use assembler::{MessageDescriptor, ReplyOption};
pub use catalog::{CatalogError, SurveyCatalog};
pub use command::Command;
pub use domain::{Choice, SafetyRule, ScoreBand, SurveyDefinition, SurveyKind, UnknownSurvey};
pub use progress::{
    Progress, ProgressionRecord, SurveyEngine, SurveyPhase, SurveyStep, Transition,
    TransitionRejected,
};
pub use router::skill_router;
pub use scoring::Assessment;
pub use service::{InboundEvent, SkillScope, SurveyService};
pub use session::{Clock, SessionStore, SystemClock, UserId, UserSession, ANONYMOUS_USER};
pub use skill::{SkillRequest, SkillResponse};
pub use sweeper::spawn_session_sweeper;
