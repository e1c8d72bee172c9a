use serde::Serialize;

use super::catalog::CRISIS_LINES;
use super::command::{HELP_TOKEN, HOME_TOKEN};
use super::domain::{SurveyDefinition, SurveyKind};
use super::scoring::Assessment;

/// Transport-neutral reply. The wire adapter turns it into a skill response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDescriptor {
    pub title_text: String,
    pub body_text: String,
    pub options: Vec<ReplyOption>,
}

/// Quick reply; `token` is the utterance the chat client echoes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyOption {
    pub label: String,
    pub token: String,
}

impl ReplyOption {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }

    fn start(survey: SurveyKind) -> Self {
        Self::new(survey.display_name(), survey.start_token())
    }

    fn help() -> Self {
        Self::new("Counseling info", HELP_TOKEN)
    }

    fn home() -> Self {
        Self::new("Back to start", HOME_TOKEN)
    }
}

/// Message for question `index`, with one option per choice plus an abort option.
pub fn question_message(definition: &SurveyDefinition, index: usize) -> MessageDescriptor {
    let mut options: Vec<ReplyOption> = definition
        .choices
        .iter()
        .map(|choice| ReplyOption::new(choice.label, definition.kind.answer_token(choice.score)))
        .collect();
    options.push(ReplyOption::new("Stop (back to start)", HOME_TOKEN));

    MessageDescriptor {
        title_text: format!(
            "{} ({}/{})",
            definition.title,
            index + 1,
            definition.question_count()
        ),
        body_text: definition.question(index).unwrap_or_default().to_string(),
        options,
    }
}

pub fn result_message(definition: &SurveyDefinition, assessment: &Assessment) -> MessageDescriptor {
    let mut body_text = format!(
        "Total: {} points (0-{})\nLevel: {}\n\n{}",
        assessment.total, assessment.max_total, assessment.level, definition.disclaimer
    );

    if assessment.needs_safety_notice() {
        if let Some(rule) = definition.safety {
            body_text.push_str("\n\n");
            body_text.push_str(rule.notice);
            body_text.push('\n');
            body_text.push_str(CRISIS_LINES);
        }
    }

    let retake = ReplyOption::new(
        format!("Retake {}", definition.kind.display_name()),
        definition.kind.start_token(),
    );
    let mut options = vec![ReplyOption::help(), retake];
    options.extend(
        definition
            .follow_ups
            .iter()
            .map(|&survey| ReplyOption::new(format!("Take {}", survey.display_name()), survey.start_token())),
    );
    options.push(ReplyOption::home());

    MessageDescriptor {
        title_text: definition.result_heading.to_string(),
        body_text,
        options,
    }
}

pub fn help_message() -> MessageDescriptor {
    MessageDescriptor {
        title_text: "Counseling and support".to_string(),
        body_text: [
            "- Suicide prevention hotline: 1393",
            "- Mental health crisis line: 1577-0199",
            "- Health and welfare hotline: 129",
            "- Emergency: 112/119",
            "",
            "Connect your campus or organization counseling links according to your operating policy.",
        ]
        .join("\n"),
        options: vec![
            ReplyOption::start(SurveyKind::Phq9),
            ReplyOption::start(SurveyKind::Gad7),
            ReplyOption::home(),
        ],
    }
}

pub fn home_message() -> MessageDescriptor {
    let mut options: Vec<ReplyOption> = SurveyKind::ordered()
        .into_iter()
        .map(ReplyOption::start)
        .collect();
    options.push(ReplyOption::help());

    MessageDescriptor {
        title_text: String::new(),
        body_text: "Please choose a survey.".to_string(),
        options,
    }
}

pub fn fallback_message() -> MessageDescriptor {
    let mut options: Vec<ReplyOption> = SurveyKind::ordered()
        .into_iter()
        .map(ReplyOption::start)
        .collect();
    options.push(ReplyOption::home());

    MessageDescriptor {
        title_text: String::new(),
        body_text: "Sorry, I did not understand that. Choose a survey below to start.".to_string(),
        options,
    }
}
