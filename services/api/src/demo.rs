use crate::infra::parse_survey;
use clap::Args;
use mindcheck::error::AppError;
use mindcheck::surveys::{
    InboundEvent, MessageDescriptor, SessionStore, SkillResponse, SkillScope, SurveyCatalog,
    SurveyKind, SurveyService,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Survey to run (phq9, gad7, cesd, cbi)
    #[arg(long, default_value = "phq9", value_parser = parse_survey)]
    pub(crate) survey: SurveyKind,
    /// Comma separated raw answer scores, e.g. 0,1,2,3. Defaults to all zeros.
    #[arg(long, value_delimiter = ',')]
    pub(crate) answers: Vec<u8>,
    /// Print the skill response payloads instead of plain text.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        survey,
        answers,
        json,
    } = args;

    let catalog = Arc::new(SurveyCatalog::standard()?);
    let question_count = catalog.definition(survey).question_count();
    let service = SurveyService::new(catalog, Arc::new(SessionStore::default()));
    let answers = if answers.is_empty() {
        vec![0; question_count]
    } else {
        answers
    };

    println!("Survey demo: {}", survey.display_name());

    let utterances = std::iter::once(survey.start_token())
        .chain(answers.iter().map(|&score| survey.answer_token(score)));
    for utterance in utterances {
        let event = InboundEvent::new("demo-user", utterance.as_str());
        let message = service.handle(&event, SkillScope::AllSurveys);
        println!("\n> {utterance}");
        render_message(&message, json);
    }

    Ok(())
}

fn render_message(message: &MessageDescriptor, json: bool) {
    if json {
        match serde_json::to_string_pretty(&SkillResponse::from(message)) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Skill payload unavailable: {err}"),
        }
        return;
    }

    if !message.title_text.is_empty() {
        println!("{}", message.title_text);
    }
    println!("{}", message.body_text);
    for option in &message.options {
        println!("  [{}] {}", option.token, option.label);
    }
}
