use super::common::*;

use crate::surveys::{
    InboundEvent, MessageDescriptor, SkillScope, SurveyKind, SurveyPhase, SurveyService, UserId,
};

fn answer_all(service: &SurveyService, user: &str, tokens: &[&str]) -> MessageDescriptor {
    let mut last = service.handle(&event(user, "PHQ9_START"), SkillScope::AllSurveys);
    for token in tokens {
        last = service.handle(&event(user, token), SkillScope::AllSurveys);
    }
    last
}

fn phq9_answers(raw: &[u8]) -> Vec<String> {
    raw.iter().map(|score| format!("PHQ9_A{score}")).collect()
}

#[test]
fn start_shows_the_first_question() {
    let (service, _, _) = build_service();
    let message = service.handle(&event("u-1", "PHQ9_START"), SkillScope::AllSurveys);

    assert_eq!(message.title_text, "PHQ-9 (1/9)");
    assert!(message.body_text.starts_with("1."));
    assert_eq!(message.options.len(), 5);
    assert_eq!(message.options[0].token, "PHQ9_A0");
    assert_eq!(message.options[4].token, "HOME");
}

#[test]
fn starting_twice_yields_the_same_first_question() {
    let (service, _, _) = build_service();
    let first = service.handle(&event("u-1", "GAD7_START"), SkillScope::AllSurveys);
    let second = service.handle(&event("u-1", "GAD-7"), SkillScope::AllSurveys);
    assert_eq!(first, second);
}

#[test]
fn restart_discards_in_flight_answers() {
    let (service, store, _) = build_service();
    let user = UserId("u-1".to_string());

    service.handle(&event("u-1", "CESD_START"), SkillScope::AllSurveys);
    service.handle(&event("u-1", "CESD_A2"), SkillScope::AllSurveys);
    service.handle(&event("u-1", "CESD_A1"), SkillScope::AllSurveys);
    let session = store.get(&user).expect("session exists");
    assert_eq!(session.progression(SurveyKind::Cesd).answers(), &[2, 1]);

    let message = service.handle(&event("u-1", "CESD"), SkillScope::AllSurveys);
    assert_eq!(message.title_text, "CES-D (past week) (1/20)");
    let session = store.get(&user).expect("session exists");
    assert_eq!(session.progression(SurveyKind::Cesd).question_index(), 0);
    assert!(session.progression(SurveyKind::Cesd).answers().is_empty());
}

#[test]
fn phq9_total_and_band_without_safety_notice() {
    let (service, _, _) = build_service();
    let answers = phq9_answers(&[0, 1, 2, 3, 0, 1, 2, 3, 0]);
    let tokens: Vec<&str> = answers.iter().map(String::as_str).collect();

    let result = answer_all(&service, "u-1", &tokens);

    assert_eq!(result.title_text, "PHQ-9 complete");
    assert!(result.body_text.contains("Total: 12 points"));
    assert!(result.body_text.contains("Moderate (10-14)"));
    assert!(!result.body_text.contains("[Safety notice]"));
    let tokens: Vec<&str> = result.options.iter().map(|o| o.token.as_str()).collect();
    assert_eq!(tokens, vec!["HELP_LINK", "PHQ9_START", "GAD7_START", "HOME"]);
}

#[test]
fn phq9_ninth_item_triggers_safety_notice() {
    let (service, _, _) = build_service();
    let answers = phq9_answers(&[0, 1, 2, 3, 0, 1, 2, 3, 2]);
    let tokens: Vec<&str> = answers.iter().map(String::as_str).collect();

    let result = answer_all(&service, "u-1", &tokens);

    assert!(result.body_text.contains("Total: 14 points"));
    assert!(result.body_text.contains("[Safety notice]"));
    assert!(result.body_text.contains("1393"));
}

#[test]
fn cesd_reverse_item_is_stored_mirrored() {
    let (service, store, _) = build_service();
    service.handle(&event("u-1", "CESD_START"), SkillScope::AllSurveys);
    for token in ["CESD_A1", "CESD_A1", "CESD_A1", "CESD_A1", "CESD_A0"] {
        service.handle(&event("u-1", token), SkillScope::AllSurveys);
    }

    let session = store.get(&UserId("u-1".to_string())).expect("session");
    assert_eq!(session.progression(SurveyKind::Cesd).answers()[4], 3);
}

#[test]
fn cesd_total_includes_reverse_scored_items() {
    let (service, _, _) = build_service();
    service.handle(&event("u-1", "CESD_START"), SkillScope::AllSurveys);
    let mut last = None;
    for _ in 0..20 {
        last = Some(service.handle(&event("u-1", "CESD_A0"), SkillScope::AllSurveys));
    }

    let result = last.expect("twenty answers sent");
    assert_eq!(result.title_text, "CES-D complete");
    // Items 5, 10 and 15 contribute 3 each.
    assert!(result.body_text.contains("Total: 9 points (0-60)"));
    assert!(result.body_text.contains("Lower range"));
}

#[test]
fn unrecognised_utterance_falls_back_without_touching_progress() {
    let (service, store, _) = build_service();
    service.handle(&event("u-1", "GAD7_START"), SkillScope::AllSurveys);
    service.handle(&event("u-1", "GAD7_A2"), SkillScope::AllSurveys);
    let before = store.get(&UserId("u-1".to_string())).expect("session");

    let message = service.handle(&event("u-1", "xyz"), SkillScope::AllSurveys);

    assert!(message.body_text.contains("did not understand"));
    let after = store.get(&UserId("u-1".to_string())).expect("session");
    assert_eq!(
        before.progression(SurveyKind::Gad7),
        after.progression(SurveyKind::Gad7)
    );
}

#[test]
fn out_of_range_digit_is_treated_as_unrecognised() {
    let (service, store, _) = build_service();
    service.handle(&event("u-1", "PHQ9_START"), SkillScope::AllSurveys);

    let message = service.handle(&event("u-1", "PHQ9_A7"), SkillScope::AllSurveys);

    assert!(message.body_text.contains("did not understand"));
    let session = store.get(&UserId("u-1".to_string())).expect("session");
    assert_eq!(session.progression(SurveyKind::Phq9).question_index(), 0);
}

#[test]
fn answering_a_completed_survey_falls_back() {
    let (service, store, _) = build_service();
    service.handle(&event("u-1", "GAD7_START"), SkillScope::AllSurveys);
    for _ in 0..7 {
        service.handle(&event("u-1", "GAD7_A1"), SkillScope::AllSurveys);
    }

    let message = service.handle(&event("u-1", "GAD7_A3"), SkillScope::AllSurveys);

    assert!(message.body_text.contains("did not understand"));
    let session = store.get(&UserId("u-1".to_string())).expect("session");
    let record = session.progression(SurveyKind::Gad7);
    assert_eq!(record.answers(), &[1; 7]);
    let catalog = service.catalog();
    assert_eq!(
        record.phase(catalog.definition(SurveyKind::Gad7)),
        SurveyPhase::Completed
    );
}

#[test]
fn answering_before_starting_falls_back() {
    let (service, store, _) = build_service();

    let message = service.handle(&event("u-1", "CBI_A2"), SkillScope::AllSurveys);

    assert!(message.body_text.contains("did not understand"));
    let session = store.get(&UserId("u-1".to_string())).expect("session created");
    assert!(session.progression(SurveyKind::Cbi).answers().is_empty());
}

#[test]
fn home_mid_survey_keeps_progress_and_start_still_works() {
    let (service, store, _) = build_service();
    let user = UserId("u-1".to_string());
    service.handle(&event("u-1", "PHQ9_START"), SkillScope::AllSurveys);
    service.handle(&event("u-1", "PHQ9_A1"), SkillScope::AllSurveys);
    service.handle(&event("u-1", "PHQ9_A2"), SkillScope::AllSurveys);

    let home = service.handle(&event("u-1", "HOME"), SkillScope::AllSurveys);
    assert_eq!(home.body_text, "Please choose a survey.");
    assert_eq!(
        store
            .get(&user)
            .expect("session")
            .progression(SurveyKind::Phq9)
            .answers(),
        &[1, 2]
    );

    let restart = service.handle(&event("u-1", "PHQ9_START"), SkillScope::AllSurveys);
    assert_eq!(restart.title_text, "PHQ-9 (1/9)");
    let next = service.handle(&event("u-1", "PHQ9_A0"), SkillScope::AllSurveys);
    assert_eq!(next.title_text, "PHQ-9 (2/9)");
}

#[test]
fn help_is_independent_of_survey_state() {
    let (service, _, _) = build_service();
    let idle = service.handle(&event("u-1", "HELP_LINK"), SkillScope::AllSurveys);
    service.handle(&event("u-1", "CBI_START"), SkillScope::AllSurveys);
    let busy = service.handle(&event("u-1", "HELP_LINK"), SkillScope::Survey(SurveyKind::Cbi));
    assert_eq!(idle, busy);
}

#[test]
fn surveys_progress_independently_for_one_user() {
    let (service, store, _) = build_service();
    service.handle(&event("u-1", "PHQ9_START"), SkillScope::AllSurveys);
    service.handle(&event("u-1", "PHQ9_A3"), SkillScope::AllSurveys);
    service.handle(&event("u-1", "GAD7_START"), SkillScope::AllSurveys);
    service.handle(&event("u-1", "GAD7_A1"), SkillScope::AllSurveys);
    let next = service.handle(&event("u-1", "PHQ9_A2"), SkillScope::AllSurveys);

    assert_eq!(next.title_text, "PHQ-9 (3/9)");
    let session = store.get(&UserId("u-1".to_string())).expect("session");
    assert_eq!(session.progression(SurveyKind::Phq9).answers(), &[3, 2]);
    assert_eq!(session.progression(SurveyKind::Gad7).answers(), &[1]);
}

#[test]
fn users_do_not_share_progress() {
    let (service, _, _) = build_service();
    service.handle(&event("alice", "PHQ9_START"), SkillScope::AllSurveys);
    service.handle(&event("alice", "PHQ9_A1"), SkillScope::AllSurveys);

    let bob = service.handle(&event("bob", "PHQ9_A1"), SkillScope::AllSurveys);
    assert!(bob.body_text.contains("did not understand"));
}

#[test]
fn unidentified_callers_share_the_anonymous_session() {
    let (service, store, _) = build_service();
    let nobody = InboundEvent {
        user_identifier_candidates: vec![None, Some(String::new())],
        utterance: "GAD7_START".to_string(),
    };
    service.handle(&nobody, SkillScope::AllSurveys);

    let someone_else = InboundEvent {
        user_identifier_candidates: Vec::new(),
        utterance: "GAD7_A2".to_string(),
    };
    let message = service.handle(&someone_else, SkillScope::AllSurveys);

    assert_eq!(message.title_text, "GAD-7 (2/7)");
    assert_eq!(store.len(), 1);
    assert!(store.contains(&UserId::anonymous()));
}

#[test]
fn scoped_endpoints_ignore_other_surveys() {
    let (service, store, _) = build_service();
    let scope = SkillScope::Survey(SurveyKind::Phq9);

    let message = service.handle(&event("u-1", "GAD7_START"), scope);
    assert!(message.body_text.contains("did not understand"));
    let session = store.get(&UserId("u-1".to_string())).expect("session");
    assert!(session.progression(SurveyKind::Gad7).answers().is_empty());

    let message = service.handle(&event("u-1", "PHQ9_START"), scope);
    assert_eq!(message.title_text, "PHQ-9 (1/9)");
}

#[test]
fn every_request_refreshes_activity() {
    let (service, store, clock) = build_service();
    let user = UserId("u-1".to_string());
    service.handle(&event("u-1", "xyz"), SkillScope::AllSurveys);
    let created = store.get(&user).expect("session").last_activity_at();

    clock.advance(chrono::Duration::minutes(5));
    service.handle(&event("u-1", "still nonsense"), SkillScope::AllSurveys);
    let refreshed = store.get(&user).expect("session").last_activity_at();

    assert_eq!(refreshed - created, chrono::Duration::minutes(5));
}
