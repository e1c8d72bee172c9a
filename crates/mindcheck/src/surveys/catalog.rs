use std::collections::BTreeSet;

use super::domain::{Choice, SafetyRule, ScoreBand, SurveyDefinition, SurveyKind};

/// Every survey definition the service can serve, indexed by kind.
#[derive(Debug, Clone)]
pub struct SurveyCatalog {
    definitions: [SurveyDefinition; SurveyKind::COUNT],
}

impl SurveyCatalog {
    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(SurveyKind::ordered().map(standard_definition))
    }

    /// Definitions must be supplied in `SurveyKind::ordered()` order.
    pub fn new(definitions: [SurveyDefinition; SurveyKind::COUNT]) -> Result<Self, CatalogError> {
        for (expected, definition) in SurveyKind::ordered().into_iter().zip(definitions.iter()) {
            if definition.kind != expected {
                return Err(CatalogError::Misplaced {
                    expected,
                    found: definition.kind,
                });
            }
            validate(definition)?;
        }

        Ok(Self { definitions })
    }

    pub fn definition(&self, kind: SurveyKind) -> &SurveyDefinition {
        &self.definitions[kind.index()]
    }

    pub fn definitions(&self) -> impl Iterator<Item = &SurveyDefinition> {
        self.definitions.iter()
    }
}

fn validate(definition: &SurveyDefinition) -> Result<(), CatalogError> {
    let survey = definition.kind;
    if definition.questions.is_empty() {
        return Err(CatalogError::NoQuestions { survey });
    }
    if definition.choices.is_empty() {
        return Err(CatalogError::NoChoices { survey });
    }
    // Answer tokens carry a single digit.
    if let Some(choice) = definition.choices.iter().find(|choice| choice.score > 9) {
        return Err(CatalogError::ScoreNotSingleDigit {
            survey,
            score: choice.score,
        });
    }
    if definition.bands.is_empty() {
        return Err(CatalogError::NoBands { survey });
    }
    if definition
        .bands
        .windows(2)
        .any(|pair| pair[0].upper_bound >= pair[1].upper_bound)
    {
        return Err(CatalogError::UnorderedBands { survey });
    }

    let count = definition.question_count();
    if let Some(&item) = definition
        .reverse_items
        .iter()
        .find(|&&item| item == 0 || item > count)
    {
        return Err(CatalogError::ReverseItemOutOfRange {
            survey,
            item,
            count,
        });
    }
    if let Some(rule) = definition.safety {
        if rule.question_index >= count {
            return Err(CatalogError::SafetyItemOutOfRange {
                survey,
                index: rule.question_index,
                count,
            });
        }
    }

    Ok(())
}

/// Raised while building a catalog; the service refuses to start on any of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("{survey} defines no questions")]
    NoQuestions { survey: SurveyKind },
    #[error("{survey} defines no answer choices")]
    NoChoices { survey: SurveyKind },
    #[error("{survey} choice score {score} does not fit a single-digit answer token")]
    ScoreNotSingleDigit { survey: SurveyKind, score: u8 },
    #[error("{survey} defines no score bands")]
    NoBands { survey: SurveyKind },
    #[error("{survey} score bands must have strictly ascending upper bounds")]
    UnorderedBands { survey: SurveyKind },
    #[error("{survey} reverse item {item} is outside 1..={count}")]
    ReverseItemOutOfRange {
        survey: SurveyKind,
        item: usize,
        count: usize,
    },
    #[error("{survey} safety item index {index} is outside 0..{count}")]
    SafetyItemOutOfRange {
        survey: SurveyKind,
        index: usize,
        count: usize,
    },
    #[error("expected the {expected} definition but found {found}")]
    Misplaced {
        expected: SurveyKind,
        found: SurveyKind,
    },
}

pub(crate) const CRISIS_LINES: &str = "Suicide prevention hotline 1393, mental health crisis line 1577-0199, emergency 112/119";

fn standard_definition(kind: SurveyKind) -> SurveyDefinition {
    match kind {
        SurveyKind::Phq9 => phq9(),
        SurveyKind::Gad7 => gad7(),
        SurveyKind::Cesd => cesd(),
        SurveyKind::Cbi => cbi(),
    }
}

fn frequency_choices() -> Vec<Choice> {
    vec![
        Choice {
            label: "Not at all (0)",
            score: 0,
        },
        Choice {
            label: "Several days (1)",
            score: 1,
        },
        Choice {
            label: "More than half the days (2)",
            score: 2,
        },
        Choice {
            label: "Nearly every day (3)",
            score: 3,
        },
    ]
}

fn phq9() -> SurveyDefinition {
    SurveyDefinition {
        kind: SurveyKind::Phq9,
        title: "PHQ-9",
        questions: vec![
            "1. Feeling down, depressed, or hopeless.",
            "2. Little interest or pleasure in doing things.",
            "3. Trouble falling or staying asleep, or sleeping too much.",
            "4. Poor appetite or overeating.",
            "5. Moving or speaking so slowly that other people could have noticed, or being so fidgety or restless that you could not sit still.",
            "6. Feeling tired or having little energy.",
            "7. Feeling bad about yourself, that you are a failure, or that you have let yourself or your family down.",
            "8. Trouble concentrating on things, such as reading the newspaper or watching television.",
            "9. Thoughts that you would be better off dead, or of hurting yourself.",
        ],
        choices: frequency_choices(),
        reverse_items: BTreeSet::new(),
        bands: vec![
            ScoreBand {
                upper_bound: 4,
                label: "Minimal (0-4)",
            },
            ScoreBand {
                upper_bound: 9,
                label: "Mild (5-9)",
            },
            ScoreBand {
                upper_bound: 14,
                label: "Moderate (10-14)",
            },
            ScoreBand {
                upper_bound: 19,
                label: "Moderately severe (15-19)",
            },
            ScoreBand {
                upper_bound: 27,
                label: "Severe (20-27)",
            },
        ],
        safety: Some(SafetyRule {
            question_index: 8,
            minimum_score: 1,
            notice: "[Safety notice]\nIf you have had any thoughts of hurting yourself, please do not stay alone with them.\nHelp is available now:",
        }),
        result_heading: "PHQ-9 complete",
        disclaimer: "This result is a self-check, not a diagnosis.\nIf these difficulties have lasted for the past two weeks, please consider talking to a counselor or professional.",
        follow_ups: vec![SurveyKind::Gad7],
    }
}

fn gad7() -> SurveyDefinition {
    SurveyDefinition {
        kind: SurveyKind::Gad7,
        title: "GAD-7",
        questions: vec![
            "1. Feeling nervous, anxious, or on edge.",
            "2. Not being able to stop or control worrying.",
            "3. Worrying too much about different things.",
            "4. Trouble relaxing.",
            "5. Being so restless that it is hard to sit still.",
            "6. Becoming easily annoyed or irritable.",
            "7. Feeling afraid, as if something awful might happen.",
        ],
        choices: frequency_choices(),
        reverse_items: BTreeSet::new(),
        bands: vec![
            ScoreBand {
                upper_bound: 4,
                label: "Minimal (0-4)",
            },
            ScoreBand {
                upper_bound: 9,
                label: "Mild (5-9)",
            },
            ScoreBand {
                upper_bound: 14,
                label: "Moderate (10-14)",
            },
            ScoreBand {
                upper_bound: 21,
                label: "Severe (15-21)",
            },
        ],
        safety: None,
        result_heading: "GAD-7 complete",
        disclaimer: "This result screens for anxiety symptoms and is not a diagnosis.\nIf worry or tension has lasted for the past two weeks, please consider talking to a counselor or professional.",
        follow_ups: vec![SurveyKind::Phq9],
    }
}

fn cesd() -> SurveyDefinition {
    SurveyDefinition {
        kind: SurveyKind::Cesd,
        title: "CES-D (past week)",
        questions: vec![
            "01. I was bothered by things that usually don't bother me.",
            "02. I did not feel like eating; my appetite was poor.",
            "03. I felt that I could not shake off the blues even with help from my family or friends.",
            "04. I had trouble keeping my mind on what I was doing.",
            "05. I was getting along fairly well.",
            "06. I felt depressed.",
            "07. I felt that everything I did was an effort.",
            "08. I felt hopeless about the future.",
            "09. I thought my life had been a failure.",
            "10. I felt that I was at least as capable as other people.",
            "11. My sleep was restless.",
            "12. I felt fearful.",
            "13. I talked less than usual.",
            "14. I felt lonely, as if I were alone in the world.",
            "15. I lived without major complaints.",
            "16. People seemed cold toward me.",
            "17. I had crying spells.",
            "18. I felt sad.",
            "19. I felt that people disliked me.",
            "20. I could not get going.",
        ],
        choices: vec![
            Choice {
                label: "Rarely (less than 1 day) (0)",
                score: 0,
            },
            Choice {
                label: "Sometimes (1-2 days) (1)",
                score: 1,
            },
            Choice {
                label: "Often (3-4 days) (2)",
                score: 2,
            },
            Choice {
                label: "Most of the time (5-7 days) (3)",
                score: 3,
            },
        ],
        reverse_items: BTreeSet::from([5, 10, 15]),
        bands: vec![
            ScoreBand {
                upper_bound: 15,
                label: "Lower range (reference)",
            },
            ScoreBand {
                upper_bound: 60,
                label: "Relatively elevated (reference)",
            },
        ],
        safety: None,
        result_heading: "CES-D complete",
        disclaimer: "This result checks depressive symptoms over the past week and is not a diagnosis.\nIf the discomfort continues, please consider talking to a counselor or professional.",
        follow_ups: vec![SurveyKind::Phq9, SurveyKind::Gad7],
    }
}

fn cbi() -> SurveyDefinition {
    SurveyDefinition {
        kind: SurveyKind::Cbi,
        title: "Burnout check (CBI based)",
        questions: vec![
            "1. These days I feel very worn out overall.",
            "2. At the end of the day I have hardly any energy left.",
            "3. Getting up and starting the day feels like a burden.",
            "4. Even after enough rest, my fatigue does not go away easily.",
            "5. I often feel physically and mentally exhausted.",
            "6. I feel worn out because of my work (including study or practicum).",
            "7. My energy drains quickly while I am working.",
            "8. When I think about work, fatigue is the first thing that comes to mind.",
            "9. I cannot unwind easily even after work is over.",
            "10. My current workload feels excessive for me.",
            "11. Dealing with people feels much harder than it used to.",
            "12. Other people's demands or emotions wear me out or weigh on me.",
            "13. I feel emotionally drained after interacting with people.",
            "14. I would rather avoid situations where I have to deal with people.",
        ],
        choices: vec![
            Choice {
                label: "Never (0)",
                score: 0,
            },
            Choice {
                label: "Sometimes (1)",
                score: 1,
            },
            Choice {
                label: "Often (2)",
                score: 2,
            },
            Choice {
                label: "Mostly (3)",
                score: 3,
            },
            Choice {
                label: "Almost always (4)",
                score: 4,
            },
        ],
        reverse_items: BTreeSet::new(),
        bands: vec![
            ScoreBand {
                upper_bound: 18,
                label: "Low burnout risk",
            },
            ScoreBand {
                upper_bound: 35,
                label: "Moderate burnout",
            },
            ScoreBand {
                upper_bound: 56,
                label: "High burnout risk",
            },
        ],
        safety: None,
        result_heading: "Burnout check complete",
        disclaimer: "This self-check is based on the Copenhagen Burnout Inventory (CBI).\nIt is not a diagnosis; if the discomfort continues, counseling is recommended.",
        follow_ups: Vec::new(),
    }
}
