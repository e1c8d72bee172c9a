use super::catalog::SurveyCatalog;
use super::domain::SurveyKind;

pub const HELP_TOKEN: &str = "HELP_LINK";
pub const HOME_TOKEN: &str = "HOME";

/// Parsed form of an utterance. Parsing happens once per request so the
/// state machine never sees raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start(SurveyKind),
    Answer { survey: SurveyKind, raw_score: u8 },
    Help,
    Home,
    Unknown,
}

impl Command {
    /// Matching is exact; answer digits outside the survey's choices parse
    /// as `Unknown`.
    pub fn parse(utterance: &str, catalog: &SurveyCatalog) -> Self {
        match utterance {
            HELP_TOKEN => return Self::Help,
            HOME_TOKEN => return Self::Home,
            _ => {}
        }

        for survey in SurveyKind::ordered() {
            if utterance == survey.start_token() || survey.aliases().contains(&utterance) {
                return Self::Start(survey);
            }

            if let Some(raw_score) = parse_answer(utterance, survey) {
                if catalog.definition(survey).accepts_score(raw_score) {
                    return Self::Answer { survey, raw_score };
                }
                return Self::Unknown;
            }
        }

        Self::Unknown
    }

    pub fn survey(&self) -> Option<SurveyKind> {
        match self {
            Self::Start(survey) | Self::Answer { survey, .. } => Some(*survey),
            Self::Help | Self::Home | Self::Unknown => None,
        }
    }
}

fn parse_answer(utterance: &str, survey: SurveyKind) -> Option<u8> {
    let digits = utterance
        .strip_prefix(survey.code())?
        .strip_prefix("_A")?;

    match digits.as_bytes() {
        [digit] if digit.is_ascii_digit() => Some(digit - b'0'),
        _ => None,
    }
}
