//! Kakao i Open Builder skill payloads.
//!
//! Only the fields the survey flow reads are modelled; everything else in
//! the request is ignored, and every modelled field is optional.

use serde::{Deserialize, Serialize};

use super::assembler::MessageDescriptor;
use super::service::InboundEvent;

const SKILL_VERSION: &str = "2.0";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequest {
    #[serde(default, rename = "userRequest")]
    pub user_request: Option<UserRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub utterance: Option<String>,
    #[serde(default)]
    pub user: Option<SkillUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: Option<UserProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProperties {
    #[serde(default)]
    pub plusfriend_user_key: Option<String>,
    #[serde(default)]
    pub app_user_id: Option<String>,
    #[serde(default)]
    pub bot_user_key: Option<String>,
}

impl From<SkillRequest> for InboundEvent {
    fn from(request: SkillRequest) -> Self {
        let UserRequest { utterance, user } = request.user_request.unwrap_or_default();
        let SkillUser { id, properties } = user.unwrap_or_default();
        let properties = properties.unwrap_or_default();

        InboundEvent {
            user_identifier_candidates: vec![
                id,
                properties.plusfriend_user_key,
                properties.app_user_id,
                properties.bot_user_key,
            ],
            utterance: utterance.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillResponse {
    pub version: String,
    pub template: SkillTemplate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTemplate {
    pub outputs: Vec<SkillOutput>,
    pub quick_replies: Vec<QuickReply>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillOutput {
    pub simple_text: SimpleText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleText {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReply {
    pub label: String,
    pub action: String,
    pub message_text: String,
}

impl From<&MessageDescriptor> for SkillResponse {
    fn from(message: &MessageDescriptor) -> Self {
        let text = if message.title_text.is_empty() {
            message.body_text.clone()
        } else {
            format!("{}\n{}", message.title_text, message.body_text)
        };

        SkillResponse {
            version: SKILL_VERSION.to_string(),
            template: SkillTemplate {
                outputs: vec![SkillOutput {
                    simple_text: SimpleText { text },
                }],
                quick_replies: message
                    .options
                    .iter()
                    .map(|option| QuickReply {
                        label: option.label.clone(),
                        action: "message".to_string(),
                        message_text: option.token.clone(),
                    })
                    .collect(),
            },
        }
    }
}

impl From<MessageDescriptor> for SkillResponse {
    fn from(message: MessageDescriptor) -> Self {
        Self::from(&message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surveys::assembler::ReplyOption;
    use serde_json::json;

    #[test]
    fn reads_nested_identifiers_in_priority_order() {
        let request: SkillRequest = serde_json::from_value(json!({
            "bot": { "id": "ignored" },
            "userRequest": {
                "utterance": "PHQ9_START",
                "user": {
                    "id": "",
                    "type": "botUserKey",
                    "properties": {
                        "plusfriendUserKey": "pf-1",
                        "botUserKey": "bot-1"
                    }
                }
            }
        }))
        .expect("payload parses");

        let event = InboundEvent::from(request);
        assert_eq!(event.utterance, "PHQ9_START");
        assert_eq!(event.user_id().0, "pf-1");
    }

    #[test]
    fn empty_payload_becomes_anonymous_event() {
        let request: SkillRequest = serde_json::from_value(json!({})).expect("payload parses");
        let event = InboundEvent::from(request);
        assert!(event.utterance.is_empty());
        assert!(event.user_id().is_anonymous());
    }

    #[test]
    fn response_serializes_in_skill_shape() {
        let message = MessageDescriptor {
            title_text: "PHQ-9 (1/9)".to_string(),
            body_text: "1. Feeling down".to_string(),
            options: vec![ReplyOption::new("Back", "HOME")],
        };

        let value = serde_json::to_value(SkillResponse::from(&message)).expect("serializes");
        assert_eq!(
            value,
            json!({
                "version": "2.0",
                "template": {
                    "outputs": [ { "simpleText": { "text": "PHQ-9 (1/9)\n1. Feeling down" } } ],
                    "quickReplies": [
                        { "label": "Back", "action": "message", "messageText": "HOME" }
                    ]
                }
            })
        );
    }

    #[test]
    fn untitled_messages_render_the_body_only() {
        let message = MessageDescriptor {
            title_text: String::new(),
            body_text: "Please choose a survey.".to_string(),
            options: Vec::new(),
        };
        let response = SkillResponse::from(message);
        assert_eq!(
            response.template.outputs[0].simple_text.text,
            "Please choose a survey."
        );
        assert!(response.template.quick_replies.is_empty());
    }
}
