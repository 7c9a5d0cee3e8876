use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{AshramError, AshramResult};

/// Language sent with every request
pub const LANGUAGE: &str = "en";

/// Answer depth sent with every request
pub const DEPTH: &str = "standard";

/// Discriminator selecting the payload and content shapes
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Qna,
    DecisionCompass,
}

/// Identifies the calling application to the endpoint
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub app: String,
    pub version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            app: "gita-ashram".to_string(),
            version: "v1".to_string(),
        }
    }
}

/// Payload of a free-text question
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QnaPayload {
    pub question: String,
}

/// Payload of a decision-compass submission
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompassPayload {
    pub title: String,
    pub situation: String,
    pub life_area: String,
    pub emotion: String,
    pub time_horizon: String,
    pub desired_outcome: String,
    pub constraints: String,
}

/// Flow-specific request payload
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Payload {
    Qna(QnaPayload),
    DecisionCompass(CompassPayload),
}

impl Payload {
    /// The feature tag matching this payload shape
    pub fn feature(&self) -> Feature {
        match self {
            Payload::Qna(_) => Feature::Qna,
            Payload::DecisionCompass(_) => Feature::DecisionCompass,
        }
    }
}

/// Request envelope posted to the chat-gita endpoint
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub feature: Feature,
    pub language: String,
    pub depth: String,
    pub payload: Payload,
    pub client: ClientInfo,
}

impl ChatRequest {
    /// Wraps a payload in the envelope; the feature tag always follows the payload.
    pub fn new(payload: Payload, client: ClientInfo) -> Self {
        Self {
            feature: payload.feature(),
            language: LANGUAGE.to_string(),
            depth: DEPTH.to_string(),
            payload,
            client,
        }
    }

    pub fn qna(question: impl Into<String>, client: ClientInfo) -> Self {
        Self::new(
            Payload::Qna(QnaPayload {
                question: question.into(),
            }),
            client,
        )
    }

    pub fn decision_compass(payload: CompassPayload, client: ClientInfo) -> Self {
        Self::new(Payload::DecisionCompass(payload), client)
    }
}

/// Response envelope returned by the chat-gita endpoint
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub content: Option<Value>,
}

impl ChatResponse {
    /// Decodes the flow-specific content. `Ok(None)` when the response carries none.
    pub fn content_as<T: DeserializeOwned>(&self) -> AshramResult<Option<T>> {
        match &self.content {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| AshramError::ParsingError(format!("Unexpected content shape: {}", e))),
        }
    }
}

/// Content of a Q&A response
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct QnaContent {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl QnaContent {
    /// First non-empty of `answer` and `message`
    pub fn resolved_text(&self) -> Option<&str> {
        non_empty(&self.answer).or_else(|| non_empty(&self.message))
    }
}

/// Content of a decision-compass response
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompassContent {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub input_echo: Option<InputEcho>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gita_lens: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub verses: Vec<VerseEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub action_plan: Vec<String>,
    #[serde(default)]
    pub inner_practice: Option<InnerPractice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reflection_questions: Vec<String>,
}

/// The endpoint's restatement of what the user submitted
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InputEcho {
    #[serde(default)]
    pub situation: Option<String>,
    #[serde(default)]
    pub life_area: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub desired_outcome: Option<String>,
    #[serde(default)]
    pub constraints: Option<String>,
}

/// One supporting verse citation
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerseEntry {
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub why_relevant: Option<String>,
    #[serde(default)]
    pub devanagari: Option<String>,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub en_translation: Option<String>,
    #[serde(default)]
    pub hi_translation: Option<String>,
}

/// A short practice exercise
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InnerPractice {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Treats a missing, `null` or empty string the same way.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
