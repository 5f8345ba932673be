//! # Envelope Records
//!
//! Statically-shaped, immutable records for the two envelopes exchanged at
//! the protocol boundary. Instances are produced by the materializer in
//! `askenv-schema` from an already-validated document; nothing in this
//! module validates.
//!
//! Field names follow the wire keys exactly (camelCase, with `System`
//! capitalized). Serializing a record reproduces the fields of the
//! document it was built from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identity::{ApplicationId, RequestId, SessionId, UserId};
use crate::temporal::Timestamp;

/// Free-form key/value payload (session attributes, intent slots, messages).
pub type Attributes = Map<String, Value>;

/// Inbound envelope: what the platform sends to the skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Protocol version.
    pub version: f64,
    /// Session state. Always present after validation, possibly repaired.
    pub session: Session,
    /// The request itself.
    pub request: Request,
    /// Device context.
    pub context: Context,
}

impl RequestEnvelope {
    /// The application the session belongs to.
    pub fn application_id(&self) -> &ApplicationId {
        &self.session.application.application_id
    }

    /// The request type discriminator (e.g. `IntentRequest`).
    pub fn request_type(&self) -> &str {
        &self.request.request_type
    }

    /// Name of the invoked intent, if any.
    pub fn intent_name(&self) -> Option<&str> {
        self.request.intent.as_ref().map(|i| i.name.as_str())
    }
}

/// Session sub-object.
///
/// A session synthesized for an out-of-session request carries only the
/// application, so every other field is optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    pub application: Application,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<bool>,
}

impl Session {
    /// True when this session was synthesized rather than sent by the platform.
    pub fn is_synthesized(&self) -> bool {
        self.session_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: ApplicationId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub request_type: String,
    pub request_id: RequestId,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Attributes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Attributes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "System")]
    pub system: SystemContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemContext {
    pub api_access_token: String,
    pub application: Application,
}

/// Outbound envelope: what the skill returns to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<Attributes>,
    pub response: Response,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: SpeechType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssml: Option<String>,
}

/// How `OutputSpeech` content is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeechType {
    PlainText,
    #[serde(rename = "SSML")]
    Ssml,
}

impl SpeechType {
    /// Wire values, in declaration order.
    pub const WIRE_VALUES: &'static [&'static str] = &["PlainText", "SSML"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "type", default)]
    pub card_type: CardType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Kind of card rendered in the companion app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    #[default]
    Simple,
    LinkAccount,
}

impl CardType {
    /// Wire values, in declaration order.
    pub const WIRE_VALUES: &'static [&'static str] = &["Simple", "LinkAccount"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
}
