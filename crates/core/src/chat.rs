//! AI assistant payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

/// One line of the chatbot transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub message: String,
}

impl ChatTurn {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            message: message.into(),
        }
    }

    pub fn bot(message: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            message: message.into(),
        }
    }
}

/// Body of `POST /ai/chatbot`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatbotRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<ChatTurn>,
}

/// The assistant's answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatbotReply {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub disclaimer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatbotResponse {
    #[serde(default)]
    pub response: Option<ChatbotReply>,
}

/// Body of `POST /ai/symptom-checker`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomCheckRequest {
    pub symptoms: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<PatientContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatientContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Body of `PUT /ai/verify-diagnosis/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosisVerification {
    pub verified: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// Free-form analysis results from the AI services
pub type AiResult = Value;
