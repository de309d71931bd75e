use serde::{ Deserialize, Serialize };

use crate::models::chat::ChatMessage;
use crate::transcript::PanelEntry;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubmitRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SaveRequest {
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PanelRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PanelResponse {
    pub entries: Vec<PanelEntry>,
    pub empty: bool,
}
