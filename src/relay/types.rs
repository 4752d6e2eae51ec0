//! Chat request types, caller-side and wire-side.

use serde::{Deserialize, Serialize};

/// One chat request as issued by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub pattern: String,
    pub vendor: String,
    pub model: String,
    pub input: String,
}

impl ChatRequest {
    pub fn new(
        pattern: impl Into<String>,
        vendor: impl Into<String>,
        model: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            vendor: vendor.into(),
            model: model.into(),
            input: input.into(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatWireRequest {
    pub prompts: Vec<PromptRequest>,
}

/// A single prompt inside [`ChatWireRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    pub user_input: String,
    pub vendor: String,
    pub model: String,
    pub pattern_name: String,
}

impl From<&ChatRequest> for ChatWireRequest {
    fn from(request: &ChatRequest) -> Self {
        Self {
            prompts: vec![PromptRequest {
                user_input: request.input.clone(),
                vendor: request.vendor.clone(),
                model: request.model.clone(),
                pattern_name: request.pattern.clone(),
            }],
        }
    }
}
