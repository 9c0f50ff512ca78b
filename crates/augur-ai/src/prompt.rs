//! Rationale inputs and the fixed analyst prompt.

use serde::{Deserialize, Serialize};

use crate::RationaleError;

// ── Prompt templates ──

pub const SYSTEM_PROMPT: &str = "You are a financial analyst. Provide a brief, clear explanation of the model's IFRS13 classification based on the following inputs.";

fn build_user_prompt(ir_summary: &str, vol_summary: &str, model_pred: &str) -> String {
    format!(
        "IR Delta Summary:\n\
         {ir_summary}\n\
         \n\
         Vol Summary:\n\
         {vol_summary}\n\
         \n\
         Model Prediction: {model_pred}\n\
         Provide a short rationale (2-3 lines) confirming or questioning the classification. Include confidence level."
    )
}

// ── Types ──

/// One chat message in the OpenAI wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The three upstream values a rationale is built from.
///
/// Each is optional so that callers can collect them from several places
/// (flags, an inputs file) and let [`messages`](Self::messages) report
/// whatever is still missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RationaleInputs {
    /// Interest-rate delta risk summary.
    #[serde(default)]
    pub ir_summary: Option<String>,
    /// Volatility risk summary.
    #[serde(default)]
    pub vol_summary: Option<String>,
    /// Model prediction label, e.g. `Level 2`.
    #[serde(default)]
    pub model_pred: Option<String>,
}

impl RationaleInputs {
    pub fn new(
        ir_summary: impl Into<String>,
        vol_summary: impl Into<String>,
        model_pred: impl Into<String>,
    ) -> Self {
        Self {
            ir_summary: Some(ir_summary.into()),
            vol_summary: Some(vol_summary.into()),
            model_pred: Some(model_pred.into()),
        }
    }

    /// Parse `{"ir_summary": ..., "vol_summary": ..., "model_pred": ...}`.
    pub fn from_json(json: &str) -> Result<Self, RationaleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Fill any unset field from `fallback`.
    pub fn or(self, fallback: RationaleInputs) -> Self {
        Self {
            ir_summary: self.ir_summary.or(fallback.ir_summary),
            vol_summary: self.vol_summary.or(fallback.vol_summary),
            model_pred: self.model_pred.or(fallback.model_pred),
        }
    }

    /// Keys that are absent or blank.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("ir_summary", &self.ir_summary),
            ("vol_summary", &self.vol_summary),
            ("model_pred", &self.model_pred),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(key, _)| key)
        .collect()
    }

    /// System and user messages for the chat request.
    ///
    /// Fails with [`RationaleError::MissingInputs`] if any input is missing.
    pub fn messages(&self) -> Result<Vec<ChatMessage>, RationaleError> {
        match (&self.ir_summary, &self.vol_summary, &self.model_pred) {
            (Some(ir), Some(vol), Some(pred)) if self.missing().is_empty() => Ok(vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_user_prompt(ir, vol, pred)),
            ]),
            _ => Err(RationaleError::MissingInputs(self.missing())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> RationaleInputs {
        RationaleInputs::new(
            "DV01 +1.2k across 2y-10y buckets",
            "Implied vol surface sourced from broker quotes",
            "Level 2",
        )
    }

    #[test]
    fn user_prompt_layout() {
        let messages = complete().messages().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(SYSTEM_PROMPT));
        assert_eq!(messages[1].role, "user");
        assert_eq!(
            messages[1].content,
            "IR Delta Summary:\nDV01 +1.2k across 2y-10y buckets\n\n\
             Vol Summary:\nImplied vol surface sourced from broker quotes\n\n\
             Model Prediction: Level 2\n\
             Provide a short rationale (2-3 lines) confirming or questioning the classification. Include confidence level."
        );
    }

    #[test]
    fn missing_inputs_are_listed() {
        let inputs = RationaleInputs {
            ir_summary: Some("ok".into()),
            vol_summary: None,
            model_pred: Some("   ".into()),
        };
        assert_eq!(inputs.missing(), vec!["vol_summary", "model_pred"]);
        match inputs.messages() {
            Err(RationaleError::MissingInputs(keys)) => {
                assert_eq!(keys, vec!["vol_summary", "model_pred"]);
            }
            other => panic!("expected MissingInputs, got {other:?}"),
        }
    }

    #[test]
    fn default_is_all_missing() {
        assert_eq!(
            RationaleInputs::default().missing(),
            vec!["ir_summary", "vol_summary", "model_pred"]
        );
    }

    #[test]
    fn flags_override_file() {
        let flags = RationaleInputs {
            model_pred: Some("Level 3".into()),
            ..Default::default()
        };
        let merged = flags.or(complete());
        assert_eq!(merged.model_pred.as_deref(), Some("Level 3"));
        assert_eq!(
            merged.ir_summary.as_deref(),
            Some("DV01 +1.2k across 2y-10y buckets")
        );
    }

    #[test]
    fn inputs_from_json() {
        let inputs = RationaleInputs::from_json(
            r#"{"ir_summary": "flat", "model_pred": "Level 1"}"#,
        )
        .unwrap();
        assert_eq!(inputs.ir_summary.as_deref(), Some("flat"));
        assert!(inputs.vol_summary.is_none());
        assert_eq!(inputs.missing(), vec!["vol_summary"]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = RationaleInputs::from_json("{not json").unwrap_err();
        assert!(matches!(err, RationaleError::Json(_)));
    }
}
