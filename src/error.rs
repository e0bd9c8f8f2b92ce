//! Unified error types for the withdrawal signer
//!
//! Every failure inside a request ends up here so that exactly one
//! status word is reported back to the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all withdrawal operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawError {
    pub code: StatusWord,
    pub message: String,
    pub details: Option<String>,
}

impl WithdrawError {
    pub fn new(code: StatusWord, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn wrong_data_length(msg: impl Into<String>) -> Self {
        Self::new(StatusWord::WrongDataLength, msg)
    }

    pub fn incorrect_data(msg: impl Into<String>) -> Self {
        Self::new(StatusWord::IncorrectData, msg)
    }

    pub fn denied(msg: impl Into<String>) -> Self {
        Self::new(StatusWord::Denied, msg)
    }

    pub fn bad_state(msg: impl Into<String>) -> Self {
        Self::new(StatusWord::BadState, msg)
    }
}

impl fmt::Display for WithdrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for WithdrawError {}

/// Outcome codes reported to the host.
///
/// The numeric values are the status words appended to every reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusWord {
    Ok,
    WrongDataLength,
    IncorrectData,
    Denied,
    /// Internal invariant violation. Never caused by host input.
    BadState,
}

impl StatusWord {
    pub const fn code(self) -> u16 {
        match self {
            StatusWord::Ok => 0x9000,
            StatusWord::WrongDataLength => 0x6A87,
            StatusWord::IncorrectData => 0x6A80,
            StatusWord::Denied => 0x6985,
            StatusWord::BadState => 0xB007,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0x9000 => Some(StatusWord::Ok),
            0x6A87 => Some(StatusWord::WrongDataLength),
            0x6A80 => Some(StatusWord::IncorrectData),
            0x6985 => Some(StatusWord::Denied),
            0xB007 => Some(StatusWord::BadState),
            _ => None,
        }
    }

    pub fn is_ok(self) -> bool {
        self == StatusWord::Ok
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (0x{:04X})", self, self.code())
    }
}

/// Result type alias for withdrawal operations
pub type WithdrawResult<T> = Result<T, WithdrawError>;

// Conversions from component errors. The status word each one maps to is
// fixed by the outcome taxonomy, not by the component.

impl From<crate::chunks::ChunkError> for WithdrawError {
    fn from(e: crate::chunks::ChunkError) -> Self {
        WithdrawError::wrong_data_length("chunk retrieval failed").with_details(e.to_string())
    }
}

impl From<crate::fields::ScriptError> for WithdrawError {
    fn from(e: crate::fields::ScriptError) -> Self {
        WithdrawError::incorrect_data("redeemer script rejected").with_details(e.to_string())
    }
}

impl From<crate::message_signer::MessageSignError> for WithdrawError {
    fn from(e: crate::message_signer::MessageSignError) -> Self {
        WithdrawError::bad_state("signing failed").with_details(e.to_string())
    }
}

impl From<crate::wallet::KeyError> for WithdrawError {
    fn from(e: crate::wallet::KeyError) -> Self {
        WithdrawError::bad_state("key access failed").with_details(e.to_string())
    }
}

impl From<crate::ui::UiError> for WithdrawError {
    fn from(e: crate::ui::UiError) -> Self {
        WithdrawError::bad_state("display failed").with_details(e.to_string())
    }
}

impl From<crate::config::ConfigError> for WithdrawError {
    fn from(e: crate::config::ConfigError) -> Self {
        WithdrawError::incorrect_data("configuration rejected").with_details(e.to_string())
    }
}

impl From<crate::handler::RequestError> for WithdrawError {
    fn from(e: crate::handler::RequestError) -> Self {
        match e {
            crate::handler::RequestError::PathTooLong { .. } => {
                WithdrawError::incorrect_data(e.to_string())
            }
            _ => WithdrawError::wrong_data_length(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = WithdrawError::incorrect_data("redeemer mismatch")
            .with_details("expected bc1q..., derived bc1p...");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("incorrect_data"));
        assert!(json.contains("redeemer mismatch"));
    }

    #[test]
    fn test_status_word_codes_round_trip() {
        for sw in [
            StatusWord::Ok,
            StatusWord::WrongDataLength,
            StatusWord::IncorrectData,
            StatusWord::Denied,
            StatusWord::BadState,
        ] {
            assert_eq!(StatusWord::from_code(sw.code()), Some(sw));
        }
        assert_eq!(StatusWord::from_code(0x1234), None);
    }

    #[test]
    fn test_component_errors_map_to_status_words() {
        let key: WithdrawError = crate::wallet::KeyError::Signing("locked".into()).into();
        assert_eq!(key.code, StatusWord::BadState);
        assert!(key.to_string().contains("locked"));

        let ui: WithdrawError = crate::ui::UiError::Rejected("detached".into()).into();
        assert_eq!(ui.code, StatusWord::BadState);

        let config: WithdrawError =
            crate::config::ConfigError::InvalidTicker("toolong".into()).into();
        assert_eq!(config.code, StatusWord::IncorrectData);

        let request: WithdrawError =
            crate::handler::RequestError::PathTooLong { len: 11, max: 10 }.into();
        assert_eq!(request.code, StatusWord::IncorrectData);
    }

    #[test]
    fn test_display_includes_details() {
        let err = WithdrawError::bad_state("signature overflow").with_details("r is 34 bytes");
        assert_eq!(err.to_string(), "[BadState] signature overflow (r is 34 bytes)");
    }
}
