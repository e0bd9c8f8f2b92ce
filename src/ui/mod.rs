//! Display Formatter
//!
//! The confirmation screen is part of the trust boundary: nothing is signed
//! until the user has approved the amount and the redeemer address.

pub mod terminal;

pub use terminal::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("display unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("display rejected the update: {0}")]
    Rejected(String),
}

/// What the user is asked to approve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawPrompt {
    /// `"<ticker> <amount>"`
    pub amount: String,
    pub redeemer_address: String,
}

impl WithdrawPrompt {
    pub fn new(amount: impl Into<String>, redeemer_address: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            redeemer_address: redeemer_address.into(),
        }
    }
}

/// User-facing display and confirmation collaborator
pub trait ConfirmationUi {
    /// Block until the user approves (`true`) or rejects (`false`)
    fn confirm_withdraw(&mut self, prompt: &WithdrawPrompt) -> bool;

    /// Shown between approval and the signature being returned
    fn show_processing(&mut self);

    /// Final success or failure screen
    fn notify_outcome(&mut self, success: bool) -> Result<(), UiError>;
}

impl<U: ConfirmationUi + ?Sized> ConfirmationUi for &mut U {
    fn confirm_withdraw(&mut self, prompt: &WithdrawPrompt) -> bool {
        (**self).confirm_withdraw(prompt)
    }

    fn show_processing(&mut self) {
        (**self).show_processing()
    }

    fn notify_outcome(&mut self, success: bool) -> Result<(), UiError> {
        (**self).notify_outcome(success)
    }
}
