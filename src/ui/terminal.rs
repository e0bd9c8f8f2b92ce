//! Line-oriented confirmation UIs.
//!
//! [`TerminalUi`] prompts on a writer and reads the answer from a reader,
//! normally stderr and stdin. [`ScriptedUi`] answers from a fixed decision
//! and records everything it was shown.

use std::io::{BufRead, Write};

use super::{ConfirmationUi, UiError, WithdrawPrompt};
use crate::log_warn;

pub struct TerminalUi<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalUi<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    fn render_prompt(&mut self, prompt: &WithdrawPrompt) -> std::io::Result<()> {
        writeln!(self.output, "Review withdrawal")?;
        writeln!(self.output, "  Amount:   {}", prompt.amount)?;
        writeln!(self.output, "  Redeemer: {}", prompt.redeemer_address)?;
        write!(self.output, "Sign withdrawal? [y/N] ")?;
        self.output.flush()
    }
}

impl TerminalUi<std::io::StdinLock<'static>, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> ConfirmationUi for TerminalUi<R, W> {
    fn confirm_withdraw(&mut self, prompt: &WithdrawPrompt) -> bool {
        if let Err(e) = self.render_prompt(prompt) {
            log_warn!("ui", format!("cannot show prompt: {}", e));
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                log_warn!("ui", format!("cannot read answer: {}", e));
                false
            }
        }
    }

    fn show_processing(&mut self) {
        if let Err(e) = writeln!(self.output, "Processing...").and_then(|_| self.output.flush()) {
            log_warn!("ui", format!("cannot show progress: {}", e));
        }
    }

    fn notify_outcome(&mut self, success: bool) -> Result<(), UiError> {
        let status = if success {
            "Withdrawal signed"
        } else {
            "Withdrawal rejected"
        };
        writeln!(self.output, "{}", status)?;
        self.output.flush()?;
        Ok(())
    }
}

/// Non-interactive UI with a predetermined answer
#[derive(Debug, Clone, Default)]
pub struct ScriptedUi {
    approve: bool,
    fail_notifications: bool,
    pub prompts: Vec<WithdrawPrompt>,
    pub processing_shown: usize,
    pub outcomes: Vec<bool>,
}

impl ScriptedUi {
    pub fn approving() -> Self {
        Self {
            approve: true,
            ..Self::default()
        }
    }

    pub fn rejecting() -> Self {
        Self::default()
    }

    /// Make every `notify_outcome` call fail after recording it
    pub fn with_failing_notifications(mut self) -> Self {
        self.fail_notifications = true;
        self
    }
}

impl ConfirmationUi for ScriptedUi {
    fn confirm_withdraw(&mut self, prompt: &WithdrawPrompt) -> bool {
        self.prompts.push(prompt.clone());
        self.approve
    }

    fn show_processing(&mut self) {
        self.processing_shown += 1;
    }

    fn notify_outcome(&mut self, success: bool) -> Result<(), UiError> {
        self.outcomes.push(success);
        if self.fail_notifications {
            return Err(UiError::Rejected("display detached".to_string()));
        }
        Ok(())
    }
}
