//! Scoped outcome reporting.
//!
//! [`OutcomeGuard`] owns the UI for the lifetime of one request. Whatever
//! path the request takes, exactly one outcome is reported and the UI is
//! asked to show it exactly once. A guard dropped without being finished
//! reports `BadState`.

use crate::error::{StatusWord, WithdrawError};
use crate::types::Response;
use crate::ui::ConfirmationUi;
use crate::{log_error, log_info, log_warn};

pub struct OutcomeGuard<'u> {
    ui: &'u mut dyn ConfirmationUi,
    reported: bool,
}

impl<'u> OutcomeGuard<'u> {
    pub fn new(ui: &'u mut dyn ConfirmationUi) -> Self {
        Self {
            ui,
            reported: false,
        }
    }

    /// The UI, for steps that run before the outcome is known
    pub fn ui(&mut self) -> &mut dyn ConfirmationUi {
        &mut *self.ui
    }

    /// Report success with the given payload
    pub fn succeed(mut self, data: Vec<u8>) -> Response {
        log_info!("withdraw", "withdrawal signed", status = StatusWord::Ok);
        self.report(true);
        Response::ok(data)
    }

    /// Report a failure; no payload is ever attached
    pub fn fail(mut self, error: &WithdrawError) -> Response {
        log_warn!("withdraw", format!("withdrawal failed: {}", error), status = error.code);
        self.report(false);
        Response::from(error)
    }

    fn report(&mut self, success: bool) {
        self.reported = true;
        if let Err(e) = self.ui.notify_outcome(success) {
            log_error!("withdraw", format!("cannot update display: {}", e));
        }
    }
}

impl Drop for OutcomeGuard<'_> {
    fn drop(&mut self) {
        if !self.reported {
            log_error!("withdraw", "request ended without an outcome", status = StatusWord::BadState);
            self.report(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::ScriptedUi;

    #[test]
    fn test_success_notifies_once() {
        let mut ui = ScriptedUi::approving();
        let response = OutcomeGuard::new(&mut ui).succeed(vec![1, 2, 3]);
        assert!(response.is_ok());
        assert_eq!(ui.outcomes, vec![true]);
    }

    #[test]
    fn test_failure_has_no_payload() {
        let mut ui = ScriptedUi::approving();
        let response = OutcomeGuard::new(&mut ui).fail(&WithdrawError::denied("user rejected"));
        assert_eq!(response.status, StatusWord::Denied);
        assert!(response.data.is_empty());
        assert_eq!(ui.outcomes, vec![false]);
    }

    #[test]
    fn test_notification_failure_is_swallowed() {
        let mut ui = ScriptedUi::approving().with_failing_notifications();
        let response = OutcomeGuard::new(&mut ui).fail(&WithdrawError::bad_state("boom"));
        assert_eq!(response.status, StatusWord::BadState);
        assert_eq!(ui.outcomes, vec![false]);
    }

    #[test]
    fn test_abandoned_guard_reports_failure() {
        let mut ui = ScriptedUi::approving();
        {
            let _guard = OutcomeGuard::new(&mut ui);
        }
        assert_eq!(ui.outcomes, vec![false]);
    }
}
