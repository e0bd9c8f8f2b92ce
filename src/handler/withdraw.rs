//! Withdrawal command handler.

use std::fmt;

use super::finalizer::OutcomeGuard;
use super::request::parse_request;
use crate::chunks::{ChunkReader, ChunkSource};
use crate::config::WithdrawConfig;
use crate::eip712::SafeTxHasher;
use crate::error::{WithdrawError, WithdrawResult};
use crate::fields::{format_with_ticker, read_amount, read_redeemer, ScriptDecoder, AMOUNT_DECIMALS};
use crate::message_signer::{sign_final_hash, WithdrawSignature};
use crate::types::{Response, WithdrawalRequest};
use crate::ui::{ConfirmationUi, WithdrawPrompt};
use crate::wallet::{AddressEncoder, AddressVerifier, KeyProvider};
use crate::{log_debug, log_warn};

/// Stages of one request. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WithdrawState {
    ReceiveRequest,
    ValidateInput,
    ConfirmWithUser,
    ComputeHash,
    Sign,
    EncodeResponse,
}

impl WithdrawState {
    fn advance(&mut self, next: WithdrawState) {
        debug_assert!(next > *self, "{} -> {} is not forward", self, next);
        log_debug!("withdraw", format!("{} -> {}", self, next));
        *self = next;
    }
}

impl fmt::Display for WithdrawState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WithdrawState::ReceiveRequest => "receive-request",
            WithdrawState::ValidateInput => "validate-input",
            WithdrawState::ConfirmWithUser => "confirm-with-user",
            WithdrawState::ComputeHash => "compute-hash",
            WithdrawState::Sign => "sign",
            WithdrawState::EncodeResponse => "encode-response",
        };
        f.write_str(name)
    }
}

/// Signs Safe withdrawals for one network configuration
pub struct WithdrawHandler<'a> {
    config: &'a WithdrawConfig,
    keys: &'a dyn KeyProvider,
    encoder: &'a dyn AddressEncoder,
    decoder: &'a dyn ScriptDecoder,
}

impl<'a> WithdrawHandler<'a> {
    pub fn new(
        config: &'a WithdrawConfig,
        keys: &'a dyn KeyProvider,
        encoder: &'a dyn AddressEncoder,
        decoder: &'a dyn ScriptDecoder,
    ) -> Self {
        if config.auto_approve && !config.skips_confirmation() {
            log_warn!(
                "withdraw",
                "auto-approve requested but not compiled in; confirmation stays on"
            );
        }
        Self {
            config,
            keys,
            encoder,
            decoder,
        }
    }

    /// Run one raw withdrawal command to completion.
    ///
    /// The UI is notified of the outcome exactly once, and a signature is
    /// only ever returned with an `Ok` status.
    pub fn handle(
        &self,
        raw: &[u8],
        source: &mut dyn ChunkSource,
        ui: &mut dyn ConfirmationUi,
    ) -> Response {
        let mut guard = OutcomeGuard::new(ui);
        match self.run(raw, source, guard.ui()) {
            Ok(signature) => guard.succeed(signature.as_bytes().to_vec()),
            Err(e) => guard.fail(&e),
        }
    }

    fn run(
        &self,
        raw: &[u8],
        source: &mut dyn ChunkSource,
        ui: &mut dyn ConfirmationUi,
    ) -> WithdrawResult<WithdrawSignature> {
        let mut state = WithdrawState::ReceiveRequest;

        state.advance(WithdrawState::ValidateInput);
        let request = parse_request(raw)?;
        log_debug!(
            "withdraw",
            "request parsed",
            path = request.path_display(),
            n_chunks = request.n_chunks,
            data_root = hex::encode(request.data_merkle_root),
        );
        let mut reader = ChunkReader::new(source, request.data_merkle_root, request.n_chunks);

        state.advance(WithdrawState::ConfirmWithUser);
        self.confirm(&request, &mut reader, ui)?;

        state.advance(WithdrawState::ComputeHash);
        let final_hash = SafeTxHasher::new(&self.config.network).compute(&mut reader)?;

        state.advance(WithdrawState::Sign);
        if !self.config.skips_confirmation() {
            ui.show_processing();
        }
        let signature = sign_final_hash(self.keys, &request.path, &final_hash)?;

        state.advance(WithdrawState::EncodeResponse);
        Ok(signature)
    }

    /// Decode the amount and redeemer, check the redeemer belongs to the
    /// signing key, then ask the user
    fn confirm(
        &self,
        request: &WithdrawalRequest,
        reader: &mut ChunkReader<'_>,
        ui: &mut dyn ConfirmationUi,
    ) -> WithdrawResult<()> {
        let amount = read_amount(reader)?;
        let redeemer = read_redeemer(reader, self.decoder)?;

        let address_type = redeemer.script_type.address_type().ok_or_else(|| {
            WithdrawError::incorrect_data("redeemer script cannot belong to a single key")
                .with_details(format!("{:?}", redeemer.script_type))
        })?;

        let verifier = AddressVerifier::new(self.keys, self.encoder);
        if !verifier.verify(&request.path, &redeemer.address, address_type) {
            return Err(WithdrawError::incorrect_data(
                "redeemer address does not belong to the signing key",
            ));
        }

        let prompt = WithdrawPrompt::new(
            format_with_ticker(&self.config.network.ticker, amount, AMOUNT_DECIMALS),
            redeemer.address,
        );
        log_debug!(
            "withdraw",
            "withdrawal decoded",
            amount = prompt.amount,
            redeemer = prompt.redeemer_address,
        );

        if self.config.skips_confirmation() {
            log_warn!("withdraw", "confirmation skipped (perf-test build)");
            return Ok(());
        }

        if !ui.confirm_withdraw(&prompt) {
            return Err(WithdrawError::denied("user rejected the withdrawal"));
        }
        Ok(())
    }
}
