//! Request Orchestrator
//!
//! Parses a withdrawal command, sequences decoding, confirmation, hashing
//! and signing, and turns the result into exactly one response.

pub mod finalizer;
pub mod request;
pub mod withdraw;

pub use finalizer::OutcomeGuard;
pub use request::{encode_request, encode_varint, parse_request, RequestError};
pub use withdraw::{WithdrawHandler, WithdrawState};
