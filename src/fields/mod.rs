//! Field Decoder
//!
//! Pulls the two human-meaningful quantities of a withdrawal out of the
//! chunk stream: the amount and the Bitcoin output script the redeemed
//! funds go to.

pub mod amount;
pub mod script;

pub use amount::*;
pub use script::*;

use crate::chunks::{ChunkReader, ChunkResult, AMOUNT, REDEEMER_SCRIPT_LEN};
use crate::error::WithdrawResult;

/// Read the raw 18-decimal amount (big-endian u64)
pub fn read_amount(reader: &mut ChunkReader<'_>) -> ChunkResult<u64> {
    let bytes: [u8; 8] = reader.read(&AMOUNT)?;
    Ok(u64::from_be_bytes(bytes))
}

/// Fetch the redeemer chunk and decode its output script.
///
/// Retrieval failures surface as `WrongDataLength`, decoding failures as
/// `IncorrectData`.
pub fn read_redeemer(
    reader: &mut ChunkReader<'_>,
    decoder: &dyn ScriptDecoder,
) -> WithdrawResult<DecodedScript> {
    let chunk = reader.fetch(REDEEMER_SCRIPT_LEN.chunk)?;
    let script = redeemer_script(&chunk)?;
    Ok(decoder.decode(script)?)
}
