//! 65-byte compact signature encoding.
//!
//! Layout: one header byte `27 + 4 + parity`, then `r` and `s` each
//! right-aligned in 32 bytes. This is the Bitcoin signed-message format for
//! compressed keys.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1};
use serde::{Deserialize, Serialize};

use super::{MessageSignError, MessageSignResult};

pub const SIGNATURE_LEN: usize = 65;

/// Header byte for a compressed-key signature with even R
pub const RECOVERY_BYTE_BASE: u8 = 27 + 4;

/// Longest DER integer for a 256-bit value: 32 bytes plus a sign pad
pub const MAX_DER_COMPONENT_LEN: usize = 33;

const DER_SEQUENCE: u8 = 0x30;
const DER_INTEGER: u8 = 0x02;

/// Split a DER ECDSA signature into its `r` and `s` integers
pub fn parse_der(der: &[u8]) -> MessageSignResult<(&[u8], &[u8])> {
    let malformed = |what: &str| MessageSignError::MalformedDer(what.to_string());

    if der.first() != Some(&DER_SEQUENCE) {
        return Err(malformed("missing sequence tag"));
    }
    let (r, rest) = der_integer(der.get(2..).ok_or_else(|| malformed("truncated"))?, "r")?;
    let (s, _) = der_integer(rest, "s")?;
    Ok((r, s))
}

fn der_integer<'a>(
    bytes: &'a [u8],
    component: &'static str,
) -> MessageSignResult<(&'a [u8], &'a [u8])> {
    let malformed = || MessageSignError::MalformedDer(format!("bad {} integer", component));

    if bytes.first() != Some(&DER_INTEGER) {
        return Err(malformed());
    }
    let len = *bytes.get(1).ok_or_else(malformed)? as usize;
    if len == 0 {
        return Err(malformed());
    }
    if len > MAX_DER_COMPONENT_LEN {
        return Err(MessageSignError::ComponentTooLong { component, len });
    }
    let value = bytes.get(2..2 + len).ok_or_else(malformed)?;
    Ok((value, &bytes[2 + len..]))
}

/// A finished withdrawal signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawSignature(#[serde(with = "hex_sig")] [u8; SIGNATURE_LEN]);

impl WithdrawSignature {
    pub fn from_der(der: &[u8], parity_odd: bool) -> MessageSignResult<Self> {
        let (r, s) = parse_der(der)?;

        let mut out = [0u8; SIGNATURE_LEN];
        out[0] = RECOVERY_BYTE_BASE + u8::from(parity_odd);
        right_align(&mut out[1..33], r);
        right_align(&mut out[33..65], s);
        Ok(Self(out))
    }

    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn recovery_byte(&self) -> u8 {
        self.0[0]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Base64 form, as printed by Bitcoin wallets' `signmessage`
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    /// Recover the compressed public key that produced this signature over
    /// `digest`
    pub fn recover_public_key(&self, digest: &[u8; 32]) -> MessageSignResult<[u8; 33]> {
        let recid = self.0[0]
            .checked_sub(RECOVERY_BYTE_BASE)
            .filter(|id| *id < 4)
            .ok_or_else(|| MessageSignError::RecoveryFailed("bad header byte".into()))?;
        let recid = RecoveryId::from_i32(i32::from(recid))
            .map_err(|e| MessageSignError::RecoveryFailed(e.to_string()))?;
        let signature = RecoverableSignature::from_compact(&self.0[1..], recid)
            .map_err(|e| MessageSignError::RecoveryFailed(e.to_string()))?;

        let secp = Secp256k1::verification_only();
        let pk = secp
            .recover_ecdsa(&Message::from_digest(*digest), &signature)
            .map_err(|e| MessageSignError::RecoveryFailed(e.to_string()))?;
        Ok(pk.serialize())
    }
}

/// Copy the low-order bytes of a big-endian integer into `dst`, dropping a
/// leading sign pad
fn right_align(dst: &mut [u8], src: &[u8]) {
    let src = if src.len() > dst.len() {
        &src[src.len() - dst.len()..]
    } else {
        src
    };
    let start = dst.len() - src.len();
    dst[start..].copy_from_slice(src);
}

mod hex_sig {
    use super::SIGNATURE_LEN;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(sig: &[u8; SIGNATURE_LEN], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(sig))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; SIGNATURE_LEN], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s).map_err(serde::de::Error::custom)?;
        <[u8; SIGNATURE_LEN]>::try_from(bytes.as_slice())
            .map_err(|_| serde::de::Error::custom("expected 65 bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn der(r: &[u8], s: &[u8]) -> Vec<u8> {
        let mut out = vec![DER_SEQUENCE, (4 + r.len() + s.len()) as u8];
        out.extend_from_slice(&[DER_INTEGER, r.len() as u8]);
        out.extend_from_slice(r);
        out.extend_from_slice(&[DER_INTEGER, s.len() as u8]);
        out.extend_from_slice(s);
        out
    }

    #[test]
    fn test_sign_pad_is_dropped() {
        let mut r = vec![0x00];
        r.extend_from_slice(&[0x80; 32]);
        let s = [0x11; 32];

        let sig = WithdrawSignature::from_der(&der(&r, &s), false).unwrap();
        let bytes = sig.as_bytes();
        assert_eq!(bytes[0], 31);
        assert_eq!(&bytes[1..33], &[0x80; 32]);
        assert_eq!(&bytes[33..65], &[0x11; 32]);
    }

    #[test]
    fn test_short_component_is_left_padded() {
        let sig = WithdrawSignature::from_der(&der(&[0x01, 0x02], &[0x7f; 31]), true).unwrap();
        let bytes = sig.as_bytes();
        assert_eq!(bytes[0], 32);
        assert_eq!(&bytes[1..31], &[0u8; 30]);
        assert_eq!(&bytes[31..33], &[0x01, 0x02]);
        assert_eq!(bytes[33], 0);
        assert_eq!(&bytes[34..65], &[0x7f; 31]);
    }

    #[test]
    fn test_oversize_component_rejected() {
        let err = WithdrawSignature::from_der(&der(&[0x01; 34], &[0x01; 32]), false).unwrap_err();
        assert_eq!(err, MessageSignError::ComponentTooLong { component: "r", len: 34 });

        let err = WithdrawSignature::from_der(&der(&[0x01; 32], &[0x01; 34]), false).unwrap_err();
        assert_eq!(err, MessageSignError::ComponentTooLong { component: "s", len: 34 });
    }

    #[test]
    fn test_malformed_der_rejected() {
        assert!(parse_der(&[]).is_err());
        assert!(parse_der(&[0x31, 0x00]).is_err());
        let mut truncated = der(&[0x01; 32], &[0x01; 32]);
        truncated.truncate(40);
        assert!(parse_der(&truncated).is_err());
    }

    #[test]
    fn test_encodings() {
        let sig = WithdrawSignature::from_bytes([0u8; SIGNATURE_LEN]);
        assert_eq!(sig.to_hex().len(), 130);
        assert_eq!(sig.to_base64().len(), 88);

        let json = serde_json::to_string(&sig).unwrap();
        let back: WithdrawSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }
}
