//! Withdrawal request framing.
//!
//! `path_len: u8 ‖ path_len × u32 BE ‖ varint n_chunks ‖ root: [u8; 32]`
//!
//! The varint is Bitcoin's compact size: one byte below `0xfd`, otherwise a
//! `0xfd`/`0xfe`/`0xff` marker followed by a little-endian u16/u32/u64.

use thiserror::Error;

use crate::types::{WithdrawalRequest, MAX_BIP32_PATH_STEPS};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("request truncated reading {field}: need {needed} bytes, {available} left")]
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("derivation path has {len} steps, at most {max} allowed")]
    PathTooLong { len: usize, max: usize },

    #[error("non-canonical varint encoding")]
    NonCanonicalVarint,

    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),
}

/// Cursor over the raw request bytes
struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, field: &'static str, n: usize) -> Result<&'a [u8], RequestError> {
        if self.data.len() < n {
            return Err(RequestError::Truncated {
                field,
                needed: n,
                available: self.data.len(),
            });
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    fn u8(&mut self, field: &'static str) -> Result<u8, RequestError> {
        Ok(self.take(field, 1)?[0])
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], RequestError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(field, N)?);
        Ok(out)
    }

    fn varint(&mut self, field: &'static str) -> Result<u64, RequestError> {
        let (value, min) = match self.u8(field)? {
            0xfd => (u64::from(u16::from_le_bytes(self.array(field)?)), 0xfd),
            0xfe => (u64::from(u32::from_le_bytes(self.array(field)?)), 0x1_0000),
            0xff => (u64::from_le_bytes(self.array(field)?), 0x1_0000_0000),
            small => return Ok(u64::from(small)),
        };
        if value < min {
            return Err(RequestError::NonCanonicalVarint);
        }
        Ok(value)
    }
}

/// Parse a withdrawal request. An oversize path length is rejected before
/// any path bytes are read.
pub fn parse_request(data: &[u8]) -> Result<WithdrawalRequest, RequestError> {
    let mut reader = Reader { data };

    let path_len = reader.u8("path length")? as usize;
    if path_len > MAX_BIP32_PATH_STEPS {
        return Err(RequestError::PathTooLong {
            len: path_len,
            max: MAX_BIP32_PATH_STEPS,
        });
    }

    let mut path = Vec::with_capacity(path_len);
    for _ in 0..path_len {
        path.push(u32::from_be_bytes(reader.array("path step")?));
    }

    let n_chunks = reader.varint("chunk count")?;
    let data_merkle_root = reader.array("data root")?;

    if !reader.data.is_empty() {
        return Err(RequestError::TrailingBytes(reader.data.len()));
    }

    Ok(WithdrawalRequest::new(path, n_chunks, data_merkle_root))
}

/// Compact-size encoding of `n`
pub fn encode_varint(n: u64, out: &mut Vec<u8>) {
    match n {
        0..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
}

/// Serialize a request the way a host sends it
pub fn encode_request(request: &WithdrawalRequest) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + 4 * request.path.len() + 9 + 32);
    out.push(request.path.len() as u8);
    for step in &request.path {
        out.extend_from_slice(&step.to_be_bytes());
    }
    encode_varint(request.n_chunks, &mut out);
    out.extend_from_slice(&request.data_merkle_root);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::HARDENED;

    #[test]
    fn test_parse_request() {
        let mut data = vec![2];
        data.extend_from_slice(&(84 | HARDENED).to_be_bytes());
        data.extend_from_slice(&7u32.to_be_bytes());
        data.push(11);
        data.extend_from_slice(&[0xcd; 32]);

        let request = parse_request(&data).unwrap();
        assert_eq!(request.path, vec![84 | HARDENED, 7]);
        assert_eq!(request.n_chunks, 11);
        assert_eq!(request.data_merkle_root, [0xcd; 32]);
        assert_eq!(encode_request(&request), data);
    }

    #[test]
    fn test_parse_master_path_and_wide_varint() {
        let request = WithdrawalRequest::new(vec![], 70_000, [1; 32]);
        let data = encode_request(&request);
        assert_eq!(&data[..6], &[0, 0xfe, 0x70, 0x11, 0x01, 0x00]);
        assert_eq!(parse_request(&data).unwrap(), request);
    }

    #[test]
    fn test_path_too_long_checked_first() {
        // No path bytes follow: the length alone is enough to reject
        assert_eq!(
            parse_request(&[11]),
            Err(RequestError::PathTooLong { len: 11, max: 10 })
        );
    }

    #[test]
    fn test_truncated_inputs() {
        assert!(matches!(parse_request(&[]), Err(RequestError::Truncated { .. })));
        assert!(matches!(parse_request(&[1, 0, 0]), Err(RequestError::Truncated { .. })));

        let mut data = encode_request(&WithdrawalRequest::new(vec![1], 12, [0; 32]));
        data.pop();
        assert!(matches!(
            parse_request(&data),
            Err(RequestError::Truncated { field: "data root", .. })
        ));
    }

    #[test]
    fn test_rejects_trailing_and_non_canonical() {
        let mut data = encode_request(&WithdrawalRequest::new(vec![], 12, [0; 32]));
        data.push(0);
        assert_eq!(parse_request(&data), Err(RequestError::TrailingBytes(1)));

        let mut data = vec![0, 0xfd, 0x0c, 0x00];
        data.extend_from_slice(&[0; 32]);
        assert_eq!(parse_request(&data), Err(RequestError::NonCanonicalVarint));
    }
}
