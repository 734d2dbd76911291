// Strict parsing of user-supplied addresses and transaction hashes

use alloy::primitives::{Address, B256};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address '{0}': expected 0x followed by 40 hex characters")]
    Malformed(String),
    #[error("Invalid address '{0}': checksum mismatch")]
    BadChecksum(String),
    #[error("Invalid transaction hash '{0}': expected 0x followed by 64 hex characters")]
    MalformedTxHash(String),
}

/// Parses `0x` + 40 hex digits.
///
/// Single-case input is accepted as-is. Mixed-case input is treated as a
/// checksummed address and must match its EIP-55 encoding.
pub fn parse_address(input: &str) -> Result<Address, AddressError> {
    let trimmed = input.trim();
    let hex_part = strict_hex(trimmed, 40)
        .ok_or_else(|| AddressError::Malformed(trimmed.to_string()))?;

    let mixed_case = hex_part.bytes().any(|b| b.is_ascii_lowercase())
        && hex_part.bytes().any(|b| b.is_ascii_uppercase());
    if mixed_case {
        return Address::parse_checksummed(trimmed, None)
            .map_err(|_| AddressError::BadChecksum(trimmed.to_string()));
    }

    trimmed
        .parse()
        .map_err(|_| AddressError::Malformed(trimmed.to_string()))
}

/// Parses `0x` + 64 hex digits in any case
pub fn parse_tx_hash(input: &str) -> Result<B256, AddressError> {
    let trimmed = input.trim();
    strict_hex(trimmed, 64)
        .and_then(|_| trimmed.parse().ok())
        .ok_or_else(|| AddressError::MalformedTxHash(trimmed.to_string()))
}

/// The hex digits after a mandatory `0x`, if there are exactly `len` of them
fn strict_hex(s: &str, len: usize) -> Option<&str> {
    s.strip_prefix("0x")
        .filter(|h| h.len() == len && h.bytes().all(|b| b.is_ascii_hexdigit()))
}
