use crate::{
    core::{Block, Hash256, ReadWrite, Tx},
    errors::DecodeError,
};
use serde_json::Value;

/// True for a non-empty string of whole bytes in hex.
pub fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decodes hex, stopping at the first byte that is not two hex digits.
pub fn parse_hex(s: &str) -> Vec<u8> {
    let valid = s
        .as_bytes()
        .chunks_exact(2)
        .take_while(|pair| pair.iter().all(u8::is_ascii_hexdigit))
        .count();
    hex::decode(&s[..valid * 2]).unwrap_or_default()
}

/// Decodes a hex-serialized transaction. Fails on bad hex, bad encoding or
/// trailing bytes.
pub fn decode_hex_tx(hex_tx: &str) -> Option<Tx> {
    decode_hex(hex_tx)
}

/// Decodes a hex-serialized block. Fails on bad hex, bad encoding or trailing
/// bytes.
pub fn decode_hex_block(hex_block: &str) -> Option<Block> {
    decode_hex(hex_block)
}

fn decode_hex<T: ReadWrite>(s: &str) -> Option<T> {
    if !is_hex(s) {
        return None;
    }
    T::from_bytes(&parse_hex(s)).ok()
}

pub fn parse_hash_str(s: &str, name: &str) -> Result<Hash256, DecodeError> {
    if !is_hex(s) {
        return Err(not_hex(s, name));
    }
    Ok(Hash256::from_hex(s))
}

pub fn parse_hash_value(v: &Value, name: &str) -> Result<Hash256, DecodeError> {
    parse_hash_str(v.as_str().unwrap_or_default(), name)
}

pub fn parse_hex_value(v: &Value, name: &str) -> Result<Vec<u8>, DecodeError> {
    let s = v.as_str().unwrap_or_default();
    if !is_hex(s) {
        return Err(not_hex(s, name));
    }
    Ok(parse_hex(s))
}

fn not_hex(s: &str, name: &str) -> DecodeError {
    DecodeError::NotHex {
        name: name.to_string(),
        value: s.to_string(),
    }
}
