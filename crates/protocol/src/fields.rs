//! Field extraction helpers. Ethscriptions protocol payloads carry numeric
//! amounts as JSON strings (`"max":"1000"`), so every numeric getter parses
//! a string first and falls back to a native JSON number for leniency.

use serde_json::Value;

pub fn get_str<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key)?.as_str()
}

pub fn get_i64(payload: &Value, key: &str) -> Option<i64> {
    let field = payload.get(key)?;
    if let Some(n) = field.as_i64() {
        return Some(n);
    }
    field.as_str()?.parse().ok()
}

pub fn get_address(payload: &Value, key: &str) -> Option<alloy_primitives::Address> {
    get_str(payload, key)?.parse().ok()
}
