//! MessagePack and JSON codecs for anything serializable in this crate or in
//! engine state.

use rmp_serde::{decode, encode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::Event;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("encode error: {0}")]
    Encode(#[from] encode::Error),
    #[error("decode error: {0}")]
    Decode(#[from] decode::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn to_msgpack<T: Serialize>(value: &T) -> Result<Vec<u8>, WireError> {
    // Named fields keep internally tagged enums decodable.
    Ok(encode::to_vec_named(value)?)
}

pub fn from_msgpack<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, WireError> {
    Ok(serde_json::to_string(value)?)
}

pub fn from_json<T: DeserializeOwned>(text: &str) -> Result<T, WireError> {
    Ok(serde_json::from_str(text)?)
}

pub fn serialize_events(events: &[Event]) -> Result<Vec<u8>, WireError> {
    to_msgpack(&events)
}

pub fn deserialize_events(bytes: &[u8]) -> Result<Vec<Event>, WireError> {
    from_msgpack(bytes)
}
