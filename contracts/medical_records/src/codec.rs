use alloc::string::String as StdString;
use alloc::vec;
use alloc::vec::Vec;
use serde::de::DeserializeOwned;
use serde::Serialize;
use soroban_sdk::{Bytes, Env, String};

use crate::ContractError;

/// Serializes a record body or response payload to UTF-8 JSON.
pub fn to_json<T: Serialize>(env: &Env, value: &T) -> Result<Bytes, ContractError> {
    let raw = serde_json::to_vec(value).map_err(|_| ContractError::InternalError)?;
    Ok(Bytes::from_slice(env, &raw))
}

/// Decodes a stored record body. Bodies are only ever written by this
/// contract, so a decode failure means the ledger state is corrupt.
pub fn from_stored_json<T: DeserializeOwned>(raw: &Bytes) -> Result<T, ContractError> {
    serde_json::from_slice(&to_vec(raw)).map_err(|_| ContractError::InternalError)
}

/// Decodes a caller-supplied argument.
pub fn from_arg_json<T: DeserializeOwned>(arg: &str) -> Result<T, ContractError> {
    serde_json::from_str(arg).map_err(|_| ContractError::InvalidArgs)
}

pub fn to_vec(raw: &Bytes) -> Vec<u8> {
    let mut buf = vec![0u8; raw.len() as usize];
    raw.copy_into_slice(&mut buf);
    buf
}

/// Copies a host string into an owned UTF-8 string.
pub fn to_std_string(value: &String) -> Result<StdString, ContractError> {
    let mut buf = vec![0u8; value.len() as usize];
    value.copy_into_slice(&mut buf);
    StdString::from_utf8(buf).map_err(|_| ContractError::InvalidArgs)
}
