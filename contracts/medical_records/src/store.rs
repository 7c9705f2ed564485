use soroban_sdk::{Bytes, Env};

use crate::keys;
use crate::ContractError;

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// Byte-level view of the host key/value store.
///
/// All calls run inside the host's per-invocation transaction; implementations
/// perform no locking of their own.
pub trait Store {
    fn env(&self) -> &Env;

    /// Returns `Ok(None)` for a missing key.
    fn get_bytes(&self, key: &Bytes) -> Result<Option<Bytes>, ContractError>;

    fn put_bytes(&self, key: &Bytes, value: &Bytes) -> Result<(), ContractError>;

    /// A missing counter reads as zero.
    fn get_counter(&self, key: &Bytes) -> Result<u64, ContractError> {
        match self.get_bytes(key)? {
            Some(raw) => keys::decode_counter(&raw),
            None => Ok(0),
        }
    }

    fn put_counter(&self, key: &Bytes, value: u64) -> Result<(), ContractError> {
        let raw = keys::encode_counter(self.env(), value);
        self.put_bytes(key, &raw)
    }
}

/// [`Store`] backed by the contract's persistent storage.
#[derive(Clone)]
pub struct LedgerStore {
    env: Env,
}

impl LedgerStore {
    pub fn new(env: &Env) -> Self {
        Self { env: env.clone() }
    }
}

impl Store for LedgerStore {
    fn env(&self) -> &Env {
        &self.env
    }

    fn get_bytes(&self, key: &Bytes) -> Result<Option<Bytes>, ContractError> {
        Ok(self.env.storage().persistent().get::<Bytes, Bytes>(key))
    }

    fn put_bytes(&self, key: &Bytes, value: &Bytes) -> Result<(), ContractError> {
        let storage = self.env.storage().persistent();
        storage.set(key, value);
        storage.extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
        Ok(())
    }
}
