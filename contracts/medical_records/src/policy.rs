//! Who may submit which transaction, on top of per-patient access levels.

use alloc::string::String as StdString;
use soroban_sdk::{contracttype, symbol_short, Bytes, Env, Symbol};

use crate::access;
use crate::codec;
use crate::identity::CallerIdentity;
use crate::keys;
use crate::store::Store;
use crate::ContractError;

const POLICY: Symbol = symbol_short!("POLICY");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// Caller gating applied to patient and visit writes.
///
/// Granting access is owner-only under every policy.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AuthPolicy {
    /// Any authenticated caller may register patients, update them, or open
    /// visits. Kept for deployments that predate caller gating.
    Open,
    /// Only the owner or a pinned doctor registers patients, updates them,
    /// or opens visits.
    Restricted,
}

pub fn load(env: &Env) -> Result<AuthPolicy, ContractError> {
    env.storage()
        .instance()
        .get(&POLICY)
        .ok_or(ContractError::NotInitialized)
}

pub fn save(env: &Env, policy: AuthPolicy) {
    env.storage().instance().set(&POLICY, &policy);
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Records the owner's common name and pins its certificate and invoker.
/// Never overwrites.
pub fn set_owner<S: Store>(store: &S, caller: &CallerIdentity) -> Result<(), ContractError> {
    let env = store.env();
    let owner_key = keys::owner_key(env);
    if store.get_bytes(&owner_key)?.is_some() {
        return Err(ContractError::AlreadyInitialized);
    }

    store.put_bytes(
        &owner_key,
        &Bytes::from_slice(env, caller.common_name.as_bytes()),
    )?;
    store.put_bytes(&keys::owner_certificate_key(env), &caller.certificate)?;
    store.put_bytes(&keys::owner_invoker_key(env), &caller.invoker)
}

pub fn owner<S: Store>(store: &S) -> Result<StdString, ContractError> {
    let raw = store
        .get_bytes(&keys::owner_key(store.env()))?
        .ok_or(ContractError::NotInitialized)?;
    StdString::from_utf8(codec::to_vec(&raw)).map_err(|_| ContractError::InternalError)
}

/// True when the caller carries the owner's common name together with its
/// pinned certificate and invoker.
pub fn is_owner<S: Store>(store: &S, caller: &CallerIdentity) -> Result<bool, ContractError> {
    if owner(store)? != caller.common_name {
        return Ok(false);
    }
    let env = store.env();
    let certificate = store
        .get_bytes(&keys::owner_certificate_key(env))?
        .ok_or(ContractError::InternalError)?;
    let invoker = store
        .get_bytes(&keys::owner_invoker_key(env))?
        .ok_or(ContractError::InternalError)?;
    Ok(caller.matches(&certificate, &invoker))
}

pub fn require_owner<S: Store>(store: &S, caller: &CallerIdentity) -> Result<(), ContractError> {
    if is_owner(store, caller)? {
        Ok(())
    } else {
        Err(ContractError::Unauthorized)
    }
}

/// Gate for `SetDoctorAccess`, independent of the policy.
pub fn authorize_grant<S: Store>(
    store: &S,
    caller: &CallerIdentity,
) -> Result<(), ContractError> {
    require_owner(store, caller)
}

/// Gate for `RegisterPatient`, `UpdatePatientDetails` and `PatientVisit`.
pub fn authorize_write<S: Store>(
    store: &S,
    policy: AuthPolicy,
    caller: &CallerIdentity,
) -> Result<(), ContractError> {
    match policy {
        AuthPolicy::Open => Ok(()),
        AuthPolicy::Restricted => {
            if is_owner(store, caller)?
                || access::is_pinned_doctor(store, caller)?
            {
                Ok(())
            } else {
                Err(ContractError::Unauthorized)
            }
        }
    }
}
