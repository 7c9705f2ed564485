use soroban_sdk::contracttype;

use crate::events;
use crate::identity::CallerIdentity;
use crate::keys;
use crate::store::Store;
use crate::validation;
use crate::ContractError;

/// Access a doctor holds on one patient. Ordered `None < Info < Full`.
///
/// Persisted as an 8-byte counter holding the discriminant.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum AccessLevel {
    /// Implicit state of every unseen (doctor, patient) pair
    None = 0,
    /// May read patient demographics
    Info = 1,
    /// May read the full history and write diagnoses and prescriptions
    Full = 2,
}

impl AccessLevel {
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            0 => Some(AccessLevel::None),
            1 => Some(AccessLevel::Info),
            2 => Some(AccessLevel::Full),
            _ => None,
        }
    }

    pub fn as_u64(self) -> u64 {
        self as u64
    }
}

/// Binds `doctor` to the caller's certificate and invoker. The first
/// registration wins.
pub fn register_doctor<S: Store>(
    store: &S,
    doctor: &str,
    caller: &CallerIdentity,
) -> Result<bool, ContractError> {
    validation::validate_doctor_name(doctor)?;

    let key = keys::doctor_public_key(store.env(), doctor);
    if store.get_bytes(&key)?.is_some() {
        return Err(ContractError::AlreadyExists);
    }

    store.put_bytes(&key, &caller.certificate)?;
    store.put_bytes(&keys::doctor_invoker_key(store.env(), doctor), &caller.invoker)?;
    events::publish_doctor_registered(store.env(), doctor);

    Ok(true)
}

/// Sets the access level of `doctor` on `patient_id`.
///
/// Returns `false` and leaves the store untouched when the level is unchanged.
pub fn set_access<S: Store>(
    store: &S,
    patient_id: u64,
    doctor: &str,
    level: AccessLevel,
) -> Result<bool, ContractError> {
    validation::validate_doctor_name(doctor)?;

    let current = stored_level(store, patient_id, doctor)?;
    if current == level {
        return Ok(false);
    }

    let key = keys::doctor_access_key(store.env(), doctor, patient_id);
    store.put_counter(&key, level.as_u64())?;
    events::publish_access_set(store.env(), patient_id, doctor, level);

    Ok(true)
}

/// Returns the access level of `doctor` on `patient_id`, provided the caller
/// presents the certificate and invoker pinned when `doctor` registered.
pub fn check_access<S: Store>(
    store: &S,
    patient_id: u64,
    doctor: &str,
    caller: &CallerIdentity,
) -> Result<AccessLevel, ContractError> {
    if !is_pinned(store, doctor, caller)?.ok_or(ContractError::NotRegistered)? {
        return Err(ContractError::InvalidCaller);
    }

    stored_level(store, patient_id, doctor)
}

/// Like [`check_access`] but fails with `Forbidden` below `required`.
pub fn require_access<S: Store>(
    store: &S,
    patient_id: u64,
    doctor: &str,
    caller: &CallerIdentity,
    required: AccessLevel,
) -> Result<AccessLevel, ContractError> {
    let level = check_access(store, patient_id, doctor, caller)?;
    if level < required {
        return Err(ContractError::Forbidden);
    }
    Ok(level)
}

/// True when the caller's common name is a registered doctor pinned to
/// exactly the caller's certificate and invoker.
pub fn is_pinned_doctor<S: Store>(
    store: &S,
    caller: &CallerIdentity,
) -> Result<bool, ContractError> {
    Ok(is_pinned(store, &caller.common_name, caller)?.unwrap_or(false))
}

/// `None` when `doctor` is unregistered.
fn is_pinned<S: Store>(
    store: &S,
    doctor: &str,
    caller: &CallerIdentity,
) -> Result<Option<bool>, ContractError> {
    let env = store.env();
    let Some(certificate) = store.get_bytes(&keys::doctor_public_key(env, doctor))? else {
        return Ok(None);
    };
    // Both halves are written together by `register_doctor`.
    let invoker = store
        .get_bytes(&keys::doctor_invoker_key(env, doctor))?
        .ok_or(ContractError::InternalError)?;
    Ok(Some(caller.matches(&certificate, &invoker)))
}

fn stored_level<S: Store>(
    store: &S,
    patient_id: u64,
    doctor: &str,
) -> Result<AccessLevel, ContractError> {
    let key = keys::doctor_access_key(store.env(), doctor, patient_id);
    let raw = store.get_counter(&key)?;
    AccessLevel::from_u64(raw).ok_or(ContractError::InternalError)
}
