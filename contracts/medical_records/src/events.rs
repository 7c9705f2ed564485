use soroban_sdk::{symbol_short, Env, String};

use crate::access::AccessLevel;
use crate::policy::AuthPolicy;

/// Event published when the contract is initialized.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: String,
    pub policy: AuthPolicy,
    pub timestamp: u64,
}

/// Event published when a patient is registered or updated.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientEvent {
    pub patient_id: u64,
    pub timestamp: u64,
}

/// Event published when a visit is opened.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VisitOpenedEvent {
    pub patient_id: u64,
    pub visit_id: u64,
    pub doctor: String,
    pub timestamp: u64,
}

/// Event published when a visit's diagnosis or prescription changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VisitUpdatedEvent {
    pub patient_id: u64,
    pub visit_id: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DoctorRegisteredEvent {
    pub doctor: String,
    pub timestamp: u64,
}

/// Event published when a doctor's access level on a patient changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessSetEvent {
    pub patient_id: u64,
    pub doctor: String,
    pub level: AccessLevel,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyChangedEvent {
    pub policy: AuthPolicy,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, owner: &str, policy: AuthPolicy) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        owner: String::from_str(env, owner),
        policy,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_patient_registered(env: &Env, patient_id: u64) {
    let topics = (symbol_short!("PAT_REG"), patient_id);
    let data = PatientEvent {
        patient_id,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_patient_updated(env: &Env, patient_id: u64) {
    let topics = (symbol_short!("PAT_UPD"), patient_id);
    let data = PatientEvent {
        patient_id,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when a doctor opens a visit for a patient.
pub fn publish_visit_opened(env: &Env, patient_id: u64, visit_id: u64, doctor: &str) {
    let topics = (symbol_short!("VISIT"), patient_id);
    let data = VisitOpenedEvent {
        patient_id,
        visit_id,
        doctor: String::from_str(env, doctor),
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_diagnosis_set(env: &Env, patient_id: u64, visit_id: u64) {
    let topics = (symbol_short!("DIAG"), patient_id);
    let data = VisitUpdatedEvent {
        patient_id,
        visit_id,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_prescription_set(env: &Env, patient_id: u64, visit_id: u64) {
    let topics = (symbol_short!("RX"), patient_id);
    let data = VisitUpdatedEvent {
        patient_id,
        visit_id,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_doctor_registered(env: &Env, doctor: &str) {
    let topics = (symbol_short!("DOC_REG"),);
    let data = DoctorRegisteredEvent {
        doctor: String::from_str(env, doctor),
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when an access level actually changes.
/// Unchanged levels publish nothing.
pub fn publish_access_set(env: &Env, patient_id: u64, doctor: &str, level: AccessLevel) {
    let topics = (symbol_short!("ACC_SET"), patient_id);
    let data = AccessSetEvent {
        patient_id,
        doctor: String::from_str(env, doctor),
        level,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_policy_changed(env: &Env, policy: AuthPolicy) {
    let topics = (symbol_short!("POLICY"),);
    let data = PolicyChangedEvent {
        policy,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
