use alloc::string::String as StdString;
use alloc::vec::Vec;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::access::{self, AccessLevel};
use crate::codec;
use crate::events;
use crate::identity::CallerIdentity;
use crate::keys;
use crate::params::{DiagnosisUpdate, NewPatient, NewVisit, PatientQuery, PrescriptionUpdate};
use crate::store::Store;
use crate::validation;
use crate::ContractError;

/// Persisted on the wire as `0`, `1` or `2`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Gender {
    #[default]
    Unspecified,
    Male,
    Female,
}

impl Gender {
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            0 => Some(Gender::Unspecified),
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_u64(self) -> u64 {
        match self {
            Gender::Unspecified => 0,
            Gender::Male => 1,
            Gender::Female => 2,
        }
    }
}

impl Serialize for Gender {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.as_u64())
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u64::deserialize(deserializer)?;
        Gender::from_u64(raw).ok_or_else(|| de::Error::custom("gender out of range"))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    #[serde(rename = "ID")]
    pub patient_id: u64,
    #[serde(rename = "firstname")]
    pub first_name: StdString,
    #[serde(rename = "lastname")]
    pub last_name: StdString,
    pub gender: Gender,
    /// Opaque to the contract.
    #[serde(rename = "birthdate")]
    pub birth_date: u64,
    pub phone: StdString,
}

impl PatientInfo {
    pub fn validate(&self) -> Result<(), ContractError> {
        validation::validate_field(&self.first_name)?;
        validation::validate_field(&self.last_name)?;
        validation::validate_field(&self.phone)
    }
}

/// A single encounter. `doctor` names the doctor who opened it and never changes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MedicalVisit {
    #[serde(rename = "ID")]
    pub visit_id: u64,
    #[serde(rename = "patient")]
    pub patient_id: u64,
    pub doctor: StdString,
    pub complaint: StdString,
    pub diagnosis: StdString,
    #[serde(rename = "perscription")]
    pub prescription: StdString,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecords {
    pub patient: PatientInfo,
    pub history: Vec<MedicalVisit>,
}

/// Allocates the next patient id and stores the new patient under it.
pub fn register_patient<S: Store>(
    store: &S,
    params: &NewPatient,
) -> Result<PatientInfo, ContractError> {
    let count_key = keys::patient_count_key(store.env());
    let count = store.get_counter(&count_key)?;
    let patient_id = count.checked_add(1).ok_or(ContractError::InternalError)?;

    let patient = PatientInfo {
        patient_id,
        first_name: params.first_name.clone(),
        last_name: params.last_name.clone(),
        gender: params.gender,
        birth_date: params.birth_date,
        phone: params.phone.clone(),
    };

    save_patient(store, &patient)?;
    store.put_counter(&count_key, patient_id)?;
    events::publish_patient_registered(store.env(), patient_id);

    Ok(patient)
}

/// Overwrites an existing patient. The id must already be allocated.
pub fn update_patient<S: Store>(store: &S, patient: &PatientInfo) -> Result<(), ContractError> {
    load_patient(store, patient.patient_id)?;
    save_patient(store, patient)?;
    events::publish_patient_updated(store.env(), patient.patient_id);
    Ok(())
}

/// Returns the patient if the caller, acting as `query.doctor`, holds at least `Info`.
pub fn get_patient<S: Store>(
    store: &S,
    caller: &CallerIdentity,
    query: &PatientQuery,
) -> Result<PatientInfo, ContractError> {
    access::require_access(
        store,
        query.patient_id,
        &query.doctor,
        caller,
        AccessLevel::Info,
    )?;
    load_patient(store, query.patient_id)
}

/// Opens a visit owned by `params.doctor` under the patient's next visit id.
pub fn open_visit<S: Store>(store: &S, params: &NewVisit) -> Result<MedicalVisit, ContractError> {
    load_patient(store, params.patient_id)?;

    let count_key = keys::visit_count_key(store.env(), params.patient_id);
    let count = store.get_counter(&count_key)?;
    let visit_id = count.checked_add(1).ok_or(ContractError::InternalError)?;

    let visit = MedicalVisit {
        visit_id,
        patient_id: params.patient_id,
        doctor: params.doctor.clone(),
        complaint: params.complaint.clone(),
        diagnosis: StdString::new(),
        prescription: StdString::new(),
    };

    save_visit(store, &visit)?;
    store.put_counter(&count_key, visit_id)?;
    events::publish_visit_opened(store.env(), params.patient_id, visit_id, &params.doctor);

    Ok(visit)
}

pub fn set_diagnosis<S: Store>(
    store: &S,
    caller: &CallerIdentity,
    params: &DiagnosisUpdate,
) -> Result<MedicalVisit, ContractError> {
    let mut visit = load_owned_visit(store, caller, params.patient_id, params.visit_id)?;
    visit.diagnosis = params.diagnosis.clone();
    save_visit(store, &visit)?;
    events::publish_diagnosis_set(store.env(), visit.patient_id, visit.visit_id);
    Ok(visit)
}

pub fn set_prescription<S: Store>(
    store: &S,
    caller: &CallerIdentity,
    params: &PrescriptionUpdate,
) -> Result<MedicalVisit, ContractError> {
    let mut visit = load_owned_visit(store, caller, params.patient_id, params.visit_id)?;
    visit.prescription = params.prescription.clone();
    save_visit(store, &visit)?;
    events::publish_prescription_set(store.env(), visit.patient_id, visit.visit_id);
    Ok(visit)
}

/// Returns the patient and every visit `1..=count`, requiring `Full` access.
pub fn medical_records<S: Store>(
    store: &S,
    caller: &CallerIdentity,
    query: &PatientQuery,
) -> Result<MedicalRecords, ContractError> {
    access::require_access(
        store,
        query.patient_id,
        &query.doctor,
        caller,
        AccessLevel::Full,
    )?;

    let patient = load_patient(store, query.patient_id)?;
    let count = visit_count(store, query.patient_id)?;

    let mut history = Vec::new();
    for visit_id in 1..=count {
        // Every id up to the counter was allocated by `open_visit`.
        let visit = find_visit(store, query.patient_id, visit_id)?
            .ok_or(ContractError::InternalError)?;
        history.push(visit);
    }

    Ok(MedicalRecords { patient, history })
}

pub fn patient_count<S: Store>(store: &S) -> Result<u64, ContractError> {
    store.get_counter(&keys::patient_count_key(store.env()))
}

pub fn visit_count<S: Store>(store: &S, patient_id: u64) -> Result<u64, ContractError> {
    store.get_counter(&keys::visit_count_key(store.env(), patient_id))
}

pub fn load_patient<S: Store>(store: &S, patient_id: u64) -> Result<PatientInfo, ContractError> {
    let raw = store
        .get_bytes(&keys::patient_key(store.env(), patient_id))?
        .ok_or(ContractError::NotFound)?;
    codec::from_stored_json(&raw)
}

pub fn find_visit<S: Store>(
    store: &S,
    patient_id: u64,
    visit_id: u64,
) -> Result<Option<MedicalVisit>, ContractError> {
    match store.get_bytes(&keys::visit_key(store.env(), patient_id, visit_id))? {
        Some(raw) => codec::from_stored_json(&raw).map(Some),
        None => Ok(None),
    }
}

/// Loads a visit and checks that the caller is its doctor with `Full` access.
fn load_owned_visit<S: Store>(
    store: &S,
    caller: &CallerIdentity,
    patient_id: u64,
    visit_id: u64,
) -> Result<MedicalVisit, ContractError> {
    let visit = find_visit(store, patient_id, visit_id)?.ok_or(ContractError::NotFound)?;
    access::require_access(
        store,
        visit.patient_id,
        &visit.doctor,
        caller,
        AccessLevel::Full,
    )?;
    Ok(visit)
}

fn save_patient<S: Store>(store: &S, patient: &PatientInfo) -> Result<(), ContractError> {
    let key = keys::patient_key(store.env(), patient.patient_id);
    store.put_bytes(&key, &codec::to_json(store.env(), patient)?)
}

fn save_visit<S: Store>(store: &S, visit: &MedicalVisit) -> Result<(), ContractError> {
    let key = keys::visit_key(store.env(), visit.patient_id, visit.visit_id);
    store.put_bytes(&key, &codec::to_json(store.env(), visit)?)
}
