//! Parameter objects carried in the single JSON argument of each transaction.
//!
//! Field names are wire-visible and match what existing clients send,
//! including the `perscription` spelling.

use alloc::string::String as StdString;
use serde::Deserialize;

use crate::access::AccessLevel;
use crate::records::Gender;
use crate::validation;
use crate::ContractError;

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct NewPatient {
    #[serde(rename = "firstname")]
    pub first_name: StdString,
    #[serde(rename = "lastname")]
    pub last_name: StdString,
    pub gender: Gender,
    #[serde(rename = "birthdate")]
    pub birth_date: u64,
    pub phone: StdString,
}

impl NewPatient {
    pub fn validate(&self) -> Result<(), ContractError> {
        validation::validate_field(&self.first_name)?;
        validation::validate_field(&self.last_name)?;
        validation::validate_field(&self.phone)
    }
}

/// Identifies a patient together with the doctor on whose behalf it is read.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct PatientQuery {
    #[serde(rename = "ID")]
    pub patient_id: u64,
    pub doctor: StdString,
}

impl PatientQuery {
    pub fn validate(&self) -> Result<(), ContractError> {
        validation::validate_doctor_name(&self.doctor)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct NewVisit {
    #[serde(rename = "patient")]
    pub patient_id: u64,
    pub doctor: StdString,
    pub complaint: StdString,
}

impl NewVisit {
    pub fn validate(&self) -> Result<(), ContractError> {
        validation::validate_doctor_name(&self.doctor)?;
        validation::validate_text(&self.complaint)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct DiagnosisUpdate {
    #[serde(rename = "ID")]
    pub visit_id: u64,
    #[serde(rename = "patient")]
    pub patient_id: u64,
    pub diagnosis: StdString,
}

impl DiagnosisUpdate {
    pub fn validate(&self) -> Result<(), ContractError> {
        validation::validate_text(&self.diagnosis)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct PrescriptionUpdate {
    #[serde(rename = "ID")]
    pub visit_id: u64,
    #[serde(rename = "patient")]
    pub patient_id: u64,
    #[serde(rename = "perscription")]
    pub prescription: StdString,
}

impl PrescriptionUpdate {
    pub fn validate(&self) -> Result<(), ContractError> {
        validation::validate_text(&self.prescription)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct DoctorRegistration {
    pub doctor: StdString,
}

impl DoctorRegistration {
    pub fn validate(&self) -> Result<(), ContractError> {
        validation::validate_doctor_name(&self.doctor)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct AccessGrant {
    #[serde(rename = "patient")]
    pub patient_id: u64,
    pub doctor: StdString,
    pub access: u64,
}

impl AccessGrant {
    pub fn validate(&self) -> Result<(), ContractError> {
        validation::validate_doctor_name(&self.doctor)?;
        self.level().map(|_| ())
    }

    pub fn level(&self) -> Result<AccessLevel, ContractError> {
        AccessLevel::from_u64(self.access).ok_or(ContractError::InvalidArgs)
    }
}
