//! Routing of named transactions to the records and access-control engines.

use alloc::string::String as StdString;
use soroban_sdk::Bytes;

use crate::access;
use crate::codec;
use crate::identity::CallerIdentity;
use crate::params::{
    AccessGrant, DiagnosisUpdate, DoctorRegistration, NewPatient, NewVisit, PatientQuery,
    PrescriptionUpdate,
};
use crate::policy::{self, AuthPolicy};
use crate::records::{self, PatientInfo};
use crate::store::Store;
use crate::ContractError;

pub const REGISTER_PATIENT: &str = "RegisterPatient";
pub const UPDATE_PATIENT_DETAILS: &str = "UpdatePatientDetails";
pub const GET_PATIENT: &str = "GetPatient";
pub const PATIENT_VISIT: &str = "PatientVisit";
pub const SET_DIAGNOSIS: &str = "SetDiagnosis";
pub const SET_PRESCRIPTION: &str = "SetPerscription";
pub const GET_MEDICAL_RECORDS: &str = "GetMedicalRecords";
pub const REGISTER_DOCTOR: &str = "RegisterDoctor";
pub const SET_DOCTOR_ACCESS: &str = "SetDoctorAccess";

/// A transaction with its decoded, validated parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Transaction {
    RegisterPatient(NewPatient),
    UpdatePatientDetails(PatientInfo),
    GetPatient(PatientQuery),
    PatientVisit(NewVisit),
    SetDiagnosis(DiagnosisUpdate),
    SetPrescription(PrescriptionUpdate),
    GetMedicalRecords(PatientQuery),
    RegisterDoctor(DoctorRegistration),
    SetDoctorAccess(AccessGrant),
}

impl Transaction {
    /// Decodes `args`, which must hold exactly one JSON object, into the
    /// parameter shape of `function`.
    pub fn parse(function: &str, args: &[StdString]) -> Result<Self, ContractError> {
        let arg = match args {
            [arg] => arg.as_str(),
            _ => return Err(ContractError::InvalidArgs),
        };

        let tx = match function {
            REGISTER_PATIENT => Transaction::RegisterPatient(codec::from_arg_json(arg)?),
            UPDATE_PATIENT_DETAILS => {
                Transaction::UpdatePatientDetails(codec::from_arg_json(arg)?)
            }
            GET_PATIENT => Transaction::GetPatient(codec::from_arg_json(arg)?),
            PATIENT_VISIT => Transaction::PatientVisit(codec::from_arg_json(arg)?),
            SET_DIAGNOSIS => Transaction::SetDiagnosis(codec::from_arg_json(arg)?),
            SET_PRESCRIPTION => Transaction::SetPrescription(codec::from_arg_json(arg)?),
            GET_MEDICAL_RECORDS => Transaction::GetMedicalRecords(codec::from_arg_json(arg)?),
            REGISTER_DOCTOR => Transaction::RegisterDoctor(codec::from_arg_json(arg)?),
            SET_DOCTOR_ACCESS => Transaction::SetDoctorAccess(codec::from_arg_json(arg)?),
            _ => return Err(ContractError::InvalidArgs),
        };

        tx.validate()?;
        Ok(tx)
    }

    fn validate(&self) -> Result<(), ContractError> {
        match self {
            Transaction::RegisterPatient(params) => params.validate(),
            Transaction::UpdatePatientDetails(patient) => patient.validate(),
            Transaction::GetPatient(query) | Transaction::GetMedicalRecords(query) => {
                query.validate()
            }
            Transaction::PatientVisit(params) => params.validate(),
            Transaction::SetDiagnosis(params) => params.validate(),
            Transaction::SetPrescription(params) => params.validate(),
            Transaction::RegisterDoctor(params) => params.validate(),
            Transaction::SetDoctorAccess(grant) => grant.validate(),
        }
    }
}

/// Runs `tx` for `caller` and returns its JSON payload, empty when the
/// transaction has none.
pub fn execute<S: Store>(
    store: &S,
    auth_policy: AuthPolicy,
    caller: &CallerIdentity,
    tx: &Transaction,
) -> Result<Bytes, ContractError> {
    let env = store.env();

    match tx {
        Transaction::RegisterPatient(params) => {
            policy::authorize_write(store, auth_policy, caller)?;
            let patient = records::register_patient(store, params)?;
            codec::to_json(env, &patient)
        }
        Transaction::UpdatePatientDetails(patient) => {
            policy::authorize_write(store, auth_policy, caller)?;
            records::update_patient(store, patient)?;
            Ok(Bytes::new(env))
        }
        Transaction::GetPatient(query) => {
            let patient = records::get_patient(store, caller, query)?;
            codec::to_json(env, &patient)
        }
        Transaction::PatientVisit(params) => {
            policy::authorize_write(store, auth_policy, caller)?;
            let visit = records::open_visit(store, params)?;
            codec::to_json(env, &visit)
        }
        Transaction::SetDiagnosis(params) => {
            let visit = records::set_diagnosis(store, caller, params)?;
            codec::to_json(env, &visit)
        }
        Transaction::SetPrescription(params) => {
            let visit = records::set_prescription(store, caller, params)?;
            codec::to_json(env, &visit)
        }
        Transaction::GetMedicalRecords(query) => {
            let medical_records = records::medical_records(store, caller, query)?;
            codec::to_json(env, &medical_records)
        }
        Transaction::RegisterDoctor(params) => {
            access::register_doctor(store, &params.doctor, caller)?;
            Ok(Bytes::new(env))
        }
        Transaction::SetDoctorAccess(grant) => {
            policy::authorize_grant(store, caller)?;
            access::set_access(store, grant.patient_id, &grant.doctor, grant.level()?)?;
            Ok(Bytes::new(env))
        }
    }
}
