//! Deterministic storage keys.
//!
//! Composite keys are laid out as
//! `0x00 ‖ namespace ‖ 0x00 ‖ (u32-BE length ‖ segment)*`. Namespace tags
//! never contain a zero byte and every segment is length-prefixed, so two
//! distinct `(namespace, segments)` tuples can never produce the same key,
//! whatever bytes the segments hold. Scalar keys never start with `0x00`
//! and therefore cannot collide with composite ones.

use soroban_sdk::{Bytes, Env};

use crate::ContractError;

const COMPOSITE_PREFIX: u8 = 0x00;
const COUNTER_WIDTH: usize = 8;

/// Scalar key holding the number of registered patients.
pub const PATIENT_COUNT: &[u8] = b"PatientCount";

/// Metadata segment naming the ledger owner.
pub const OWNER: &str = "Owner";
/// Metadata segment holding the owner's pinned certificate.
pub const OWNER_CERTIFICATE: &str = "OwnerCertificate";
/// Metadata segment holding the owner's pinned invoker address.
pub const OWNER_INVOKER: &str = "OwnerInvoker";

/// Namespace tags for composite keys.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Namespace {
    Metadata,
    Patient,
    Visit,
    VisitCount,
    DoctorPublicKey,
    DoctorInvoker,
    DoctorAccess,
}

impl Namespace {
    pub fn tag(&self) -> &'static str {
        match self {
            Namespace::Metadata => "Metadata",
            Namespace::Patient => "Patient",
            Namespace::Visit => "Visit",
            Namespace::VisitCount => "VisitCount",
            Namespace::DoctorPublicKey => "DoctorPublicKey",
            Namespace::DoctorInvoker => "DoctorInvoker",
            Namespace::DoctorAccess => "DoctorAccess",
        }
    }
}

/// One component of a composite key.
#[derive(Clone, Copy, Debug)]
pub enum Segment<'a> {
    Text(&'a str),
    /// Rendered as the raw little-endian bytes of the id.
    Id(u64),
}

/// Builds the composite key for `namespace` and `segments`.
pub fn composite_key(env: &Env, namespace: Namespace, segments: &[Segment]) -> Bytes {
    let mut key = Bytes::new(env);
    key.push_back(COMPOSITE_PREFIX);
    key.extend_from_slice(namespace.tag().as_bytes());
    key.push_back(COMPOSITE_PREFIX);

    for segment in segments {
        let id_bytes;
        let raw: &[u8] = match segment {
            Segment::Text(text) => text.as_bytes(),
            Segment::Id(id) => {
                id_bytes = id.to_le_bytes();
                &id_bytes
            }
        };
        // Segments are bounded by validation well below u32::MAX.
        let len = raw.len() as u32;
        key.extend_from_slice(&len.to_be_bytes());
        key.extend_from_slice(raw);
    }

    key
}

pub fn owner_key(env: &Env) -> Bytes {
    composite_key(env, Namespace::Metadata, &[Segment::Text(OWNER)])
}

pub fn owner_certificate_key(env: &Env) -> Bytes {
    composite_key(env, Namespace::Metadata, &[Segment::Text(OWNER_CERTIFICATE)])
}

pub fn owner_invoker_key(env: &Env) -> Bytes {
    composite_key(env, Namespace::Metadata, &[Segment::Text(OWNER_INVOKER)])
}

pub fn patient_count_key(env: &Env) -> Bytes {
    Bytes::from_slice(env, PATIENT_COUNT)
}

pub fn patient_key(env: &Env, patient_id: u64) -> Bytes {
    composite_key(env, Namespace::Patient, &[Segment::Id(patient_id)])
}

pub fn visit_key(env: &Env, patient_id: u64, visit_id: u64) -> Bytes {
    composite_key(
        env,
        Namespace::Visit,
        &[Segment::Id(patient_id), Segment::Id(visit_id)],
    )
}

pub fn visit_count_key(env: &Env, patient_id: u64) -> Bytes {
    composite_key(env, Namespace::VisitCount, &[Segment::Id(patient_id)])
}

pub fn doctor_public_key(env: &Env, doctor: &str) -> Bytes {
    composite_key(env, Namespace::DoctorPublicKey, &[Segment::Text(doctor)])
}

pub fn doctor_invoker_key(env: &Env, doctor: &str) -> Bytes {
    composite_key(env, Namespace::DoctorInvoker, &[Segment::Text(doctor)])
}

pub fn doctor_access_key(env: &Env, doctor: &str, patient_id: u64) -> Bytes {
    composite_key(
        env,
        Namespace::DoctorAccess,
        &[Segment::Text(doctor), Segment::Id(patient_id)],
    )
}

/// Encodes a counter as exactly 8 little-endian bytes.
pub fn encode_counter(env: &Env, value: u64) -> Bytes {
    Bytes::from_slice(env, &value.to_le_bytes())
}

/// Decodes an 8-byte little-endian counter. Any other width is a storage fault.
pub fn decode_counter(raw: &Bytes) -> Result<u64, ContractError> {
    if raw.len() as usize != COUNTER_WIDTH {
        return Err(ContractError::StoreError);
    }
    let mut buf = [0u8; COUNTER_WIDTH];
    raw.copy_into_slice(&mut buf);
    Ok(u64::from_le_bytes(buf))
}
