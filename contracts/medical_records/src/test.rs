#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

extern crate std;

use super::*;
use crate::keys::{Namespace, Segment};
use crate::params::{DiagnosisUpdate, NewPatient, NewVisit, PatientQuery};
use alloc::string::{String as StdString, ToString};
use alloc::vec;
use soroban_sdk::{testutils::Address as _, Address, Bytes, Env};

const CERT_A: &[u8] = b"-----BEGIN CERTIFICATE-----\nMIIBdr.a\n-----END CERTIFICATE-----\n";
const CERT_B: &[u8] = b"-----BEGIN CERTIFICATE-----\nMIIBdr.b\n-----END CERTIFICATE-----\n";

/// Store that fails reads or writes on demand.
struct FaultyStore {
    inner: LedgerStore,
    fail_reads: bool,
    fail_writes: bool,
}

impl Store for FaultyStore {
    fn env(&self) -> &Env {
        self.inner.env()
    }

    fn get_bytes(&self, key: &Bytes) -> Result<Option<Bytes>, ContractError> {
        if self.fail_reads {
            return Err(ContractError::StoreError);
        }
        self.inner.get_bytes(key)
    }

    fn put_bytes(&self, key: &Bytes, value: &Bytes) -> Result<(), ContractError> {
        if self.fail_writes {
            return Err(ContractError::StoreError);
        }
        self.inner.put_bytes(key, value)
    }
}

fn with_store<T>(f: impl FnOnce(&Env, &LedgerStore) -> T) -> T {
    let env = Env::default();
    let contract_id = env.register(MedicalRecordsContract, ());
    env.as_contract(&contract_id, || {
        let store = LedgerStore::new(&env);
        f(&env, &store)
    })
}

/// A caller with a fresh invoker address.
fn caller(env: &Env, name: &str, cert: &[u8]) -> CallerIdentity {
    CallerIdentity {
        common_name: name.to_string(),
        certificate: Bytes::from_slice(env, cert),
        invoker: identity::invoker_bytes(&Address::generate(env)),
    }
}

fn new_patient(first_name: &str) -> NewPatient {
    NewPatient {
        first_name: first_name.to_string(),
        last_name: "Doe".to_string(),
        gender: Gender::Male,
        birth_date: 19700101,
        phone: "555-0100".to_string(),
    }
}

// ── Key codec ────────────────────────────────────────────────────────────────

#[test]
fn test_composite_key_is_deterministic() {
    let env = Env::default();
    let a = keys::composite_key(&env, Namespace::Visit, &[Segment::Id(1), Segment::Id(2)]);
    let b = keys::composite_key(&env, Namespace::Visit, &[Segment::Id(1), Segment::Id(2)]);
    assert_eq!(a, b);
}

#[test]
fn test_composite_key_layout() {
    let env = Env::default();
    let key = keys::composite_key(&env, Namespace::Patient, &[Segment::Id(1)]);

    let mut expected = vec![0u8];
    expected.extend_from_slice(b"Patient");
    expected.push(0);
    expected.extend_from_slice(&8u32.to_be_bytes());
    expected.extend_from_slice(&1u64.to_le_bytes());

    assert_eq!(key, Bytes::from_slice(&env, &expected));
}

#[test]
fn test_composite_key_segments_do_not_collide() {
    let env = Env::default();

    // Same concatenated bytes, different segmentation.
    let split = keys::composite_key(
        &env,
        Namespace::DoctorPublicKey,
        &[Segment::Text("ab"), Segment::Text("c")],
    );
    let joined = keys::composite_key(
        &env,
        Namespace::DoctorPublicKey,
        &[Segment::Text("a"), Segment::Text("bc")],
    );
    assert_ne!(split, joined);

    let by_id = keys::doctor_access_key(&env, "dr.a", 1);
    let other_patient = keys::doctor_access_key(&env, "dr.a", 256);
    assert_ne!(by_id, other_patient);

    // Namespaces never collide with each other or with scalar keys.
    assert_ne!(keys::patient_key(&env, 1), keys::visit_count_key(&env, 1));
    assert_ne!(
        keys::patient_count_key(&env),
        keys::composite_key(&env, Namespace::Metadata, &[Segment::Text("PatientCount")])
    );
}

#[test]
fn test_counter_codec() {
    let env = Env::default();
    let raw = keys::encode_counter(&env, 0x0102_0304_0506_0708);
    assert_eq!(raw.len(), 8);
    assert_eq!(raw.get(0), Some(0x08));
    assert_eq!(keys::decode_counter(&raw), Ok(0x0102_0304_0506_0708));

    let short = Bytes::from_slice(&env, &[1, 2, 3]);
    assert_eq!(keys::decode_counter(&short), Err(ContractError::StoreError));
}

// ── Store adapter ────────────────────────────────────────────────────────────

#[test]
fn test_store_missing_keys() {
    with_store(|env, store| {
        let key = keys::patient_key(env, 42);
        assert_eq!(store.get_bytes(&key), Ok(None));
        assert_eq!(store.get_counter(&keys::patient_count_key(env)), Ok(0));
    });
}

#[test]
fn test_store_counter_round_trip() {
    with_store(|env, store| {
        let key = keys::visit_count_key(env, 7);
        store.put_counter(&key, 41).unwrap();
        assert_eq!(store.get_counter(&key), Ok(41));
        assert_eq!(store.get_bytes(&key).unwrap().unwrap().len(), 8);
    });
}

#[test]
fn test_corrupt_counter_is_store_error() {
    with_store(|env, store| {
        let key = keys::patient_count_key(env);
        store
            .put_bytes(&key, &Bytes::from_slice(env, b"bad"))
            .unwrap();
        assert_eq!(
            records::register_patient(store, &new_patient("J")),
            Err(ContractError::StoreError)
        );
    });
}

#[test]
fn test_store_failures_propagate() {
    with_store(|env, store| {
        let failing_writes = FaultyStore {
            inner: store.clone(),
            fail_reads: false,
            fail_writes: true,
        };
        assert_eq!(
            records::register_patient(&failing_writes, &new_patient("J")),
            Err(ContractError::StoreError)
        );
        assert_eq!(
            access::register_doctor(&failing_writes, "dr.a", &caller(env, "dr.a", CERT_A)),
            Err(ContractError::StoreError)
        );

        let failing_reads = FaultyStore {
            inner: store.clone(),
            fail_reads: true,
            fail_writes: false,
        };
        assert_eq!(
            access::check_access(&failing_reads, 1, "dr.a", &caller(env, "dr.a", CERT_A)),
            Err(ContractError::StoreError)
        );
        assert_eq!(
            records::patient_count(&failing_reads),
            Err(ContractError::StoreError)
        );
    });
}

// ── Access control ───────────────────────────────────────────────────────────

#[test]
fn test_access_levels_are_ordered() {
    assert!(AccessLevel::None < AccessLevel::Info);
    assert!(AccessLevel::Info < AccessLevel::Full);
    assert_eq!(AccessLevel::from_u64(2), Some(AccessLevel::Full));
    assert_eq!(AccessLevel::from_u64(3), None);
    assert_eq!(AccessLevel::Info.as_u64(), 1);
}

#[test]
fn test_register_doctor_pins_first_certificate() {
    with_store(|env, store| {
        let dr_a = caller(env, "dr.a", CERT_A);
        let other = caller(env, "dr.a", CERT_B);

        assert_eq!(access::register_doctor(store, "dr.a", &dr_a), Ok(true));
        assert_eq!(
            access::register_doctor(store, "dr.a", &other),
            Err(ContractError::AlreadyExists)
        );

        assert_eq!(
            access::check_access(store, 1, "dr.a", &dr_a),
            Ok(AccessLevel::None)
        );
        assert_eq!(
            access::check_access(store, 1, "dr.a", &other),
            Err(ContractError::InvalidCaller)
        );
        assert_eq!(
            access::check_access(store, 1, "dr.b", &other),
            Err(ContractError::NotRegistered)
        );
    });
}

#[test]
fn test_pinned_certificate_from_another_invoker_is_rejected() {
    with_store(|env, store| {
        let dr_a = caller(env, "dr.a", CERT_A);
        // Same name and certificate bytes, different authenticated address.
        let replayed = caller(env, "dr.a", CERT_A);

        access::register_doctor(store, "dr.a", &dr_a).unwrap();
        access::set_access(store, 1, "dr.a", AccessLevel::Full).unwrap();

        assert_eq!(
            access::check_access(store, 1, "dr.a", &dr_a),
            Ok(AccessLevel::Full)
        );
        assert_eq!(
            access::check_access(store, 1, "dr.a", &replayed),
            Err(ContractError::InvalidCaller)
        );
        assert_eq!(access::is_pinned_doctor(store, &dr_a), Ok(true));
        assert_eq!(access::is_pinned_doctor(store, &replayed), Ok(false));
    });
}

#[test]
fn test_doctor_without_pinned_invoker_is_internal_error() {
    with_store(|env, store| {
        let dr_a = caller(env, "dr.a", CERT_A);
        store
            .put_bytes(&keys::doctor_public_key(env, "dr.a"), &dr_a.certificate)
            .unwrap();

        assert_eq!(
            access::check_access(store, 1, "dr.a", &dr_a),
            Err(ContractError::InternalError)
        );
    });
}

// ── Owner and policy ─────────────────────────────────────────────────────────

#[test]
fn test_owner_requires_pinned_invoker() {
    with_store(|env, store| {
        let owner = caller(env, "hospital-admin", CERT_A);
        let replayed = caller(env, "hospital-admin", CERT_A);
        let forged = caller(env, "hospital-admin", CERT_B);

        policy::set_owner(store, &owner).unwrap();
        assert_eq!(
            policy::set_owner(store, &replayed),
            Err(ContractError::AlreadyInitialized)
        );

        assert_eq!(policy::is_owner(store, &owner), Ok(true));
        assert_eq!(policy::is_owner(store, &replayed), Ok(false));
        assert_eq!(policy::is_owner(store, &forged), Ok(false));
        assert_eq!(
            policy::require_owner(store, &replayed),
            Err(ContractError::Unauthorized)
        );
        assert_eq!(policy::owner(store), Ok("hospital-admin".to_string()));
    });
}

#[test]
fn test_grant_is_owner_only_under_every_policy() {
    with_store(|env, store| {
        let owner = caller(env, "hospital-admin", CERT_A);
        let stranger = caller(env, "stranger", CERT_B);
        policy::set_owner(store, &owner).unwrap();

        assert_eq!(policy::authorize_grant(store, &owner), Ok(()));
        assert_eq!(
            policy::authorize_grant(store, &stranger),
            Err(ContractError::Unauthorized)
        );

        // Open only lifts the gate on patient and visit writes.
        assert_eq!(
            policy::authorize_write(store, AuthPolicy::Open, &stranger),
            Ok(())
        );
        assert_eq!(
            policy::authorize_write(store, AuthPolicy::Restricted, &stranger),
            Err(ContractError::Unauthorized)
        );
    });
}

#[test]
fn test_set_access_reports_changes() {
    with_store(|env, store| {
        let cert = caller(env, "dr.a", CERT_A);
        access::register_doctor(store, "dr.a", &cert).unwrap();

        assert_eq!(access::set_access(store, 1, "dr.a", AccessLevel::None), Ok(false));
        assert_eq!(access::set_access(store, 1, "dr.a", AccessLevel::Info), Ok(true));
        assert_eq!(access::set_access(store, 1, "dr.a", AccessLevel::Info), Ok(false));
        assert_eq!(access::check_access(store, 1, "dr.a", &cert), Ok(AccessLevel::Info));

        assert_eq!(access::set_access(store, 1, "dr.a", AccessLevel::Full), Ok(true));
        assert_eq!(access::check_access(store, 1, "dr.a", &cert), Ok(AccessLevel::Full));
        assert_eq!(access::check_access(store, 2, "dr.a", &cert), Ok(AccessLevel::None));

        let key = keys::doctor_access_key(env, "dr.a", 1);
        assert_eq!(store.get_counter(&key), Ok(2));
    });
}

#[test]
fn test_out_of_range_stored_level_is_internal_error() {
    with_store(|env, store| {
        let cert = caller(env, "dr.a", CERT_A);
        access::register_doctor(store, "dr.a", &cert).unwrap();
        store
            .put_counter(&keys::doctor_access_key(env, "dr.a", 1), 9)
            .unwrap();

        assert_eq!(
            access::check_access(store, 1, "dr.a", &cert),
            Err(ContractError::InternalError)
        );
    });
}

// ── Records engine ───────────────────────────────────────────────────────────

#[test]
fn test_register_patient_allocates_sequential_ids() {
    with_store(|env, store| {
        let first = records::register_patient(store, &new_patient("Ann")).unwrap();
        let second = records::register_patient(store, &new_patient("Bob")).unwrap();

        assert_eq!(first.patient_id, 1);
        assert_eq!(second.patient_id, 2);
        assert_eq!(records::patient_count(store), Ok(2));
        assert_eq!(records::load_patient(store, 1), Ok(first));
        assert_eq!(records::load_patient(store, 2), Ok(second));
        assert!(store.get_bytes(&keys::patient_key(env, 3)).unwrap().is_none());
    });
}

#[test]
fn test_visits_and_history() {
    with_store(|env, store| {
        let doctor = caller(env, "dr.a", CERT_A);
        records::register_patient(store, &new_patient("Ann")).unwrap();
        access::register_doctor(store, "dr.a", &doctor).unwrap();
        access::set_access(store, 1, "dr.a", AccessLevel::Full).unwrap();

        for expected in 1..=3u64 {
            let visit = records::open_visit(
                store,
                &NewVisit {
                    patient_id: 1,
                    doctor: "dr.a".to_string(),
                    complaint: "cough".to_string(),
                },
            )
            .unwrap();
            assert_eq!(visit.visit_id, expected);
            assert_eq!(visit.diagnosis, "");
        }

        let query = PatientQuery {
            patient_id: 1,
            doctor: "dr.a".to_string(),
        };
        let history = records::medical_records(store, &doctor, &query).unwrap();
        let ids: std::vec::Vec<u64> = history.history.iter().map(|v| v.visit_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(history.patient.patient_id, 1);
    });
}

#[test]
fn test_visit_for_unknown_patient_is_rejected() {
    with_store(|_env, store| {
        let result = records::open_visit(
            store,
            &NewVisit {
                patient_id: 5,
                doctor: "dr.a".to_string(),
                complaint: "cough".to_string(),
            },
        );
        assert_eq!(result, Err(ContractError::NotFound));
        assert_eq!(records::visit_count(store, 5), Ok(0));
    });
}

#[test]
fn test_only_visit_doctor_may_diagnose() {
    with_store(|env, store| {
        let dr_a = caller(env, "dr.a", CERT_A);
        let dr_b = caller(env, "dr.b", CERT_B);
        records::register_patient(store, &new_patient("Ann")).unwrap();
        access::register_doctor(store, "dr.a", &dr_a).unwrap();
        access::register_doctor(store, "dr.b", &dr_b).unwrap();
        access::set_access(store, 1, "dr.a", AccessLevel::Full).unwrap();
        access::set_access(store, 1, "dr.b", AccessLevel::Full).unwrap();

        records::open_visit(
            store,
            &NewVisit {
                patient_id: 1,
                doctor: "dr.a".to_string(),
                complaint: "cough".to_string(),
            },
        )
        .unwrap();

        let update = DiagnosisUpdate {
            visit_id: 1,
            patient_id: 1,
            diagnosis: "flu".to_string(),
        };

        // dr.b has Full access but does not own the visit.
        assert_eq!(
            records::set_diagnosis(store, &dr_b, &update),
            Err(ContractError::InvalidCaller)
        );

        let visit = records::set_diagnosis(store, &dr_a, &update).unwrap();
        assert_eq!(visit.diagnosis, "flu");
        assert_eq!(visit.doctor, "dr.a");
        assert_eq!(
            records::find_visit(store, 1, 1).unwrap().unwrap().diagnosis,
            "flu"
        );
    });
}

#[test]
fn test_update_unknown_patient_is_not_found() {
    with_store(|_env, store| {
        let patient = PatientInfo {
            patient_id: 3,
            first_name: "J".to_string(),
            last_name: "Doe".to_string(),
            gender: Gender::Unspecified,
            birth_date: 0,
            phone: StdString::new(),
        };
        assert_eq!(
            records::update_patient(store, &patient),
            Err(ContractError::NotFound)
        );
    });
}

#[test]
fn test_missing_visit_inside_counter_range_is_internal_error() {
    with_store(|env, store| {
        let dr_a = caller(env, "dr.a", CERT_A);
        records::register_patient(store, &new_patient("Ann")).unwrap();
        access::register_doctor(store, "dr.a", &dr_a).unwrap();
        access::set_access(store, 1, "dr.a", AccessLevel::Full).unwrap();
        store.put_counter(&keys::visit_count_key(env, 1), 2).unwrap();

        let query = PatientQuery {
            patient_id: 1,
            doctor: "dr.a".to_string(),
        };
        assert_eq!(
            records::medical_records(store, &dr_a, &query),
            Err(ContractError::InternalError)
        );
    });
}

// ── JSON shapes ──────────────────────────────────────────────────────────────

#[test]
fn test_patient_json_field_names() {
    let patient = PatientInfo {
        patient_id: 1,
        first_name: "J".to_string(),
        last_name: "Doe".to_string(),
        gender: Gender::Female,
        birth_date: 19700101,
        phone: "x".to_string(),
    };
    let json = serde_json::to_string(&patient).unwrap();
    assert_eq!(
        json,
        r#"{"ID":1,"firstname":"J","lastname":"Doe","gender":2,"birthdate":19700101,"phone":"x"}"#
    );

    let decoded: PatientInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, patient);
}

#[test]
fn test_visit_json_keeps_perscription_spelling() {
    let visit = MedicalVisit {
        visit_id: 1,
        patient_id: 1,
        doctor: "dr.a".to_string(),
        complaint: "cough".to_string(),
        diagnosis: StdString::new(),
        prescription: "rest".to_string(),
    };
    let json = serde_json::to_string(&visit).unwrap();
    assert_eq!(
        json,
        r#"{"ID":1,"patient":1,"doctor":"dr.a","complaint":"cough","diagnosis":"","perscription":"rest"}"#
    );
}

#[test]
fn test_gender_out_of_range_is_rejected() {
    let result: Result<NewPatient, _> = serde_json::from_str(
        r#"{"firstname":"J","lastname":"Doe","gender":3,"birthdate":0,"phone":""}"#,
    );
    assert!(result.is_err());
}

// ── Parsing ──────────────────────────────────────────────────────────────────

fn one(arg: &str) -> std::vec::Vec<StdString> {
    vec![arg.to_string()]
}

#[test]
fn test_parse_every_transaction() {
    let patient = r#"{"firstname":"J","lastname":"Doe","gender":1,"birthdate":19700101,"phone":"x"}"#;
    let update = r#"{"ID":1,"firstname":"J","lastname":"Doe","gender":1,"birthdate":19700101,"phone":"x"}"#;
    let query = r#"{"ID":1,"doctor":"dr.a"}"#;

    let parse = |name: &str, arg: &str| Transaction::parse(name, &one(arg)).unwrap();

    assert!(matches!(parse("RegisterPatient", patient), Transaction::RegisterPatient(_)));
    assert!(matches!(
        parse("UpdatePatientDetails", update),
        Transaction::UpdatePatientDetails(_)
    ));
    assert!(matches!(parse("GetPatient", query), Transaction::GetPatient(_)));
    assert!(matches!(
        parse("PatientVisit", r#"{"patient":1,"doctor":"dr.a","complaint":"cough"}"#),
        Transaction::PatientVisit(_)
    ));
    assert!(matches!(
        parse("SetDiagnosis", r#"{"ID":1,"patient":1,"diagnosis":"flu"}"#),
        Transaction::SetDiagnosis(_)
    ));
    assert!(matches!(
        parse("SetPerscription", r#"{"ID":1,"patient":1,"perscription":"rest"}"#),
        Transaction::SetPrescription(_)
    ));
    assert!(matches!(
        parse("GetMedicalRecords", query),
        Transaction::GetMedicalRecords(_)
    ));
    assert!(matches!(
        parse("RegisterDoctor", r#"{"doctor":"dr.a"}"#),
        Transaction::RegisterDoctor(_)
    ));
    assert!(matches!(
        parse("SetDoctorAccess", r#"{"patient":1,"doctor":"dr.a","access":2}"#),
        Transaction::SetDoctorAccess(_)
    ));
}

#[test]
fn test_parse_typed_parameters() {
    let tx = Transaction::parse(
        "SetPerscription",
        &one(r#"{"ID":4,"patient":2,"perscription":"rest","extra":true}"#),
    )
    .unwrap();

    match tx {
        Transaction::SetPrescription(params) => {
            assert_eq!(params.visit_id, 4);
            assert_eq!(params.patient_id, 2);
            assert_eq!(params.prescription, "rest");
        }
        other => panic!("unexpected transaction {:?}", other),
    }
}

#[test]
fn test_parse_rejects_bad_input() {
    let valid = r#"{"doctor":"dr.a"}"#;

    assert_eq!(
        Transaction::parse("RegisterDoctor", &[]),
        Err(ContractError::InvalidArgs)
    );
    assert_eq!(
        Transaction::parse("RegisterDoctor", &[valid.to_string(), valid.to_string()]),
        Err(ContractError::InvalidArgs)
    );
    assert_eq!(
        Transaction::parse("DeletePatient", &one(valid)),
        Err(ContractError::InvalidArgs)
    );
    assert_eq!(
        Transaction::parse("RegisterDoctor", &one("{not json")),
        Err(ContractError::InvalidArgs)
    );
    assert_eq!(
        Transaction::parse("RegisterDoctor", &one(r#"{"doctor":""}"#)),
        Err(ContractError::InvalidArgs)
    );
    assert_eq!(
        Transaction::parse("GetPatient", &one(r#"{"ID":1}"#)),
        Err(ContractError::InvalidArgs)
    );
    assert_eq!(
        Transaction::parse(
            "SetDoctorAccess",
            &one(r#"{"patient":1,"doctor":"dr.a","access":3}"#)
        ),
        Err(ContractError::InvalidArgs)
    );
    assert_eq!(
        Transaction::parse(
            "SetDoctorAccess",
            &one(r#"{"patient":1,"doctor":"dr.a","access":-1}"#)
        ),
        Err(ContractError::InvalidArgs)
    );
}

#[test]
fn test_parse_enforces_length_limits() {
    let long_complaint = "a".repeat(4097);
    let arg = std::format!(
        r#"{{"patient":1,"doctor":"dr.a","complaint":"{}"}}"#,
        long_complaint
    );
    assert_eq!(
        Transaction::parse("PatientVisit", &one(&arg)),
        Err(ContractError::InvalidArgs)
    );

    let long_doctor = "d".repeat(129);
    let arg = std::format!(r#"{{"doctor":"{}"}}"#, long_doctor);
    assert_eq!(
        Transaction::parse("RegisterDoctor", &one(&arg)),
        Err(ContractError::InvalidArgs)
    );
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(ContractError::NotInitialized as u32, 1);
    assert_eq!(ContractError::InvalidArgs as u32, 3);
    assert_eq!(ContractError::NotFound as u32, 4);
    assert_eq!(ContractError::AlreadyExists as u32, 5);
    assert_eq!(ContractError::NotRegistered as u32, 6);
    assert_eq!(ContractError::InvalidCaller as u32, 7);
    assert_eq!(ContractError::Forbidden as u32, 8);
    assert_eq!(ContractError::StoreError as u32, 9);
    assert_eq!(ContractError::InternalError as u32, 10);
    assert_eq!(ContractError::Unauthorized as u32, 12);

    for code in 1..=12u32 {
        let error = ContractError::from_code(code).unwrap();
        assert_eq!(error as u32, code);
        assert!(!error.message().is_empty());
    }
    assert_eq!(ContractError::from_code(0), None);
    assert_eq!(ContractError::from_code(13), None);
}

#[test]
fn test_error_classification() {
    assert_eq!(ContractError::Forbidden.category(), ErrorCategory::Authorization);
    assert_eq!(ContractError::NotFound.category(), ErrorCategory::NotFound);
    assert_eq!(ContractError::StoreError.category(), ErrorCategory::Storage);
    assert_eq!(ContractError::InternalError.severity(), ErrorSeverity::Critical);
    assert!(ContractError::StoreError.retryable());
    assert!(!ContractError::Forbidden.retryable());
}
