#![no_std]
//! Medical records held on the ledger: patients, visits, and per-doctor
//! access grants, driven through nine named JSON transactions.

extern crate alloc;

pub mod access;
pub mod codec;
pub mod dispatch;
pub mod errors;
pub mod events;
pub mod identity;
pub mod keys;
pub mod params;
pub mod policy;
pub mod records;
pub mod store;
pub mod validation;

use alloc::vec::Vec as StdVec;
use soroban_sdk::{contract, contractimpl, Bytes, Env, String, Vec};

pub use access::AccessLevel;
pub use dispatch::Transaction;
pub use errors::{ContractError, ErrorCategory, ErrorSeverity};
pub use identity::{CallerIdentity, SerializedIdentity};
pub use policy::AuthPolicy;
pub use records::{Gender, MedicalRecords, MedicalVisit, PatientInfo};
pub use store::{LedgerStore, Store};

#[contract]
pub struct MedicalRecordsContract;

#[contractimpl]
impl MedicalRecordsContract {
    /// Records the creator as the ledger owner and selects the authorization policy.
    ///
    /// `AuthPolicy::Open` leaves patient and visit writes ungated for
    /// compatibility with unguarded deployments; access grants stay owner-only.
    pub fn initialize(
        env: Env,
        creator: SerializedIdentity,
        auth_policy: AuthPolicy,
    ) -> Result<(), ContractError> {
        if Self::is_initialized(env.clone()) {
            return Err(ContractError::AlreadyInitialized);
        }

        let caller = identity::resolve(&creator)?;
        let store = LedgerStore::new(&env);

        policy::set_owner(&store, &caller)?;
        policy::save(&env, auth_policy);

        events::publish_initialized(&env, &caller.common_name, auth_policy);

        Ok(())
    }

    /// Check if the contract is initialized
    pub fn is_initialized(env: Env) -> bool {
        policy::load(&env).is_ok()
    }

    /// Runs the transaction `function` with its single JSON argument and
    /// returns the JSON payload (empty for transactions without one).
    pub fn dispatch(
        env: Env,
        creator: SerializedIdentity,
        function: String,
        args: Vec<String>,
    ) -> Result<Bytes, ContractError> {
        let result = run_transaction(&env, &creator, &function, &args);
        if let Err(err) = result {
            errors::log_failure(&env, &function, err);
        }
        result
    }

    /// Common name of the principal that initialized the contract.
    pub fn owner(env: Env) -> Result<String, ContractError> {
        let owner = policy::owner(&LedgerStore::new(&env))?;
        Ok(String::from_str(&env, &owner))
    }

    pub fn auth_policy(env: Env) -> Result<AuthPolicy, ContractError> {
        policy::load(&env)
    }

    /// Switches the authorization policy. Owner only.
    pub fn set_auth_policy(
        env: Env,
        creator: SerializedIdentity,
        auth_policy: AuthPolicy,
    ) -> Result<(), ContractError> {
        policy::load(&env)?;
        let caller = identity::resolve(&creator)?;
        policy::require_owner(&LedgerStore::new(&env), &caller)?;

        policy::save(&env, auth_policy);
        events::publish_policy_changed(&env, auth_policy);

        Ok(())
    }

    /// Number of patients registered so far, which is also the highest patient id.
    pub fn patient_count(env: Env) -> Result<u64, ContractError> {
        records::patient_count(&LedgerStore::new(&env))
    }

    /// Resolves an error code returned by `dispatch` to its stable message.
    pub fn error_message(env: Env, code: u32) -> Result<String, ContractError> {
        let error = ContractError::from_code(code).ok_or(ContractError::InvalidArgs)?;
        Ok(String::from_str(&env, error.message()))
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }
}

fn run_transaction(
    env: &Env,
    creator: &SerializedIdentity,
    function: &String,
    args: &Vec<String>,
) -> Result<Bytes, ContractError> {
    let auth_policy = policy::load(env)?;
    let caller = identity::resolve(creator)?;

    let function = codec::to_std_string(function)?;
    let mut decoded = StdVec::new();
    for arg in args.iter() {
        decoded.push(codec::to_std_string(&arg)?);
    }

    let tx = Transaction::parse(&function, &decoded)?;
    dispatch::execute(&LedgerStore::new(env), auth_policy, &caller, &tx)
}

#[cfg(test)]
mod test;
