use soroban_sdk::{contracterror, contracttype, log, Env, String};

/// Error categories for classifying different types of errors
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Malformed arguments or unknown transaction names
    Validation = 1,
    /// Certificate pinning, access level and policy failures
    Authorization = 2,
    /// Resource lookup failures
    NotFound = 3,
    /// Duplicate registrations and lifecycle conflicts
    StateConflict = 4,
    /// Storage operation failures
    Storage = 5,
    /// Broken invariants
    System = 6,
}

/// Error severity levels indicating the impact and urgency of errors
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorSeverity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

/// Every failure a transaction can report to the host.
///
/// The discriminants and [`ContractError::message`] strings are part of the
/// observable interface for off-chain clients and must stay stable.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidArgs = 3,
    NotFound = 4,
    AlreadyExists = 5,
    NotRegistered = 6,
    InvalidCaller = 7,
    Forbidden = 8,
    StoreError = 9,
    InternalError = 10,
    IdentityUnavailable = 11,
    Unauthorized = 12,
}

impl ContractError {
    /// Resolves a numeric code back to its error, if the code is known.
    pub fn from_code(code: u32) -> Option<Self> {
        let err = match code {
            1 => ContractError::NotInitialized,
            2 => ContractError::AlreadyInitialized,
            3 => ContractError::InvalidArgs,
            4 => ContractError::NotFound,
            5 => ContractError::AlreadyExists,
            6 => ContractError::NotRegistered,
            7 => ContractError::InvalidCaller,
            8 => ContractError::Forbidden,
            9 => ContractError::StoreError,
            10 => ContractError::InternalError,
            11 => ContractError::IdentityUnavailable,
            12 => ContractError::Unauthorized,
            _ => return None,
        };
        Some(err)
    }

    /// Returns the error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized | ContractError::InvalidArgs => {
                ErrorCategory::Validation
            }
            ContractError::InvalidCaller
            | ContractError::Forbidden
            | ContractError::IdentityUnavailable
            | ContractError::Unauthorized => ErrorCategory::Authorization,
            ContractError::NotFound | ContractError::NotRegistered => ErrorCategory::NotFound,
            ContractError::AlreadyInitialized | ContractError::AlreadyExists => {
                ErrorCategory::StateConflict
            }
            ContractError::StoreError => ErrorCategory::Storage,
            ContractError::InternalError => ErrorCategory::System,
        }
    }

    /// Returns the severity level for this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::InvalidArgs
            | ContractError::NotFound
            | ContractError::AlreadyExists
            | ContractError::NotRegistered => ErrorSeverity::Low,
            ContractError::Forbidden
            | ContractError::IdentityUnavailable
            | ContractError::Unauthorized => ErrorSeverity::Medium,
            // Certificate mismatch is an impersonation attempt.
            ContractError::InvalidCaller | ContractError::StoreError => ErrorSeverity::High,
            ContractError::InternalError => ErrorSeverity::Critical,
        }
    }

    /// Returns whether resubmitting the same transaction may succeed.
    pub fn retryable(&self) -> bool {
        matches!(self, ContractError::StoreError)
    }

    /// Returns the stable, human-readable message for this error.
    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract has not been initialized",
            ContractError::AlreadyInitialized => "Contract is already initialized",
            ContractError::InvalidArgs => "Invalid transaction arguments",
            ContractError::NotFound => "Record not found",
            ContractError::AlreadyExists => "Already registered",
            ContractError::NotRegistered => "Doctor not registered",
            ContractError::InvalidCaller => "Invalid caller certificate",
            ContractError::Forbidden => "Caller does not have access to patient info",
            ContractError::StoreError => "Storage operation failed",
            ContractError::InternalError => "Internal invariant violated",
            ContractError::IdentityUnavailable => "Error getting caller data",
            ContractError::Unauthorized => "Caller is not authorized for this transaction",
        }
    }
}

/// Writes a diagnostic log line for a failed transaction.
///
/// Failed invocations are rolled back by the host, so nothing is persisted
/// here; the line only shows up in diagnostic output.
pub fn log_failure(env: &Env, function: &String, error: ContractError) {
    log!(
        env,
        "transaction failed",
        function.clone(),
        error as u32,
        error.category() as u32,
        error.severity() as u32
    );
}
