use crate::ContractError;

const MAX_DOCTOR_NAME_LEN: usize = 128;
const MAX_FIELD_LEN: usize = 128;
const MAX_TEXT_LEN: usize = 4096;

/// Doctor names become key segments: 1..=128 bytes, no control characters.
pub fn validate_doctor_name(name: &str) -> Result<(), ContractError> {
    if name.is_empty() || name.len() > MAX_DOCTOR_NAME_LEN {
        return Err(ContractError::InvalidArgs);
    }
    if name.chars().any(char::is_control) {
        return Err(ContractError::InvalidArgs);
    }
    Ok(())
}

/// Short demographic fields such as names and phone numbers.
pub fn validate_field(value: &str) -> Result<(), ContractError> {
    if value.len() > MAX_FIELD_LEN {
        return Err(ContractError::InvalidArgs);
    }
    Ok(())
}

/// Free-text clinical notes: complaint, diagnosis, prescription.
pub fn validate_text(value: &str) -> Result<(), ContractError> {
    if value.len() > MAX_TEXT_LEN {
        return Err(ContractError::InvalidArgs);
    }
    Ok(())
}
