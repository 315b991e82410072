//! Identity number checks used to gate access to a stored user id.
//!
//! This is a plain string comparison, not an authentication system: the
//! password is simply the last four characters of the identity number.

pub const IDENTITY_NUMBER_LEN: usize = 12;
const PASSWORD_LEN: usize = 4;

/// User input rejected before anything is written to the store
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("IC number must be exactly 12 characters (got {len})")]
    IdentityLength { len: usize },
    #[error("password must match the last 4 characters of your IC number")]
    PasswordMismatch,
    #[error("login failed: incorrect IC number or password")]
    LoginFailed,
    #[error("invalid {field}: '{value}' is not a number")]
    InvalidAmount { field: &'static str, value: String },
    #[error("invalid {field}: '{value}' must not be negative")]
    NegativeAmount { field: &'static str, value: String },
}

/// The password expected for an identity number, if the identity number is well formed
pub fn expected_password(identity_number: &str) -> Option<&str> {
    if identity_number.chars().count() != IDENTITY_NUMBER_LEN {
        return None;
    }
    let (split, _) = identity_number.char_indices().rev().nth(PASSWORD_LEN - 1)?;
    Some(&identity_number[split..])
}

/// True if the identity number is 12 characters long and ends with `password`
pub fn verify_credential(identity_number: &str, password: &str) -> bool {
    expected_password(identity_number) == Some(password)
}

/// Checks a new registration, reporting which rule was broken
pub fn validate_registration(identity_number: &str, password: &str) -> Result<(), ValidationError> {
    match expected_password(identity_number) {
        None => Err(ValidationError::IdentityLength {
            len: identity_number.chars().count(),
        }),
        Some(expected) if expected != password => Err(ValidationError::PasswordMismatch),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_last_four_characters() {
        assert!(verify_credential("900101145678", "5678"));
    }

    #[test]
    fn wrong_password() {
        assert!(!verify_credential("900101145678", "1234"));
        assert!(!verify_credential("900101145678", "678"));
        assert!(!verify_credential("900101145678", ""));
    }

    #[test]
    fn identity_number_must_be_twelve_characters() {
        assert!(!verify_credential("90010114567", "4567"));
        assert!(!verify_credential("9001011456789", "6789"));
        assert!(!verify_credential("", ""));
    }

    #[test]
    fn identity_number_need_not_be_numeric() {
        assert!(verify_credential("AB0101-1CDEF", "CDEF"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(verify_credential("ééééééééwxyz", "wxyz"));
        assert!(verify_credential("abcdefgh1é34", "1é34"));
    }

    #[test]
    fn registration_errors() {
        assert_eq!(
            validate_registration("12345", "2345"),
            Err(ValidationError::IdentityLength { len: 5 })
        );
        assert_eq!(
            validate_registration("900101145678", "0000"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(validate_registration("900101145678", "5678"), Ok(()));
    }
}
