use crate::error::{ClientError, Result};

/// Validates an email address.
///
/// # Arguments
///
/// * `email` - The email address to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the email is plausible.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ClientError::Validation("Email is required".to_string()));
    }

    if email.len() > 255 {
        return Err(ClientError::Validation(
            "Email must be at most 255 characters".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ClientError::Validation(
            "Enter a valid email address".to_string(),
        ));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ClientError::Validation(
            "Enter a valid email address".to_string(),
        ));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(ClientError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(ClientError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates a person's name field.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ClientError::Validation("Name cannot be empty".to_string()));
    }

    if name.len() > 150 {
        return Err(ClientError::Validation(
            "Name must be at most 150 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates a one-time code before it is sent for verification.
///
/// # Arguments
///
/// * `code` - The code to validate.
/// * `expected_len` - The expected number of digits.
pub fn validate_otp_code(code: &str, expected_len: usize) -> Result<()> {
    if code.len() != expected_len {
        return Err(ClientError::Validation(format!(
            "Code must be exactly {} digits",
            expected_len
        )));
    }

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClientError::Validation(
            "Code must contain only digits".to_string(),
        ));
    }

    Ok(())
}
