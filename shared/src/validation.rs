//! Input validation functions
//!
//! Field rules for user and job input. Every check runs before any storage
//! access so malformed input never reaches the database.

use crate::errors::ValidationError;
use crate::types::{CreateJobRequest, UpdateJobRequest, UpdateUserRequest};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use validator::ValidateEmail;

static LETTERS_AND_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z A-Z]+$").expect("letters regex is valid"));

static USERNAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]+[a-zA-Z0-9 ]*$").expect("username regex is valid"));

// ASCII only: non-ASCII letters are rejected
static PASSWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_ ]+$").expect("password regex is valid"));

/// Check length (in characters) and pattern of a single field
fn check_field(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
    pattern: &Regex,
    pattern_hint: &str,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::new(
            field,
            format!("must be at least {} characters", min),
        ));
    }
    if len > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    if !pattern.is_match(value) {
        return Err(ValidationError::new(field, pattern_hint));
    }
    Ok(())
}

/// Validate a full name: 3-50 letters and spaces
pub fn validate_full_name(full_name: &str) -> Result<(), ValidationError> {
    check_field(
        "full_name",
        full_name,
        3,
        50,
        &LETTERS_AND_SPACES,
        "may only contain letters and spaces",
    )
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("email", "cannot be empty"));
    }
    if email.len() > 255 {
        return Err(ValidationError::new("email", "is too long"));
    }
    if !email.validate_email() {
        return Err(ValidationError::new("email", "is not a valid email address"));
    }
    Ok(())
}

/// Validate a username: 3-50 chars, leading letter, then letters, digits or spaces
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    check_field(
        "username",
        username,
        3,
        50,
        &USERNAME,
        "must start with a letter and contain only letters, digits and spaces",
    )
}

/// Validate a password: 3-50 ASCII letters, digits, underscores or spaces
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    check_field(
        "password",
        password,
        3,
        50,
        &PASSWORD,
        "may only contain letters, digits, underscores and spaces",
    )
}

/// Validate a company name: 2-50 letters and spaces
pub fn validate_company(company: &str) -> Result<(), ValidationError> {
    check_field(
        "company",
        company,
        2,
        50,
        &LETTERS_AND_SPACES,
        "may only contain letters and spaces",
    )
}

/// Validate a position title: 3-50 letters and spaces
pub fn validate_position(position: &str) -> Result<(), ValidationError> {
    check_field(
        "position",
        position,
        3,
        50,
        &LETTERS_AND_SPACES,
        "may only contain letters and spaces",
    )
}

/// Validate every field of a registration
pub fn validate_registration(
    full_name: &str,
    email: &str,
    username: &str,
    password: &str,
) -> Result<(), ValidationError> {
    validate_full_name(full_name)?;
    validate_email(email)?;
    validate_username(username)?;
    validate_password(password)
}

/// Validate the fields present in a profile update
pub fn validate_user_update(req: &UpdateUserRequest) -> Result<(), ValidationError> {
    if let Some(full_name) = &req.full_name {
        validate_full_name(full_name)?;
    }
    if let Some(email) = &req.email {
        validate_email(email)?;
    }
    if let Some(username) = &req.username {
        validate_username(username)?;
    }
    Ok(())
}

/// Validate a new job
pub fn validate_new_job(req: &CreateJobRequest) -> Result<(), ValidationError> {
    validate_company(&req.company)?;
    validate_position(&req.position)
}

/// Validate the fields present in a job update
pub fn validate_job_update(req: &UpdateJobRequest) -> Result<(), ValidationError> {
    if let Some(company) = &req.company {
        validate_company(company)?;
    }
    if let Some(position) = &req.position {
        validate_position(position)?;
    }
    Ok(())
}
