//! Input validation utilities
//!
//! Validators return `Result<T, String>` with a user-facing message; callers
//! collect failures per field into [`ValidationErrors`].

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Longest hotel name accepted
pub const MAX_HOTEL_NAME_CHARS: usize = 32;
/// Highest star rating accepted
pub const MAX_STAR_RATING: i16 = 5;

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field-level causes of a rejected write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed for {}", self.fields().join(", "))
    }
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single failing field
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record the outcome of a validator, keeping the value on success
    pub fn check<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.push(field, message);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field).collect()
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    if !has_upper {
        return Err("Password must contain at least one uppercase letter".to_string());
    }

    if !has_lower {
        return Err("Password must contain at least one lowercase letter".to_string());
    }

    if !has_digit {
        return Err("Password must contain at least one digit".to_string());
    }

    if !has_special {
        return Err("Password must contain at least one special character".to_string());
    }

    Ok(())
}

/// Trim a required text field, rejecting missing or blank input
pub fn required_text(value: Option<&str>, label: &str) -> Result<String, String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(format!("{label} is required")),
    }
}

/// Validate and trim a hotel name
pub fn validate_hotel_name(value: Option<&str>) -> Result<String, String> {
    let name = required_text(value, "Hotel name")?;
    if name.chars().count() > MAX_HOTEL_NAME_CHARS {
        return Err(format!(
            "Hotel name must be at most {MAX_HOTEL_NAME_CHARS} characters long"
        ));
    }
    Ok(name)
}

/// Parse a star rating in `0..=5`
pub fn validate_star_rating(value: Option<&str>) -> Result<i16, String> {
    let raw = required_text(value, "Hotel star rating")?;
    let rating: i16 = raw
        .parse()
        .map_err(|_| "Hotel star rating must be a whole number".to_string())?;

    if rating > MAX_STAR_RATING {
        return Err(format!(
            "Hotel star rating must be at most {MAX_STAR_RATING}"
        ));
    }
    if rating < 0 {
        return Err("Hotel star rating must be at least 0".to_string());
    }
    Ok(rating)
}

/// Parse a finite, non-negative nightly cost
pub fn validate_cost_per_night(value: Option<&str>) -> Result<f64, String> {
    let raw = required_text(value, "Cost per night")?;
    let cost: f64 = raw
        .parse()
        .map_err(|_| "Cost per night must be a number".to_string())?;

    if !cost.is_finite() {
        return Err("Cost per night must be a number".to_string());
    }
    if cost < 0.0 {
        return Err("Cost per night cannot be negative".to_string());
    }
    Ok(cost)
}

/// Parse an availability flag as sent by HTML forms
pub fn validate_availability(value: Option<&str>) -> Result<bool, String> {
    let raw = required_text(value, "Availability")?;
    match raw.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err("Availability must be true or false".to_string()),
    }
}

/// Require a strictly positive count (nights, guests)
pub fn validate_positive_count(value: u32, label: &str) -> Result<u32, String> {
    if value == 0 {
        return Err(format!("{label} must be at least 1"));
    }
    Ok(value)
}
