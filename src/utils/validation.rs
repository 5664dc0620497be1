//! Custom rules for `#[derive(Validate)]` request types, plus helpers for
//! cross-field checks that run after the derived ones.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

/// Largest accepted ticket price.
pub const MAX_PRICE: Decimal = Decimal::from_parts(9_999_999, 0, 0, false, 2);

pub fn create_validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

/// Adds `validation_error` to the collected errors under `field` when it failed.
pub fn append_validation_error(
    validation_errors: Result<(), ValidationErrors>,
    field: &'static str,
    validation_error: Result<(), ValidationError>,
) -> Result<(), ValidationErrors> {
    if let Err(validation_error) = validation_error {
        let mut validation_errors = match validation_errors {
            Ok(()) => ValidationErrors::new(),
            Err(validation_errors) => validation_errors,
        };
        validation_errors.add(field, validation_error);
        Err(validation_errors)
    } else {
        validation_errors
    }
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(create_validation_error("blank", "Value cannot be blank"));
    }
    Ok(())
}

/// Empty, or an absolute `http(s)` URL.
pub fn http_url_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.starts_with("http://") || value.starts_with("https://") {
        return Ok(());
    }
    Err(create_validation_error("url", "Must be a valid URL or empty"))
}

pub fn price_amount(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        return Err(create_validation_error(
            "price_negative",
            "Price must be 0 or greater",
        ));
    }
    if *price > MAX_PRICE {
        return Err(create_validation_error(
            "price_too_large",
            "Price cannot exceed 99999.99",
        ));
    }
    if price.normalize().scale() > 2 {
        return Err(create_validation_error(
            "price_scale",
            "Price must have at most 2 decimal places",
        ));
    }
    Ok(())
}

pub fn in_future(date_time: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *date_time <= Utc::now() {
        return Err(create_validation_error(
            "not_in_future",
            "Event date and time must be in the future",
        ));
    }
    Ok(())
}

pub fn end_not_before_start(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match end {
        Some(end) if end < start => {
            let mut error = create_validation_error(
                "end_before_start",
                "End date and time cannot precede the start",
            );
            error.add_param(Cow::from("event_date_time"), &start);
            error.add_param(Cow::from("end_date_time"), &end);
            Err(error)
        }
        _ => Ok(()),
    }
}

/// `zip_code` -> `zipCode`, matching the JSON field names clients send.
pub fn json_field_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}
