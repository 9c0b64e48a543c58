use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use time::{Date, OffsetDateTime};

use super::dto::{CreateUserRequest, UpdateUserRequest};

/// Field name mapped to one or more human-readable messages. Serializes as
/// the bare map, keyed by the wire-casing of the field.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Whole years at `today`, counting the birthday itself as completed.
fn is_adult(birth_date: Date, today: Date) -> bool {
    let mut age = today.year() - birth_date.year();
    if (today.month() as u8, today.day()) < (birth_date.month() as u8, birth_date.day()) {
        age -= 1;
    }
    age >= 18
}

fn check_name(errors: &mut FieldErrors, name: &str) {
    if name.is_empty() {
        errors.push("name", "name is required");
    }
    let len = name.chars().count();
    if len < 3 || len > 100 {
        errors.push("name", "name must be between 3 and 100 characters");
    }
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.push("email", "email is required");
    } else if !is_valid_email(email) {
        errors.push("email", "email must be a valid email address");
    }
}

fn check_birth_date(errors: &mut FieldErrors, birth_date: Date, today: Date) {
    if !is_adult(birth_date, today) {
        errors.push("birthDate", "user must be at least 18 years old");
    }
}

// An empty phone counts as not provided.
fn check_phone(errors: &mut FieldErrors, phone: Option<&str>) {
    if let Some(phone) = phone {
        if !phone.is_empty() && phone.chars().count() > 15 {
            errors.push("phone", "phone must be at most 15 characters");
        }
    }
}

pub fn validate_create(req: &CreateUserRequest) -> FieldErrors {
    let mut errors = FieldErrors::default();
    let today = OffsetDateTime::now_utc().date();

    check_name(&mut errors, &req.name);
    check_email(&mut errors, &req.email);
    if req.password.is_empty() {
        errors.push("password", "password is required");
    } else if req.password.chars().count() < 6 {
        errors.push("password", "password must be at least 6 characters");
    }
    check_birth_date(&mut errors, req.birth_date, today);
    check_phone(&mut errors, req.phone.as_deref());

    errors
}

pub fn validate_update(req: &UpdateUserRequest) -> FieldErrors {
    let mut errors = FieldErrors::default();
    let today = OffsetDateTime::now_utc().date();

    check_name(&mut errors, &req.name);
    check_email(&mut errors, &req.email);
    check_birth_date(&mut errors, req.birth_date, today);
    check_phone(&mut errors, req.phone.as_deref());

    errors
}
