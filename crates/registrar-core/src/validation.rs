//! Identifier and field format validators.
//!
//! Every validator trims its input and returns the normalized value or
//! [`AppError::InvalidInput`]. Patterns are compiled once per process.
//! Optional-field variants map blank input to `None`.

use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, AppResult};

static FACULTY_ID: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Za-z0-9]{8}$"));
static PROGRAM_ID: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Za-z0-9]{8}$"));
static LECTURER_ID: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Za-z0-9]{10}$"));
static STUDENT_ID: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Za-z0-9]{12}$"));
static TERM_ID: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]{4}[123]$"));
static ACADEMIC_YEAR: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]{4}/[0-9]{4}$"));
static PROGRAM_CODE: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Za-z0-9_-]{1,16}$"));
static EMAIL: Lazy<Regex> = Lazy::new(|| compile(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"));
static NIK: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]{16}$"));
static NIDN: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]+$"));
static LECTURER_PHONE: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9+]{1,20}$"));
static STUDENT_PHONE: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9+\- ]{1,20}$"));

pub const EMAIL_MAX_LEN: usize = 120;
pub const NIDN_MAX_LEN: usize = 16;
pub const MIN_ENTRY_YEAR: i32 = 2000;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("validator pattern must compile")
}

fn check(re: &Regex, value: &str, message: &str) -> AppResult<String> {
    let value = value.trim();
    if re.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(AppError::invalid_input(message))
    }
}

/// Trims an optional value and drops it when blank.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn optional_with<F>(value: Option<String>, validate: F) -> AppResult<Option<String>>
where
    F: FnOnce(&str) -> AppResult<String>,
{
    normalize_optional(value).map(|v| validate(&v)).transpose()
}

pub fn faculty_id(value: &str) -> AppResult<String> {
    check(&FACULTY_ID, value, "id_fakultas must be 8 alphanumeric characters")
}

pub fn program_id(value: &str) -> AppResult<String> {
    check(&PROGRAM_ID, value, "id_prodi must be 8 alphanumeric characters")
}

pub fn lecturer_id(value: &str) -> AppResult<String> {
    check(&LECTURER_ID, value, "id_dosen must be 10 alphanumeric characters")
}

pub fn student_id(value: &str) -> AppResult<String> {
    check(&STUDENT_ID, value, "id_mahasiswa must be 12 alphanumeric characters")
}

pub fn term_id(value: &str) -> AppResult<String> {
    check(&TERM_ID, value, "id_semester must be YYYY followed by 1, 2 or 3")
}

/// Splits a term id into its year and trailing term digit.
pub fn term_id_parts(value: &str) -> AppResult<(i32, u8)> {
    let id = term_id(value)?;
    let malformed = || AppError::invalid_input("id_semester must be YYYY followed by 1, 2 or 3");
    let (year, digit) = id.split_at_checked(4).ok_or_else(malformed)?;
    let year = year
        .parse::<i32>()
        .map_err(|_| AppError::invalid_input("id_semester year is not a number"))?;
    let digit = digit
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .and_then(|d| u8::try_from(d).ok())
        .ok_or_else(malformed)?;
    Ok((year, digit))
}

/// Validates a `YYYY/YYYY` label and returns it with its first year.
pub fn academic_year(value: &str) -> AppResult<(String, i32)> {
    let label = check(&ACADEMIC_YEAR, value, "tahun_ajaran must be YYYY/YYYY")?;
    let (first, second) = label
        .split_once('/')
        .ok_or_else(|| AppError::invalid_input("tahun_ajaran must be YYYY/YYYY"))?;
    let (first, second) = match (first.parse::<i32>(), second.parse::<i32>()) {
        (Ok(first), Ok(second)) => (first, second),
        _ => return Err(AppError::invalid_input("tahun_ajaran must be YYYY/YYYY")),
    };
    if second != first + 1 {
        return Err(AppError::invalid_input(
            "tahun_ajaran second year must follow the first",
        ));
    }
    Ok((label, first))
}

pub fn program_code(value: &str) -> AppResult<String> {
    check(
        &PROGRAM_CODE,
        value,
        "kode_prodi must be 1-16 characters of letters, digits, '_' or '-'",
    )
}

pub fn email(value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.chars().count() > EMAIL_MAX_LEN {
        return Err(AppError::invalid_input("email must be at most 120 characters"));
    }
    check(&EMAIL, value, "email is not a valid address")
}

pub fn nik(value: &str) -> AppResult<String> {
    check(&NIK, value, "nik must be exactly 16 digits")
}

pub fn nidn(value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.len() > NIDN_MAX_LEN {
        return Err(AppError::invalid_input("nidn must be at most 16 digits"));
    }
    check(&NIDN, value, "nidn must contain digits only")
}

pub fn lecturer_phone(value: &str) -> AppResult<String> {
    check(
        &LECTURER_PHONE,
        value,
        "no_hp must be at most 20 digits or '+'",
    )
}

pub fn student_phone(value: &str) -> AppResult<String> {
    check(
        &STUDENT_PHONE,
        value,
        "no_hp must be at most 20 digits, '+', '-' or spaces",
    )
}

pub fn optional_email(value: Option<String>) -> AppResult<Option<String>> {
    optional_with(value, email)
}

pub fn optional_nik(value: Option<String>) -> AppResult<Option<String>> {
    optional_with(value, nik)
}

pub fn optional_nidn(value: Option<String>) -> AppResult<Option<String>> {
    optional_with(value, nidn)
}

pub fn optional_lecturer_phone(value: Option<String>) -> AppResult<Option<String>> {
    optional_with(value, lecturer_phone)
}

pub fn optional_student_phone(value: Option<String>) -> AppResult<Option<String>> {
    optional_with(value, student_phone)
}

/// Trims a required text field and checks its length in characters.
pub fn text(field: &str, value: &str, min: usize, max: usize) -> AppResult<String> {
    let value = value.trim();
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::invalid_input(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(value.to_string())
}

/// Trims an optional text field; blank becomes `None`.
pub fn optional_text(field: &str, value: Option<String>, max: usize) -> AppResult<Option<String>> {
    optional_with(value, |v| {
        if v.chars().count() > max {
            return Err(AppError::invalid_input(format!(
                "{field} must be at most {max} characters"
            )));
        }
        Ok(v.to_string())
    })
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Entry years run from 2000 through next year.
pub fn entry_year(year: i32) -> AppResult<i32> {
    entry_year_at(year, current_year())
}

pub fn entry_year_at(year: i32, current_year: i32) -> AppResult<i32> {
    if year < MIN_ENTRY_YEAR || year > current_year + 1 {
        return Err(AppError::invalid_input(format!(
            "tahun_masuk must be between {MIN_ENTRY_YEAR} and {}",
            current_year + 1
        )));
    }
    Ok(year)
}

/// Parses a `YYYY-MM-DD` date.
pub fn date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::invalid_input(format!("{field} invalid (YYYY-MM-DD)")))
}

pub fn optional_date(field: &str, value: Option<String>) -> AppResult<Option<NaiveDate>> {
    normalize_optional(value)
        .map(|v| date(field, &v))
        .transpose()
}
