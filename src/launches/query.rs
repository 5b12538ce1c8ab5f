//! Query-string validation for `/launches`.
//!
//! Two passes over the same parsed query: a whitelist check that names any
//! key other than `limit`/`offset`, then a range check on the values. The
//! whitelist failure is reported first.

use serde::Serialize;
use thiserror::Error;

pub const LIMIT: &str = "limit";
pub const OFFSET: &str = "offset";
const ALLOWED_PARAMS: [&str; 2] = [LIMIT, OFFSET];

pub const LIMIT_MESSAGE: &str = "Limit debe ser un entero mayor que 0.";
pub const OFFSET_MESSAGE: &str = "Offset debe ser un entero mayor o igual a 0.";

/// Validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

/// One failing field, shaped like the validator output clients already parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub value: String,
    pub msg: &'static str,
    pub param: &'static str,
    pub location: &'static str,
}

impl FieldError {
    fn query(param: &'static str, value: &str, msg: &'static str) -> Self {
        Self {
            value: value.to_string(),
            msg,
            param,
            location: "query",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Los siguientes parámetros no están permitidos: {}", .0.join(", "))]
    UnexpectedParameters(Vec<String>),

    #[error("invalid query parameters")]
    Invalid(Vec<FieldError>),
}

/// Parse and validate a raw query string (without the leading `?`).
pub fn parse_page(raw_query: Option<&str>, default_limit: u64) -> Result<Page, QueryError> {
    let pairs: Vec<(String, String)> = raw_query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();

    let mut unexpected: Vec<String> = Vec::new();
    for (key, _) in &pairs {
        if !ALLOWED_PARAMS.contains(&key.as_str()) && !unexpected.contains(key) {
            unexpected.push(key.clone());
        }
    }
    if !unexpected.is_empty() {
        return Err(QueryError::UnexpectedParameters(unexpected));
    }

    let mut errors = Vec::new();
    let limit = check_field(&pairs, LIMIT, LIMIT_MESSAGE, 1, &mut errors);
    let offset = check_field(&pairs, OFFSET, OFFSET_MESSAGE, 0, &mut errors);

    if !errors.is_empty() {
        return Err(QueryError::Invalid(errors));
    }

    Ok(Page {
        limit: limit.unwrap_or(default_limit),
        offset: offset.unwrap_or(0),
    })
}

/// Validates every occurrence of `param`; the first one supplies the value.
fn check_field(
    pairs: &[(String, String)],
    param: &'static str,
    msg: &'static str,
    min: u64,
    errors: &mut Vec<FieldError>,
) -> Option<u64> {
    let mut first = None;
    for (_, raw) in pairs.iter().filter(|(key, _)| key == param) {
        match parse_int(raw).filter(|n| n.at_least(min)) {
            Some(n) => {
                first.get_or_insert(n.magnitude);
            }
            None => {
                errors.push(FieldError::query(param, raw, msg));
                return None;
            }
        }
    }
    first
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParsedInt {
    negative: bool,
    magnitude: u64,
}

impl ParsedInt {
    fn at_least(&self, min: u64) -> bool {
        if self.negative {
            self.magnitude == 0 && min == 0
        } else {
            self.magnitude >= min
        }
    }
}

/// Optional sign followed by ASCII digits. Magnitudes past `u64::MAX` saturate.
fn parse_int(raw: &str) -> Option<ParsedInt> {
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude = digits
        .bytes()
        .fold(0u64, |acc, b| acc.saturating_mul(10).saturating_add(u64::from(b - b'0')));
    Some(ParsedInt { negative, magnitude })
}
