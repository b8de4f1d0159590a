//! Derived text: dates, term clauses, placeholders and export filenames.
//!
//! Every function here is total. Bad input is coerced or rendered as a
//! placeholder instead of being reported as an error, so drafting is never
//! interrupted by validation.

use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::document::{ConfidentialityTermType, DocumentState, MndaTermType, MutualNdaFields};

/// Rendering for any value that has not been provided yet.
pub const PLACEHOLDER: &str = "___________";

/// Smallest year count a term may hold.
pub const MIN_TERM_YEARS: u32 = 1;

/// Longest sanitized filename component, in characters.
pub const MAX_FILENAME_COMPONENT: usize = 50;

lazy_static! {
    /// Calendar date as entered in forms and returned by the chat model.
    static ref ISO_DATE_PATTERN: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();

    /// Anything that may not appear in an exported filename component.
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9-]").unwrap();
}

/// Format a `YYYY-MM-DD` date as `"January 15, 2024"`.
///
/// Parsing is purely calendar based, so the day of month never shifts with
/// the host time zone. Empty input renders as [`PLACEHOLDER`]; any other
/// string that is not a valid calendar date is returned unchanged.
pub fn format_date(date: &str) -> String {
    if date.is_empty() {
        return PLACEHOLDER.to_string();
    }
    if !ISO_DATE_PATTERN.is_match(date) {
        return date.to_string();
    }
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// MNDA term clause.
pub fn mnda_term_text(fields: &MutualNdaFields) -> String {
    match fields.mnda_term_type {
        MndaTermType::Expires => format!(
            "Expires {} year(s) from Effective Date.",
            fields.mnda_term_years
        ),
        MndaTermType::Continues => {
            "Continues until terminated in accordance with the terms of the MNDA.".to_string()
        }
    }
}

/// Confidentiality term clause.
pub fn confidentiality_term_text(fields: &MutualNdaFields) -> String {
    match fields.confidentiality_term_type {
        ConfidentialityTermType::Years => format!(
            "{} year(s) from Effective Date, but in the case of trade secrets until Confidential Information is no longer considered a trade secret under applicable laws.",
            fields.confidentiality_term_years
        ),
        ConfidentialityTermType::Perpetuity => "In perpetuity.".to_string(),
    }
}

/// `value` if non-empty, otherwise [`PLACEHOLDER`].
pub fn placeholder(value: &str) -> &str {
    placeholder_or(value, PLACEHOLDER)
}

/// `value` if non-empty, otherwise `fallback`.
pub fn placeholder_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Parse a user-typed year count.
///
/// Reads the leading integer the way a numeric form control does: leading
/// whitespace and a sign are accepted, and parsing stops at the first
/// non-digit, so `"2.7"` yields 2. Empty, unparseable and non-positive input
/// yields [`MIN_TERM_YEARS`]. Values beyond `u32::MAX` saturate.
pub fn parse_years_input(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];

    if digits.is_empty() || negative {
        return MIN_TERM_YEARS;
    }

    // Only overflow can fail once the slice is all ASCII digits.
    digits
        .parse::<u32>()
        .map(|n| n.max(MIN_TERM_YEARS))
        .unwrap_or(u32::MAX)
}

/// Replace every character outside `[A-Za-z0-9-]` with `_` and truncate to
/// [`MAX_FILENAME_COMPONENT`] characters.
///
/// Replacement counts UTF-16 code units, so a character outside the Basic
/// Multilingual Plane (an emoji, say) becomes `__`.
pub fn sanitize_filename(value: &str) -> String {
    UNSAFE_FILENAME_CHARS
        .replace_all(value, |caps: &Captures| "_".repeat(caps[0].encode_utf16().count()))
        .chars()
        .take(MAX_FILENAME_COMPONENT)
        .collect()
}

/// Export filename for a document, dated today (UTC) when no effective date
/// is set.
pub fn generate_document_filename(state: &DocumentState, doc_type_label: &str) -> String {
    generate_document_filename_on(state, doc_type_label, Utc::now().date_naive())
}

/// Export filename with an explicit fallback date.
///
/// `{label}_{company1}_{company2}_{date}.pdf`, where spaces in the label
/// become hyphens and empty company names become `Party1`/`Party2`. An
/// effective date that is not a `YYYY-MM-DD` calendar date is replaced by
/// `today`.
pub fn generate_document_filename_on(
    state: &DocumentState,
    doc_type_label: &str,
    today: NaiveDate,
) -> String {
    let label = doc_type_label.replace(' ', "-");
    let party1 = sanitize_filename(placeholder_or(&state.common.party1.company, "Party1"));
    let party2 = sanitize_filename(placeholder_or(&state.common.party2.company, "Party2"));
    let date = NaiveDate::parse_from_str(&state.common.effective_date, "%Y-%m-%d")
        .unwrap_or(today)
        .format("%Y-%m-%d");

    format!("{}_{}_{}_{}.pdf", label, party1, party2, date)
}
