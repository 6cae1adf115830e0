//! Common utilities for certificate generation.
//!
//! Shared helpers for identifiers, date formatting, and export filenames.

use chrono::{Datelike, Local, NaiveDate, Utc};
use uuid::Uuid;

/// Organization tag that prefixes every certificate id.
pub const CERTIFICATE_ID_PREFIX: &str = "VOL";

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Generate a certificate id such as `VOL-M1K3Z9QA-4F09C2B7`.
///
/// The middle part is the current time in milliseconds (base 36), the last
/// part is random. Collisions are unlikely but not impossible; the id is not
/// a security token.
pub fn generate_certificate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let random = Uuid::new_v4().simple().to_string();

    format!(
        "{}-{}-{}",
        CERTIFICATE_ID_PREFIX,
        to_base36(millis),
        &random[..8]
    )
    .to_uppercase()
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Format a date as "January 15, 2024". No timezone conversion is applied.
pub fn format_long_date(date: NaiveDate) -> String {
    let month = MONTHS[(date.month0() as usize).min(MONTHS.len() - 1)];
    format!("{} {}, {}", month, date.day(), date.year())
}

/// Today's date in the local timezone, long form.
pub fn today_long_date() -> String {
    format_long_date(Local::now().date_naive())
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_dash && !result.is_empty()
        {
            result.push('-');
            last_dash = true;
        }
    }

    if result.is_empty() {
        return fallback.to_string();
    }

    result.trim_matches('-').to_string()
}

/// Download filename for a recipient: `certificate-<first>-<last>.pdf`.
pub fn certificate_filename(first_name: &str, last_name: &str) -> String {
    format!(
        "certificate-{}-{}.pdf",
        sanitize_filename(first_name, "volunteer"),
        sanitize_filename(last_name, "recipient")
    )
}
