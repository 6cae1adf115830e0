#![allow(dead_code)]

use chrono::NaiveDate;
use lopdf::content::Content;
use lopdf::Document;
use volunteer_certificates::certificate::{CertificateData, Event, Volunteer};

pub fn volunteer(id: &str, first_name: &str, last_name: &str, total_hours: f64) -> Volunteer {
    Volunteer {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        total_hours,
        badges: vec![],
    }
}

pub fn cleanup_drive() -> Event {
    Event {
        id: "evt-cleanup".to_string(),
        name: "Cleanup Drive".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        location: Some("Riverside Park".to_string()),
        duration_hours: Some(4.0),
    }
}

pub fn sample_data(volunteer_name: &str) -> CertificateData {
    CertificateData {
        volunteer_name: volunteer_name.to_string(),
        event_name: "Cleanup Drive".to_string(),
        event_date: "January 15, 2024".to_string(),
        location: "Riverside Park".to_string(),
        organizer_name: "Marcus Reed".to_string(),
        hours_contributed: 4.0,
        certificate_id: "VOL-LRX3K2-9F8E7D6C".to_string(),
        issue_date: "January 16, 2024".to_string(),
        badge_type: None,
        total_hours: None,
        rank: None,
    }
}

/// Every string shown with `Tj` on the first page, in drawing order.
pub fn drawn_text(pdf: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(pdf).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first())
        .map(|operand| String::from_utf8_lossy(operand.as_str().unwrap()).into_owned())
        .collect()
}
