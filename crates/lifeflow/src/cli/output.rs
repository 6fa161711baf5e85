//! Text rendering for command output.
//!
//! Renderers return strings so the binary decides where they go.

use chrono::NaiveDate;

use crate::config::ContactConfig;
use crate::contact::ContactLinks;
use crate::donor::Donor;
use crate::search::{SearchOutcome, NO_RESULTS_HINT};

/// Title shown after a successful registration.
pub const REGISTERED_TITLE: &str = "Registration Successful!";

/// Message shown after a successful registration.
pub const REGISTERED_MESSAGE: &str =
    "Thank you for registering as a blood donor. You're a lifesaver!";

/// One donor as a card: name, place, group, eligibility and contact links.
#[must_use]
pub fn donor_card(donor: &Donor, contact: &ContactConfig, today: NaiveDate) -> String {
    let mut lines = vec![
        format!("#{} {}", donor.id, donor.full_name),
        format!("   District:    {}", donor.district),
        format!("   Blood group: {}", donor.blood_group),
        format!("   Status:      {}", donor.eligibility_label_on(today)),
    ];
    if let Some(last) = donor.last_donation_display() {
        lines.push(format!("   Last:        {last}"));
    }
    match ContactLinks::for_donor(donor, contact) {
        Ok(links) => {
            lines.push(format!("   Call:        {}", links.call));
            if let Some(whatsapp) = links.whatsapp {
                lines.push(format!("   WhatsApp:    {whatsapp}"));
            }
        }
        Err(e) => lines.push(format!("   Contact:     unavailable ({e})")),
    }
    join_lines(&lines)
}

/// Heading for search output, e.g. "Found 2 donors (O+ in Pune, Urgent)".
#[must_use]
pub fn summary_line(outcome: &SearchOutcome) -> String {
    format!(
        "{} ({} in {}, {})",
        outcome.summary(),
        outcome.query.blood_group,
        outcome.query.district,
        outcome.urgency.label()
    )
}

/// Search results as cards, or the empty-result hint.
#[must_use]
pub fn search_results(outcome: &SearchOutcome, contact: &ContactConfig, today: NaiveDate) -> String {
    let mut out = join_lines(&[summary_line(outcome)]);
    if outcome.donors.is_empty() {
        out.push_str(NO_RESULTS_HINT);
        out.push('\n');
        return out;
    }
    for donor in &outcome.donors {
        out.push('\n');
        out.push_str(&donor_card(donor, contact, today));
    }
    out
}

/// Search results with one row per donor, under the summary line.
#[must_use]
pub fn search_table(outcome: &SearchOutcome, today: NaiveDate) -> String {
    let mut lines = vec![summary_line(outcome)];
    if outcome.donors.is_empty() {
        lines.push(NO_RESULTS_HINT.to_string());
        return join_lines(&lines);
    }

    lines.push(format!(
        "{:<6} {:<24} {:<5} {:<16} {:<18} {:<10}",
        "ID", "NAME", "GROUP", "MOBILE", "STATUS", "LAST"
    ));
    for donor in &outcome.donors {
        lines.push(format!(
            "{:<6} {:<24} {:<5} {:<16} {:<18} {:<10}",
            donor.id,
            truncate(&donor.full_name, 24),
            donor.blood_group.as_str(),
            donor.mobile_number,
            donor.eligibility_label_on(today),
            donor.last_donation_display().unwrap_or_else(|| "-".to_string())
        ));
    }
    join_lines(&lines)
}

/// Lines joined with a trailing newline.
fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

/// Hide all but the last four characters of a secret.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return String::new();
    }
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}
