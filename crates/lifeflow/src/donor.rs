//! Core donor types for lifeflow.
//!
//! This module defines the donor record, the closed set of blood groups,
//! and the donation eligibility rule.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Minimum number of calendar months between two donations.
pub const MIN_MONTHS_BETWEEN_DONATIONS: i32 = 3;

/// Date format used for last-donation dates on input and in storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Day-first format used when showing dates to Indian users.
const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// ABO/Rh blood group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    /// A positive.
    #[serde(rename = "A+")]
    APositive,
    /// A negative.
    #[serde(rename = "A-")]
    ANegative,
    /// B positive.
    #[serde(rename = "B+")]
    BPositive,
    /// B negative.
    #[serde(rename = "B-")]
    BNegative,
    /// AB positive.
    #[serde(rename = "AB+")]
    AbPositive,
    /// AB negative.
    #[serde(rename = "AB-")]
    AbNegative,
    /// O positive.
    #[serde(rename = "O+")]
    OPositive,
    /// O negative.
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    /// All blood groups, in the order they are offered to users.
    pub const ALL: [Self; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];

    /// The canonical label, e.g. `"AB+"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == wanted)
            .ok_or_else(|| {
                Error::invalid_field(
                    "blood group",
                    format!("'{}' is not one of A+, A-, B+, B-, AB+, AB-, O+, O-", s.trim()),
                )
            })
    }
}

/// A donor as submitted for registration, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDonor {
    /// Donor's full name.
    pub full_name: String,
    /// Donor's blood group.
    pub blood_group: BloodGroup,
    /// Contact number, stored as entered.
    pub mobile_number: String,
    /// District the donor lives in.
    pub district: String,
    /// When the donor last gave blood, if they told us.
    pub last_donation_date: Option<NaiveDate>,
    /// Whether the mobile number is reachable on WhatsApp.
    pub has_whatsapp: bool,
}

/// A registered donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Donor's full name.
    pub full_name: String,
    /// Donor's blood group.
    pub blood_group: BloodGroup,
    /// Contact number, stored as entered.
    pub mobile_number: String,
    /// District the donor lives in.
    pub district: String,
    /// When the donor last gave blood.
    pub last_donation_date: Option<NaiveDate>,
    /// Whether the mobile number is reachable on WhatsApp.
    pub has_whatsapp: bool,
    /// When the donor registered.
    pub created_at: DateTime<Utc>,
}

impl Donor {
    /// Build a stored donor from a registration payload.
    #[must_use]
    pub fn from_new(id: i64, new: NewDonor, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            full_name: new.full_name,
            blood_group: new.blood_group,
            mobile_number: new.mobile_number,
            district: new.district,
            last_donation_date: new.last_donation_date,
            has_whatsapp: new.has_whatsapp,
            created_at,
        }
    }

    /// Whether the donor may donate on `today`.
    ///
    /// True when no last donation is recorded, or when at least
    /// [`MIN_MONTHS_BETWEEN_DONATIONS`] calendar months separate the two
    /// dates. Only year and month numbers count; the day is ignored.
    #[must_use]
    pub fn is_eligible_on(&self, today: NaiveDate) -> bool {
        self.last_donation_date
            .map_or(true, |last| months_between(last, today) >= MIN_MONTHS_BETWEEN_DONATIONS)
    }

    /// Whether the donor may donate today, by the local calendar.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.is_eligible_on(Local::now().date_naive())
    }

    /// Eligibility as shown on a donor card.
    #[must_use]
    pub fn eligibility_label_on(&self, today: NaiveDate) -> &'static str {
        if self.is_eligible_on(today) {
            "Eligible to donate"
        } else {
            "Recently donated"
        }
    }

    /// Last donation date in day-first form, if any.
    #[must_use]
    pub fn last_donation_display(&self) -> Option<String> {
        self.last_donation_date
            .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
    }
}

/// Difference in calendar-month numbers from `from` to `to`.
///
/// Negative when `to` falls in an earlier month than `from`.
#[must_use]
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    // month() is 1..=12 so the cast is lossless
    #[allow(clippy::cast_possible_wrap)]
    let month_delta = to.month() as i32 - from.month() as i32;
    (to.year() - from.year()) * 12 + month_delta
}

/// Parse a `YYYY-MM-DD` date as entered on a form.
///
/// # Errors
///
/// Returns [`Error::InvalidField`] if the text is not a valid calendar date.
pub fn parse_date(field: &'static str, text: &str) -> Result<NaiveDate, Error> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| {
        Error::invalid_field(field, format!("'{text}' is not a YYYY-MM-DD date ({e})"))
    })
}
