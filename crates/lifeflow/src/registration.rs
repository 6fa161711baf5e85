//! Donor registration form.
//!
//! Raw input is checked here before anything touches the store: blank
//! required fields are reported together, and the store is never called for
//! an incomplete form.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::is_known_district;
use crate::donor::{parse_date, BloodGroup, NewDonor};
use crate::error::{Error, Form, Result};

/// Registration input as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    /// Full name.
    pub full_name: String,
    /// Blood group label, e.g. `"O+"`.
    pub blood_group: String,
    /// Mobile number.
    pub mobile_number: String,
    /// District.
    pub district: String,
    /// Optional `YYYY-MM-DD` date of the last donation.
    pub last_donation_date: Option<String>,
    /// Whether the number has WhatsApp.
    pub has_whatsapp: bool,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            blood_group: String::new(),
            mobile_number: String::new(),
            district: String::new(),
            last_donation_date: None,
            has_whatsapp: true,
        }
    }
}

impl RegistrationForm {
    /// Names of required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("full name", &self.full_name),
            ("blood group", &self.blood_group),
            ("mobile number", &self.mobile_number),
            ("district", &self.district),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Check the form and turn it into an insert payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFields`] if any required field is blank, or
    /// [`Error::InvalidField`] if the blood group or date cannot be parsed.
    pub fn validate(&self) -> Result<NewDonor> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(Error::MissingFields {
                form: Form::Registration,
                fields: missing,
            });
        }

        let blood_group: BloodGroup = self.blood_group.parse()?;

        let last_donation_date = match self.last_donation_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(parse_date("last donation date", text)?),
        };

        let district = self.district.trim().to_string();
        if !is_known_district(&district) {
            warn!("Registering donor in unlisted district {district:?}");
        }

        Ok(NewDonor {
            full_name: self.full_name.trim().to_string(),
            blood_group,
            mobile_number: self.mobile_number.trim().to_string(),
            district,
            last_donation_date,
            has_whatsapp: self.has_whatsapp,
        })
    }
}
