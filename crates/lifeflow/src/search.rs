//! Donor search form and query.

use serde::{Deserialize, Serialize};

use crate::catalog::Urgency;
use crate::donor::{BloodGroup, Donor};
use crate::error::{Error, Form, Result};

/// Hint shown when a search comes back empty.
pub const NO_RESULTS_HINT: &str =
    "Try searching in nearby districts or with compatible blood groups.";

/// Search input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    /// Required blood group label.
    pub blood_group: String,
    /// District to search in.
    pub district: String,
    /// Urgency level; defaults to normal.
    pub urgency: Option<String>,
}

/// An equality filter on the `blood_group` and `district` columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorQuery {
    /// Blood group to match.
    pub blood_group: BloodGroup,
    /// District to match, exactly.
    pub district: String,
}

impl DonorQuery {
    /// Create a query for the given blood group and district.
    #[must_use]
    pub fn new(blood_group: BloodGroup, district: impl Into<String>) -> Self {
        Self {
            blood_group,
            district: district.into(),
        }
    }

    /// Check whether a donor satisfies both equalities.
    #[must_use]
    pub fn matches(&self, donor: &Donor) -> bool {
        donor.blood_group == self.blood_group && donor.district == self.district
    }
}

impl SearchForm {
    /// Check the form and build the query plus the requested urgency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFields`] if blood group or district is blank,
    /// or [`Error::InvalidField`] if a value cannot be parsed.
    pub fn validate(&self) -> Result<(DonorQuery, Urgency)> {
        let missing: Vec<&'static str> = [
            ("blood group", &self.blood_group),
            ("district", &self.district),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(Error::MissingFields {
                form: Form::Search,
                fields: missing,
            });
        }

        let urgency = match self.urgency.as_deref().map(str::trim) {
            None | Some("") => Urgency::default(),
            Some(text) => text.parse()?,
        };

        Ok((
            DonorQuery::new(self.blood_group.parse()?, self.district.trim()),
            urgency,
        ))
    }
}

/// What a search produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// The query that was run.
    pub query: DonorQuery,
    /// Urgency the requester selected.
    pub urgency: Urgency,
    /// Matching donors, newest registration first.
    pub donors: Vec<Donor>,
}

impl SearchOutcome {
    /// Heading for the results, e.g. "Found 2 donors".
    #[must_use]
    pub fn summary(&self) -> String {
        match self.donors.len() {
            0 => "No donors found".to_string(),
            1 => "Found 1 donor".to_string(),
            n => format!("Found {n} donors"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn form(blood_group: &str, district: &str) -> SearchForm {
        SearchForm {
            blood_group: blood_group.to_string(),
            district: district.to_string(),
            urgency: None,
        }
    }

    #[test]
    fn test_validate_builds_query() {
        let (query, urgency) = form("O+", "Pune").validate().unwrap();
        assert_eq!(query, DonorQuery::new(BloodGroup::OPositive, "Pune"));
        assert_eq!(urgency, Urgency::Normal);
    }

    #[test]
    fn test_validate_requires_both_fields() {
        for (bg, district, expected) in [
            ("", "Pune", vec!["blood group"]),
            ("O+", " ", vec!["district"]),
            ("", "", vec!["blood group", "district"]),
        ] {
            match form(bg, district).validate() {
                Err(Error::MissingFields { form, fields }) => {
                    assert_eq!(form, Form::Search);
                    assert_eq!(fields, expected);
                }
                other => panic!("expected missing fields, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_urgency() {
        let mut f = form("A-", "Delhi");
        f.urgency = Some("critical".to_string());
        assert_eq!(f.validate().unwrap().1, Urgency::Critical);

        f.urgency = Some("soonish".to_string());
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_query_matches() {
        let donor = Donor {
            id: 7,
            full_name: "Meera".to_string(),
            blood_group: BloodGroup::OPositive,
            mobile_number: "9000000000".to_string(),
            district: "Pune".to_string(),
            last_donation_date: None,
            has_whatsapp: false,
            created_at: Utc::now(),
        };
        assert!(DonorQuery::new(BloodGroup::OPositive, "Pune").matches(&donor));
        assert!(!DonorQuery::new(BloodGroup::ONegative, "Pune").matches(&donor));
        assert!(!DonorQuery::new(BloodGroup::OPositive, "Thane").matches(&donor));
    }

    #[test]
    fn test_summary() {
        let mut outcome = SearchOutcome {
            query: DonorQuery::new(BloodGroup::BNegative, "Surat"),
            urgency: Urgency::Urgent,
            donors: Vec::new(),
        };
        assert_eq!(outcome.summary(), "No donors found");

        let donor = Donor {
            id: 1,
            full_name: "Kiran".to_string(),
            blood_group: BloodGroup::BNegative,
            mobile_number: "9111111111".to_string(),
            district: "Surat".to_string(),
            last_donation_date: None,
            has_whatsapp: true,
            created_at: Utc::now(),
        };
        outcome.donors.push(donor.clone());
        assert_eq!(outcome.summary(), "Found 1 donor");
        outcome.donors.push(donor);
        assert_eq!(outcome.summary(), "Found 2 donors");
    }
}
