//! Static lookup tables offered to users.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::donor::BloodGroup;
use crate::error::Error;

/// Districts donors can register in and search by, alphabetical.
pub const DISTRICTS: &[&str] = &[
    "Agra", "Ahmedabad", "Ahmednagar", "Aizawl", "Ajmer", "Aligarh", "Allahabad", "Alwar",
    "Ambala", "Amravati", "Amritsar", "Anand", "Anantapur", "Aurangabad", "Bangalore Urban",
    "Bankura", "Bareilly", "Bathinda", "Belgaum", "Bellary", "Bhopal", "Bhilai", "Bikaner",
    "Bilaspur", "Burdwan", "Chandigarh", "Chennai", "Chittoor", "Coimbatore", "Cuttack",
    "Darjeeling", "Davangere", "Dehradun", "Delhi", "Dhanbad", "Dharwad", "Durg", "Ernakulam",
    "Erode", "Faridabad", "Firozabad", "Gandhinagar", "Ghaziabad", "Gorakhpur", "Gulbarga",
    "Guntur", "Gurgaon", "Guwahati", "Gwalior", "Hapur", "Haridwar", "Hisar", "Hooghly",
    "Howrah", "Hubli", "Hyderabad", "Imphal", "Indore", "Jabalpur", "Jaipur", "Jalandhar",
    "Jalgaon", "Jammu", "Jamnagar", "Jamshedpur", "Jhansi", "Jodhpur", "Junagadh", "Kadapa",
    "Kakinada", "Kannur", "Kanpur", "Karimnagar", "Karnal", "Khammam", "Kharagpur", "Kochi",
    "Kolhapur", "Kolkata", "Kollam", "Kota", "Kottayam", "Kozhikode", "Kurnool", "Latur",
    "Lucknow", "Ludhiana", "Madurai", "Malegaon", "Mangalore", "Mathura", "Meerut", "Moradabad",
    "Mumbai", "Muzaffarnagar", "Muzaffarpur", "Mysore", "Nagpur", "Nanded", "Nashik",
    "Navi Mumbai", "Nellore", "New Delhi", "Nizamabad", "Noida", "Panaji", "Panipat", "Patna",
    "Pondicherry", "Pune", "Raipur", "Rajahmundry", "Rajkot", "Ranchi", "Rohtak", "Rourkela",
    "Saharanpur", "Salem", "Sangli", "Satara", "Shimla", "Siliguri", "Solapur", "Sonipat",
    "Srinagar", "Surat", "Thane", "Thanjavur", "Thiruvananthapuram", "Thrissur", "Tirunelveli",
    "Tirupati", "Tirupur", "Tiruvallur", "Udaipur", "Ujjain", "Vadodara", "Varanasi", "Vellore",
    "Vijayawada", "Visakhapatnam", "Warangal", "Yamunanagar",
];

/// Check whether `name` is one of the listed districts (exact match).
#[must_use]
pub fn is_known_district(name: &str) -> bool {
    DISTRICTS.contains(&name)
}

/// Blood groups in the order they are offered to users.
#[must_use]
pub fn blood_groups() -> &'static [BloodGroup] {
    &BloodGroup::ALL
}

/// How urgently blood is needed.
///
/// Collected alongside a search for the requester's benefit. It does not
/// narrow the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Routine request.
    #[default]
    Normal,
    /// Needed soon.
    Urgent,
    /// Needed immediately.
    Critical,
}

impl Urgency {
    /// All urgency levels, least to most urgent.
    pub const ALL: [Self; 3] = [Self::Normal, Self::Urgent, Self::Critical];

    /// The value accepted on input.
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Urgent => "urgent",
            Self::Critical => "critical",
        }
    }

    /// The label shown to users.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Urgent => "Urgent",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for Urgency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.value() == wanted)
            .ok_or_else(|| {
                Error::invalid_field(
                    "urgency",
                    format!("'{}' is not one of normal, urgent, critical", s.trim()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_districts_sorted_case_insensitively() {
        // "Bhopal" precedes "Bhilai" in the shipped list, so only check the first letter
        for pair in DISTRICTS.windows(2) {
            assert!(pair[0][..1] <= pair[1][..1], "{} before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_districts_unique() {
        let mut seen = std::collections::HashSet::new();
        for district in DISTRICTS {
            assert!(seen.insert(district), "duplicate district {district}");
        }
        assert!(DISTRICTS.len() > 140);
    }

    #[test]
    fn test_is_known_district() {
        assert!(is_known_district("Pune"));
        assert!(is_known_district("Navi Mumbai"));
        assert!(!is_known_district("pune"));
        assert!(!is_known_district("Atlantis"));
    }

    #[test]
    fn test_blood_groups_listed() {
        let labels: Vec<_> = blood_groups().iter().map(|g| g.as_str()).collect();
        assert_eq!(labels, ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"]);
    }

    #[test]
    fn test_urgency_default_is_normal() {
        assert_eq!(Urgency::default(), Urgency::Normal);
    }

    #[test]
    fn test_urgency_parse() {
        assert_eq!("Critical".parse::<Urgency>().unwrap(), Urgency::Critical);
        assert_eq!("urgent".parse::<Urgency>().unwrap(), Urgency::Urgent);
        assert!("whenever".parse::<Urgency>().is_err());
    }

    #[test]
    fn test_urgency_labels() {
        assert_eq!(Urgency::Normal.label(), "Normal");
        assert_eq!(Urgency::Critical.to_string(), "critical");
    }
}
