//! Contact links for reaching a donor.
//!
//! Requesters reach donors outside the application: a `tel:` URI for a call,
//! or a `wa.me` deep link with a pre-filled WhatsApp message.

use serde::Serialize;
use url::form_urlencoded;
use url::Url;

use crate::config::ContactConfig;
use crate::donor::Donor;
use crate::error::{Error, Result};

/// Base of WhatsApp click-to-chat links.
const WHATSAPP_BASE: &str = "https://wa.me/";

/// Ways to reach a donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactLinks {
    /// `tel:` URI for the donor's number.
    pub call: String,
    /// WhatsApp deep link, when the donor has WhatsApp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
}

impl ContactLinks {
    /// Build every link the donor can be reached by.
    ///
    /// # Errors
    ///
    /// Returns an error if the WhatsApp link cannot be built.
    pub fn for_donor(donor: &Donor, contact: &ContactConfig) -> Result<Self> {
        let whatsapp = if donor.has_whatsapp {
            Some(whatsapp_link(donor, contact)?)
        } else {
            None
        };
        Ok(Self {
            call: call_link(donor),
            whatsapp,
        })
    }
}

/// `tel:` URI for the donor's mobile number.
#[must_use]
pub fn call_link(donor: &Donor) -> String {
    let number: String = donor
        .mobile_number
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("tel:{number}")
}

/// The message a requester sends when opening WhatsApp.
#[must_use]
pub fn whatsapp_message(donor: &Donor, app_name: &str) -> String {
    format!(
        "Hello {}, I found your contact on {app_name}. I need {} blood. Can you please help?",
        donor.full_name, donor.blood_group
    )
}

/// WhatsApp deep link with a pre-filled message.
///
/// Numbers entered in international form (leading `+`) are used as is;
/// anything else is prefixed with the configured country code.
///
/// # Errors
///
/// Returns [`Error::WhatsAppUnavailable`] if the donor did not register a
/// WhatsApp number.
pub fn whatsapp_link(donor: &Donor, contact: &ContactConfig) -> Result<String> {
    if !donor.has_whatsapp {
        return Err(Error::WhatsAppUnavailable { donor_id: donor.id });
    }

    let trimmed = donor.mobile_number.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    let number = if trimmed.starts_with('+') {
        digits
    } else {
        format!("{}{digits}", contact.country_code)
    };

    let url = Url::parse(WHATSAPP_BASE)
        .and_then(|base| base.join(&number))
        .map_err(|e| Error::internal(format!("failed to build WhatsApp link: {e}")))?;
    let text = encode_component(&whatsapp_message(donor, &contact.app_name));
    Ok(format!("{url}?text={text}"))
}

/// Percent-encode a URI component.
///
/// Leaves `A-Z a-z 0-9 - _ . ! ~ * ' ( )` as they are and encodes everything
/// else, spaces included, as `%XX`.
fn encode_component(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%7E", "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donor::BloodGroup;
    use chrono::Utc;

    fn donor(mobile: &str, has_whatsapp: bool) -> Donor {
        Donor {
            id: 3,
            full_name: "Priya Shah".to_string(),
            blood_group: BloodGroup::AbNegative,
            mobile_number: mobile.to_string(),
            district: "Surat".to_string(),
            last_donation_date: None,
            has_whatsapp,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_call_link() {
        assert_eq!(call_link(&donor("9876543210", true)), "tel:9876543210");
        assert_eq!(call_link(&donor("98765 43210", true)), "tel:9876543210");
    }

    fn parse(link: &str) -> Url {
        Url::parse(link).unwrap()
    }

    #[test]
    fn test_whatsapp_link_prefixes_country_code() {
        let link = whatsapp_link(&donor("9876543210", true), &ContactConfig::default()).unwrap();
        let url = parse(&link);
        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/919876543210");
    }

    #[test]
    fn test_whatsapp_link_message() {
        let link = whatsapp_link(&donor("9876543210", true), &ContactConfig::default()).unwrap();
        let text = parse(&link)
            .query_pairs()
            .find(|(key, _)| key == "text")
            .map(|(_, value)| value.into_owned())
            .unwrap();
        assert_eq!(
            text,
            "Hello Priya Shah, I found your contact on LifeFlow Blood Bank. \
             I need AB- blood. Can you please help?"
        );
    }

    #[test]
    fn test_whatsapp_link_percent_encodes_spaces() {
        let link = whatsapp_link(&donor("9876543210", true), &ContactConfig::default()).unwrap();
        assert_eq!(
            link,
            "https://wa.me/919876543210?text=Hello%20Priya%20Shah%2C%20I%20found%20your\
             %20contact%20on%20LifeFlow%20Blood%20Bank.%20I%20need%20AB-%20blood.\
             %20Can%20you%20please%20help%3F"
        );
        assert!(!link.contains('+'));
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("D'Souza (A+)"), "D'Souza%20(A%2B)");
        assert_eq!(encode_component("~ok! *yes*"), "~ok!%20*yes*");
        assert_eq!(encode_component("a&b=c/d"), "a%26b%3Dc%2Fd");
        assert_eq!(encode_component("सहायता"), "%E0%A4%B8%E0%A4%B9%E0%A4%BE%E0%A4%AF%E0%A4%A4%E0%A4%BE");
    }

    #[test]
    fn test_whatsapp_link_international_number() {
        let link =
            whatsapp_link(&donor("+44 7700 900123", true), &ContactConfig::default()).unwrap();
        assert_eq!(parse(&link).path(), "/447700900123");
    }

    #[test]
    fn test_whatsapp_link_custom_settings() {
        let contact = ContactConfig {
            country_code: "977".to_string(),
            app_name: "Kathmandu Donors".to_string(),
        };
        let url = parse(&whatsapp_link(&donor("9800000000", true), &contact).unwrap());
        assert_eq!(url.path(), "/9779800000000");
        assert!(url
            .query_pairs()
            .any(|(_, value)| value.contains("Kathmandu Donors")));
    }

    #[test]
    fn test_whatsapp_unavailable() {
        let err = whatsapp_link(&donor("9876543210", false), &ContactConfig::default()).unwrap_err();
        assert!(matches!(err, Error::WhatsAppUnavailable { donor_id: 3 }));
    }

    #[test]
    fn test_contact_links_for_donor() {
        let links =
            ContactLinks::for_donor(&donor("9876543210", false), &ContactConfig::default()).unwrap();
        assert_eq!(links.call, "tel:9876543210");
        assert!(links.whatsapp.is_none());

        let links =
            ContactLinks::for_donor(&donor("9876543210", true), &ContactConfig::default()).unwrap();
        assert!(links.whatsapp.unwrap().starts_with("https://wa.me/91"));
    }
}
