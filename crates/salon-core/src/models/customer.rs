// ABOUTME: Customer contact fields and authenticated identity types
// ABOUTME: Contact validation for submission and pre-fill from the signed-in profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::contact::{MAX_PHONE_DIGITS, MIN_PHONE_DIGITS};
use serde::{Deserialize, Serialize};

/// Contact details attached to every appointment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerContact {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
}

impl CustomerContact {
    /// Names of required fields that are blank
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// First field whose format is invalid, with a reason
    #[must_use]
    pub fn format_problem(&self) -> Option<(&'static str, String)> {
        let email = self.email.trim();
        let well_formed_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !email.is_empty() && !well_formed_email {
            return Some(("email", format!("'{email}' is not a valid email address")));
        }

        let digits = self.phone.chars().filter(char::is_ascii_digit).count();
        if !self.phone.trim().is_empty()
            && !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
        {
            return Some((
                "phone",
                format!("phone number must have {MIN_PHONE_DIGITS}-{MAX_PHONE_DIGITS} digits"),
            ));
        }
        None
    }

    /// Fill blank fields from the signed-in profile, keeping anything already typed
    pub fn prefill_from(&mut self, identity: &CustomerIdentity) {
        fill_if_blank(&mut self.name, identity.display_name.as_deref());
        fill_if_blank(&mut self.email, identity.email.as_deref());
        fill_if_blank(&mut self.phone, identity.phone.as_deref());
    }
}

fn fill_if_blank(field: &mut String, value: Option<&str>) {
    if field.trim().is_empty() {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            value.clone_into(field);
        }
    }
}

/// Identity reported by the authentication provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerIdentity {
    /// Stable user identifier
    pub user_id: String,
    /// Profile display name
    pub display_name: Option<String>,
    /// Profile email
    pub email: Option<String>,
    /// Profile phone
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_reports_blanks() {
        let contact = CustomerContact {
            name: "Asha".to_owned(),
            email: "  ".to_owned(),
            phone: String::new(),
        };
        assert_eq!(contact.missing_fields(), vec!["email", "phone"]);
    }

    #[test]
    fn test_prefill_keeps_typed_values() {
        let mut contact = CustomerContact {
            name: "Typed Name".to_owned(),
            ..CustomerContact::default()
        };
        contact.prefill_from(&CustomerIdentity {
            user_id: "u1".to_owned(),
            display_name: Some("Profile Name".to_owned()),
            email: Some("asha@example.com".to_owned()),
            phone: None,
        });

        assert_eq!(contact.name, "Typed Name");
        assert_eq!(contact.email, "asha@example.com");
        assert!(contact.phone.is_empty());
    }

    #[test]
    fn test_format_problem_detects_bad_email_and_phone() {
        let mut contact = CustomerContact {
            name: "Asha".to_owned(),
            email: "asha.example.com".to_owned(),
            phone: "98765 43210".to_owned(),
        };
        assert_eq!(contact.format_problem().map(|(f, _)| f), Some("email"));

        contact.email = "asha@example.com".to_owned();
        assert_eq!(contact.format_problem(), None);

        contact.phone = "12345".to_owned();
        assert_eq!(contact.format_problem().map(|(f, _)| f), Some("phone"));
    }
}
