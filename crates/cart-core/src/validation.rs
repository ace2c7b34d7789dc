//! # Checkout Form Validation
//!
//! Field-presence and format checks for the shipping and payment steps.
//! Errors are collected per field so a form can show all of them at once.

use crate::error::CartError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name -> message
pub type FieldErrors = BTreeMap<String, String>;

/// Shipping or billing address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address1: String,
    #[serde(default)]
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "US".to_string()
}

impl ShippingAddress {
    /// Validate the shipping step
    pub fn validate(&self) -> Result<(), CartError> {
        let mut errors = FieldErrors::new();

        require(&mut errors, "first_name", &self.first_name, "First name is required");
        require(&mut errors, "last_name", &self.last_name, "Last name is required");

        if self.email.trim().is_empty() {
            errors.insert("email".into(), "Email is required".into());
        } else if !is_valid_email(&self.email) {
            errors.insert("email".into(), "Invalid email format".into());
        }

        if self.phone.trim().is_empty() {
            errors.insert("phone".into(), "Phone is required".into());
        } else if !is_valid_phone(&self.phone) {
            errors.insert("phone".into(), "Invalid phone format".into());
        }

        require(&mut errors, "address1", &self.address1, "Address is required");
        require(&mut errors, "city", &self.city, "City is required");
        require(&mut errors, "state", &self.state, "State is required");
        require(&mut errors, "zip_code", &self.zip_code, "ZIP code is required");

        into_result(errors)
    }
}

/// How the customer pays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    #[default]
    Card,
    Paypal,
    ApplePay,
    GooglePay,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(rename = "type", default)]
    pub payment_type: PaymentType,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry_month: String,
    #[serde(default)]
    pub expiry_year: String,
    #[serde(default)]
    pub cvv: String,
    #[serde(default)]
    pub cardholder_name: String,
}

impl PaymentMethod {
    /// Validate the payment step. Only card payments carry fields to check.
    pub fn validate(&self) -> Result<(), CartError> {
        let mut errors = FieldErrors::new();

        if self.payment_type == PaymentType::Card {
            if self.card_number.trim().is_empty() {
                errors.insert("card_number".into(), "Card number is required".into());
            } else if !is_valid_card_number(&self.card_number) {
                errors.insert("card_number".into(), "Invalid card number".into());
            }
            require(&mut errors, "expiry_month", &self.expiry_month, "Expiry month is required");
            require(&mut errors, "expiry_year", &self.expiry_year, "Expiry year is required");
            require(&mut errors, "cvv", &self.cvv, "CVV is required");
            require(
                &mut errors,
                "cardholder_name",
                &self.cardholder_name,
                "Cardholder name is required",
            );
        }

        into_result(errors)
    }

    /// Last four digits for receipts; never keep the full number around
    pub fn masked(&self) -> PaymentMethod {
        let digits: String = self.card_number.chars().filter(char::is_ascii_digit).collect();
        let last4 = digits.get(digits.len().saturating_sub(4)..).unwrap_or_default();
        PaymentMethod {
            payment_type: self.payment_type,
            card_number: if last4.is_empty() {
                String::new()
            } else {
                format!("**** {last4}")
            },
            expiry_month: self.expiry_month.clone(),
            expiry_year: self.expiry_year.clone(),
            cvv: String::new(),
            cardholder_name: self.cardholder_name.clone(),
        }
    }
}

fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), message.to_string());
    }
}

fn into_result(errors: FieldErrors) -> Result<(), CartError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CartError::Validation { fields: errors })
    }
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot inside the
/// domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot + 1 < domain.len(),
        None => false,
    }
}

/// Optional leading `+`, then at least ten digits, spaces, dashes or parens.
pub fn is_valid_phone(phone: &str) -> bool {
    let body = phone.strip_prefix('+').unwrap_or(phone);
    body.chars().count() >= 10
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'))
}

/// 15 to 19 characters once whitespace is removed.
pub fn is_valid_card_number(card_number: &str) -> bool {
    let cleaned: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();
    (15..=19).contains(&cleaned.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "+1 (555) 010-2030".into(),
            address1: "12 Analytical Way".into(),
            address2: String::new(),
            city: "London".into(),
            state: "LDN".into(),
            zip_code: "10001".into(),
            country: "US".into(),
        }
    }

    #[test]
    fn test_valid_address() {
        assert!(address().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let err = ShippingAddress::default().validate().unwrap_err();
        let CartError::Validation { fields } = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 8);
        assert_eq!(fields["email"], "Email is required");
        assert_eq!(fields["zip_code"], "ZIP code is required");
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@c.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@c."));

        let mut bad = address();
        bad.email = "not-an-email".into();
        let CartError::Validation { fields } = bad.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(fields["email"], "Invalid email format");
    }

    #[test]
    fn test_phone_format() {
        assert!(is_valid_phone("5550102030"));
        assert!(is_valid_phone("+44 20 7946 0958"));
        assert!(!is_valid_phone("555-0102"));
        assert!(!is_valid_phone("call me maybe"));
    }

    #[test]
    fn test_card_payment_validation() {
        let card = PaymentMethod {
            payment_type: PaymentType::Card,
            card_number: "4242 4242 4242 4242".into(),
            expiry_month: "12".into(),
            expiry_year: "2030".into(),
            cvv: "123".into(),
            cardholder_name: "Ada Lovelace".into(),
        };
        assert!(card.validate().is_ok());

        let short = PaymentMethod {
            card_number: "4242 4242".into(),
            ..card.clone()
        };
        let CartError::Validation { fields } = short.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(fields["card_number"], "Invalid card number");
    }

    #[test]
    fn test_non_card_payment_skips_card_fields() {
        let paypal = PaymentMethod {
            payment_type: PaymentType::Paypal,
            ..Default::default()
        };
        assert!(paypal.validate().is_ok());
    }

    #[test]
    fn test_masked_card() {
        let card = PaymentMethod {
            card_number: "4242 4242 4242 1234".into(),
            cvv: "999".into(),
            ..Default::default()
        };
        let masked = card.masked();
        assert_eq!(masked.card_number, "**** 1234");
        assert!(masked.cvv.is_empty());
    }
}
