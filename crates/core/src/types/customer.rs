//! Customer details collected at checkout.

use serde::{Deserialize, Serialize};

/// Errors that can occur when validating [`Customer`] details.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerError {
    /// The customer name is blank.
    #[error("customer name cannot be empty")]
    MissingName,
    /// The phone number is blank.
    #[error("phone number cannot be empty")]
    MissingPhone,
    /// The phone number contains characters other than digits and separators.
    #[error("phone number may only contain digits, spaces, dashes and a leading +")]
    InvalidPhone,
    /// A field exceeds its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
}

/// Who placed an order and how to reach them.
///
/// ## Constraints
///
/// - `name` and `phone` are required and stored trimmed
/// - `phone` holds digits, optionally a leading `+`, spaces and dashes
/// - blank `notes` are stored as `None`
///
/// ```
/// use warung_core::Customer;
///
/// let customer = Customer::new(" Budi ", "0812-3456-7890", "").unwrap();
/// assert_eq!(customer.name(), "Budi");
/// assert!(customer.notes().is_none());
///
/// assert!(Customer::new("", "0812", "").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CustomerFields")]
pub struct Customer {
    name: String,
    phone: String,
    notes: Option<String>,
}

/// Unchecked wire form of [`Customer`]; goes through [`Customer::new`].
#[derive(Deserialize)]
struct CustomerFields {
    name: String,
    phone: String,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<CustomerFields> for Customer {
    type Error = CustomerError;

    fn try_from(fields: CustomerFields) -> Result<Self, Self::Error> {
        Self::new(
            &fields.name,
            &fields.phone,
            fields.notes.as_deref().unwrap_or_default(),
        )
    }
}

impl Customer {
    /// Maximum length of the name field.
    pub const MAX_NAME_LENGTH: usize = 100;
    /// Maximum length of the phone field.
    pub const MAX_PHONE_LENGTH: usize = 32;
    /// Maximum length of the notes field.
    pub const MAX_NOTES_LENGTH: usize = 500;

    /// Validate and build customer details from raw form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or phone is blank, the phone contains
    /// unexpected characters, or any field is too long.
    pub fn new(name: &str, phone: &str, notes: &str) -> Result<Self, CustomerError> {
        let name = name.trim();
        let phone = phone.trim();
        let notes = notes.trim();

        if name.is_empty() {
            return Err(CustomerError::MissingName);
        }
        if name.chars().count() > Self::MAX_NAME_LENGTH {
            return Err(CustomerError::TooLong {
                field: "name",
                max: Self::MAX_NAME_LENGTH,
            });
        }

        if phone.is_empty() {
            return Err(CustomerError::MissingPhone);
        }
        if phone.chars().count() > Self::MAX_PHONE_LENGTH {
            return Err(CustomerError::TooLong {
                field: "phone",
                max: Self::MAX_PHONE_LENGTH,
            });
        }
        if !is_phone_number(phone) {
            return Err(CustomerError::InvalidPhone);
        }

        if notes.chars().count() > Self::MAX_NOTES_LENGTH {
            return Err(CustomerError::TooLong {
                field: "notes",
                max: Self::MAX_NOTES_LENGTH,
            });
        }

        Ok(Self {
            name: name.to_owned(),
            phone: phone.to_owned(),
            notes: (!notes.is_empty()).then(|| notes.to_owned()),
        })
    }

    /// Returns the customer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the phone number as entered (trimmed).
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the order notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

fn is_phone_number(phone: &str) -> bool {
    let body = phone.strip_prefix('+').unwrap_or(phone);
    body.chars().any(|c| c.is_ascii_digit())
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_validates() {
        let customer: Customer =
            serde_json::from_str(r#"{"name": " Siti ", "phone": "0812", "notes": ""}"#).unwrap();
        assert_eq!(customer, Customer::new("Siti", "0812", "").unwrap());

        let round_trip: Customer =
            serde_json::from_str(&serde_json::to_string(&customer).unwrap()).unwrap();
        assert_eq!(round_trip, customer);

        assert!(serde_json::from_str::<Customer>(r#"{"name": "", "phone": "0812"}"#).is_err());
        let invalid_phone = r#"{"name": "Siti", "phone": "call me"}"#;
        assert!(serde_json::from_str::<Customer>(invalid_phone).is_err());
    }

    #[test]
    fn test_valid_customer() {
        let customer = Customer::new("Siti", "+62 812-3456-7890", "no onions").unwrap();
        assert_eq!(customer.name(), "Siti");
        assert_eq!(customer.phone(), "+62 812-3456-7890");
        assert_eq!(customer.notes(), Some("no onions"));
    }

    #[test]
    fn test_missing_name() {
        assert_eq!(
            Customer::new("   ", "0812", ""),
            Err(CustomerError::MissingName)
        );
    }

    #[test]
    fn test_missing_phone() {
        assert_eq!(
            Customer::new("Siti", "  ", ""),
            Err(CustomerError::MissingPhone)
        );
    }

    #[test]
    fn test_invalid_phone() {
        assert_eq!(
            Customer::new("Siti", "call me", ""),
            Err(CustomerError::InvalidPhone)
        );
        assert_eq!(
            Customer::new("Siti", "+-", ""),
            Err(CustomerError::InvalidPhone)
        );
    }

    #[test]
    fn test_too_long() {
        let long = "a".repeat(Customer::MAX_NAME_LENGTH + 1);
        assert!(matches!(
            Customer::new(&long, "0812", ""),
            Err(CustomerError::TooLong { field: "name", .. })
        ));
    }

    #[test]
    fn test_blank_notes_become_none() {
        let customer = Customer::new("Siti", "0812", "   ").unwrap();
        assert!(customer.notes().is_none());
    }
}
