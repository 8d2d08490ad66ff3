//! Validation errors for domain inputs.
//!
//! Returned before any state changes, so a caller receiving one of these
//! can be sure neither memory nor the backend was touched.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Parties must have a display name.
    #[error("name cannot be empty")]
    EmptyName,

    /// A non-empty email must look like an address.
    #[error("invalid email address: {email}")]
    InvalidEmail { email: String },

    /// Purchases and sales must move a positive amount.
    #[error("amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },

    /// A running total would exceed the decimal range.
    #[error("amount {amount} would overflow the running total")]
    AmountOverflow { amount: Decimal },

    #[error("credit limit cannot be negative, got {limit}")]
    NegativeCreditLimit { limit: Decimal },

    /// The permission table has no entry for a role it must resolve.
    #[error("unknown role: {role}")]
    UnknownRole { role: String },
}

/// Check the fields every party (supplier or customer) shares.
pub(crate) fn validate_contact(name: &str, email: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::EmptyName);
    }
    let email = email.trim();
    if !email.is_empty() && !looks_like_email(email) {
        return Err(DomainError::InvalidEmail {
            email: email.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn validate_amount(amount: Decimal) -> Result<(), DomainError> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::NonPositiveAmount { amount });
    }
    Ok(())
}

/// Add `amount` to a running total without panicking on overflow.
pub(crate) fn accumulate(total: Decimal, amount: Decimal) -> Result<Decimal, DomainError> {
    total
        .checked_add(amount)
        .ok_or(DomainError::AmountOverflow { amount })
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(' ')
        }
        None => false,
    }
}
