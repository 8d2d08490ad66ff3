//! Builders for domain inputs used across tests.

use rust_decimal::Decimal;

use crate::domain::{NewCustomer, NewSupplier};

/// The supplier used throughout the store scenarios.
pub fn acme() -> NewSupplier {
    NewSupplier::new("ACME")
        .with_phone("+966500000000")
        .with_email("a@x.com")
}

/// A supplier with every contact field filled in.
pub fn full_supplier(name: &str) -> NewSupplier {
    NewSupplier {
        name: name.to_string(),
        phone: "+966511111111".into(),
        email: format!("{}@example.sa", name.to_lowercase().replace(' ', ".")),
        address: "الرياض، حي العليا".into(),
        tax_number: "300000000000003".into(),
        payment_terms: "net30".into(),
    }
}

pub fn customer(name: &str) -> NewCustomer {
    NewCustomer {
        credit_limit: Decimal::from(10_000),
        ..NewCustomer::new(name)
    }
}
