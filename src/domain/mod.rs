//! Business entities, permissions and navigation.
//!
//! Nothing here performs I/O. The store in [`crate::application`] owns the
//! collections and drives persistence; this layer only defines the records
//! and the rules they obey.

pub mod access;
pub mod account;
pub mod collection;
pub mod customer;
pub mod entity;
pub mod error;
pub mod id;
pub mod navigation;
pub mod supplier;

pub use access::{PermissionTable, Section, ADMIN_ROLE};
pub use account::{AccountKind, AccountOwner, LinkedAccount};
pub use collection::Collection;
pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use entity::{Entity, Party};
pub use error::DomainError;
pub use id::{AccountId, CustomerId, SupplierId};
pub use navigation::{NavEntry, Navigation};
pub use supplier::{NewSupplier, Supplier, SupplierPatch};
