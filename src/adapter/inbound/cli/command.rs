//! Command-line interface definitions.
//!
//! The operator CLI drives the entity store directly: supplier and customer
//! CRUD, purchase and sale recording, role menus, and configuration checks.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

/// Business dashboard data core
#[derive(Parser, Debug)]
#[command(name = "dukkan")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "dukkan.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage suppliers
    #[command(subcommand)]
    Supplier(SupplierCommand),

    /// Manage customers
    #[command(subcommand)]
    Customer(CustomerCommand),

    /// Show the navigation menu visible to a role
    Menu(MenuArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `dukkan supplier`.
#[derive(Subcommand, Debug)]
pub enum SupplierCommand {
    /// List all suppliers.
    List,
    /// Add a supplier.
    Add(SupplierAddArgs),
    /// Update fields of an existing supplier.
    Update(SupplierUpdateArgs),
    /// Delete a supplier and its payable account.
    Delete(IdArg),
    /// Record a purchase from a supplier.
    Purchase(AmountArgs),
}

/// Subcommands for `dukkan customer`.
#[derive(Subcommand, Debug)]
pub enum CustomerCommand {
    /// List all customers.
    List,
    /// Add a customer.
    Add(CustomerAddArgs),
    /// Update fields of an existing customer.
    Update(CustomerUpdateArgs),
    /// Delete a customer and its receivable account.
    Delete(IdArg),
    /// Record a sale to a customer.
    Sale(AmountArgs),
}

/// Subcommands for `dukkan config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the configuration file without opening any backend.
    Validate,
}

/// Contact fields shared by suppliers and customers.
#[derive(Args, Debug, Default)]
pub struct ContactArgs {
    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Postal address
    #[arg(long)]
    pub address: Option<String>,

    /// Tax registration number
    #[arg(long)]
    pub tax_number: Option<String>,
}

#[derive(Args, Debug)]
pub struct SupplierAddArgs {
    /// Supplier name
    pub name: String,

    #[command(flatten)]
    pub contact: ContactArgs,

    /// Payment terms, e.g. "net 30"
    #[arg(long)]
    pub payment_terms: Option<String>,
}

#[derive(Args, Debug)]
pub struct SupplierUpdateArgs {
    /// Supplier id
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub contact: ContactArgs,

    /// New payment terms
    #[arg(long)]
    pub payment_terms: Option<String>,
}

#[derive(Args, Debug)]
pub struct CustomerAddArgs {
    /// Customer name
    pub name: String,

    #[command(flatten)]
    pub contact: ContactArgs,

    /// Credit limit
    #[arg(long)]
    pub credit_limit: Option<Decimal>,
}

#[derive(Args, Debug)]
pub struct CustomerUpdateArgs {
    /// Customer id
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub contact: ContactArgs,

    /// New credit limit
    #[arg(long)]
    pub credit_limit: Option<Decimal>,
}

#[derive(Args, Debug)]
pub struct IdArg {
    /// Record id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct AmountArgs {
    /// Record id
    pub id: String,

    /// Positive amount
    pub amount: Decimal,

    /// Timestamp in RFC 3339 (defaults to now)
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub struct MenuArgs {
    /// Role name (unknown or omitted roles use the fallback role)
    #[arg(long)]
    pub role: Option<String>,
}
