//! Handlers for the `supplier` command group.

use chrono::Utc;
use serde_json::json;
use tabled::Tabled;

use super::command::{AmountArgs, IdArg, SupplierAddArgs, SupplierCommand, SupplierUpdateArgs};
use super::output;
use crate::application::AppContext;
use crate::domain::{AccountOwner, NewSupplier, Supplier, SupplierId, SupplierPatch};
use crate::error::Result;

#[derive(Tabled)]
struct SupplierRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Purchases")]
    total_purchases: String,
    #[tabled(rename = "Last Order")]
    last_order: String,
}

impl From<&Supplier> for SupplierRow {
    fn from(supplier: &Supplier) -> Self {
        Self {
            id: supplier.id().to_string(),
            name: supplier.name.clone(),
            phone: supplier.phone.clone(),
            email: supplier.email.clone(),
            total_purchases: supplier.total_purchases().to_string(),
            last_order: supplier
                .last_order()
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

pub async fn execute(ctx: &AppContext, command: SupplierCommand) -> Result<()> {
    match command {
        SupplierCommand::List => list(ctx),
        SupplierCommand::Add(args) => add(ctx, args).await,
        SupplierCommand::Update(args) => update(ctx, args).await,
        SupplierCommand::Delete(args) => delete(ctx, args).await,
        SupplierCommand::Purchase(args) => purchase(ctx, args).await,
    }
}

fn list(ctx: &AppContext) -> Result<()> {
    let suppliers = ctx.store().suppliers();

    if output::is_json() {
        output::json_output(json!({
            "command": "supplier.list",
            "suppliers": suppliers,
        }));
        return Ok(());
    }

    output::section("Suppliers");
    output::table(
        suppliers.iter().map(SupplierRow::from).collect(),
        "(no suppliers)",
    );
    Ok(())
}

async fn add(ctx: &AppContext, args: SupplierAddArgs) -> Result<()> {
    let contact = args.contact;
    let draft = NewSupplier {
        name: args.name,
        phone: contact.phone.unwrap_or_default(),
        email: contact.email.unwrap_or_default(),
        address: contact.address.unwrap_or_default(),
        tax_number: contact.tax_number.unwrap_or_default(),
        payment_terms: args.payment_terms.unwrap_or_default(),
    };
    let supplier = ctx.store().add_supplier(draft).await?;
    report(ctx, "supplier.add", "Supplier added", &supplier);
    Ok(())
}

async fn update(ctx: &AppContext, args: SupplierUpdateArgs) -> Result<()> {
    let contact = args.contact;
    let patch = SupplierPatch {
        name: args.name,
        phone: contact.phone,
        email: contact.email,
        address: contact.address,
        tax_number: contact.tax_number,
        payment_terms: args.payment_terms,
    };
    if patch.is_empty() {
        output::note("Nothing to update");
        return Ok(());
    }
    let supplier = ctx
        .store()
        .update_supplier(&SupplierId::from(args.id), patch)
        .await?;
    report(ctx, "supplier.update", "Supplier updated", &supplier);
    Ok(())
}

async fn delete(ctx: &AppContext, args: IdArg) -> Result<()> {
    let supplier = ctx
        .store()
        .delete_supplier(&SupplierId::from(args.id))
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "supplier.delete",
            "supplier": supplier,
        }));
        return Ok(());
    }

    output::success(&format!("Deleted supplier {}", supplier.name));
    output::field("ID", supplier.id());
    Ok(())
}

async fn purchase(ctx: &AppContext, args: AmountArgs) -> Result<()> {
    let at = args.at.unwrap_or_else(Utc::now);
    let supplier = ctx
        .store()
        .record_purchase(&SupplierId::from(args.id), args.amount, at)
        .await?;
    report(ctx, "supplier.purchase", "Purchase recorded", &supplier);
    Ok(())
}

fn report(ctx: &AppContext, command: &str, message: &str, supplier: &Supplier) {
    let account = ctx
        .store()
        .account_for(&AccountOwner::Supplier(supplier.id().clone()));

    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "supplier": supplier,
            "account": account,
        }));
        return;
    }

    output::success(message);
    output::field("ID", supplier.id());
    output::field("Name", &supplier.name);
    output::field("Purchases", supplier.total_purchases());
    if let Some(account) = account {
        output::field("Account", format!("{} ({})", account.code(), account.balance()));
    }
}
