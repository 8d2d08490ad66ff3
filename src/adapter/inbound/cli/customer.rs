//! Handlers for the `customer` command group.

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tabled::Tabled;

use super::command::{AmountArgs, CustomerAddArgs, CustomerCommand, CustomerUpdateArgs, IdArg};
use super::output;
use crate::application::AppContext;
use crate::domain::{AccountOwner, Customer, CustomerId, CustomerPatch, NewCustomer};
use crate::error::Result;

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Credit Limit")]
    credit_limit: String,
    #[tabled(rename = "Sales")]
    total_sales: String,
    #[tabled(rename = "Last Sale")]
    last_sale: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id().to_string(),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            credit_limit: customer.credit_limit().to_string(),
            total_sales: customer.total_sales().to_string(),
            last_sale: customer
                .last_sale()
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

pub async fn execute(ctx: &AppContext, command: CustomerCommand) -> Result<()> {
    match command {
        CustomerCommand::List => list(ctx),
        CustomerCommand::Add(args) => add(ctx, args).await,
        CustomerCommand::Update(args) => update(ctx, args).await,
        CustomerCommand::Delete(args) => delete(ctx, args).await,
        CustomerCommand::Sale(args) => sale(ctx, args).await,
    }
}

fn list(ctx: &AppContext) -> Result<()> {
    let customers = ctx.store().customers();

    if output::is_json() {
        output::json_output(json!({
            "command": "customer.list",
            "customers": customers,
        }));
        return Ok(());
    }

    output::section("Customers");
    output::table(
        customers.iter().map(CustomerRow::from).collect(),
        "(no customers)",
    );
    Ok(())
}

async fn add(ctx: &AppContext, args: CustomerAddArgs) -> Result<()> {
    let contact = args.contact;
    let draft = NewCustomer {
        name: args.name,
        phone: contact.phone.unwrap_or_default(),
        email: contact.email.unwrap_or_default(),
        address: contact.address.unwrap_or_default(),
        tax_number: contact.tax_number.unwrap_or_default(),
        credit_limit: args.credit_limit.unwrap_or(Decimal::ZERO),
    };
    let customer = ctx.store().add_customer(draft).await?;
    report(ctx, "customer.add", "Customer added", &customer);
    Ok(())
}

async fn update(ctx: &AppContext, args: CustomerUpdateArgs) -> Result<()> {
    let contact = args.contact;
    let patch = CustomerPatch {
        name: args.name,
        phone: contact.phone,
        email: contact.email,
        address: contact.address,
        tax_number: contact.tax_number,
        credit_limit: args.credit_limit,
    };
    if patch.is_empty() {
        output::note("Nothing to update");
        return Ok(());
    }
    let customer = ctx
        .store()
        .update_customer(&CustomerId::from(args.id), patch)
        .await?;
    report(ctx, "customer.update", "Customer updated", &customer);
    Ok(())
}

async fn delete(ctx: &AppContext, args: IdArg) -> Result<()> {
    let customer = ctx
        .store()
        .delete_customer(&CustomerId::from(args.id))
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "customer.delete",
            "customer": customer,
        }));
        return Ok(());
    }

    output::success(&format!("Deleted customer {}", customer.name));
    output::field("ID", customer.id());
    Ok(())
}

async fn sale(ctx: &AppContext, args: AmountArgs) -> Result<()> {
    let at = args.at.unwrap_or_else(Utc::now);
    let customer = ctx
        .store()
        .record_sale(&CustomerId::from(args.id), args.amount, at)
        .await?;
    report(ctx, "customer.sale", "Sale recorded", &customer);
    Ok(())
}

fn report(ctx: &AppContext, command: &str, message: &str, customer: &Customer) {
    let account = ctx
        .store()
        .account_for(&AccountOwner::Customer(customer.id().clone()));

    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "customer": customer,
            "account": account,
        }));
        return;
    }

    output::success(message);
    output::field("ID", customer.id());
    output::field("Name", &customer.name);
    output::field("Credit limit", customer.credit_limit());
    output::field("Sales", customer.total_sales());
    if let Some(account) = account {
        output::field("Account", format!("{} ({})", account.code(), account.balance()));
    }
}
