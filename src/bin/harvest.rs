//! Harvest API CLI binary.
//!
//! A command-line interface for interacting with the Harvest API.

use clap::Parser;
use harvestapi::cli::{Cli, Command, Entity, ReportKind};
use harvestapi::output::PrettyPrint;
use harvestapi::{
    expense_report, time_report, uninvoiced_report, Client, Company, Contact, Delete, Estimate,
    Expense, ExpenseCategory, ExpenseReportOptions, Get, HarvestClient, Invoice, List, Page,
    Paginated, Project, Role, Task, TimeEntry, TimeReportOptions, UninvoicedReportOptions, User,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let client = match HarvestClient::from_env(&cli.user_agent) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set HARVEST_ACCESS_TOKEN and HARVEST_ACCOUNT_ID environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &HarvestClient, cli: Cli) -> harvestapi::Result<()> {
    match cli.command {
        Command::Me => output_single(&User::me(client).await?, cli.json),
        Command::Company => output_single(&Company::current(client).await?, cli.json),
        Command::Get { entity, id } => handle_get(client, entity, id, cli.json).await,
        Command::List {
            entity,
            page,
            per_page,
            all,
        } => {
            let list = ListArgs {
                page,
                per_page,
                all,
                json: cli.json,
            };
            handle_list(client, entity, &list).await
        }
        Command::Delete { entity, id } => handle_delete(client, entity, id).await,
        Command::Report { kind, from, to } => handle_report(client, kind, from, to, cli.json).await,
    }
}

async fn handle_get(
    client: &HarvestClient,
    entity: Entity,
    id: u64,
    json: bool,
) -> harvestapi::Result<()> {
    match entity {
        Entity::Client => output_single(&Client::get(client, id).await?, json),
        Entity::Contact => output_single(&Contact::get(client, id).await?, json),
        Entity::Project => output_single(&Project::get(client, id).await?, json),
        Entity::Task => output_single(&Task::get(client, id).await?, json),
        Entity::TimeEntry => output_single(&TimeEntry::get(client, id).await?, json),
        Entity::User => output_single(&User::get(client, id).await?, json),
        Entity::Role => output_single(&Role::get(client, id).await?, json),
        Entity::Invoice => output_single(&Invoice::get(client, id).await?, json),
        Entity::Estimate => output_single(&Estimate::get(client, id).await?, json),
        Entity::Expense => output_single(&Expense::get(client, id).await?, json),
        Entity::ExpenseCategory => output_single(&ExpenseCategory::get(client, id).await?, json),
    }
}

struct ListArgs {
    page: Option<u32>,
    per_page: Option<u32>,
    all: bool,
    json: bool,
}

async fn handle_list(
    client: &HarvestClient,
    entity: Entity,
    args: &ListArgs,
) -> harvestapi::Result<()> {
    match entity {
        Entity::Client => {
            list::<Client, _>(client, args, |c| Row::new(c.id, &c.name, active(c.is_active))).await
        }
        Entity::Contact => {
            list::<Contact, _>(client, args, |c| {
                let client_name = c.client.as_ref().map(|r| r.name.clone()).unwrap_or_default();
                Row::new(c.id, c.full_name(), client_name)
            })
            .await
        }
        Entity::Project => list::<Project, _>(client, args, |p| ProjectRow::from(p)).await,
        Entity::Task => {
            list::<Task, _>(client, args, |t| Row::new(t.id, &t.name, active(t.is_active))).await
        }
        Entity::TimeEntry => list::<TimeEntry, _>(client, args, |t| TimeEntryRow::from(t)).await,
        Entity::User => {
            list::<User, _>(client, args, |u| Row::new(u.id, u.full_name(), &u.email)).await
        }
        Entity::Role => {
            list::<Role, _>(client, args, |r| {
                Row::new(r.id, &r.name, format!("{} members", r.user_ids.len()))
            })
            .await
        }
        Entity::Invoice => list::<Invoice, _>(client, args, |i| InvoiceRow::from(i)).await,
        Entity::Estimate => {
            list::<Estimate, _>(client, args, |e| {
                Row::new(e.id, e.number.clone().unwrap_or_default(), &e.state)
            })
            .await
        }
        Entity::Expense => {
            list::<Expense, _>(client, args, |e| {
                Row::new(e.id, e.spent_date, format!("{:.2}", e.total_cost))
            })
            .await
        }
        Entity::ExpenseCategory => {
            list::<ExpenseCategory, _>(client, args, |c| {
                Row::new(c.id, &c.name, active(c.is_active))
            })
            .await
        }
    }
}

async fn list<T, R>(
    client: &HarvestClient,
    args: &ListArgs,
    to_row: impl Fn(&T) -> R,
) -> harvestapi::Result<()>
where
    T: List + Serialize,
    R: Tabled,
{
    let mut query = T::Query::default();
    let pagination = query.pagination_mut();
    pagination.page = args.page;
    pagination.per_page = args.per_page;

    if args.all {
        let items = T::list_all(client, &query).await?;
        output_items(&items, args.json, to_row)
    } else {
        let page = T::list_page(client, &query).await?;
        output_page(&page, args.json, to_row)
    }
}

async fn handle_delete(client: &HarvestClient, entity: Entity, id: u64) -> harvestapi::Result<()> {
    match entity {
        Entity::Client => Client::delete(client, id).await?,
        Entity::Contact => Contact::delete(client, id).await?,
        Entity::Project => Project::delete(client, id).await?,
        Entity::Task => Task::delete(client, id).await?,
        Entity::TimeEntry => TimeEntry::delete(client, id).await?,
        Entity::User => User::delete(client, id).await?,
        Entity::Role => Role::delete(client, id).await?,
        Entity::Invoice => Invoice::delete(client, id).await?,
        Entity::Estimate => Estimate::delete(client, id).await?,
        Entity::Expense => Expense::delete(client, id).await?,
        Entity::ExpenseCategory => ExpenseCategory::delete(client, id).await?,
    }
    eprintln!("Deleted {entity:?} {id}");
    Ok(())
}

async fn handle_report(
    client: &HarvestClient,
    kind: ReportKind,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
    json: bool,
) -> harvestapi::Result<()> {
    match kind {
        ReportKind::Time => {
            let rows = time_report(client, &TimeReportOptions::new(from, to)).await?;
            output_items(&rows, json, |r| ReportRow {
                name: r.user_name.clone().unwrap_or_default(),
                hours: format!("{:.2}", r.total_hours),
                amount: format!("{:.2}", r.billable_amount),
            })
        }
        ReportKind::Expenses => {
            let rows = expense_report(client, &ExpenseReportOptions::new(from, to)).await?;
            output_items(&rows, json, |r| ReportRow {
                name: r.user_name.clone().unwrap_or_default(),
                hours: String::new(),
                amount: format!("{:.2}", r.total_amount),
            })
        }
        ReportKind::Uninvoiced => {
            let rows = uninvoiced_report(client, &UninvoicedReportOptions::new(from, to)).await?;
            output_items(&rows, json, |r| ReportRow {
                name: r.project_name.clone().unwrap_or_default(),
                hours: format!("{:.2}", r.uninvoiced_hours),
                amount: format!("{:.2}", r.uninvoiced_amount),
            })
        }
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> harvestapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_items<T, R, F>(items: &[T], json: bool, to_row: F) -> harvestapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} items", items.len());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, json: bool, to_row: F) -> harvestapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
    } else {
        let rows: Vec<R> = page.items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        let more = if page.has_next_page() {
            "more available, use --all"
        } else {
            "end"
        };
        match page.page {
            Some(n) => println!(
                "\nPage {n}/{} ({} total items, {more})",
                page.total_pages, page.total_entries
            ),
            None => println!("\n{} of {} items ({more})", page.len(), page.total_entries),
        }
    }
    Ok(())
}

fn active(flag: bool) -> &'static str {
    if flag {
        "active"
    } else {
        "archived"
    }
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct Row {
    id: u64,
    name: String,
    detail: String,
}

impl Row {
    fn new(id: u64, name: impl ToString, detail: impl ToString) -> Self {
        Self {
            id,
            name: name.to_string(),
            detail: detail.to_string(),
        }
    }
}

#[derive(Tabled)]
struct ProjectRow {
    id: u64,
    code: String,
    name: String,
    client: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            code: p.code.clone().unwrap_or_default(),
            name: p.name.clone(),
            client: p.client.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct TimeEntryRow {
    id: u64,
    date: String,
    hours: String,
    project: String,
    task: String,
    user: String,
}

impl From<&TimeEntry> for TimeEntryRow {
    fn from(t: &TimeEntry) -> Self {
        Self {
            id: t.id,
            date: t.spent_date.to_string(),
            hours: format!("{:.2}{}", t.hours, if t.is_running { " *" } else { "" }),
            project: t.project.as_ref().map(|p| p.name.clone()).unwrap_or_default(),
            task: t.task.as_ref().map(|r| r.name.clone()).unwrap_or_default(),
            user: t.user.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct InvoiceRow {
    id: u64,
    number: String,
    client: String,
    state: String,
    due: String,
}

impl From<&Invoice> for InvoiceRow {
    fn from(i: &Invoice) -> Self {
        Self {
            id: i.id,
            number: i.number.clone().unwrap_or_default(),
            client: i.client.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
            state: i.state.clone(),
            due: format!("{:.2}", i.due_amount),
        }
    }
}

#[derive(Tabled)]
struct ReportRow {
    name: String,
    hours: String,
    amount: String,
}
