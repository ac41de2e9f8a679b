//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! `harvest` binary.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("harvestapi-cli/", env!("CARGO_PKG_VERSION"));

/// Harvest API command-line interface.
///
/// Credentials are read from `HARVEST_ACCESS_TOKEN` and `HARVEST_ACCOUNT_ID`.
#[derive(Parser, Debug)]
#[command(name = "harvest", about = "Harvest API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log requests and pagination to stderr.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// User agent, as "AppName (contact@example.com)".
    #[arg(long, global = true, env = "HARVEST_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the authenticated user.
    Me,

    /// Show the account's company settings.
    Company,

    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity ID.
        id: u64,
    },

    /// List entities, one page or all of them.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Page number (1-indexed). Ignored by cursor-paginated entities.
        #[arg(long)]
        page: Option<u32>,

        /// Number of items per page (at most 2000).
        #[arg(long)]
        per_page: Option<u32>,

        /// Fetch every page instead of a single one.
        #[arg(long, conflicts_with = "page")]
        all: bool,
    },

    /// Delete an entity by ID.
    Delete {
        /// The type of entity to delete.
        entity: Entity,

        /// The entity ID.
        id: u64,
    },

    /// Run a report over a date range.
    Report {
        /// The report to run.
        kind: ReportKind,

        /// First day of the range (YYYY-MM-DD).
        #[arg(long)]
        from: NaiveDate,

        /// Last day of the range (YYYY-MM-DD).
        #[arg(long)]
        to: NaiveDate,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    #[value(alias = "clients")]
    Client,
    #[value(alias = "contacts")]
    Contact,
    #[value(alias = "projects")]
    Project,
    #[value(alias = "tasks")]
    Task,
    #[value(alias = "time-entries", alias = "entries")]
    TimeEntry,
    #[value(alias = "users")]
    User,
    #[value(alias = "roles")]
    Role,
    #[value(alias = "invoices")]
    Invoice,
    #[value(alias = "estimates")]
    Estimate,
    #[value(alias = "expenses")]
    Expense,
    #[value(alias = "expense-categories")]
    ExpenseCategory,
}

/// Reports available from the CLI.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    /// Hours per team member.
    Time,
    /// Expenses per team member.
    Expenses,
    /// Uninvoiced hours and expenses per project.
    Uninvoiced,
}
