//! Harvest API model types.

mod client;
mod common;
mod company;
mod estimate;
mod expense;
mod invoice;
mod project;
mod report;
mod role;
mod task;
mod time_entry;
mod user;

pub use client::*;
pub use common::*;
pub use company::*;
pub use estimate::*;
pub use expense::*;
pub use invoice::*;
pub use project::*;
pub use report::*;
pub use role::*;
pub use task::*;
pub use time_entry::*;
pub use user::*;
