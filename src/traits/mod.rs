//! Trait definitions for Harvest operations.
//!
//! Each resource type implements the traits its endpoints support. The
//! traits carry default bodies that route through [`dispatch`](crate::dispatch),
//! so an implementation usually only names the resource's path.

mod create;
mod delete;
mod get;
mod list;
mod update;

pub use create::Create;
pub use delete::Delete;
pub use get::Get;
pub use list::List;
pub use update::Update;

/// A top-level Harvest resource addressed as `<PATH>/<id>`.
pub trait Resource {
    /// Collection path relative to the API root, e.g. `"time_entries"`.
    const PATH: &'static str;

    /// Path of a single item.
    fn item_path(id: u64) -> String {
        format!("{}/{id}", Self::PATH)
    }
}
