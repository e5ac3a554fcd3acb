//! Operation groups handed out by [`MinossClient`](crate::MinossClient).
//!
//! - [`BucketOperations`]: bucket listing, creation and policies
//! - [`ObjectOperations`]: listing, search, upload, download and removal
//! - [`AdminOperations`]: quotas, usage reports and user management

mod admin_operations;
mod bucket_operations;
mod object_operations;

pub use admin_operations::AdminOperations;
pub use bucket_operations::BucketOperations;
pub use object_operations::{DEFAULT_PART_SIZE, ObjectOperations};
