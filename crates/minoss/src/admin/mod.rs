//! Transport for the MinIO admin API.
//!
//! The S3 client library has no admin surface, so quota, usage and user
//! management calls go through [`AdminClient`], which signs each request
//! with [`signer::Signer`].

mod admin_client;
pub mod signer;

pub use admin_client::{ADMIN_API_PREFIX, ADMIN_SIGNING_REGION, ADMIN_SIGNING_SERVICE, AdminClient};
