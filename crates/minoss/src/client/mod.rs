//! Client construction and configuration.
//!
//! [`MinossClient`] is built from a [`MinossConfig`] and hands out the
//! operation groups in [`crate::operations`].

mod minoss_client;
mod minoss_config;
mod minoss_credentials;

pub use minoss_client::MinossClient;
pub use minoss_config::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS, MinossConfig,
};
pub use minoss_credentials::MinossCredentials;
