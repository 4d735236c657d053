// Large tool schemas are built with `json!`.
#![recursion_limit = "256"]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod inputs;
pub mod mcp;
pub mod pagination;
pub mod server;
pub mod tools;
pub mod types;

pub use client::GitLabClient;
pub use error::{GitLabError, Result};
