//! GitHub REST adapter used by the activity collector.

pub mod client;
pub mod models;

pub use client::GitHubClient;
pub use models::{GitHubEvent, PushActivity};
