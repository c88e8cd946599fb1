//! Scenario Sync Remote - HTTP catalog client
//!
//! Implements [`scenario_sync_core::ScenarioCatalog`] against the Xray Cloud
//! REST and GraphQL API.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod wire;

pub use client::{XrayClient, CONNECT_TIMEOUT, REQUEST_TIMEOUT};
pub use wire::{issue_key_jql, parse_tests_response, parse_token, GET_TESTS_QUERY};
