//! genecloud CLI library
//!
//! Configuration and session resolution, the REST client, identifier
//! resolution and the command set behind the `genecloud` binary. Exposed as
//! a library so integration tests can drive commands directly.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod external;
pub mod logging;
pub mod models;
pub mod output;
pub mod resolve;
