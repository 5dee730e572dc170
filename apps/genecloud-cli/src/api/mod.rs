//! API client modules for genecloud

mod analyses;
mod client;
mod data;
mod pipelines;
mod tokens;
mod users;

pub use analyses::AnalysisFilter;
pub use client::{ApiClient, Auth};
