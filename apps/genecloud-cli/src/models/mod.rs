//! Data models for the genecloud REST API

pub mod analysis;
pub mod data;
pub mod page;
pub mod pipeline;
pub mod token;
pub mod user;

pub use analysis::Analysis;
pub use data::{AwsTempCredentials, DataItem, ProjectData};
pub use page::{Page, PageRequest, DEFAULT_PAGE_SIZE};
pub use pipeline::{InputParameter, Pipeline, ProjectPipeline};
pub use token::{JwtClaims, TokenResponse, EXPECTED_AUDIENCE};
pub use user::User;
