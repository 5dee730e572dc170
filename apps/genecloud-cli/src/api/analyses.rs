//! Project analysis API client methods

use crate::api::ApiClient;
use crate::error::CliResult;
use crate::models::{Analysis, Page, PageRequest};

/// Server-side filters for analysis listings
#[derive(Debug, Clone, Default)]
pub struct AnalysisFilter {
    pub status: Option<String>,
    pub user_reference: Option<String>,
}

impl AnalysisFilter {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = &self.status {
            query.push(("status", status.clone()));
        }
        if let Some(reference) = &self.user_reference {
            query.push(("userReference", reference.clone()));
        }
        query
    }
}

impl ApiClient {
    /// List one page of analyses in a project
    pub async fn list_analyses(
        &self,
        project_id: &str,
        filter: &AnalysisFilter,
        page: PageRequest,
    ) -> CliResult<Page<Analysis>> {
        let path = format!("/api/projects/{project_id}/analyses");
        self.get_page(&path, &filter.query(), page).await
    }
}
