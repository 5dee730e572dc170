//! Project pipeline API client methods

use crate::api::ApiClient;
use crate::error::CliResult;
use crate::models::{InputParameter, Page, PageRequest, ProjectPipeline};

impl ApiClient {
    /// List one page of the pipelines linked to a project
    pub async fn list_project_pipelines(
        &self,
        project_id: &str,
        page: PageRequest,
    ) -> CliResult<Page<ProjectPipeline>> {
        let path = format!("/api/projects/{project_id}/pipelines");
        self.get_page(&path, &[], page).await
    }

    /// Get a single project pipeline by ID
    pub async fn get_project_pipeline(
        &self,
        project_id: &str,
        pipeline_id: &str,
    ) -> CliResult<ProjectPipeline> {
        let path = format!("/api/projects/{project_id}/pipelines/{pipeline_id}");
        self.get_json(&path, &[]).await
    }

    /// Declared inputs of a pipeline
    pub async fn get_input_parameters(
        &self,
        project_id: &str,
        pipeline_id: &str,
    ) -> CliResult<Vec<InputParameter>> {
        let path = format!("/api/projects/{project_id}/pipelines/{pipeline_id}/inputParameters");
        let page: Page<InputParameter> = self.get_json(&path, &[]).await?;
        Ok(page.items)
    }

    /// Move a pipeline from draft to released
    pub async fn release_pipeline(&self, project_id: &str, pipeline_id: &str) -> CliResult<()> {
        let path = format!("/api/projects/{project_id}/pipelines/{pipeline_id}:release");
        self.post_no_content::<()>(&path, None).await
    }
}
