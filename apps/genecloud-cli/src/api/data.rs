//! Project data API client methods

use crate::api::ApiClient;
use crate::error::{CliError, CliResult};
use crate::models::data::{CreateFolderRequest, DownloadUrl, TemporaryCredentials};
use crate::models::{AwsTempCredentials, DataItem, Page, PageRequest, ProjectData};

/// Page size for path lookups; an exact path filter rarely fills one page
const LOOKUP_PAGE_SIZE: u32 = 10;

impl ApiClient {
    /// Look up a file or folder by its path in the project
    ///
    /// Folder paths end with `/`. Pages are walked until an item with exactly
    /// this path shows up. Returns `None` when nothing matches.
    pub async fn find_data_by_path(
        &self,
        project_id: &str,
        path: &str,
    ) -> CliResult<Option<DataItem>> {
        let url = format!("/api/projects/{project_id}/data");
        let filters = [("filePath", path.to_string()), ("filenameMatchMode", "EXACT".to_string())];
        let mut request = PageRequest::new(LOOKUP_PAGE_SIZE);

        loop {
            let page: Page<ProjectData> = self.get_page(&url, &filters, request).await?;
            let has_more = page.has_more(&request);

            if let Some(item) = page
                .items
                .into_iter()
                .map(|entry| entry.data)
                .find(|item| item.details.path == path)
            {
                return Ok(Some(item));
            }

            if !has_more {
                tracing::debug!(path, offset = request.offset, "No project data at path");
                return Ok(None);
            }
            request = request.next();
        }
    }

    /// Create a folder; `path` is the full folder path
    pub async fn create_folder(&self, project_id: &str, path: &str) -> CliResult<DataItem> {
        let request = CreateFolderRequest::for_path(path).ok_or_else(|| {
            CliError::InvalidArgument(format!("Cannot create folder at '{path}'"))
        })?;
        let url = format!("/api/projects/{project_id}/data");
        let created: ProjectData = self.post_json(&url, Some(&request)).await?;
        Ok(created.data)
    }

    /// Scoped S3 credentials for a folder
    pub async fn create_temporary_credentials(
        &self,
        project_id: &str,
        data_id: &str,
    ) -> CliResult<AwsTempCredentials> {
        let url = format!("/api/projects/{project_id}/data/{data_id}:createTemporaryCredentials");
        let creds: TemporaryCredentials = self.post_json::<(), _>(&url, None).await?;
        Ok(creds.aws_temp_credentials)
    }

    /// Presigned download URL for a file
    pub async fn create_download_url(&self, project_id: &str, data_id: &str) -> CliResult<String> {
        let url = format!("/api/projects/{project_id}/data/{data_id}:createDownloadUrl");
        let response: DownloadUrl = self.post_json::<(), _>(&url, None).await?;
        Ok(response.url)
    }
}
