//! Name to identifier resolution over paginated list endpoints
//!
//! Human-friendly arguments (pipeline codes, user full names) are turned into
//! platform IDs by walking a list endpoint page by page and matching a
//! display field exactly on the client side.

use crate::api::ApiClient;
use crate::error::{CliError, CliResult};
use crate::models::{Page, PageRequest, Pipeline, User, DEFAULT_PAGE_SIZE};
use async_trait::async_trait;

/// A list endpoint that can be read one page at a time
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;

    /// Fetch the page described by `request`
    async fn fetch_page(&self, request: PageRequest) -> CliResult<Page<Self::Item>>;
}

/// Resolves display names to items by exhaustive pagination
#[derive(Debug, Clone, Copy)]
pub struct IdentifierResolver {
    page_size: u32,
}

impl Default for IdentifierResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl IdentifierResolver {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Return the first item whose display field equals `key`
    ///
    /// Pages are requested until a match is found or the source reports no
    /// further pages; only then does this fail with `NotFound`.
    pub async fn resolve<S, F>(
        &self,
        source: &S,
        key: &str,
        kind: &str,
        display: F,
    ) -> CliResult<S::Item>
    where
        S: PageSource + ?Sized,
        F: Fn(&S::Item) -> String + Send + Sync,
    {
        let mut request = PageRequest::new(self.page_size);
        let mut pages = 0u32;

        loop {
            let page = source.fetch_page(request).await?;
            pages += 1;
            let has_more = page.has_more(&request);

            if let Some(found) = page.items.into_iter().find(|item| display(item) == key) {
                tracing::debug!(kind, key, pages, "Resolved identifier");
                return Ok(found);
            }

            if !has_more {
                tracing::debug!(kind, key, pages, "Exhausted pages without a match");
                return Err(CliError::NotFound(format!("{kind} '{key}'")));
            }
            request = request.next();
        }
    }
}

/// Users visible to the caller
pub struct UserSource<'a> {
    client: &'a ApiClient,
}

impl<'a> UserSource<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for UserSource<'_> {
    type Item = User;

    async fn fetch_page(&self, request: PageRequest) -> CliResult<Page<User>> {
        self.client.list_users(request).await
    }
}

/// Pipelines linked to one project
pub struct PipelineSource<'a> {
    client: &'a ApiClient,
    project_id: &'a str,
}

impl<'a> PipelineSource<'a> {
    pub fn new(client: &'a ApiClient, project_id: &'a str) -> Self {
        Self { client, project_id }
    }
}

#[async_trait]
impl PageSource for PipelineSource<'_> {
    type Item = Pipeline;

    async fn fetch_page(&self, request: PageRequest) -> CliResult<Page<Pipeline>> {
        let page = self
            .client
            .list_project_pipelines(self.project_id, request)
            .await?;
        Ok(Page {
            items: page.items.into_iter().map(|p| p.pipeline).collect(),
            total_item_count: page.total_item_count,
        })
    }
}

/// Resolve a user's `"<firstname> <lastname>"` to their user ID
pub async fn resolve_user_id(
    resolver: &IdentifierResolver,
    client: &ApiClient,
    full_name: &str,
) -> CliResult<String> {
    let user = resolver
        .resolve(&UserSource::new(client), full_name, "User", User::full_name)
        .await?;
    Ok(user.id)
}

/// Resolve a pipeline code (or an ID) within a project
pub async fn resolve_pipeline(
    resolver: &IdentifierResolver,
    client: &ApiClient,
    project_id: &str,
    code_or_id: &str,
) -> CliResult<Pipeline> {
    let source = PipelineSource::new(client, project_id);
    match resolver
        .resolve(&source, code_or_id, "Pipeline", |p: &Pipeline| p.code.clone())
        .await
    {
        Err(CliError::NotFound(_)) => {
            tracing::debug!(code_or_id, "No pipeline code matched, trying as an ID");
            client
                .get_project_pipeline(project_id, code_or_id)
                .await
                .map(|entry| entry.pipeline)
                .map_err(|e| match e {
                    CliError::NotFound(_) => {
                        CliError::NotFound(format!("Pipeline '{code_or_id}'"))
                    }
                    other => other,
                })
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory source that records every request it serves
    struct VecSource {
        items: Vec<String>,
        report_total: bool,
        requests: Mutex<Vec<PageRequest>>,
    }

    impl VecSource {
        fn new(items: &[&str], report_total: bool) -> Self {
            Self {
                items: items.iter().map(|s| s.to_string()).collect(),
                report_total,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PageSource for VecSource {
        type Item = String;

        async fn fetch_page(&self, request: PageRequest) -> CliResult<Page<String>> {
            self.requests.lock().unwrap().push(request);
            let items: Vec<String> = self
                .items
                .iter()
                .skip(request.offset as usize)
                .take(request.page_size as usize)
                .cloned()
                .collect();
            let page = Page::new(items);
            Ok(if self.report_total {
                page.with_total(self.items.len() as u64)
            } else {
                page
            })
        }
    }

    #[tokio::test]
    async fn test_match_on_third_page() {
        let source = VecSource::new(&["a", "b", "c", "d", "e", "target"], true);
        let resolver = IdentifierResolver::new(2);

        let found = resolver
            .resolve(&source, "target", "Item", String::clone)
            .await
            .unwrap();

        assert_eq!(found, "target");
        assert_eq!(source.request_count(), 3);
        let offsets: Vec<u32> = source.requests.lock().unwrap().iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![0, 2, 4]);
    }

    #[tokio::test]
    async fn test_stops_at_first_match() {
        let source = VecSource::new(&["a", "target", "c", "target"], true);
        let resolver = IdentifierResolver::new(2);

        resolver
            .resolve(&source, "target", "Item", String::clone)
            .await
            .unwrap();
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn test_not_found_after_all_pages() {
        let source = VecSource::new(&["a", "b", "c", "d", "e"], true);
        let resolver = IdentifierResolver::new(2);

        let err = resolver
            .resolve(&source, "zzz", "Item", String::clone)
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::NotFound(ref m) if m.contains("zzz")));
        assert_eq!(source.request_count(), 3);
    }

    #[tokio::test]
    async fn test_without_total_ends_on_empty_page() {
        let source = VecSource::new(&["a", "b", "c", "d"], false);
        let resolver = IdentifierResolver::new(2);

        let err = resolver
            .resolve(&source, "zzz", "Item", String::clone)
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::NotFound(_)));
        // Two full pages, then an empty one signals the end
        assert_eq!(source.request_count(), 3);
    }

    #[tokio::test]
    async fn test_exact_match_only() {
        let source = VecSource::new(&["Jane Doe", "Jane Doe Jr"], true);
        let resolver = IdentifierResolver::default();

        assert!(resolver
            .resolve(&source, "Jane", "User", String::clone)
            .await
            .is_err());
        assert_eq!(
            resolver
                .resolve(&source, "Jane Doe Jr", "User", String::clone)
                .await
                .unwrap(),
            "Jane Doe Jr"
        );
    }

    #[test]
    fn test_default_page_size() {
        assert_eq!(IdentifierResolver::default().page_size(), 1000);
        assert_eq!(IdentifierResolver::new(0).page_size(), 1);
    }
}
