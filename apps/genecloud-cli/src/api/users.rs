//! User API client methods

use crate::api::ApiClient;
use crate::error::CliResult;
use crate::models::{Page, PageRequest, User};

impl ApiClient {
    /// List one page of users visible to the caller
    pub async fn list_users(&self, page: PageRequest) -> CliResult<Page<User>> {
        self.get_page("/api/users", &[], page).await
    }
}
