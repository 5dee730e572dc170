//! Token exchange

use crate::api::ApiClient;
use crate::error::CliResult;
use crate::models::TokenResponse;

impl ApiClient {
    /// Exchange the API key this client was built with for a JWT
    pub async fn create_token(&self) -> CliResult<String> {
        let response: TokenResponse = self.post_json::<(), _>("/api/tokens", None).await?;
        Ok(response.token)
    }
}
