//! `/api/user` endpoints.

use tracing::instrument;

use storefront_core::Result;
use storefront_core::resources::UserRecord;

use crate::client::ApiClient;

#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    client: &'a ApiClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Every registered user. Admin only.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<UserRecord>> {
        self.client.get_json("/api/user/all").await
    }
}
