use crate::{
    api::{AzureClient, BaseClient},
    types::{CloudcraftConfig, CloudcraftError, DeleteAzureAccountInput},
};

#[derive(Debug, Clone)]
/// A Cloudcraft account, reached with the API key it was configured with.
pub struct Cloudcraft {
    client: BaseClient,
}

impl Cloudcraft {
    /// Create a new [`Cloudcraft`].
    ///
    /// Fails if the API key is empty or cannot be sent as a header, or if the
    /// endpoint does not form a valid URL.
    pub fn new(config: CloudcraftConfig) -> Result<Self, CloudcraftError> {
        Ok(Self {
            client: BaseClient::init(&config)?,
        })
    }

    /// Get a [`CloudcraftAzure`].
    pub fn azure(&self) -> CloudcraftAzure {
        CloudcraftAzure {
            client: AzureClient::init(self.client.clone()),
        }
    }
}

#[derive(Debug, Clone)]
/// Azure accounts registered with a Cloudcraft account.
pub struct CloudcraftAzure {
    client: AzureClient,
}

impl CloudcraftAzure {
    /// Delete an Azure account.
    ///
    /// Issues a single request. Dropping the returned future cancels it.
    pub async fn delete_account(
        &self,
        input: DeleteAzureAccountInput,
    ) -> Result<(), CloudcraftError> {
        Ok(self
            .client
            .delete_account(&input.id, input.ignore_not_found)
            .await?)
    }
}
