//! CRUD capability over one entity type

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info};

use super::{ApiClient, ApiError};
use crate::entities::Entity;
use crate::models::{Identified, RecordId};

/// The four remote operations every management screen relies on.
///
/// `create` and `update` return the server's canonical record, which may carry
/// fields the client never sent (generated id, resolved display names).
#[async_trait]
pub trait Resource: Send + Sync {
    type Entity: Entity;

    async fn list(&self) -> Result<Vec<<Self::Entity as Entity>::Record>, ApiError>;

    async fn create(
        &self,
        payload: &<Self::Entity as Entity>::Payload,
    ) -> Result<<Self::Entity as Entity>::Record, ApiError>;

    async fn update(
        &self,
        id: RecordId,
        payload: &<Self::Entity as Entity>::Payload,
    ) -> Result<<Self::Entity as Entity>::Record, ApiError>;

    async fn delete(&self, id: RecordId) -> Result<(), ApiError>;
}

/// REST implementation of [`Resource`] using the entity's endpoint table
pub struct ResourceClient<E> {
    api: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> ResourceClient<E> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for ResourceClient<E> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: Entity> Resource for ResourceClient<E> {
    type Entity = E;

    async fn list(&self) -> Result<Vec<E::Record>, ApiError> {
        let records: Vec<E::Record> = self.api.get_json(E::endpoints().list).await?;
        debug!("Fetched {} {}", records.len(), E::PLURAL.to_lowercase());
        Ok(records)
    }

    async fn create(&self, payload: &E::Payload) -> Result<E::Record, ApiError> {
        let record: E::Record = self
            .api
            .send_json(Method::POST, E::endpoints().create, payload)
            .await?;
        info!("Created {} #{}", E::NAME.to_lowercase(), record.id());
        Ok(record)
    }

    async fn update(&self, id: RecordId, payload: &E::Payload) -> Result<E::Record, ApiError> {
        let record = self
            .api
            .send_json(Method::PUT, &E::endpoints().item(id), payload)
            .await?;
        info!("Updated {} #{}", E::NAME.to_lowercase(), id);
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> Result<(), ApiError> {
        self.api.delete(&E::endpoints().item(id)).await?;
        info!("Deleted {} #{}", E::NAME.to_lowercase(), id);
        Ok(())
    }
}
