//! Entity definitions: endpoints, form schema, grid columns and payload mapping
//!
//! Each managed entity type is a zero-sized marker implementing [`Entity`];
//! the generic CRUD screen and the resource client are instantiated with it.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::api::ApiClient;
use crate::crud::Column;
use crate::form::{FieldErrors, FormSchema, FormValues, ReferenceOptions};
use crate::models::{Identified, RecordId};

pub mod driver;
pub mod trip;
pub mod vehicle;

pub use driver::Drivers;
pub use trip::Trips;
pub use vehicle::Vehicles;

/// REST paths of one entity type, relative to the API base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub list: &'static str,
    pub create: &'static str,
    /// Prefix for update/delete; the record id is appended
    pub item_prefix: &'static str,
}

impl Endpoints {
    pub fn item(&self, id: RecordId) -> String {
        format!("{}/{}", self.item_prefix.trim_end_matches('/'), id)
    }
}

#[async_trait]
pub trait Entity: Send + Sync + 'static {
    type Record: Identified + Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;
    type Payload: Serialize + Debug + Clone + Send + Sync + 'static;

    /// Singular display name ("Vehicle")
    const NAME: &'static str;
    /// Plural display name ("Vehicles")
    const PLURAL: &'static str;

    fn endpoints() -> Endpoints;

    fn schema() -> FormSchema;

    fn columns() -> Vec<Column<Self::Record>>;

    /// Form contents for editing `record`
    fn form_values(record: &Self::Record) -> FormValues;

    /// Convert validated form input into a request body. `editing` is the record being
    /// updated, or `None` when creating.
    fn build_payload(values: &FormValues, editing: Option<&Self::Record>) -> Result<Self::Payload, FieldErrors>;

    /// Option sets for reference fields. Failures are logged and yield empty sets.
    async fn load_references(_api: &ApiClient) -> ReferenceOptions {
        ReferenceOptions::new()
    }
}

/// Parse a reference field holding a record id
pub(crate) fn parse_id(values: &FormValues, field: &str, errors: &mut FieldErrors) -> Option<RecordId> {
    match values.get(field).trim().parse::<RecordId>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, format!("{} must be a record id", field));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_path() {
        let endpoints = Vehicles::endpoints();
        assert_eq!(endpoints.item(7), "/api/vehicles/7");
        assert_eq!(Trips::endpoints().item(12), "/api/trips/12");
        assert_eq!(Drivers::endpoints().create, "/api/drivers/adddriver");
    }
}
