//! Results of background requests, delivered to the screen that started them

use crate::crud::Change;
use crate::form::ReferenceOptions;

#[derive(Debug, Clone)]
pub enum CrudEvent<R> {
    /// Full list fetched
    Listed(Vec<R>),
    /// Option sets for reference fields fetched
    ReferencesLoaded(ReferenceOptions),
    /// A create, update or delete was confirmed by the server
    Changed(Change<R>),
    /// A request failed; the message is already logged
    Failed(String),
}
