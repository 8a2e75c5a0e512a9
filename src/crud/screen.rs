//! Per-screen CRUD state machine: list, selection, form and submissions

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{error, info, warn};

use super::list_state::EntityListState;
use crate::api::{ApiError, Resource};
use crate::entities::Entity;
use crate::form::{FieldErrors, FormSchema, FormValues, ReferenceOptions, ValidationContext};
use crate::models::{Identified, RecordId};

/// Viewing: no selection, form in create mode. Editing: form pre-filled from the selected record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    Editing(RecordId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget {
    Create,
    Update(RecordId),
}

/// Remote call being made, for log and status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update(RecordId),
    Delete(RecordId),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::List => write!(f, "list"),
            Operation::Create => write!(f, "create"),
            Operation::Update(id) => write!(f, "update #{}", id),
            Operation::Delete(id) => write!(f, "delete #{}", id),
        }
    }
}

/// A confirmed server-side mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Change<R> {
    Created(R),
    Updated { id: RecordId, record: R },
    Deleted(RecordId),
}

/// Validated payload ready to be sent
#[derive(Debug, Clone)]
pub struct Submission<E: Entity> {
    pub target: SubmitTarget,
    pub payload: E::Payload,
}

impl<E: Entity> Submission<E> {
    pub fn operation(&self) -> Operation {
        match self.target {
            SubmitTarget::Create => Operation::Create,
            SubmitTarget::Update(id) => Operation::Update(id),
        }
    }

    pub async fn send(self, resource: &dyn Resource<Entity = E>) -> Result<Change<E::Record>, ApiError> {
        match self.target {
            SubmitTarget::Create => resource.create(&self.payload).await.map(Change::Created),
            SubmitTarget::Update(id) => resource
                .update(id, &self.payload)
                .await
                .map(|record| Change::Updated { id, record }),
        }
    }
}

/// Log a failed remote call and return a one-line status message
pub fn report_failure(entity: &str, operation: Operation, err: &ApiError) -> String {
    error!(
        entity = entity,
        operation = %operation,
        transient = err.is_transient(),
        "Failed to {} {}: {}",
        operation,
        entity.to_lowercase(),
        err
    );
    format!("Failed to {} {} (see log)", operation, entity.to_lowercase())
}

/// State behind one entity management screen
pub struct CrudScreen<E: Entity> {
    resource: Arc<dyn Resource<Entity = E>>,
    schema: FormSchema,
    records: EntityListState<E::Record>,
    selected: Option<RecordId>,
    form: FormValues,
    errors: FieldErrors,
    references: ReferenceOptions,
}

impl<E: Entity> CrudScreen<E> {
    pub fn new(resource: Arc<dyn Resource<Entity = E>>) -> Self {
        let schema = E::schema();
        let form = schema.default_values();
        Self {
            resource,
            schema,
            records: EntityListState::new(),
            selected: None,
            form,
            errors: FieldErrors::new(),
            references: ReferenceOptions::new(),
        }
    }

    pub fn resource(&self) -> Arc<dyn Resource<Entity = E>> {
        Arc::clone(&self.resource)
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn mode(&self) -> Mode {
        match self.selected {
            Some(id) => Mode::Editing(id),
            None => Mode::Viewing,
        }
    }

    pub fn records(&self) -> &[E::Record] {
        self.records.records()
    }

    pub fn selected_record(&self) -> Option<&E::Record> {
        self.selected.and_then(|id| self.records.get(id))
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    pub fn set_value(&mut self, field: &str, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn references(&self) -> &ReferenceOptions {
        &self.references
    }

    pub fn set_references(&mut self, references: ReferenceOptions) {
        self.references.extend(references);
    }

    /// Replace the list with a fresh fetch; a selection whose record vanished is dropped
    pub fn load(&mut self, records: Vec<E::Record>) {
        self.records.replace_all(records);
        if let Some(id) = self.selected {
            if self.records.get(id).is_none() {
                warn!("{} #{} is no longer listed, leaving edit mode", E::NAME, id);
                self.cancel_edit();
            }
        }
    }

    /// Enter edit mode for `id`, filling the form from that record
    pub fn select_for_edit(&mut self, id: RecordId) -> bool {
        match self.records.get(id) {
            Some(record) => {
                self.form = E::form_values(record);
                self.errors.clear();
                self.selected = Some(id);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.selected = None;
        self.reset_form();
    }

    pub fn reset_form(&mut self) {
        self.form = self.schema.default_values();
        self.errors.clear();
    }

    /// Validate the form; on success build what should be sent, otherwise keep the errors for display.
    ///
    /// A create clears the form right away so the next record can be typed while the request is
    /// in flight; an update keeps it until the server confirms.
    pub fn prepare_submission(&mut self, now: NaiveDateTime) -> Option<Submission<E>> {
        let ctx = ValidationContext::new(now, &self.references);
        let validated = self
            .schema
            .validate(&self.form, &ctx)
            .and_then(|_| E::build_payload(&self.form, self.selected_record()));

        match validated {
            Ok(payload) => {
                self.errors.clear();
                let target = match self.selected {
                    Some(id) => SubmitTarget::Update(id),
                    None => {
                        self.reset_form();
                        SubmitTarget::Create
                    }
                };
                Some(Submission { target, payload })
            }
            Err(errors) => {
                info!("{} form has {} invalid field(s)", E::NAME, errors.len());
                self.errors = errors;
                None
            }
        }
    }

    /// Fold a confirmed mutation into local state
    pub fn apply(&mut self, change: Change<E::Record>) {
        match change {
            Change::Created(record) => self.records.append(record),
            Change::Updated { id, record } => {
                if record.id() != id {
                    warn!("Server returned {} #{} for update of #{}", E::NAME, record.id(), id);
                }
                if !self.records.replace(id, record) {
                    warn!("Updated {} #{} is not in the loaded list", E::NAME, id);
                }
                if self.selected == Some(id) {
                    self.cancel_edit();
                }
            }
            Change::Deleted(id) => {
                self.records.remove(id);
                if self.selected == Some(id) {
                    self.cancel_edit();
                }
            }
        }
    }
}
