//! Demo request form
//!
//! Submission is simulated: after a fixed delay the form flips to its
//! success state. Nothing leaves the page.

use crate::error::{LoomkyError, Result};
use crate::navigation::DelayedAction;
use loomky_animation::SchedulerHandle;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Company,
    Properties,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 5] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Company,
        ContactField::Properties,
        ContactField::Message,
    ];

    /// Form input name
    pub fn name(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Company => "company",
            ContactField::Properties => "properties",
            ContactField::Message => "message",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn is_required(&self) -> bool {
        matches!(self, ContactField::Name | ContactField::Email)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub company: String,
    /// Portfolio size bucket, e.g. "1-5"
    pub properties: String,
    pub message: String,
}

impl ContactFields {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Company => &self.company,
            ContactField::Properties => &self.properties,
            ContactField::Message => &self.message,
        }
    }

    fn get_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Company => &mut self.company,
            ContactField::Properties => &mut self.properties,
            ContactField::Message => &mut self.message,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Editing,
    Submitting,
    Submitted,
}

pub struct ContactForm {
    fields: ContactFields,
    status: Rc<Cell<FormStatus>>,
    pending: Option<DelayedAction>,
    submit_delay_ms: u32,
}

impl ContactForm {
    pub fn new(submit_delay_ms: u32) -> Self {
        Self {
            fields: ContactFields::default(),
            status: Rc::new(Cell::new(FormStatus::Editing)),
            pending: None,
            submit_delay_ms,
        }
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    pub fn field(&self, field: ContactField) -> &str {
        self.fields.get(field)
    }

    /// Update one input. Ignored once the form has been sent.
    pub fn set_field(&mut self, field: ContactField, value: impl Into<String>) {
        if self.status() == FormStatus::Editing {
            *self.fields.get_mut(field) = value.into();
        }
    }

    pub fn status(&self) -> FormStatus {
        self.status.get()
    }

    pub fn is_submitting(&self) -> bool {
        self.status() == FormStatus::Submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.status() == FormStatus::Submitted
    }

    /// Start the simulated submission
    ///
    /// Returns `Ok(false)` if a submission is already in flight or done.
    pub fn submit(&mut self, scheduler: SchedulerHandle) -> Result<bool> {
        if self.status() != FormStatus::Editing {
            return Ok(false);
        }
        for field in ContactField::ALL {
            if field.is_required() && self.fields.get(field).trim().is_empty() {
                return Err(LoomkyError::MissingField(field.name()));
            }
        }

        let status = Rc::clone(&self.status);
        let action = DelayedAction::schedule(scheduler, self.submit_delay_ms, move || {
            status.set(FormStatus::Submitted);
            tracing::info!("demo request submitted");
        })?;
        self.status.set(FormStatus::Submitting);
        self.pending = Some(action);
        tracing::debug!(delay_ms = self.submit_delay_ms, "submitting demo request");
        Ok(true)
    }

    /// Back to an empty form, abandoning any submission in flight
    pub fn reset(&mut self) {
        if let Some(mut action) = self.pending.take() {
            action.cancel();
        }
        self.fields = ContactFields::default();
        self.status.set(FormStatus::Editing);
    }
}
