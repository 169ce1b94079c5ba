//! Routing of backend validation errors onto form fields.
//!
//! Each field is either clean or carries one backend error message. A
//! server error for the bound deposit moves a field to errored and shows
//! the message; the user editing an errored field clears it. Fields are
//! independent of each other.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};

use deposit_core::{FieldErrorSink, FieldPath, ValidationError};

/// Backend error state of one field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldErrorState {
    #[default]
    Clean,
    Errored { message: String },
}

/// Relays validation errors for one deposit to a [`FieldErrorSink`].
pub struct ValidationRouter {
    deposit_id: String,
    no_validate_fields: HashSet<String>,
    sink: Arc<dyn FieldErrorSink>,
    states: Mutex<HashMap<FieldPath, String>>,
}

impl ValidationRouter {
    pub fn new(
        deposit_id: impl Into<String>,
        no_validate_fields: impl IntoIterator<Item = String>,
        sink: Arc<dyn FieldErrorSink>,
    ) -> Self {
        Self {
            deposit_id: deposit_id.into(),
            no_validate_fields: no_validate_fields.into_iter().collect(),
            sink,
            states: Mutex::new(HashMap::new()),
        }
    }

    pub fn deposit_id(&self) -> &str {
        &self.deposit_id
    }

    /// Handle a validation error emitted for `deposit_id`.
    ///
    /// Returns `true` when the error was shown on its field. Errors for
    /// other deposits and for excluded fields are dropped.
    #[instrument(skip(self, error), fields(subsystem = "validation", op = "route_error", field = %error.field))]
    pub fn on_validation_error(&self, deposit_id: &str, error: &ValidationError) -> bool {
        if deposit_id != self.deposit_id {
            debug!(deposit_id, "Validation error for another deposit");
            return false;
        }
        if self.no_validate_fields.contains(error.field.as_str()) {
            debug!("Field excluded from backend validation");
            return false;
        }

        self.lock_states()
            .insert(error.field.clone(), error.message.clone());
        self.sink.show_error(&error.field, &error.message);
        true
    }

    /// Handle a change of `field`'s value by the user.
    ///
    /// Returns `true` when an active backend error was cleared.
    #[instrument(skip(self), fields(subsystem = "validation", op = "field_changed"))]
    pub fn on_field_changed(&self, field: &FieldPath) -> bool {
        if self.lock_states().remove(field).is_none() {
            return false;
        }
        self.sink.clear_error(field);
        true
    }

    /// Current state of `field`.
    pub fn state(&self, field: &FieldPath) -> FieldErrorState {
        match self.lock_states().get(field) {
            Some(message) => FieldErrorState::Errored {
                message: message.clone(),
            },
            None => FieldErrorState::Clean,
        }
    }

    /// Fields that currently carry a backend error, sorted by path.
    pub fn errored_fields(&self) -> Vec<FieldPath> {
        let mut fields: Vec<FieldPath> = self.lock_states().keys().cloned().collect();
        fields.sort();
        fields
    }

    fn lock_states(&self) -> std::sync::MutexGuard<'_, HashMap<FieldPath, String>> {
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }
}
