//! One submission attempt against a [`Form`].

use formagg_core::{RenderedElement, Value};
use formagg_engine::{
    FieldRegistry, FieldValueSet, PersistedSubmission, RegistryError, encode, recompute,
};

use crate::{error::FormError, form::Form};

/// Editing state of one submission attempt.
///
/// Every change runs to completion, recompute included, before the next can
/// start; the session is not shared between threads. [`submit`](Self::submit)
/// consumes it, so a stored submission can only be edited again through
/// [`Form::reopen`], which starts a new uncommitted session.
#[derive(Debug)]
pub struct FormSession {
    form: Form,
    registry: FieldRegistry,
}

impl FormSession {
    pub(crate) fn new(form: Form, registry: FieldRegistry) -> Self {
        Self { form, registry }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.registry.get(id)
    }

    pub fn values(&self) -> FieldValueSet {
        self.registry.snapshot()
    }

    /// Change event hook: write an input field and recompute what depends on it.
    ///
    /// Returns the aggregation identifiers whose value changed, in evaluation order.
    pub fn set(&mut self, id: &str, value: impl Into<Value>) -> Result<Vec<String>, FormError> {
        let value = value.into();
        let field = self
            .form
            .schema()
            .field(id)
            .ok_or_else(|| RegistryError::UnknownField {
                field: id.to_string(),
            })?;
        if !field.is_aggregation() {
            self.form.handler_for(field)?.validate(field, &value)?;
        }
        self.write_and_recompute(id, value)
    }

    /// Reset an input field to null and recompute what depends on it.
    pub fn clear(&mut self, id: &str) -> Result<Vec<String>, FormError> {
        self.write_and_recompute(id, Value::Null)
    }

    pub fn render(&self, id: &str) -> Result<RenderedElement, FormError> {
        self.form.render(self, id)
    }

    /// Finish the session and return the submission to store.
    pub fn submit(self) -> PersistedSubmission {
        encode(&self.registry)
    }

    /// A change that drives any total outside the finite `f64` range is
    /// undone and reported; the session keeps its previous values.
    fn write_and_recompute(&mut self, id: &str, value: Value) -> Result<Vec<String>, FormError> {
        let previous = self.registry.set(id, value)?;
        let updated = self.recompute_from(id);

        let overflow = updated
            .iter()
            .find(|total| {
                matches!(self.registry.get(total), Some(Value::Float(v)) if !v.is_finite())
            })
            .cloned();
        if let Some(field) = overflow {
            match previous {
                Some(value) => {
                    self.registry.set(id, value)?;
                }
                None => {
                    self.registry.unset(id)?;
                }
            }
            self.recompute_from(id);
            return Err(FormError::NonFiniteTotal {
                field,
                changed: id.to_string(),
            });
        }
        Ok(updated)
    }

    fn recompute_from(&mut self, id: &str) -> Vec<String> {
        let updated = recompute(self.form.plan(), &mut self.registry, id);
        tracing::debug!(field = id, updated = ?updated, "field changed");
        updated
    }
}
