//! Per-submission field values.

use std::{collections::HashMap, sync::Arc};

use formagg_core::{FormSchema, Value};

use crate::error::RegistryError;

/// Plain mapping from field identifier to value, scoped to one submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldValueSet {
    values: HashMap<String, Value>,
}

impl FieldValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(id.into(), value.into())
    }

    pub fn remove(&mut self, id: &str) -> Option<Value> {
        self.values.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FieldValueSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Current values of one form instance.
///
/// Input fields are written through [`set`](Self::set); aggregation entries
/// are owned by the recompute engine. Not meant to be shared across sessions.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    schema: Arc<FormSchema>,
    values: FieldValueSet,
}

impl FieldRegistry {
    pub fn new(schema: impl Into<Arc<FormSchema>>) -> Self {
        Self {
            schema: schema.into(),
            values: FieldValueSet::new(),
        }
    }

    /// Registry holding the input-field entries of `values`.
    ///
    /// Aggregation entries and identifiers outside the schema are skipped;
    /// run [`recompute_all`](crate::recompute_all) to fill in aggregations.
    pub fn replay(schema: impl Into<Arc<FormSchema>>, values: &FieldValueSet) -> Self {
        let mut registry = Self::new(schema);
        for field in registry.schema.primitives() {
            if let Some(value) = values.get(&field.id) {
                registry.values.insert(field.id.clone(), value.clone());
            }
        }
        registry
    }

    pub fn schema(&self) -> &Arc<FormSchema> {
        &self.schema
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    /// Write an input field, returning the previous value.
    pub fn set(&mut self, id: &str, value: impl Into<Value>) -> Result<Option<Value>, RegistryError> {
        self.check_writable(id)?;
        Ok(self.values.insert(id, value))
    }

    /// Reset an input field to `Value::Null`, returning the previous value.
    pub fn clear(&mut self, id: &str) -> Result<Option<Value>, RegistryError> {
        self.set(id, Value::Null)
    }

    /// Drop an input field's entry so it reads as never filled in.
    pub fn unset(&mut self, id: &str) -> Result<Option<Value>, RegistryError> {
        self.check_writable(id)?;
        Ok(self.values.remove(id))
    }

    pub fn snapshot(&self) -> FieldValueSet {
        self.values.clone()
    }

    /// Store a freshly computed aggregation value. Returns `true` if it changed.
    pub(crate) fn store_computed(&mut self, id: &str, value: Value) -> bool {
        if self.values.get(id) == Some(&value) {
            return false;
        }
        self.values.insert(id, value);
        true
    }

    fn check_writable(&self, id: &str) -> Result<(), RegistryError> {
        match self.schema.field(id) {
            None => Err(RegistryError::UnknownField {
                field: id.to_string(),
            }),
            Some(field) if field.is_aggregation() => Err(RegistryError::ReadOnlyField {
                field: id.to_string(),
            }),
            Some(_) => Ok(()),
        }
    }
}
