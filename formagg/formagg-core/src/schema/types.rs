use std::{
    collections::{HashMap, HashSet},
    fmt::{Display, Formatter, Result},
};

use serde::{Deserialize, Serialize};

use crate::{element_type::ElementType, error::SchemaError};

/// Configuration of a derived (summation) field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregationDef {
    #[serde(default)]
    sources: Vec<String>,
}

impl AggregationDef {
    /// Duplicate identifiers are dropped, keeping the first occurrence.
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut def = Self {
            sources: sources.into_iter().map(Into::into).collect(),
        };
        def.dedupe_sources();
        def
    }

    /// Source field identifiers in the order the administrator selected them.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    fn dedupe_sources(&mut self) {
        let mut seen = HashSet::new();
        self.sources.retain(|s| seen.insert(s.clone()));
    }
}

/// Declared type of a field. The serialized `type` tag matches the
/// [`ElementType`] name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldKind {
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "textfield")]
    Text,
    #[serde(rename = "checkbox")]
    Boolean,
    #[serde(rename = "summation")]
    Summation(AggregationDef),
}

impl FieldKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            FieldKind::Number => ElementType::Number,
            FieldKind::Text => ElementType::Textfield,
            FieldKind::Boolean => ElementType::Checkbox,
            FieldKind::Summation(_) => ElementType::Summation,
        }
    }
}

/// One field of a form schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
        }
    }

    pub fn number(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, FieldKind::Number)
    }

    pub fn text(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, FieldKind::Text)
    }

    pub fn boolean(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, FieldKind::Boolean)
    }

    pub fn summation<I, S>(id: impl Into<String>, title: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(id, title, FieldKind::Summation(AggregationDef::new(sources)))
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn aggregation(&self) -> Option<&AggregationDef> {
        match &self.kind {
            FieldKind::Summation(def) => Some(def),
            _ => None,
        }
    }

    pub fn is_aggregation(&self) -> bool {
        self.aggregation().is_some()
    }
}

#[derive(Deserialize)]
struct FormSchemaRepr {
    fields: Vec<FieldDef>,
}

/// Ordered collection of fields with unique identifiers.
///
/// Immutable once built; share it between sessions behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSchema {
    fields: Vec<FieldDef>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldDef>) -> std::result::Result<Self, SchemaError> {
        let mut fields = fields;
        let mut index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter_mut().enumerate() {
            if index.insert(field.id.clone(), i).is_some() {
                return Err(SchemaError::DuplicateField {
                    field: field.id.clone(),
                });
            }
            if let FieldKind::Summation(def) = &mut field.kind {
                def.dedupe_sources();
            }
        }
        Ok(Self { fields, index })
    }

    /// Parse a schema of the form `{"fields": [{"id": .., "title": .., "type": ..}, ..]}`.
    pub fn from_json_str(text: &str) -> std::result::Result<Self, SchemaError> {
        let repr: FormSchemaRepr = serde_json::from_str(text)?;
        Self::new(repr.fields)
    }

    pub fn to_json_string(&self) -> std::result::Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&FieldDef> {
        self.index.get(id).map(|&i| &self.fields[i])
    }

    /// Declaration position of `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_aggregation(&self, id: &str) -> bool {
        self.field(id).is_some_and(FieldDef::is_aggregation)
    }

    /// Aggregation fields in declaration order.
    pub fn aggregations(&self) -> impl Iterator<Item = (&FieldDef, &AggregationDef)> {
        self.fields
            .iter()
            .filter_map(|f| f.aggregation().map(|def| (f, def)))
    }

    /// Non-aggregation fields in declaration order.
    pub fn primitives(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| !f.is_aggregation())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Display for FormSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = super::format_form_schema(self)?;
        f.write_str(&text)
    }
}
