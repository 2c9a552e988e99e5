//! Element handler trait used to register form element types.

use crate::{
    element_type::ElementType, error::ElementError, schema::FieldDef, value::Value,
};

/// Static description of an element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    pub element_type: ElementType,
    pub label: &'static str,
    /// Value is derived from other fields rather than entered.
    pub computed: bool,
}

/// Render-ready view of one field: a plain value plus styling hints.
/// Markup generation is left to the host UI layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedElement {
    pub id: String,
    pub element_type: ElementType,
    pub title: String,
    /// Current registry value; for computed fields this may predate the
    /// latest recompute pass.
    pub value: Value,
    pub classes: Vec<String>,
}

impl RenderedElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Capability set of a form element type.
///
/// Handlers are registered explicitly with `formagg::FormBuilder` and
/// dispatched on [`ElementType`].
pub trait ElementHandler: Send + Sync {
    /// Returns the element type this handler serves.
    fn element_type(&self) -> ElementType;

    fn info(&self) -> ElementInfo;

    /// Build the render view for `field` holding `value` (`None` if unset).
    fn render(&self, field: &FieldDef, value: Option<&Value>) -> RenderedElement;

    /// Check that `value` is acceptable for `field`.
    fn validate(&self, field: &FieldDef, value: &Value) -> Result<(), ElementError>;
}
