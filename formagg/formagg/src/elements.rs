//! Built-in element handlers.

use formagg_core::{
    ElementError, ElementHandler, ElementInfo, ElementType, FieldDef, NumericPolicy,
    RenderedElement, Value,
};

/// All built-in handlers, for explicit registration at start-up.
pub fn default_elements() -> Vec<Box<dyn ElementHandler>> {
    vec![
        Box::new(NumberElement),
        Box::new(TextfieldElement),
        Box::new(CheckboxElement),
        Box::new(SummationElement),
    ]
}

/// Numeric input. Accepts numbers, numeric text and null.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberElement;

impl ElementHandler for NumberElement {
    fn element_type(&self) -> ElementType {
        ElementType::Number
    }

    fn info(&self) -> ElementInfo {
        ElementInfo {
            element_type: self.element_type(),
            label: "Number",
            computed: false,
        }
    }

    fn render(&self, field: &FieldDef, value: Option<&Value>) -> RenderedElement {
        render_field(field, value, &[])
    }

    fn validate(&self, field: &FieldDef, value: &Value) -> Result<(), ElementError> {
        check_element(self, field)?;
        if value.is_null() || value.as_numeric(NumericPolicy::ParseText).is_some() {
            Ok(())
        } else {
            Err(invalid(field, value))
        }
    }
}

/// Single-line text input. Accepts any scalar.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextfieldElement;

impl ElementHandler for TextfieldElement {
    fn element_type(&self) -> ElementType {
        ElementType::Textfield
    }

    fn info(&self) -> ElementInfo {
        ElementInfo {
            element_type: self.element_type(),
            label: "Text field",
            computed: false,
        }
    }

    fn render(&self, field: &FieldDef, value: Option<&Value>) -> RenderedElement {
        render_field(field, value, &[])
    }

    fn validate(&self, field: &FieldDef, _value: &Value) -> Result<(), ElementError> {
        check_element(self, field)
    }
}

/// Boolean input. Accepts booleans and null.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckboxElement;

impl ElementHandler for CheckboxElement {
    fn element_type(&self) -> ElementType {
        ElementType::Checkbox
    }

    fn info(&self) -> ElementInfo {
        ElementInfo {
            element_type: self.element_type(),
            label: "Checkbox",
            computed: false,
        }
    }

    fn render(&self, field: &FieldDef, value: Option<&Value>) -> RenderedElement {
        let checked = value.is_some_and(|v| matches!(v, Value::Bool(true)));
        let extra: &[&str] = if checked { &["is-checked"] } else { &[] };
        render_field(field, value, extra)
    }

    fn validate(&self, field: &FieldDef, value: &Value) -> Result<(), ElementError> {
        check_element(self, field)?;
        value.try_bool().map(|_| ()).map_err(|_| invalid(field, value))
    }
}

/// Read-only sum of the fields selected as its sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummationElement;

impl ElementHandler for SummationElement {
    fn element_type(&self) -> ElementType {
        ElementType::Summation
    }

    fn info(&self) -> ElementInfo {
        ElementInfo {
            element_type: self.element_type(),
            label: "Summation field",
            computed: true,
        }
    }

    fn render(&self, field: &FieldDef, value: Option<&Value>) -> RenderedElement {
        render_field(
            field,
            value,
            &["form-element--computed", "form-element--readonly"],
        )
    }

    fn validate(&self, field: &FieldDef, value: &Value) -> Result<(), ElementError> {
        check_element(self, field)?;
        match value {
            Value::Null | Value::Int(_) | Value::Float(_) => Ok(()),
            _ => Err(invalid(field, value)),
        }
    }
}

fn render_field(field: &FieldDef, value: Option<&Value>, extra: &[&str]) -> RenderedElement {
    let element_type = field.element_type();
    let mut classes = vec![
        "form-element".to_string(),
        format!("form-element--type-{element_type}"),
    ];
    classes.extend(extra.iter().map(|c| c.to_string()));

    RenderedElement {
        id: field.id.clone(),
        element_type,
        title: field.title.clone(),
        value: value.cloned().unwrap_or_default(),
        classes,
    }
}

fn check_element(handler: &dyn ElementHandler, field: &FieldDef) -> Result<(), ElementError> {
    let handler_type = handler.element_type();
    if field.element_type() == handler_type {
        Ok(())
    } else {
        Err(ElementError::WrongElement {
            field: field.id.clone(),
            element_type: field.element_type().to_string(),
            handler: handler_type.to_string(),
        })
    }
}

fn invalid(field: &FieldDef, value: &Value) -> ElementError {
    ElementError::InvalidValue {
        field: field.id.clone(),
        found: value.variant_name(),
    }
}
