//! Form facade: schema, evaluation plan, and element handlers bundled for sessions.

use std::{collections::HashMap, fmt, sync::Arc};

use formagg_core::{
    ElementHandler, ElementType, FieldDef, FormSchema, NumericPolicy, RenderedElement,
};
use formagg_engine::{
    EvaluationPlan, FieldRegistry, FieldValueSet, PersistedSubmission, RegistryError,
    build_plan_with, decode, encode, recompute_all, validate,
};
use rayon::prelude::*;

use crate::{
    elements::default_elements,
    error::FormError,
    outcome::{Rejection, SubmissionOutcome},
    session::FormSession,
};

/// A deployed form: frozen schema, its evaluation plan, and the element
/// handlers for every field type it uses.
///
/// Cloning is cheap; clones share the same plan and handlers, and a `Form`
/// can be used from many threads at once.
#[derive(Clone)]
pub struct Form {
    plan: Arc<EvaluationPlan>,
    elements: Arc<HashMap<ElementType, Arc<dyn ElementHandler>>>,
}

/// Builder for configuring [`Form`].
pub struct FormBuilder {
    schema: Arc<FormSchema>,
    elements: Vec<Arc<dyn ElementHandler>>,
    policy: NumericPolicy,
}

impl Form {
    /// Create a builder for [`Form`].
    pub fn builder(schema: impl Into<Arc<FormSchema>>) -> FormBuilder {
        FormBuilder {
            schema: schema.into(),
            elements: Vec::new(),
            policy: NumericPolicy::default(),
        }
    }

    /// Parse a JSON schema and build a form with the built-in elements.
    pub fn from_json_str(text: &str) -> Result<Self, FormError> {
        Self::builder(FormSchema::from_json_str(text)?)
            .with_default_elements()
            .build()
    }

    pub fn schema(&self) -> &Arc<FormSchema> {
        self.plan.schema()
    }

    pub fn plan(&self) -> &EvaluationPlan {
        &self.plan
    }

    pub fn element(&self, element_type: &ElementType) -> Option<&Arc<dyn ElementHandler>> {
        self.elements.get(element_type)
    }

    /// Start an empty editing session. Aggregations start at zero.
    pub fn start_session(&self) -> FormSession {
        let mut registry = FieldRegistry::new(self.schema().clone());
        recompute_all(&self.plan, &mut registry);
        FormSession::new(self.clone(), registry)
    }

    /// Start a new uncommitted session from a stored submission.
    ///
    /// The submission is checked exactly like [`accept`](Self::accept) first.
    pub fn reopen(&self, persisted: &PersistedSubmission) -> Result<FormSession, Rejection> {
        self.checked_registry(persisted)
            .map(|registry| FormSession::new(self.clone(), registry))
            .map_err(|e| self.reject(e))
    }

    /// Persistence hook: check a client-supplied submission and return the
    /// re-encoded form to store, or a rejection.
    pub fn accept(&self, persisted: &PersistedSubmission) -> SubmissionOutcome {
        match self.checked_registry(persisted) {
            Ok(registry) => SubmissionOutcome::Accepted(encode(&registry)),
            Err(e) => SubmissionOutcome::Rejected(self.reject(e)),
        }
    }

    /// [`accept`](Self::accept) many submissions in parallel. Outcomes are
    /// returned in input order.
    pub fn accept_batch(&self, submissions: &[PersistedSubmission]) -> Vec<SubmissionOutcome> {
        submissions.par_iter().map(|s| self.accept(s)).collect()
    }

    /// Render view of field `id` holding its current (possibly stale) value.
    pub fn render(&self, session: &FormSession, id: &str) -> Result<RenderedElement, FormError> {
        let field = self
            .schema()
            .field(id)
            .ok_or_else(|| RegistryError::UnknownField {
                field: id.to_string(),
            })?;
        let handler = self.handler_for(field)?;
        Ok(handler.render(field, session.get(id)))
    }

    /// Render views of every field in declaration order.
    pub fn render_all(&self, session: &FormSession) -> Result<Vec<RenderedElement>, FormError> {
        self.schema()
            .fields()
            .iter()
            .map(|field| self.render(session, &field.id))
            .collect()
    }

    pub(crate) fn handler_for(&self, field: &FieldDef) -> Result<&dyn ElementHandler, FormError> {
        let element_type = field.element_type();
        self.elements
            .get(&element_type)
            .map(|handler| handler.as_ref())
            .ok_or_else(|| FormError::NoElementHandler {
                element_type: element_type.to_string(),
                field: field.id.clone(),
            })
    }

    fn checked_registry(&self, persisted: &PersistedSubmission) -> Result<FieldRegistry, FormError> {
        let decoded = decode(persisted, self.schema())?;
        self.check_inputs(&decoded)?;
        Ok(validate(&decoded, &self.plan)?)
    }

    /// Run element validation on every value present in `values`, persisted
    /// totals included.
    fn check_inputs(&self, values: &FieldValueSet) -> Result<(), FormError> {
        for field in self.schema().fields() {
            if let Some(value) = values.get(&field.id) {
                self.handler_for(field)?.validate(field, value)?;
            }
        }
        Ok(())
    }

    fn reject(&self, cause: FormError) -> Rejection {
        tracing::warn!(error = %cause, "submission rejected");
        Rejection::new(cause)
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("plan", &self.plan)
            .field("elements", &self.elements.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FormBuilder {
    /// Register an element handler. A later registration for the same
    /// element type replaces the earlier one, so calling this after
    /// [`with_default_elements`](Self::with_default_elements) swaps out a
    /// built-in element.
    pub fn with_element(mut self, handler: Box<dyn ElementHandler>) -> Self {
        self.elements.push(Arc::from(handler));
        self
    }

    /// Register the built-in number, textfield, checkbox, and summation elements.
    pub fn with_default_elements(self) -> Self {
        default_elements()
            .into_iter()
            .fold(self, |builder, handler| builder.with_element(handler))
    }

    /// Set how field values count towards sums (default: [`NumericPolicy::ParseText`]).
    pub fn with_numeric_policy(mut self, policy: NumericPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the form.
    ///
    /// Schema errors and missing element handlers surface here, before any
    /// session can be started.
    pub fn build(self) -> Result<Form, FormError> {
        let plan = build_plan_with(self.schema, self.policy)?;

        let mut elements = HashMap::new();
        for handler in self.elements {
            elements.insert(handler.element_type(), handler);
        }

        if let Some(field) = plan
            .schema()
            .fields()
            .iter()
            .find(|f| !elements.contains_key(&f.element_type()))
        {
            return Err(FormError::NoElementHandler {
                element_type: field.element_type().to_string(),
                field: field.id.clone(),
            });
        }

        tracing::debug!(
            fields = plan.schema().len(),
            aggregations = plan.len(),
            elements = elements.len(),
            "built form"
        );

        Ok(Form {
            plan: Arc::new(plan),
            elements: Arc::new(elements),
        })
    }
}
