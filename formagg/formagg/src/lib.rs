mod elements;
mod error;
mod form;
mod outcome;
mod session;

pub use elements::{
    CheckboxElement, NumberElement, SummationElement, TextfieldElement, default_elements,
};
pub use error::FormError;
pub use form::{Form, FormBuilder};
pub use formagg_core as core;
pub use formagg_engine as engine;
pub use outcome::{Rejection, SubmissionOutcome};
pub use session::FormSession;
