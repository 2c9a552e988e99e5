pub mod recompute;
pub mod schema;
pub mod validate;

use std::{fs, path::Path};

use anyhow::{Context, Result};
use formagg::{Form, core::FormSchema, engine::PersistedSubmission};

use crate::policy::PolicyArg;

fn load_form(path: &Path, policy: PolicyArg) -> Result<Form> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    let schema = FormSchema::from_json_str(&text)
        .with_context(|| format!("invalid schema {}", path.display()))?;
    let form = Form::builder(schema)
        .with_default_elements()
        .with_numeric_policy(policy.into())
        .build()
        .with_context(|| format!("schema {} cannot be deployed", path.display()))?;
    Ok(form)
}

fn read_submission(path: &Path) -> Result<PersistedSubmission> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read submission {}", path.display()))?;
    PersistedSubmission::from_json_str(&text)
        .with_context(|| format!("invalid submission {}", path.display()))
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{text}\n"))?,
        None => println!("{text}"),
    }
    Ok(())
}
