use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Args;
use formagg::core::Value;

use super::{load_form, read_submission, write_output};
use crate::policy::PolicyArg;

#[derive(Args)]
pub struct RecomputeArgs {
    /// Path to the form schema (JSON)
    schema: PathBuf,

    /// Stored submission to reopen
    submission: PathBuf,

    /// Edit to apply before re-encoding, as `id=value`; the value is read as
    /// JSON and falls back to plain text
    #[arg(long = "set", value_parser = parse_assignment)]
    edits: Vec<(String, Value)>,

    /// How text values count towards sums
    #[arg(long, value_enum, default_value_t = PolicyArg::ParseText)]
    numeric_policy: PolicyArg,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RecomputeArgs {
    pub fn run(self) -> Result<()> {
        let form = load_form(&self.schema, self.numeric_policy)?;
        let stored = read_submission(&self.submission)?;
        let mut session = form
            .reopen(&stored)
            .map_err(|rejection| anyhow!("{rejection}: {}", rejection.cause()))?;

        for (id, value) in self.edits {
            let updated = session.set(&id, value)?;
            if !updated.is_empty() {
                eprintln!("{id}: updated {}", updated.join(", "));
            }
        }

        let text = session.submit().to_json_string()?;
        write_output(self.output.as_deref(), &text)
    }
}

fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected `id=value`, got `{raw}`"))?;
    if id.is_empty() {
        return Err(format!("missing field id in `{raw}`"));
    }
    let value = match serde_json::from_str::<serde_json::Value>(value) {
        Ok(serde_json::Value::Null) => Value::Null,
        Ok(serde_json::Value::Bool(v)) => Value::Bool(v),
        Ok(serde_json::Value::Number(n)) => match n.as_i64() {
            Some(v) => Value::Int(v),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        Ok(serde_json::Value::String(s)) => Value::from(s),
        _ => Value::text(value),
    };
    Ok((id.to_string(), value))
}
