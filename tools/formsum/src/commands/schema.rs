use std::{fmt::Write as _, path::PathBuf};

use anyhow::Result;
use clap::Args;
use formagg::core::format_form_schema;

use super::{load_form, write_output};
use crate::policy::PolicyArg;

#[derive(Args)]
pub struct SchemaArgs {
    /// Path to the form schema (JSON)
    schema: PathBuf,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl SchemaArgs {
    pub fn run(self) -> Result<()> {
        let form = load_form(&self.schema, PolicyArg::default())?;
        let mut text = format_form_schema(form.schema())?;

        writeln!(text, "evaluation order:")?;
        if form.plan().is_empty() {
            writeln!(text, "    (no summation fields)")?;
        }
        for (i, id) in form.plan().order().iter().enumerate() {
            writeln!(text, "    {}. {id}", i + 1)?;
        }

        write_output(self.output.as_deref(), text.trim_end())
    }
}
