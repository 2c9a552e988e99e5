use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use formagg::SubmissionOutcome;
use indicatif::{ProgressBar, ProgressStyle};

use super::{load_form, read_submission};
use crate::policy::PolicyArg;

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the form schema (JSON)
    schema: PathBuf,

    /// Stored submissions (JSON objects) to check
    #[arg(required = true)]
    submissions: Vec<PathBuf>,

    /// How text values count towards sums
    #[arg(long, value_enum, default_value_t = PolicyArg::ParseText)]
    numeric_policy: PolicyArg,

    /// Print the internal reason for each rejection
    #[arg(long)]
    explain: bool,
}

impl ValidateArgs {
    pub fn run(self) -> Result<()> {
        let form = load_form(&self.schema, self.numeric_policy)?;

        let pb = ProgressBar::new(self.submissions.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} loading",
            )?
            .progress_chars("=>-"),
        );
        let mut submissions = Vec::with_capacity(self.submissions.len());
        for path in &self.submissions {
            submissions.push(read_submission(path)?);
            pb.inc(1);
        }
        pb.finish_and_clear();

        let outcomes = form.accept_batch(&submissions);
        let mut rejected = 0usize;
        for (path, outcome) in self.submissions.iter().zip(&outcomes) {
            match outcome {
                SubmissionOutcome::Accepted(_) => println!("ok        {}", path.display()),
                SubmissionOutcome::Rejected(rejection) => {
                    rejected += 1;
                    if self.explain {
                        println!("rejected  {}: {}", path.display(), rejection.cause());
                    } else {
                        println!("rejected  {}: {rejection}", path.display());
                    }
                }
            }
        }

        if rejected > 0 {
            bail!("{rejected} of {} submissions rejected", outcomes.len());
        }
        Ok(())
    }
}
