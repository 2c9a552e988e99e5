use clap::ValueEnum;
use formagg::core::NumericPolicy;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum PolicyArg {
    /// Numeric text counts towards sums
    #[default]
    ParseText,
    /// Only JSON numbers count towards sums
    StrictNumbers,
}

impl From<PolicyArg> for NumericPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::ParseText => NumericPolicy::ParseText,
            PolicyArg::StrictNumbers => NumericPolicy::StrictNumbers,
        }
    }
}
