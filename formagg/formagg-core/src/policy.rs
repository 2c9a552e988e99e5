/// Policy for turning field values into numeric contributions when an
/// aggregation sums its sources.
///
/// Booleans, nulls and absent fields never contribute; they count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericPolicy {
    /// Text that parses as an integer or finite float contributes that
    /// number (default). Form inputs usually arrive as text.
    #[default]
    ParseText,
    /// Only `Int` and `Float` values contribute; all text counts as zero.
    StrictNumbers,
}
