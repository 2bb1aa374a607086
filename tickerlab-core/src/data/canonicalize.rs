use super::schema::DATE;
use polars::prelude::*;

/// Canonicalizer for quote tables
pub struct Canonicalizer;

impl Canonicalizer {
    /// Sort by date and keep the first row of any duplicated date
    pub fn canonicalize(df: LazyFrame) -> LazyFrame {
        df.sort(
            [DATE],
            SortMultipleOptions::default()
                .with_order_descending(false)
                .with_maintain_order(true),
        )
        .unique_stable(Some(vec![DATE.into()]), UniqueKeepStrategy::First)
    }
}
