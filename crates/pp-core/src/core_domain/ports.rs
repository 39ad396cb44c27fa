use serde_json::Value;

use crate::core::{DatasetKind, SourceError, SplitName};

/// Raw rows of one split, decoded lazily.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<Value, SourceError>> + 'a>;

// ---------------------------------------------------------------------------
// RecordSource — yields raw records for one provider split
// ---------------------------------------------------------------------------

/// Supplies the raw rows of a dataset split as JSON values, in provider order.
///
/// An empty stream means the split exists but holds no rows. Failing to
/// locate the split is an error from `fetch`; failing to read a row is an
/// error item in the stream.
pub trait RecordSource: Send + Sync {
    fn fetch(
        &self,
        dataset: DatasetKind,
        split: &SplitName,
    ) -> Result<RecordStream<'_>, SourceError>;
}
