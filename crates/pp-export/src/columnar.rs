use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Fields, Schema, SchemaRef};
use arrow::json::ReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use pp_core::core::{ConversationTurn, PreferencePair};
use serde::Serialize;

use crate::error::ExportError;
use crate::json::read_json;

/// Rows decoded into one record batch at a time.
const BATCH_ROWS: usize = 8192;

fn turn_list_type() -> DataType {
    let turn = Fields::from(vec![
        Field::new("role", DataType::Utf8, false),
        Field::new("content", DataType::Utf8, false),
    ]);
    DataType::List(Arc::new(Field::new("item", DataType::Struct(turn), false)))
}

/// Arrow schema of a preference pair table:
/// `chosen` and `rejected` are both `list<struct<role, content>>`.
pub fn preference_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("chosen", turn_list_type(), false),
        Field::new("rejected", turn_list_type(), false),
    ]))
}

#[derive(Serialize)]
struct TurnRow<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct PairRow<'a> {
    chosen: Vec<TurnRow<'a>>,
    rejected: Vec<TurnRow<'a>>,
}

fn turn_rows(turns: &[ConversationTurn]) -> Vec<TurnRow<'_>> {
    turns
        .iter()
        .map(|turn| TurnRow {
            role: turn.role.as_str(),
            content: turn.content.as_str(),
        })
        .collect()
}

impl<'a> From<&'a PreferencePair> for PairRow<'a> {
    fn from(pair: &'a PreferencePair) -> Self {
        Self {
            chosen: turn_rows(pair.chosen()),
            rejected: turn_rows(pair.rejected()),
        }
    }
}

/// Writes `pairs` to a single Parquet file, returning the row count.
pub fn write_parquet(pairs: &[PreferencePair], path: &Path) -> Result<usize, ExportError> {
    let schema = preference_schema();
    let file = File::create(path).map_err(|err| ExportError::io(path, err))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, Arc::clone(&schema), Some(props))?;

    let mut decoder = ReaderBuilder::new(schema)
        .with_batch_size(BATCH_ROWS)
        .build_decoder()?;
    for chunk in pairs.chunks(BATCH_ROWS) {
        let rows: Vec<PairRow<'_>> = chunk.iter().map(PairRow::from).collect();
        decoder.serialize(&rows)?;
        if let Some(batch) = decoder.flush()? {
            writer.write(&batch)?;
        }
    }

    let metadata = writer.close()?;
    let rows = usize::try_from(metadata.num_rows).unwrap_or_default();
    tracing::debug!(path = %path.display(), rows, "wrote parquet");
    Ok(rows)
}

/// Reloads a JSON file produced by [`crate::write_json`] and writes it out as
/// a Parquet shard.
pub fn json_to_parquet(json_path: &Path, parquet_path: &Path) -> Result<usize, ExportError> {
    let pairs = read_json(json_path)?;
    write_parquet(&pairs, parquet_path)
}
