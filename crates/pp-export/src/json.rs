use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use pp_core::core::PreferencePair;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::ExportError;

const JSON_INDENT: &[u8] = b"    ";

/// Writes `pairs` as one pretty-printed JSON array (4-space indent).
pub fn write_json(pairs: &[PreferencePair], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|err| ExportError::io(path, err))?;
    let mut writer = BufWriter::new(file);

    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    pairs
        .serialize(&mut serializer)
        .map_err(|err| ExportError::json(path, err))?;

    writer.flush().map_err(|err| ExportError::io(path, err))?;
    tracing::debug!(path = %path.display(), records = pairs.len(), "wrote JSON");
    Ok(())
}

/// Reads back a JSON array written by [`write_json`]. Every element is
/// validated against the preference-pair shape.
pub fn read_json(path: &Path) -> Result<Vec<PreferencePair>, ExportError> {
    let file = File::open(path).map_err(|err| ExportError::io(path, err))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|err| ExportError::json(path, err))
}
