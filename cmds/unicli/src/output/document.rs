//! Structured output: YAML document streams and JSON arrays.

use std::io::Write;

use serde::Serialize;
use tracing::instrument;

use super::OutputError;

fn yaml_options() -> serde_saphyr::SerializerOptions {
	serde_saphyr::SerializerOptions {
		indent_step: 2,
		indent_array: Some(0),
		prefer_block_scalars: true,
		empty_map_as_braces: true,
		empty_array_as_brackets: true,
		line_width: Some(120),
		quote_numeric_strings: true,
		..Default::default()
	}
}

/// Serialize a single value to YAML, without a document marker.
pub fn to_yaml<T: Serialize>(value: &T) -> Result<String, OutputError> {
	let mut output = String::new();
	serde_saphyr::to_fmt_writer_with_options(&mut output, value, yaml_options())?;
	Ok(output)
}

/// Write each document preceded by `---`.
#[instrument(skip_all, fields(count = documents.len()))]
pub fn write_yaml<T: Serialize, W: Write>(
	mut writer: W,
	documents: &[T],
) -> Result<(), OutputError> {
	for document in documents {
		let yaml = to_yaml(document)?;
		writeln!(writer, "---")?;
		writer.write_all(yaml.as_bytes())?;
		if !yaml.ends_with('\n') {
			writeln!(writer)?;
		}
	}
	Ok(())
}

/// Write all documents as one pretty printed JSON array.
#[instrument(skip_all, fields(count = documents.len()))]
pub fn write_json<T: Serialize, W: Write>(
	mut writer: W,
	documents: &[T],
) -> Result<(), OutputError> {
	serde_json::to_writer_pretty(&mut writer, documents)?;
	writeln!(writer)?;
	Ok(())
}
