//! Output of `get` results in the format chosen with `-o`.

use std::io::Write;

use serde::Serialize;

use super::{document, Column, OutputError, OutputFlag, OutputFormat, Table};

/// A row of `get` output. The serialized form is the YAML/JSON document.
pub trait Listing: Serialize {
	const COLUMNS: &'static [Column];

	/// One cell per entry of [`Self::COLUMNS`].
	fn cells(&self) -> Vec<String>;
}

/// Validates the output flags up front, then prints once results are in.
#[derive(Debug)]
pub struct Printer {
	format: OutputFormat,
	table: Table,
}

impl Printer {
	pub fn new<L: Listing>(output: &OutputFlag, columns: &[String]) -> Result<Self, OutputError> {
		let mut table = Table::new(L::COLUMNS);
		table.select(columns)?;
		Ok(Self {
			format: output.format,
			table,
		})
	}

	pub fn print<L: Listing, W: Write>(
		mut self,
		writer: W,
		items: &[L],
	) -> Result<(), OutputError> {
		match self.format {
			OutputFormat::Table => {
				for item in items {
					self.table.push(item.cells());
				}
				self.table.write(writer)
			}
			OutputFormat::Yaml => document::write_yaml(writer, items),
			OutputFormat::Json => document::write_json(writer, items),
		}
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;

	use super::*;

	#[derive(Serialize)]
	struct Row {
		name: &'static str,
		id: &'static str,
	}

	impl Listing for Row {
		const COLUMNS: &'static [Column] = &[Column::shown("name"), Column::hidden("id")];

		fn cells(&self) -> Vec<String> {
			vec![self.name.to_string(), self.id.to_string()]
		}
	}

	fn print(format: OutputFormat, columns: &[&str]) -> String {
		let columns: Vec<String> = columns.iter().map(ToString::to_string).collect();
		let printer = Printer::new::<Row>(&OutputFlag { format }, &columns).unwrap();
		let mut out = Vec::new();
		printer
			.print(&mut out, &[Row { name: "web", id: "a1" }])
			.unwrap();
		String::from_utf8(out).unwrap()
	}

	#[test]
	fn test_table() {
		assert_eq!(print(OutputFormat::Table, &[]), "NAME\nweb\n");
		assert_eq!(print(OutputFormat::Table, &["id", "name"]), "ID   NAME\na1   web\n");
	}

	#[test]
	fn test_documents_ignore_columns() {
		let yaml = print(OutputFormat::Yaml, &["id"]);
		assert!(yaml.starts_with("---\nname: web\nid: a1\n"));

		let json: serde_json::Value =
			serde_json::from_str(&print(OutputFormat::Json, &[])).unwrap();
		assert_eq!(json, serde_json::json!([{"name": "web", "id": "a1"}]));
	}

	#[test]
	fn test_unknown_column_fails_before_printing() {
		let result = Printer::new::<Row>(&OutputFlag::default(), &["size".to_string()]);
		assert_matches!(result, Err(OutputError::UnknownColumn { .. }));
	}
}
