//! kubectl style tables.

use std::io::Write;

use tabwriter::TabWriter;

use super::OutputError;

/// Spaces between columns.
const PADDING: usize = 3;

/// A table column and whether it is shown without `--columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
	pub name: &'static str,
	pub default: bool,
}

impl Column {
	pub const fn shown(name: &'static str) -> Self {
		Self {
			name,
			default: true,
		}
	}

	pub const fn hidden(name: &'static str) -> Self {
		Self {
			name,
			default: false,
		}
	}
}

/// Rows are pushed with a cell for every column; only the selected ones
/// are written.
#[derive(Debug, Clone)]
pub struct Table {
	columns: Vec<&'static str>,
	selected: Vec<usize>,
	rows: Vec<Vec<String>>,
}

impl Table {
	/// A table showing the default columns.
	pub fn new(columns: &[Column]) -> Self {
		Self {
			columns: columns.iter().map(|c| c.name).collect(),
			selected: columns
				.iter()
				.enumerate()
				.filter(|(_, c)| c.default)
				.map(|(i, _)| i)
				.collect(),
			rows: Vec::new(),
		}
	}

	/// Show `requested` columns in the given order. Names are matched
	/// case-insensitively; an empty list keeps the defaults.
	pub fn select(&mut self, requested: &[String]) -> Result<(), OutputError> {
		if requested.is_empty() {
			return Ok(());
		}
		self.selected = requested
			.iter()
			.map(|name| {
				self.columns
					.iter()
					.position(|c| c.eq_ignore_ascii_case(name.trim()))
					.ok_or_else(|| OutputError::UnknownColumn {
						name: name.trim().to_string(),
						available: self.columns.join(", "),
					})
			})
			.collect::<Result<_, _>>()?;
		Ok(())
	}

	pub fn push(&mut self, row: Vec<String>) {
		debug_assert_eq!(row.len(), self.columns.len());
		self.rows.push(row);
	}

	pub fn write<W: Write>(&self, writer: W) -> Result<(), OutputError> {
		let mut tw = TabWriter::new(writer).padding(PADDING);

		let header: Vec<String> = self
			.selected
			.iter()
			.map(|&i| self.columns[i].to_uppercase())
			.collect();
		writeln!(tw, "{}", header.join("\t"))?;

		for row in &self.rows {
			let cells: Vec<&str> = self
				.selected
				.iter()
				.map(|&i| row.get(i).map_or("", String::as_str))
				.collect();
			writeln!(tw, "{}", cells.join("\t"))?;
		}

		tw.flush()?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use indoc::indoc;

	use super::*;

	const COLUMNS: &[Column] = &[
		Column::shown("name"),
		Column::hidden("id"),
		Column::shown("status"),
	];

	fn table() -> Table {
		let mut table = Table::new(COLUMNS);
		table.push(vec!["web".into(), "a1".into(), "Provisioned".into()]);
		table.push(vec!["database".into(), "b2".into(), "".into()]);
		table.push(vec!["cache".into(), "c3".into(), "Provisioning".into()]);
		table
	}

	fn render(table: &Table) -> String {
		let mut out = Vec::new();
		table.write(&mut out).unwrap();
		String::from_utf8(out).unwrap()
	}

	#[test]
	fn test_default_columns() {
		assert_eq!(
			render(&table()),
			concat!(
				"NAME       STATUS\n",
				"web        Provisioned\n",
				"database   \n",
				"cache      Provisioning\n",
			)
		);
	}

	#[test]
	fn test_selected_columns_keep_requested_order() {
		let mut table = table();
		table
			.select(&["Status".to_string(), "ID".to_string()])
			.unwrap();
		assert_eq!(
			render(&table),
			indoc! {"
				STATUS         ID
				Provisioned    a1
				               b2
				Provisioning   c3
			"}
		);
	}

	#[test]
	fn test_unknown_column() {
		let mut table = table();
		let err = table.select(&["flavor".to_string()]).unwrap_err();
		assert_matches!(&err, OutputError::UnknownColumn { name, .. } if name == "flavor");
		assert_eq!(
			err.to_string(),
			r#"unknown column "flavor", available columns: name, id, status"#
		);
	}

	#[test]
	fn test_headers_only() {
		assert_eq!(render(&Table::new(COLUMNS)), "NAME   STATUS\n");
	}
}
