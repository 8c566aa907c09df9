//! Rendering of command results: tables, trees and documents.

use std::io::IsTerminal;

use clap::{Args, ValueEnum};
use thiserror::Error;

pub mod document;
pub mod listing;
pub mod table;
pub mod tree;

pub use listing::{Listing, Printer};
pub use table::{Column, Table};
pub use tree::Tree;

#[derive(Debug, Error)]
pub enum OutputError {
	#[error("writing output")]
	Write(#[from] std::io::Error),

	#[error("unknown column {name:?}, available columns: {available}")]
	UnknownColumn { name: String, available: String },

	#[error("serializing to YAML")]
	Yaml(#[from] serde_saphyr::ser_error::Error),

	#[error("serializing to JSON")]
	Json(#[from] serde_json::Error),
}

/// When to use ANSI colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
	/// Only when stdout is a terminal
	#[default]
	Auto,
	Always,
	Never,
}

impl ColorMode {
	pub fn should_colorize(self) -> bool {
		match self {
			Self::Auto => std::io::stdout().is_terminal(),
			Self::Always => true,
			Self::Never => false,
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	#[default]
	Table,
	Yaml,
	Json,
}

/// `-o/--output`.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputFlag {
	/// Output format
	#[arg(short = 'o', long = "output", value_enum, default_value_t)]
	pub format: OutputFormat,
}

/// `--columns`.
#[derive(Args, Debug, Clone, Default)]
pub struct ColumnsFlag {
	/// Comma separated list of table columns to show, in order
	#[arg(long, value_delimiter = ',')]
	pub columns: Vec<String>,
}
