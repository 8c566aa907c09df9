//! Tree rendering for `describe`.

use std::io::Write;

use nu_ansi_term::{Color, Style};
use unikorn_apis::{REASON_PROVISIONED, REASON_PROVISIONING};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const INDENT: &str = "│   ";
const LAST_INDENT: &str = "    ";

const LABEL: Color = Color::Rgb(0x1E, 0x3A, 0x8A);
const BADGE_TEXT: Color = Color::Rgb(0xFA, 0xFA, 0xFA);
const BADGE_GREEN: Color = Color::Rgb(0x2E, 0x7D, 0x32);
const BADGE_AMBER: Color = Color::Rgb(0xF5, 0x7F, 0x17);
const BADGE_RED: Color = Color::Rgb(0xC6, 0x28, 0x28);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
	Text(String),
	Field { label: String, value: String },
	Status { label: String, reason: String },
}

impl Line {
	fn render(&self, color: bool) -> String {
		match self {
			Self::Text(text) => text.clone(),
			Self::Field { label, value } => format!("{} {value}", render_label(label, color)),
			Self::Status { label, reason } => {
				format!("{} {}", render_label(label, color), render_badge(reason, color))
			}
		}
	}
}

fn render_label(label: &str, color: bool) -> String {
	let label = format!("{label}:");
	if color {
		Style::new().bold().fg(LABEL).paint(label).to_string()
	} else {
		label
	}
}

fn render_badge(reason: &str, color: bool) -> String {
	if !color {
		return reason.to_string();
	}
	let background = match reason {
		REASON_PROVISIONED => BADGE_GREEN,
		REASON_PROVISIONING => BADGE_AMBER,
		_ => BADGE_RED,
	};
	Style::new()
		.bold()
		.fg(BADGE_TEXT)
		.on(background)
		.paint(format!(" {reason} "))
		.to_string()
}

/// A node and its children, built with chained calls:
///
/// ```
/// # use unicli::output::Tree;
/// let tree = Tree::new("Network")
/// 	.child(Tree::new("Basic Information").field("Name", "web"));
/// assert_eq!(tree.render(false), "Network\n└── Basic Information\n    └── Name: web\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
	line: Line,
	children: Vec<Tree>,
}

impl Tree {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			line: Line::Text(title.into()),
			children: Vec::new(),
		}
	}

	/// A `label: value` node, which may have children of its own.
	pub fn labeled(label: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			line: Line::Field {
				label: label.into(),
				value: value.into(),
			},
			children: Vec::new(),
		}
	}

	#[must_use]
	pub fn child(mut self, child: Tree) -> Self {
		self.push(child);
		self
	}

	pub fn push(&mut self, child: Tree) {
		self.children.push(child);
	}

	#[must_use]
	pub fn field(self, label: impl Into<String>, value: impl Into<String>) -> Self {
		self.child(Self::labeled(label, value))
	}

	#[must_use]
	pub fn text(self, text: impl Into<String>) -> Self {
		self.child(Self::new(text))
	}

	/// A status badge, omitted when there is no condition.
	#[must_use]
	pub fn status(self, label: impl Into<String>, reason: Option<&str>) -> Self {
		match reason {
			Some(reason) => self.child(Self {
				line: Line::Status {
					label: label.into(),
					reason: reason.to_string(),
				},
				children: Vec::new(),
			}),
			None => self,
		}
	}

	pub fn render(&self, color: bool) -> String {
		let mut out = self.line.render(color);
		out.push('\n');
		self.render_children("", color, &mut out);
		out
	}

	fn render_children(&self, prefix: &str, color: bool, out: &mut String) {
		let count = self.children.len();
		for (i, child) in self.children.iter().enumerate() {
			let last = i + 1 == count;
			out.push_str(prefix);
			out.push_str(if last { LAST_BRANCH } else { BRANCH });
			out.push_str(&child.line.render(color));
			out.push('\n');

			let nested = format!("{prefix}{}", if last { LAST_INDENT } else { INDENT });
			child.render_children(&nested, color, out);
		}
	}

	pub fn write<W: Write>(&self, mut writer: W, color: bool) -> std::io::Result<()> {
		writer.write_all(self.render(color).as_bytes())
	}
}
