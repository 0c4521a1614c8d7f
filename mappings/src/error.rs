use std::fmt::{Display, Formatter};

/// The error for a malformed or inconsistent line of a mapping file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSyntaxError {
	/// The line number, starting at `1`.
	pub line: usize,
	pub text: String,
}

impl MappingSyntaxError {
	pub fn new(line: usize, text: impl Into<String>) -> MappingSyntaxError {
		MappingSyntaxError { line, text: text.into() }
	}
}

impl Display for MappingSyntaxError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "error at line {}: {}", self.line, self.text)
	}
}

impl std::error::Error for MappingSyntaxError {}
