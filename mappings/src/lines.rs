use std::io::BufRead;
use std::iter::Peekable;
use anyhow::{anyhow, Context, Result};

/// A line of a mapping file, together with its line number (starting at `1`).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NumberedLine {
	pub(crate) line_number: usize,
	pub(crate) text: String,
}

pub(crate) fn numbered_lines(reader: &mut dyn BufRead) -> impl Iterator<Item=Result<NumberedLine>> + '_ {
	reader.lines()
		.enumerate()
		.map(|(index, line)| {
			let line_number = index + 1;
			line.map(|text| NumberedLine { line_number, text })
				.with_context(|| anyhow!("failed to read line {line_number}"))
		})
}

/// Takes the next line out of the iterator if `f` accepts it.
///
/// Read errors are passed on, even if they'd end the run of accepted lines.
pub(crate) fn next_accepted<I, T>(lines: &mut Peekable<I>, f: impl Fn(&str) -> Option<T>) -> Result<Option<T>>
where
	I: Iterator<Item=Result<NumberedLine>>,
{
	match lines.peek() {
		Some(Ok(line)) => {
			let accepted = f(&line.text);
			if accepted.is_some() {
				lines.next();
			}
			Ok(accepted)
		},
		Some(Err(_)) => {
			lines.next().transpose()?;
			Ok(None)
		},
		None => Ok(None),
	}
}
