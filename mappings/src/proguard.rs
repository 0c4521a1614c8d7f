//! Reader for Proguard `mapping.txt` files.
//!
//! The format looks like this:
//! ```txt
//! # comments and empty lines are ignored
//! com.example.Main -> a:
//!     int counter -> a
//!     java.lang.String[] names -> b
//!     void <init>() -> <init>
//!     12:20:void run(int,java.util.List) -> a
//! ```
//! A class line is followed by all of its field lines, and then all of its method lines. Member lines are indented
//! by exactly four spaces, a method line can have a `start:end:` line number range in front, which is ignored.
//!
//! Identifiers consist of ASCII letters and digits, and of `_$.<>-`. Types can't have `<>-` in them, but can end
//! with any number of `[]`.
//!
//! Any line that's neither a member line of the current class nor a class line is an error.

use std::io::BufRead;
use anyhow::Result;
use crate::descriptor::{encode_method_type, encode_type};
use crate::lines::{next_accepted, numbered_lines};
use crate::{ClassMapping, MappingParser, MappingSyntaxError};

const INDENT: &str = "    ";

/// The [`MappingParser`] for the Proguard dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProguardParser;

impl MappingParser for ProguardParser {
	fn parse(&self, reader: &mut dyn BufRead) -> Result<Vec<ClassMapping>> {
		let mut lines = numbered_lines(reader)
			.filter(|line| !matches!(line, Ok(line) if line.text.is_empty() || line.text.starts_with('#')))
			.peekable();

		let mut classes = Vec::new();

		while let Some(line) = lines.next() {
			let line = line?;

			let Some((original, obfuscated)) = parse_class_line(&line.text) else {
				return Err(MappingSyntaxError::new(line.line_number, format!("invalid syntax: {:?}", line.text)).into());
			};

			let mut class = ClassMapping::new(internal_name(original), internal_name(obfuscated));

			while let Some(field) = next_accepted(&mut lines, parse_field_line)? {
				class.add_field(field.obfuscated, field.original);
			}
			while let Some(method) = next_accepted(&mut lines, parse_method_line)? {
				class.add_method(method.obfuscated, method.desc, method.original);
			}

			classes.push(class);
		}

		Ok(classes)
	}
}

#[derive(Debug, Clone, PartialEq)]
struct MemberLine {
	original: String,
	obfuscated: String,
	desc: String,
}

fn internal_name(binary_name: &str) -> String {
	binary_name.replace('.', "/")
}

fn is_ident(s: &str) -> bool {
	!s.is_empty() && s.chars().all(|ch| ch.is_ascii_alphanumeric() || "_$.<>-".contains(ch))
}

fn is_type(s: &str) -> bool {
	let mut element = s;
	while let Some(inner) = element.strip_suffix("[]") {
		element = inner;
	}
	!element.is_empty() && element.chars().all(|ch| ch.is_ascii_alphanumeric() || "_$.".contains(ch))
}

/// Splits `original -> obfuscated` into both identifiers.
fn parse_arrow(s: &str) -> Option<(&str, &str)> {
	let (original, obfuscated) = s.split_once(" -> ")?;
	(is_ident(original) && is_ident(obfuscated)).then_some((original, obfuscated))
}

/// Parses `original -> obfuscated:`.
fn parse_class_line(line: &str) -> Option<(&str, &str)> {
	parse_arrow(line.strip_suffix(':')?)
}

/// Parses `    type original -> obfuscated`.
fn parse_field_line(line: &str) -> Option<MemberLine> {
	let (field_type, rest) = line.strip_prefix(INDENT)?.split_once(' ')?;
	let (original, obfuscated) = parse_arrow(rest)?;

	is_type(field_type).then(|| MemberLine {
		original: original.to_owned(),
		obfuscated: obfuscated.to_owned(),
		desc: encode_type(field_type),
	})
}

/// Strips a leading `start:end:`, if it's there.
fn strip_line_range(s: &str) -> &str {
	fn is_number(s: &str) -> bool {
		!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
	}

	let mut parts = s.splitn(3, ':');
	match (parts.next(), parts.next(), parts.next()) {
		(Some(start), Some(end), Some(rest)) if is_number(start) && is_number(end) => rest,
		_ => s,
	}
}

/// Parses `    [start:end:]returnType original(argType,...) -> obfuscated`.
fn parse_method_line(line: &str) -> Option<MemberLine> {
	let line = strip_line_range(line.strip_prefix(INDENT)?);

	let (return_type, rest) = line.split_once(' ')?;
	let (signature, obfuscated) = rest.split_once(" -> ")?;
	let (original, arguments) = signature.strip_suffix(')')?.split_once('(')?;

	let argument_types: Vec<&str> = if arguments.is_empty() {
		Vec::new()
	} else {
		arguments.split(',').collect()
	};

	let valid = is_type(return_type)
		&& is_ident(original)
		&& is_ident(obfuscated)
		&& argument_types.iter().all(|t| is_type(t));

	valid.then(|| MemberLine {
		original: original.to_owned(),
		obfuscated: obfuscated.to_owned(),
		desc: encode_method_type(return_type, &argument_types),
	})
}
