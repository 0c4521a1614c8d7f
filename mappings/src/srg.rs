//! Reader for SRG mapping files.
//!
//! Every line starts with a tag, followed by space separated fields:
//! ```txt
//! PK: ./ net/minecraft/src
//! CL: a net/minecraft/src/Main
//! FD: a/b net/minecraft/src/Main/counter
//! MD: a/c (La;)V net/minecraft/src/Main/run (Lnet/minecraft/src/Main;)V
//! ```
//! Package lines are ignored. A class has to be declared with a `CL:` line before the first field or method line
//! of it, and the class name in the original part of a field or method line has to match the declared one.
//!
//! Other lines aren't fatal, they are skipped with a warning.

use std::io::BufRead;
use anyhow::Result;
use indexmap::IndexMap;
use log::warn;
use crate::lines::numbered_lines;
use crate::{ClassMapping, MappingParser, MappingSyntaxError};

/// The [`MappingParser`] for the SRG dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SrgParser;

impl MappingParser for SrgParser {
	fn parse(&self, reader: &mut dyn BufRead) -> Result<Vec<ClassMapping>> {
		let mut classes: IndexMap<String, ClassMapping> = IndexMap::new();

		for line in numbered_lines(reader) {
			let line = line?;
			let line_number = line.line_number;
			let error = |text: String| MappingSyntaxError::new(line_number, text);

			// trailing spaces don't make empty fields
			let text = line.text.trim_end_matches(' ');
			let fields: Vec<&str> = text.split(' ').collect();

			match fields[0] {
				"PK:" => {},
				"CL:" => {
					let [_, obfuscated, original] = fields[..] else {
						return Err(error("wrong number of fields".to_owned()).into());
					};

					let class = ClassMapping::new(original, obfuscated);
					if let Some(old) = classes.insert(obfuscated.to_owned(), class) {
						warn!("line {line_number}: class {obfuscated} is declared again, replacing the mapping to {}", old.original_name);
					}
				},
				"FD:" => {
					let [_, obfuscated, original] = fields[..] else {
						return Err(error("wrong number of fields".to_owned()).into());
					};

					let (class, obfuscated, original) = member(&mut classes, obfuscated, original)
						.map_err(error)?;
					class.add_field(obfuscated, original);
				},
				"MD:" => {
					let [_, obfuscated, _obfuscated_desc, original, original_desc] = fields[..] else {
						return Err(error("wrong number of fields".to_owned()).into());
					};

					let (class, obfuscated, original) = member(&mut classes, obfuscated, original)
						.map_err(error)?;
					class.add_method(obfuscated, original_desc, original);
				},
				"" if text.is_empty() => {},
				_ => warn!("skipping invalid line {line_number}: {:?}", line.text),
			}
		}

		Ok(classes.into_values().collect())
	}
}

/// Splits `owner/name` for the obfuscated and original side of a member line, and finds the declared class.
fn member<'c, 's>(
	classes: &'c mut IndexMap<String, ClassMapping>,
	obfuscated: &'s str,
	original: &'s str,
) -> Result<(&'c mut ClassMapping, &'s str, &'s str), String> {
	let (obfuscated_owner, obfuscated_name) = obfuscated.rsplit_once('/')
		.ok_or_else(|| "invalid syntax".to_owned())?;
	let (original_owner, original_name) = original.rsplit_once('/')
		.ok_or_else(|| "invalid syntax".to_owned())?;

	let class = classes.get_mut(obfuscated_owner)
		.ok_or_else(|| format!("class {obfuscated_owner} is not declared"))?;

	if class.original_name != original_owner {
		return Err(format!("deobfuscated class names do not match ({},{original_owner})", class.original_name));
	}

	Ok((class, obfuscated_name, original_name))
}
