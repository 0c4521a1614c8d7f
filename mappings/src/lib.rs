//! Crate for reading obfuscation mapping files into an in-memory model.
//!
//! Two dialects are supported, selected by a [`Dialect`]:
//! - [`proguard`]: the `mapping.txt` written by Proguard, with java source names like `int[]` or `java.lang.String`,
//! - [`srg`]: the SRG format, with internal names and descriptors.
//!
//! Both produce a list of [`ClassMapping`]s, which are usually turned into [`Mappings`] afterwards.
//! Parsing is all or nothing: the first malformed line fails the whole parse with a [`MappingSyntaxError`]
//! as root cause.
//!
//! ```
//! # use pretty_assertions::assert_eq;
//! use mappings::{Dialect, Mappings};
//!
//! let input = "com.example.A -> a:\n    int x -> b\n";
//! let classes = Dialect::Proguard.parser().parse(&mut input.as_bytes()).unwrap();
//! let mappings = Mappings::new(classes);
//!
//! let class = mappings.get("a").unwrap();
//! assert_eq!(class.original_name, "com/example/A");
//! assert_eq!(class.map_field("b"), Some("x"));
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use anyhow::{anyhow, Context, Result};

mod error;
mod lines;

pub mod descriptor;
pub mod proguard;
pub mod srg;
pub mod tree;

pub use error::MappingSyntaxError;
pub use tree::{ClassMapping, MethodKey, Mappings};

/// A reader for one mapping file dialect.
pub trait MappingParser {
	/// Reads all class mappings from the reader.
	///
	/// Fails on the first malformed line, the root cause of the error is then a [`MappingSyntaxError`].
	fn parse(&self, reader: &mut dyn BufRead) -> Result<Vec<ClassMapping>>;
}

/// The dialect of a mapping file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
	#[default]
	Proguard,
	Srg,
}

impl Dialect {
	pub fn parser(self) -> &'static dyn MappingParser {
		match self {
			Dialect::Proguard => &proguard::ProguardParser,
			Dialect::Srg => &srg::SrgParser,
		}
	}
}

/// Reads the mapping file at the given path, in the given dialect.
pub fn parse_file(dialect: Dialect, path: impl AsRef<Path>) -> Result<Vec<ClassMapping>> {
	let path = path.as_ref();
	let file = File::open(path)
		.with_context(|| anyhow!("failed to open mapping file {path:?}"))?;

	dialect.parser().parse(&mut BufReader::new(file))
		.with_context(|| anyhow!("failed to read mapping file {path:?} as {dialect:?} file"))
}
