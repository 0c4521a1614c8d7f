//! Reading strings from the constant pool, and adding new ones without creating duplicates.
//!
//! The constant pool stores strings in the modified utf8 format of the JVM, see
//! <https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.4.7>.

use std::collections::HashMap;
use anyhow::{anyhow, bail, Context, Result};
use java_string::{JavaStr, JavaString};
use raw_class_file::{ConstantPool, CpInfo};

pub(crate) fn decode(bytes: &[u8]) -> Result<String> {
	JavaString::from_modified_utf8(bytes.to_vec())
		.with_context(|| anyhow!("invalid java utf8 contents"))?
		.into_string()
		.with_context(|| anyhow!("java string contains unpaired surrogates"))
}

pub(crate) fn encode(string: &str) -> Vec<u8> {
	JavaStr::from_str(string).to_modified_utf8().into_owned()
}

/// Reads the [`CpInfo::Utf8`] at the given index.
pub(crate) fn utf8(pool: &ConstantPool, index: u16) -> Result<String> {
	match pool.get(index) {
		Some(CpInfo::Utf8 { bytes }) => decode(bytes)
			.with_context(|| anyhow!("failed to read utf8 constant at index {index}")),
		Some(entry) => bail!("expected utf8 constant at index {index}, got {entry:?}"),
		None => bail!("no constant at index {index}"),
	}
}

/// Reads the name of the [`CpInfo::Class`] at the given index.
pub(crate) fn class_name(pool: &ConstantPool, index: u16) -> Result<String> {
	match pool.get(index) {
		Some(&CpInfo::Class { name_index }) => utf8(pool, name_index)
			.with_context(|| anyhow!("failed to read name of class constant at index {index}")),
		Some(entry) => bail!("expected class constant at index {index}, got {entry:?}"),
		None => bail!("no constant at index {index}"),
	}
}

/// Looks up strings and name and type pairs in the constant pool, adding them if they don't exist yet.
///
/// Only knows about the entries that existed when it was created, and the ones added through it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Interner {
	strings: HashMap<String, u16>,
	name_and_types: HashMap<(String, String), u16>,
}

impl Interner {
	/// Collects all strings and name and type pairs of the pool.
	///
	/// Strings that aren't valid are left out, they can never be the result of a lookup.
	pub(crate) fn new(pool: &ConstantPool) -> Interner {
		let mut interner = Interner::default();

		for (index, entry) in pool.iter() {
			match *entry {
				CpInfo::Utf8 { ref bytes } => {
					if let Ok(string) = decode(bytes) {
						interner.strings.insert(string, index);
					}
				},
				CpInfo::NameAndType { name_index, descriptor_index } => {
					if let (Ok(name), Ok(desc)) = (utf8(pool, name_index), utf8(pool, descriptor_index)) {
						interner.name_and_types.insert((name, desc), index);
					}
				},
				_ => {},
			}
		}

		interner
	}

	/// Gets the index of a [`CpInfo::Utf8`] with the given contents.
	pub(crate) fn string(&mut self, pool: &mut ConstantPool, string: &str) -> Result<u16> {
		if let Some(&index) = self.strings.get(string) {
			return Ok(index);
		}

		let index = pool.push(CpInfo::Utf8 { bytes: encode(string) })
			.with_context(|| anyhow!("failed to add string {string:?} to the constant pool"))?;
		self.strings.insert(string.to_owned(), index);
		Ok(index)
	}

	/// Gets the index of a [`CpInfo::NameAndType`] pointing to the given name and descriptor.
	pub(crate) fn name_and_type(&mut self, pool: &mut ConstantPool, name: &str, desc: &str) -> Result<u16> {
		let key = (name.to_owned(), desc.to_owned());
		if let Some(&index) = self.name_and_types.get(&key) {
			return Ok(index);
		}

		let name_index = self.string(pool, name)?;
		let descriptor_index = self.string(pool, desc)?;
		let index = pool.push(CpInfo::NameAndType { name_index, descriptor_index })
			.with_context(|| anyhow!("failed to add name and type {name:?} {desc:?} to the constant pool"))?;
		self.name_and_types.insert(key, index);
		Ok(index)
	}

	/// Tells the interner that the name and type at `index` now has a different descriptor.
	pub(crate) fn moved_name_and_type(&mut self, index: u16, name: &str, old_desc: &str, new_desc: &str) {
		let old_key = (name.to_owned(), old_desc.to_owned());
		if self.name_and_types.get(&old_key) == Some(&index) {
			self.name_and_types.remove(&old_key);
		}
		self.name_and_types.entry((name.to_owned(), new_desc.to_owned())).or_insert(index);
	}
}
