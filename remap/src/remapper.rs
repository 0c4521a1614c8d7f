//! Rewriting the names inside of a class file.
//!
//! A [`Remapper`] is created once for all classes, and only read from after that. Each class file gets remapped
//! with [`Remapper::remap_class`], which only ever appends to the constant pool, so indices into it stay valid.
//! Existing entries are only changed to point to other strings.
//!
//! Members get their names from the mapping of the class that declares them. If that class has no mapping for a
//! member, the super class and then the interfaces are searched, depth first. This way overriding methods and
//! inherited fields accessed through a subclass get the same name as the member they come from.
//!
//! The mappings given to a [`Remapper`] should already have the names for colliding members added, see
//! [`resolve_collisions`][crate::resolve_collisions].

use std::borrow::Cow;
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use mappings::Mappings;
use raw_class_file::{AttributeInfo, ClassFile, ConstantPool, CpInfo, FieldInfo, InnerClassesEntry, MethodInfo};
use crate::hierarchy::Hierarchy;
use crate::pool::{self, Interner};
use crate::signature::map_signature;

/// Local variables with this character in the name get a new name.
const OBFUSCATION_MARKER: char = '\u{2603}';

/// Remaps class files, using the given mappings and class hierarchy.
#[derive(Debug)]
pub struct Remapper<'a> {
	mappings: &'a Mappings,
	hierarchy: &'a Hierarchy,
	/// Obfuscated to original class names.
	class_names: IndexMap<String, String>,
	/// Original to obfuscated class names.
	inverse_class_names: IndexMap<String, String>,
}

impl<'a> Remapper<'a> {
	pub fn new(mappings: &'a Mappings, hierarchy: &'a Hierarchy) -> Remapper<'a> {
		Remapper {
			mappings,
			hierarchy,
			class_names: mappings.class_names(),
			inverse_class_names: mappings.inverse_class_names(),
		}
	}

	/// Maps a class name, which may also be an array descriptor like `[La;`.
	pub fn map_class(&self, name: &str) -> String {
		if name.starts_with('[') {
			self.map_signature(name).into_owned()
		} else {
			self.mappings.map_class(name).unwrap_or(name).to_owned()
		}
	}

	/// Maps all class names in a descriptor or generic signature, see [`map_signature`].
	pub fn map_signature<'s>(&self, signature: &'s str) -> Cow<'s, str> {
		map_signature(signature, &self.class_names)
	}

	/// Gets the original name of a field, searching the parents of `owner` if it doesn't map it itself.
	///
	/// Gives back `name` if no class maps the field.
	pub fn resolve_field(&self, owner: &str, name: &str) -> String {
		self.find_field(owner, name).unwrap_or(name).to_owned()
	}

	/// Gets the original name of a method, searching the parents of `owner` if it doesn't map it itself.
	///
	/// The descriptor must already be mapped. Gives back `name` if no class maps the method.
	pub fn resolve_method(&self, owner: &str, name: &str, desc: &str) -> String {
		self.find_method(owner, name, desc).unwrap_or(name).to_owned()
	}

	fn find_field(&self, owner: &str, name: &str) -> Option<&'a str> {
		if let Some(original) = self.mappings.get(owner).and_then(|mapping| mapping.map_field(name)) {
			return Some(original);
		}

		self.hierarchy.parents_of(owner).iter()
			.find_map(|parent| self.find_field(parent, name))
	}

	fn find_method(&self, owner: &str, name: &str, desc: &str) -> Option<&'a str> {
		if let Some(original) = self.mappings.get(owner).and_then(|mapping| mapping.map_method(name, desc)) {
			return Some(original);
		}

		self.hierarchy.parents_of(owner).iter()
			.find_map(|parent| self.find_method(parent, name, desc))
	}

	/// Changes all the names in the class file from obfuscated to original ones.
	///
	/// If this fails, the class file is left partially remapped and shouldn't be used.
	pub fn remap_class(&self, class: &mut ClassFile) -> Result<()> {
		let name = crate::class_name(class)?;

		let mut context = ClassContext {
			remapper: self,
			interner: Interner::new(&class.constant_pool),
			name,
		};

		context.remap(class)
			.with_context(|| anyhow!("failed to remap class {}", context.name))
	}
}

/// The state for remapping one class file.
struct ClassContext<'r> {
	remapper: &'r Remapper<'r>,
	interner: Interner,
	/// The obfuscated name of the class.
	name: String,
}

impl ClassContext<'_> {
	/// Points `index` to a string with the content `new`, unless `old` already is that.
	fn retarget(&mut self, pool: &mut ConstantPool, index: &mut u16, old: &str, new: &str) -> Result<()> {
		if old != new {
			*index = self.interner.string(pool, new)?;
		}
		Ok(())
	}

	/// Maps the class names in the descriptor or signature at `index`.
	fn remap_descriptor(&mut self, pool: &mut ConstantPool, index: &mut u16) -> Result<()> {
		let desc = pool::utf8(pool, *index)?;
		let mapped = self.remapper.map_signature(&desc).into_owned();
		self.retarget(pool, index, &desc, &mapped)
	}

	fn remap(&mut self, class: &mut ClassFile) -> Result<()> {
		let ClassFile { constant_pool, fields, methods, attributes, .. } = class;

		self.remap_constant_pool(constant_pool)?;

		for attribute in attributes.iter_mut() {
			match attribute {
				AttributeInfo::Signature { signature_index, .. } => {
					self.remap_descriptor(constant_pool, signature_index)
						.with_context(|| anyhow!("failed to remap class signature"))?;
				},
				AttributeInfo::InnerClasses { classes, .. } => {
					for entry in classes.iter_mut() {
						self.remap_inner_class(constant_pool, entry)
							.with_context(|| anyhow!("failed to remap inner class entry {entry:?}"))?;
					}
				},
				_ => {},
			}
		}

		for field in fields.iter_mut() {
			self.remap_field(constant_pool, field)?;
		}

		for (ordinal, method) in methods.iter_mut().enumerate() {
			self.remap_method(constant_pool, method, ordinal)?;
		}

		Ok(())
	}

	fn remap_constant_pool(&mut self, pool: &mut ConstantPool) -> Result<()> {
		// the name and types as they were before changing anything
		let original_name_and_types: IndexMap<u16, (String, String)> = pool.iter()
			.filter_map(|(index, entry)| match *entry {
				CpInfo::NameAndType { name_index, descriptor_index } => {
					let name = pool::utf8(pool, name_index).ok()?;
					let desc = pool::utf8(pool, descriptor_index).ok()?;
					Some((index, (name, desc)))
				},
				_ => None,
			})
			.collect();

		// new entries added in here don't need to be looked at
		let end = pool.next_index();

		for index in 1..end {
			if let Some(&CpInfo::Class { name_index }) = pool.get(index) {
				let mut new_name_index = name_index;
				let name = pool::utf8(pool, name_index)
					.with_context(|| anyhow!("failed to read class constant at index {index}"))?;
				let mapped = self.remapper.map_class(&name);
				self.retarget(pool, &mut new_name_index, &name, &mapped)?;

				if let Some(CpInfo::Class { name_index }) = pool.get_mut(index) {
					*name_index = new_name_index;
				}
			}
		}

		for index in 1..end {
			if let Some(&CpInfo::NameAndType { descriptor_index, .. }) = pool.get(index) {
				let mut new_descriptor_index = descriptor_index;
				let desc = pool::utf8(pool, descriptor_index)
					.with_context(|| anyhow!("failed to read name and type constant at index {index}"))?;
				let mapped = self.remapper.map_signature(&desc).into_owned();
				self.retarget(pool, &mut new_descriptor_index, &desc, &mapped)?;

				if new_descriptor_index != descriptor_index {
					if let Some((name, _)) = original_name_and_types.get(&index) {
						self.interner.moved_name_and_type(index, name, &desc, &mapped);
					}
					if let Some(CpInfo::NameAndType { descriptor_index, .. }) = pool.get_mut(index) {
						*descriptor_index = new_descriptor_index;
					}
				}
			}
		}

		for index in 1..end {
			let (class_index, name_and_type_index, is_field) = match pool.get(index) {
				Some(&CpInfo::Fieldref { class_index, name_and_type_index }) => (class_index, name_and_type_index, true),
				Some(&CpInfo::Methodref { class_index, name_and_type_index }) => (class_index, name_and_type_index, false),
				Some(&CpInfo::InterfaceMethodref { class_index, name_and_type_index }) => (class_index, name_and_type_index, false),
				Some(&CpInfo::MethodType { descriptor_index }) => {
					let mut new_descriptor_index = descriptor_index;
					self.remap_descriptor(pool, &mut new_descriptor_index)
						.with_context(|| anyhow!("failed to remap method type constant at index {index}"))?;

					if let Some(CpInfo::MethodType { descriptor_index }) = pool.get_mut(index) {
						*descriptor_index = new_descriptor_index;
					}
					continue;
				},
				_ => continue,
			};

			let new_name_and_type_index = self.remap_member_ref(pool, &original_name_and_types, class_index, name_and_type_index, is_field)
				.with_context(|| anyhow!("failed to remap member reference at index {index}"))?;

			match pool.get_mut(index) {
				Some(CpInfo::Fieldref { name_and_type_index, .. }) |
				Some(CpInfo::Methodref { name_and_type_index, .. }) |
				Some(CpInfo::InterfaceMethodref { name_and_type_index, .. }) => *name_and_type_index = new_name_and_type_index,
				_ => {},
			}
		}

		Ok(())
	}

	/// Gives back the index of the name and type a field or method reference should use.
	fn remap_member_ref(
		&mut self,
		pool: &mut ConstantPool,
		original_name_and_types: &IndexMap<u16, (String, String)>,
		class_index: u16,
		name_and_type_index: u16,
		is_field: bool,
	) -> Result<u16> {
		// the class constant is already remapped
		let owner = pool::class_name(pool, class_index)?;
		let owner = self.remapper.inverse_class_names.get(&owner).cloned().unwrap_or(owner);

		let (name, desc) = original_name_and_types.get(&name_and_type_index)
			.with_context(|| anyhow!("no valid name and type constant at index {name_and_type_index}"))?;

		let mapped_desc = self.remapper.map_signature(desc);
		let mapped_name = if is_field {
			self.remapper.resolve_field(&owner, name)
		} else {
			self.remapper.resolve_method(&owner, name, &mapped_desc)
		};

		if &mapped_name != name || mapped_desc != desc.as_str() {
			debug!("in class {}: {owner}.{name}{desc} -> {mapped_name}{mapped_desc}", self.name);
			self.interner.name_and_type(pool, &mapped_name, &mapped_desc)
		} else {
			Ok(name_and_type_index)
		}
	}

	fn remap_inner_class(&mut self, pool: &mut ConstantPool, entry: &mut InnerClassesEntry) -> Result<()> {
		if entry.outer_class_info_index == 0 || entry.inner_class_info_index == 0 {
			return Ok(());
		}

		let outer = pool::class_name(pool, entry.outer_class_info_index)?;
		let inner = pool::class_name(pool, entry.inner_class_info_index)?;

		let Some(simple_name) = inner.strip_prefix(&outer).and_then(|rest| rest.strip_prefix('$')) else {
			warn!("in class {}: inner class {inner} doesn't start with {outer}$, keeping its simple name", self.name);
			return Ok(());
		};

		let old = if entry.inner_name_index == 0 {
			None
		} else {
			pool::utf8(pool, entry.inner_name_index).ok()
		};
		if old.as_deref() != Some(simple_name) {
			entry.inner_name_index = self.interner.string(pool, simple_name)?;
		}
		Ok(())
	}

	fn remap_field(&mut self, pool: &mut ConstantPool, field: &mut FieldInfo) -> Result<()> {
		let name = pool::utf8(pool, field.name_index)?;

		// only the class itself, declaring a field hides the ones of the parents
		let mapped = self.remapper.mappings.get(&self.name)
			.and_then(|mapping| mapping.map_field(&name))
			.map(str::to_owned);
		if let Some(mapped) = mapped {
			self.retarget(pool, &mut field.name_index, &name, &mapped)?;
		}

		self.remap_descriptor(pool, &mut field.descriptor_index)
			.with_context(|| anyhow!("failed to remap descriptor of field {name}"))?;

		for attribute in field.attributes.iter_mut() {
			if let AttributeInfo::Signature { signature_index, .. } = attribute {
				self.remap_descriptor(pool, signature_index)
					.with_context(|| anyhow!("failed to remap signature of field {name}"))?;
			}
		}

		Ok(())
	}

	fn remap_method(&mut self, pool: &mut ConstantPool, method: &mut MethodInfo, ordinal: usize) -> Result<()> {
		let name = pool::utf8(pool, method.name_index)?;
		let desc = pool::utf8(pool, method.descriptor_index)?;

		let mapped_desc = self.remapper.map_signature(&desc).into_owned();
		let mapped_name = self.remapper.resolve_method(&self.name, &name, &mapped_desc);

		self.retarget(pool, &mut method.name_index, &name, &mapped_name)?;
		self.retarget(pool, &mut method.descriptor_index, &desc, &mapped_desc)?;

		for attribute in method.attributes.iter_mut() {
			match attribute {
				AttributeInfo::Code { attributes, .. } => {
					// generic local variable types aren't remapped, so they're just dropped
					attributes.retain(|attribute| !matches!(attribute, AttributeInfo::LocalVariableTypeTable { .. }));

					for attribute in attributes.iter_mut() {
						if let AttributeInfo::LocalVariableTable { local_variable_table, .. } = attribute {
							for (entry_ordinal, entry) in local_variable_table.iter_mut().enumerate() {
								let local_name = pool::utf8(pool, entry.name_index)
									.with_context(|| anyhow!("failed to read local variable name in method {name}{desc}"))?;
								if local_name.contains(OBFUSCATION_MARKER) {
									let new_name = format!("local{ordinal}_{entry_ordinal}");
									self.retarget(pool, &mut entry.name_index, &local_name, &new_name)?;
								}

								self.remap_descriptor(pool, &mut entry.descriptor_index)
									.with_context(|| anyhow!("failed to remap local variable {local_name} in method {name}{desc}"))?;
							}
						}
					}
				},
				AttributeInfo::Signature { signature_index, .. } => {
					self.remap_descriptor(pool, signature_index)
						.with_context(|| anyhow!("failed to remap signature of method {name}{desc}"))?;
				},
				_ => {},
			}
		}

		Ok(())
	}
}
