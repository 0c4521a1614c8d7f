//! Keeping members without mapping from getting the same name as mapped members.
//!
//! If a class maps the field `a` to `x`, but also has a field that's already called `x` and has no mapping, both
//! fields would be called `x` after remapping. To avoid this, such members get a new name of the form
//! `<name>_<ordinal>`, where the ordinal starts at the position of the member in the class.
//!
//! The new names are added to the mappings before any class gets remapped, so that references from other classes
//! and from subclasses find them just like names from the mapping file.

use std::collections::HashSet;
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use log::info;
use mappings::{ClassMapping, Mappings};
use raw_class_file::ClassFile;
use crate::pool;
use crate::signature::map_signature;

/// Gives back the mappings with the new names for all colliding members of the given classes added.
///
/// This has to see every class file before any of them is remapped.
pub fn resolve_collisions<'c>(mappings: &Mappings, classes: impl IntoIterator<Item=&'c ClassFile>) -> Result<Mappings> {
	let class_names = mappings.class_names();
	let mut resolved = mappings.clone();

	for class in classes {
		let name = crate::class_name(class)?;
		if let Some(mapping) = resolved.get_mut(&name) {
			let attached = attach(mapping, class, &class_names)
				.with_context(|| anyhow!("failed to check for name collisions in class {name}"))?;
			*mapping = attached;
		}
	}

	Ok(resolved)
}

/// Creates the mapping for a class file, with the names of colliding members added to it.
///
/// `class_names` maps obfuscated class names to original ones, it's used to bring the method descriptors of the
/// class file into the form of the mapping.
fn attach(mapping: &ClassMapping, class: &ClassFile, class_names: &IndexMap<String, String>) -> Result<ClassMapping> {
	let mut attached = mapping.clone();
	let pool = &class.constant_pool;

	let target_fields: HashSet<&str> = mapping.fields.values().map(String::as_str).collect();

	let field_names = class.fields.iter()
		.map(|field| pool::utf8(pool, field.name_index))
		.collect::<Result<Vec<String>>>()?;
	let mut taken_fields: HashSet<String> = target_fields.iter().map(|&name| name.to_owned()).collect();
	taken_fields.extend(field_names.iter().cloned());

	for (ordinal, name) in field_names.iter().enumerate() {
		if attached.has_field(name) || !target_fields.contains(name.as_str()) {
			continue;
		}

		let new_name = free_name(name, ordinal, &taken_fields);
		info!("in class {}: field {name} -> {new_name}", mapping.original_name);
		taken_fields.insert(new_name.clone());
		attached.add_field(name.as_str(), new_name);
	}

	let target_methods: HashSet<(&str, &str)> = mapping.methods.iter()
		.map(|(key, original)| (original.as_str(), key.desc.as_str()))
		.collect();

	let methods = class.methods.iter()
		.map(|method| {
			let name = pool::utf8(pool, method.name_index)?;
			let desc = pool::utf8(pool, method.descriptor_index)?;
			let desc = map_signature(&desc, class_names).into_owned();
			Ok((name, desc))
		})
		.collect::<Result<Vec<(String, String)>>>()?;
	let mut taken_methods: HashSet<String> = target_methods.iter().map(|&(name, _)| name.to_owned()).collect();
	taken_methods.extend(methods.iter().map(|(name, _)| name.clone()));

	for (ordinal, (name, desc)) in methods.iter().enumerate() {
		if attached.has_method(name, desc) || !target_methods.contains(&(name.as_str(), desc.as_str())) {
			continue;
		}

		let new_name = free_name(name, ordinal, &taken_methods);
		info!("in class {}: method {name}{desc} -> {new_name}", mapping.original_name);
		taken_methods.insert(new_name.clone());
		attached.add_method(name.as_str(), desc.as_str(), new_name);
	}

	Ok(attached)
}

fn free_name(name: &str, first_ordinal: usize, taken: &HashSet<String>) -> String {
	(first_ordinal..)
		.map(|ordinal| format!("{name}_{ordinal}"))
		.find(|candidate| !taken.contains(candidate))
		.unwrap_or_else(|| name.to_owned())
}
