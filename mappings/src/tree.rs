//! The in-memory model of a mapping file.
//!
//! All class names in here are internal names, with `/` as package separator.

use std::hash::{Hash, Hasher};
use indexmap::{Equivalent, IndexMap};

/// The key of a method in a [`ClassMapping`].
///
/// The `desc` is the method descriptor with the *original* class names in it, that is, the way the mapping file
/// writes it. The same obfuscated name can be used for overloads, the descriptor tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MethodKey {
	pub name: String,
	pub desc: String,
}

impl MethodKey {
	pub fn new(name: impl Into<String>, desc: impl Into<String>) -> MethodKey {
		MethodKey { name: name.into(), desc: desc.into() }
	}
}

// must hash the same as `MethodKeyRef`
impl Hash for MethodKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.name.as_str().hash(state);
		self.desc.as_str().hash(state);
	}
}

/// A borrowed [`MethodKey`], for lookups without allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MethodKeyRef<'a>(&'a str, &'a str);

impl Hash for MethodKeyRef<'_> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.hash(state);
		self.1.hash(state);
	}
}

impl Equivalent<MethodKey> for MethodKeyRef<'_> {
	fn equivalent(&self, key: &MethodKey) -> bool {
		self.0 == key.name && self.1 == key.desc
	}
}

/// The mappings of one class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassMapping {
	pub original_name: String,
	pub obfuscated_name: String,
	/// Obfuscated field name to original field name.
	pub fields: IndexMap<String, String>,
	/// Obfuscated method name and original descriptor to original method name.
	pub methods: IndexMap<MethodKey, String>,
}

impl ClassMapping {
	pub fn new(original_name: impl Into<String>, obfuscated_name: impl Into<String>) -> ClassMapping {
		ClassMapping {
			original_name: original_name.into(),
			obfuscated_name: obfuscated_name.into(),
			fields: IndexMap::new(),
			methods: IndexMap::new(),
		}
	}

	/// Gets the original name of the field with the given obfuscated name, if this class maps it.
	pub fn map_field(&self, name: &str) -> Option<&str> {
		self.fields.get(name).map(String::as_str)
	}

	/// Gets the original name of the method with the given obfuscated name and original descriptor, if this
	/// class maps it.
	pub fn map_method(&self, name: &str, desc: &str) -> Option<&str> {
		self.methods.get(&MethodKeyRef(name, desc)).map(String::as_str)
	}

	pub fn has_field(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	pub fn has_method(&self, name: &str, desc: &str) -> bool {
		self.methods.contains_key(&MethodKeyRef(name, desc))
	}

	/// Adds a field mapping, replacing an earlier one for the same obfuscated name.
	pub fn add_field(&mut self, obfuscated: impl Into<String>, original: impl Into<String>) {
		self.fields.insert(obfuscated.into(), original.into());
	}

	/// Adds a method mapping, replacing an earlier one for the same obfuscated name and descriptor.
	pub fn add_method(&mut self, obfuscated: impl Into<String>, desc: impl Into<String>, original: impl Into<String>) {
		self.methods.insert(MethodKey::new(obfuscated, desc), original.into());
	}
}

/// The mappings of all classes, keyed by obfuscated class name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mappings {
	classes: IndexMap<String, ClassMapping>,
}

impl Mappings {
	/// Keys the classes by their obfuscated name. If two classes have the same obfuscated name, the later one is used.
	pub fn new(classes: Vec<ClassMapping>) -> Mappings {
		let classes = classes.into_iter()
			.map(|class| (class.obfuscated_name.clone(), class))
			.collect();
		Mappings { classes }
	}

	pub fn get(&self, obfuscated_name: &str) -> Option<&ClassMapping> {
		self.classes.get(obfuscated_name)
	}

	pub fn get_mut(&mut self, obfuscated_name: &str) -> Option<&mut ClassMapping> {
		self.classes.get_mut(obfuscated_name)
	}

	/// Gets the original name of a class, if there's a mapping for it.
	pub fn map_class(&self, obfuscated_name: &str) -> Option<&str> {
		self.get(obfuscated_name).map(|class| class.original_name.as_str())
	}

	pub fn len(&self) -> usize {
		self.classes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}

	pub fn classes(&self) -> impl Iterator<Item=&ClassMapping> {
		self.classes.values()
	}

	/// The map from obfuscated class name to original class name.
	pub fn class_names(&self) -> IndexMap<String, String> {
		self.classes.iter()
			.map(|(obfuscated, class)| (obfuscated.clone(), class.original_name.clone()))
			.collect()
	}

	/// The map from original class name to obfuscated class name.
	pub fn inverse_class_names(&self) -> IndexMap<String, String> {
		self.classes.iter()
			.map(|(obfuscated, class)| (class.original_name.clone(), obfuscated.clone()))
			.collect()
	}
}
