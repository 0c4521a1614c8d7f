use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use raw_class_file::ClassFile;
use crate::pool;

/// The direct super classes and interfaces of every class, by obfuscated name.
///
/// Classes without any recorded parents have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hierarchy {
	parents: IndexMap<String, Vec<String>>,
}

impl Hierarchy {
	pub fn new() -> Hierarchy {
		Hierarchy::default()
	}

	/// Builds the hierarchy of all the given classes.
	pub fn from_classes<'a>(classes: impl IntoIterator<Item=&'a ClassFile>) -> Result<Hierarchy> {
		let mut hierarchy = Hierarchy::new();
		for class in classes {
			hierarchy.add_class(class)?;
		}
		Ok(hierarchy)
	}

	/// Records the super class followed by the interfaces of a class.
	///
	/// `package-info` classes are skipped.
	pub fn add_class(&mut self, class: &ClassFile) -> Result<()> {
		let pool = &class.constant_pool;
		let name = pool::class_name(pool, class.this_class)
			.with_context(|| anyhow!("failed to get the name of the class"))?;

		if name.ends_with("package-info") {
			return Ok(());
		}

		let mut parents = Vec::with_capacity(class.interfaces.len() + 1);
		// only java/lang/Object has no super class
		if class.super_class != 0 {
			let super_class = pool::class_name(pool, class.super_class)
				.with_context(|| anyhow!("failed to get the super class of {name}"))?;
			parents.push(super_class);
		}
		for &interface in &class.interfaces {
			let interface = pool::class_name(pool, interface)
				.with_context(|| anyhow!("failed to get an interface of {name}"))?;
			parents.push(interface);
		}

		self.insert(name, parents);
		Ok(())
	}

	/// Sets the parents of a class. An empty list of parents removes the entry.
	pub fn insert(&mut self, class: impl Into<String>, parents: Vec<String>) {
		let class = class.into();
		if parents.is_empty() {
			self.parents.shift_remove(&class);
		} else {
			self.parents.insert(class, parents);
		}
	}

	/// The parents of a class, the super class first. Empty for unknown classes.
	pub fn parents_of(&self, class: &str) -> &[String] {
		self.parents.get(class).map(Vec::as_slice).unwrap_or(&[])
	}

	/// The number of classes with parents.
	pub fn len(&self) -> usize {
		self.parents.len()
	}

	pub fn is_empty(&self) -> bool {
		self.parents.is_empty()
	}
}
