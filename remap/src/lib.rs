//! Remapping of class files from obfuscated names to original names.
//!
//! The parts, in the order they are used:
//! - a [`Hierarchy`] is built from all class files, so that members can be looked up in parent classes,
//! - [`resolve_collisions`] adds new names for members that would collide after remapping to the
//!   [`Mappings`][mappings::Mappings],
//! - a [`Remapper`] is created from the hierarchy and the resulting mappings,
//! - [`batch::run`] calls [`Remapper::remap_class`] on all class files, on several threads.
//!
//! ```
//! use mappings::{ClassMapping, Mappings};
//! use remap::{Hierarchy, Remapper};
//!
//! let mut class = ClassMapping::new("com/example/A", "a");
//! class.add_field("b", "x");
//! let mappings = Mappings::new(vec![class]);
//!
//! let mut hierarchy = Hierarchy::new();
//! hierarchy.insert("c", vec!["a".to_owned()]);
//!
//! let remapper = Remapper::new(&mappings, &hierarchy);
//! assert_eq!(remapper.resolve_field("c", "b"), "x");
//! assert_eq!(remapper.map_class("a"), "com/example/A");
//! ```

use anyhow::{anyhow, Context, Result};
use raw_class_file::ClassFile;

pub mod batch;
mod collision;
mod hierarchy;
mod pool;
mod remapper;
mod signature;

pub use collision::resolve_collisions;
pub use hierarchy::Hierarchy;
pub use remapper::Remapper;
pub use signature::map_signature;

/// Gets the internal name of a class file, like `java/lang/Object`.
pub fn class_name(class: &ClassFile) -> Result<String> {
	pool::class_name(&class.constant_pool, class.this_class)
		.with_context(|| anyhow!("failed to get the name of the class"))
}
