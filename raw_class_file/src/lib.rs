//! This crate contains a direct binary representation of a java class file.
//!
//! See the [Java Virtual Machine Specification, Chapter 4](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html)
//! for the meaning of the items. No format checking is done, the representation is only as structured as needed for
//! changing the symbolic names of a class:
//! - the constant pool is a [`ConstantPool`] with every constant kind as a [`CpInfo`],
//! - the attributes that carry names and descriptors (`Code`, `Signature`, `InnerClasses`, `LocalVariableTable`
//!   and `LocalVariableTypeTable`) are parsed into [`AttributeInfo`] variants,
//! - every other attribute is kept as [`AttributeInfo::Other`], holding the raw bytes.
//!
//! Reading a class and writing it again gives back the same bytes.
//! ```
//! # use pretty_assertions::assert_eq;
//! use raw_class_file::{ClassFile, ConstantPool, CpInfo};
//! let class = ClassFile {
//!     minor_version: 0,
//!     major_version: 52,
//!     // the constant pool indices start at 1, not at 0
//!     constant_pool: ConstantPool::from(vec![
//!         CpInfo::Utf8 { bytes: b"org/example/Main".to_vec() },
//!         CpInfo::Class { name_index: 1 },
//!         CpInfo::Utf8 { bytes: b"java/lang/Object".to_vec() },
//!         CpInfo::Class { name_index: 3 },
//!     ]),
//!     access_flags: 0x0020,
//!     this_class: 2,
//!     super_class: 4,
//!     interfaces: vec![],
//!     fields: vec![],
//!     methods: vec![],
//!     attributes: vec![],
//! };
//!
//! let bytes = class.to_bytes();
//!
//! let class_2 = ClassFile::read(&mut std::io::Cursor::new(&bytes)).unwrap();
//!
//! assert_eq!(bytes.len(), class_2.length());
//! assert_eq!(class, class_2);
//! ```
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use macros::notation;

mod macros;

impl ClassFile {
	/// Converts the class file to binary representation.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut vec = Vec::with_capacity(self.length());
		self.jvms_write(&mut vec).expect("Writing to a Vec<u8> should never fail");
		vec
	}

	pub fn write(&self, writer: &mut impl std::io::Write) -> std::io::Result<()> {
		self.jvms_write(writer)
	}

	pub fn read(reader: &mut impl std::io::Read) -> std::io::Result<ClassFile> {
		ClassFile::jvms_read(reader, None)
	}

	/// Reads the class file at the given path.
	pub fn read_from_path(path: impl AsRef<Path>) -> std::io::Result<ClassFile> {
		let mut reader = BufReader::new(File::open(path)?);
		ClassFile::read(&mut reader)
	}

	/// Writes the class file to the given path, replacing any file already there.
	///
	/// The parent directory must exist.
	pub fn write_to_path(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
		let mut writer = BufWriter::new(File::create(path)?);
		self.write(&mut writer)?;
		writer.flush()
	}

	/// The length of the class file produced by [`Self::to_bytes`], in bytes.
	pub fn length(&self) -> usize {
		self.jvms_len() as usize
	}
}

notation!(
	struct ClassFile {
		const magic: u32 = 0xCAFEBABEu32,
		mut minor_version: u16,
		mut major_version: u16,
		mut constant_pool: ConstantPool; Some(&constant_pool),
		mut access_flags: u16,
		mut this_class: u16,
		mut super_class: u16,
		//interfaces_count: u16,
		mut interfaces: Vec<u16> [u16],
		//fields_count: u16,
		mut fields: Vec<FieldInfo> [u16],
		//methods_count: u16,
		mut methods: Vec<MethodInfo> [u16],
		//attributes_count: u16,
		mut attributes: Vec<AttributeInfo> [u16],
	}
);

/// The constant pool of a class file.
///
/// Indices start at `1`. The entries [`CpInfo::Long`] and [`CpInfo::Double`] take up two indices, the second one
/// is unusable. Entries can only be appended, so that all indices stay valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
	/// The slot at position `i` is the entry for index `i + 1`. A `None` is the unusable slot after a long or double.
	slots: Vec<Option<CpInfo>>,
}

impl ConstantPool {
	pub fn new() -> ConstantPool {
		ConstantPool::default()
	}

	/// Gets the entry at the given index. Index `0`, the upper half of a long or double and any index past the end
	/// give `None`.
	pub fn get(&self, index: u16) -> Option<&CpInfo> {
		let slot = usize::from(index).checked_sub(1)?;
		self.slots.get(slot)?.as_ref()
	}

	pub fn get_mut(&mut self, index: u16) -> Option<&mut CpInfo> {
		let slot = usize::from(index).checked_sub(1)?;
		self.slots.get_mut(slot)?.as_mut()
	}

	/// Appends an entry and returns the index of it.
	///
	/// Fails if the pool doesn't have enough indices left.
	pub fn push(&mut self, entry: CpInfo) -> std::io::Result<u16> {
		let index = self.next_index();
		let wide = entry.is_wide();

		let needed = if wide { 2 } else { 1 };
		if usize::from(index) + needed > usize::from(u16::MAX) {
			return Err(std::io::Error::new(
				std::io::ErrorKind::InvalidData,
				format!("constant pool overflow: cannot add {entry:?} at index {index}"),
			));
		}

		self.slots.push(Some(entry));
		if wide {
			self.slots.push(None);
		}
		Ok(index)
	}

	/// The index the next pushed entry gets. This is the `constant_pool_count` item of the class file.
	pub fn next_index(&self) -> u16 {
		// the pool is never longer than u16::MAX - 1 slots, see `push` and `jvms_read`
		(self.slots.len() + 1) as u16
	}

	/// Iterates over all usable entries, together with their index.
	pub fn iter(&self) -> impl Iterator<Item=(u16, &CpInfo)> {
		self.slots.iter()
			.enumerate()
			.filter_map(|(slot, entry)| entry.as_ref().map(|entry| ((slot + 1) as u16, entry)))
	}

	fn jvms_write(&self, writer: &mut impl std::io::Write) -> std::io::Result<()> {
		writer.write_all(&self.next_index().to_be_bytes())?;
		for entry in self.slots.iter().flatten() {
			entry.jvms_write(writer)?;
		}
		Ok(())
	}

	fn jvms_read(reader: &mut impl std::io::Read, _pool: Option<&ConstantPool>) -> std::io::Result<ConstantPool> {
		let mut buf = [0u8; 2];
		reader.read_exact(&mut buf)?;
		let constant_pool_count = u16::from_be_bytes(buf);

		let slot_count = usize::from(constant_pool_count.saturating_sub(1));
		let mut slots = Vec::with_capacity(slot_count);
		while slots.len() < slot_count {
			let entry = CpInfo::jvms_read(reader, None)?;
			let wide = entry.is_wide();
			slots.push(Some(entry));
			if wide {
				slots.push(None);
			}
		}
		if slots.len() != slot_count {
			return Err(std::io::Error::other(format!("the last constant pool entry at index {} is a long or double, but that needs two indices", slot_count)));
		}

		Ok(ConstantPool { slots })
	}

	fn jvms_len(&self) -> u32 {
		// every entry has a one byte tag
		2 + self.slots.iter().flatten().map(|entry| 1 + entry.jvms_len()).sum::<u32>()
	}
}

impl From<Vec<CpInfo>> for ConstantPool {
	/// Creates a pool by placing the entries one after another, starting at index `1`.
	///
	/// Note that a [`CpInfo::Long`] or [`CpInfo::Double`] moves all later entries back by one more index.
	fn from(entries: Vec<CpInfo>) -> ConstantPool {
		let mut slots = Vec::with_capacity(entries.len());
		for entry in entries {
			let wide = entry.is_wide();
			slots.push(Some(entry));
			if wide {
				slots.push(None);
			}
		}
		ConstantPool { slots }
	}
}

impl CpInfo {
	/// Whether this entry takes up two indices in the constant pool.
	pub fn is_wide(&self) -> bool {
		matches!(self, CpInfo::Long { .. } | CpInfo::Double { .. })
	}
}

notation!(
	enum CpInfo {
		tag: u8,
		Class {
			= 7 => 7,
			mut name_index: u16,
		},
		Fieldref {
			= 9 => 9,
			mut class_index: u16,
			mut name_and_type_index: u16,
		},
		Methodref {
			= 10 => 10,
			mut class_index: u16,
			mut name_and_type_index: u16,
		},
		InterfaceMethodref {
			= 11 => 11,
			mut class_index: u16,
			mut name_and_type_index: u16,
		},
		String {
			= 8 => 8,
			mut string_index: u16,
		},
		Integer {
			= 3 => 3,
			mut bytes: u32,
		},
		Float {
			= 4 => 4,
			mut bytes: u32,
		},
		Long {
			= 5 => 5,
			mut high_bytes: u32,
			mut low_bytes: u32,
		},
		Double {
			= 6 => 6,
			mut high_bytes: u32,
			mut low_bytes: u32,
		},
		NameAndType {
			= 12 => 12,
			mut name_index: u16,
			mut descriptor_index: u16,
		},
		Utf8 {
			= 1 => 1,
			//length: u16,
			mut bytes: Vec<u8> [u16],
		},
		MethodHandle {
			= 15 => 15,
			mut reference_kind: u8,
			mut reference_index: u16,
		},
		MethodType {
			= 16 => 16,
			mut descriptor_index: u16,
		},
		Dynamic {
			= 17 => 17,
			mut bootstrap_method_attr_index: u16,
			mut name_and_type_index: u16,
		},
		InvokeDynamic {
			= 18 => 18,
			mut bootstrap_method_attr_index: u16,
			mut name_and_type_index: u16,
		},
		Module {
			= 19 => 19,
			mut name_index: u16,
		},
		Package {
			= 20 => 20,
			mut name_index: u16,
		},
		_ {
			tag => Err(std::io::Error::other(format!("Unexpected constant pool tag {}", tag))),
		},
	}
);

notation!(
	struct FieldInfo {
		mut access_flags: u16,
		mut name_index: u16,
		mut descriptor_index: u16,
		//attributes_count: u16,
		mut attributes: Vec<AttributeInfo> [u16],
	}
);

notation!(
	struct MethodInfo {
		mut access_flags: u16,
		mut name_index: u16,
		mut descriptor_index: u16,
		//attributes_count: u16,
		mut attributes: Vec<AttributeInfo> [u16],
	}
);

fn pool_has_utf8(pool: Option<&ConstantPool>, index: u16, value: &[u8]) -> Result<bool, std::io::Error> {
	let Some(pool) = pool else {
		return Err(std::io::Error::other("Expected to have constant pool at this point of reading"));
	};
	let Some(entry) = pool.get(index) else {
		return Err(std::io::Error::other(format!("No constant pool entry at position {}", index)));
	};
	let CpInfo::Utf8 { bytes } = entry else {
		return Err(std::io::Error::other(format!("Expected constant pool entry Utf8 at position {}, got {:?}", index, entry)));
	};
	Ok(bytes.as_slice() == value)
}

notation!(
	enum AttributeInfo [pool] {
		attribute_name_index: u16,
		Code this {
			= *attribute_name_index => attribute_name_index if pool_has_utf8(pool, attribute_name_index, b"Code")?,
			mut attribute_name_index: u16 nowrite = attribute_name_index,
			const attribute_length: u32 = this.jvms_len() - 6,
			mut max_stack: u16,
			mut max_locals: u16,
			//code_length: u32,
			mut code: Vec<u8> [u32],
			//exception_table_length: u16,
			mut exception_table: Vec<ExceptionTableEntry> [u16],
			//attributes_count: u16,
			mut attributes: Vec<AttributeInfo> [u16],
		},
		InnerClasses this {
			= *attribute_name_index => attribute_name_index if pool_has_utf8(pool, attribute_name_index, b"InnerClasses")?,
			mut attribute_name_index: u16 nowrite = attribute_name_index,
			const attribute_length: u32 = this.jvms_len() - 6,
			//number_of_classes: u16,
			mut classes: Vec<InnerClassesEntry> [u16],
		},
		Signature {
			= *attribute_name_index => attribute_name_index if pool_has_utf8(pool, attribute_name_index, b"Signature")?,
			mut attribute_name_index: u16 nowrite = attribute_name_index,
			const attribute_length: u32 = 2,
			mut signature_index: u16,
		},
		LocalVariableTable this {
			= *attribute_name_index => attribute_name_index if pool_has_utf8(pool, attribute_name_index, b"LocalVariableTable")?,
			mut attribute_name_index: u16 nowrite = attribute_name_index,
			const attribute_length: u32 = this.jvms_len() - 6,
			//local_variable_table_length: u16,
			mut local_variable_table: Vec<LocalVariableTableEntry> [u16],
		},
		LocalVariableTypeTable this {
			= *attribute_name_index => attribute_name_index if pool_has_utf8(pool, attribute_name_index, b"LocalVariableTypeTable")?,
			mut attribute_name_index: u16 nowrite = attribute_name_index,
			const attribute_length: u32 = this.jvms_len() - 6,
			//local_variable_type_table_length: u16,
			mut local_variable_type_table: Vec<LocalVariableTypeTableEntry> [u16],
		},
		Other {
			= *attribute_name_index => attribute_name_index,
			mut attribute_name_index: u16 nowrite = attribute_name_index,
			//attribute_length: u32,
			mut info: Vec<u8> [u32],
		},
	}
);

notation!(
	struct ExceptionTableEntry {
		mut start_pc: u16,
		mut end_pc: u16,
		mut handler_pc: u16,
		mut catch_type: u16,
	}
);

notation!(
	struct InnerClassesEntry {
		mut inner_class_info_index: u16,
		mut outer_class_info_index: u16,
		mut inner_name_index: u16,
		mut inner_class_access_flags: u16,
	}
);

notation!(
	struct LocalVariableTableEntry {
		mut start_pc: u16,
		mut length: u16,
		mut name_index: u16,
		mut descriptor_index: u16,
		mut index: u16,
	}
);

notation!(
	struct LocalVariableTypeTableEntry {
		mut start_pc: u16,
		mut length: u16,
		mut name_index: u16,
		mut signature_index: u16,
		mut index: u16,
	}
);
