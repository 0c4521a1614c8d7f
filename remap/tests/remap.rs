use std::collections::HashMap;
use anyhow::Result;
use pretty_assertions::assert_eq;
use mappings::{ClassMapping, Dialect, Mappings};
use raw_class_file::{AttributeInfo, ClassFile, ConstantPool, CpInfo, FieldInfo, InnerClassesEntry, LocalVariableTableEntry, LocalVariableTypeTableEntry, MethodInfo};
use remap::{Hierarchy, Remapper};

/// Builds a constant pool the way a compiler would, without duplicate strings.
#[derive(Default)]
struct PoolBuilder {
	pool: ConstantPool,
	strings: HashMap<String, u16>,
}

impl PoolBuilder {
	fn utf8(&mut self, string: &str) -> Result<u16> {
		if let Some(&index) = self.strings.get(string) {
			return Ok(index);
		}
		let index = self.pool.push(CpInfo::Utf8 { bytes: string.as_bytes().to_vec() })?;
		self.strings.insert(string.to_owned(), index);
		Ok(index)
	}

	fn class(&mut self, name: &str) -> Result<u16> {
		let name_index = self.utf8(name)?;
		Ok(self.pool.push(CpInfo::Class { name_index })?)
	}

	fn name_and_type(&mut self, name: &str, desc: &str) -> Result<u16> {
		let name_index = self.utf8(name)?;
		let descriptor_index = self.utf8(desc)?;
		Ok(self.pool.push(CpInfo::NameAndType { name_index, descriptor_index })?)
	}

	fn field_ref(&mut self, class_index: u16, name: &str, desc: &str) -> Result<u16> {
		let name_and_type_index = self.name_and_type(name, desc)?;
		Ok(self.pool.push(CpInfo::Fieldref { class_index, name_and_type_index })?)
	}

	fn method_ref(&mut self, class_index: u16, name: &str, desc: &str) -> Result<u16> {
		let name_and_type_index = self.name_and_type(name, desc)?;
		Ok(self.pool.push(CpInfo::Methodref { class_index, name_and_type_index })?)
	}

	fn field(&mut self, name: &str, desc: &str) -> Result<FieldInfo> {
		Ok(FieldInfo {
			access_flags: 0x0002,
			name_index: self.utf8(name)?,
			descriptor_index: self.utf8(desc)?,
			attributes: vec![],
		})
	}

	fn method(&mut self, name: &str, desc: &str) -> Result<MethodInfo> {
		Ok(MethodInfo {
			access_flags: 0x0001,
			name_index: self.utf8(name)?,
			descriptor_index: self.utf8(desc)?,
			attributes: vec![],
		})
	}

	fn build(self, this_class: u16, super_class: u16, fields: Vec<FieldInfo>, methods: Vec<MethodInfo>) -> ClassFile {
		ClassFile {
			minor_version: 0,
			major_version: 52,
			constant_pool: self.pool,
			access_flags: 0x0021,
			this_class,
			super_class,
			interfaces: vec![],
			fields,
			methods,
			attributes: vec![],
		}
	}
}

fn utf8(pool: &ConstantPool, index: u16) -> String {
	match pool.get(index) {
		Some(CpInfo::Utf8 { bytes }) => String::from_utf8(bytes.clone()).unwrap(),
		entry => panic!("expected utf8 at {index}, got {entry:?}"),
	}
}

fn class_name(pool: &ConstantPool, index: u16) -> String {
	match pool.get(index) {
		Some(&CpInfo::Class { name_index }) => utf8(pool, name_index),
		entry => panic!("expected class at {index}, got {entry:?}"),
	}
}

fn name_and_type(pool: &ConstantPool, index: u16) -> (String, String) {
	match pool.get(index) {
		Some(&CpInfo::NameAndType { name_index, descriptor_index }) => (utf8(pool, name_index), utf8(pool, descriptor_index)),
		entry => panic!("expected name and type at {index}, got {entry:?}"),
	}
}

/// The owner, name and descriptor of a field or method reference.
fn member_ref(pool: &ConstantPool, index: u16) -> (String, String, String) {
	match pool.get(index) {
		Some(&CpInfo::Fieldref { class_index, name_and_type_index }) |
		Some(&CpInfo::Methodref { class_index, name_and_type_index }) => {
			let (name, desc) = name_and_type(pool, name_and_type_index);
			(class_name(pool, class_index), name, desc)
		},
		entry => panic!("expected member reference at {index}, got {entry:?}"),
	}
}

fn count(pool: &ConstantPool, f: impl Fn(&CpInfo) -> bool) -> usize {
	pool.iter().filter(|(_, entry)| f(entry)).count()
}

/// A class `a` with a field `b` mapped to `x` and an unmapped field `x`, so that `x` needs a new name.
fn colliding_class() -> Result<ClassFile> {
	let mut builder = PoolBuilder::default();
	let this_class = builder.class("a")?;
	let super_class = builder.class("java/lang/Object")?;
	let fields = vec![builder.field("b", "I")?, builder.field("x", "I")?];
	let methods = vec![builder.method("c", "()V")?, builder.method("go", "()V")?];
	Ok(builder.build(this_class, super_class, fields, methods))
}

#[test]
fn proguard_mapping_end_to_end() -> Result<()> {
	let input = "\
com.example.A -> a:
    int x -> b
    void go() -> c
";
	let mappings = Mappings::new(Dialect::Proguard.parser().parse(&mut input.as_bytes())?);

	let mut builder = PoolBuilder::default();
	let this_class = builder.class("a")?;
	let super_class = builder.class("java/lang/Object")?;
	let field_ref = builder.field_ref(this_class, "b", "I")?;
	let method_ref = builder.method_ref(this_class, "c", "()V")?;
	let fields = vec![builder.field("b", "I")?];
	let methods = vec![builder.method("c", "()V")?];
	let mut class = builder.build(this_class, super_class, fields, methods);
	let original = class.clone();

	let hierarchy = Hierarchy::from_classes([&class])?;
	Remapper::new(&mappings, &hierarchy).remap_class(&mut class)?;

	let pool = &class.constant_pool;
	assert_eq!(remap::class_name(&class)?, "com/example/A");
	assert_eq!(class_name(pool, class.super_class), "java/lang/Object");
	assert_eq!(utf8(pool, class.fields[0].name_index), "x");
	assert_eq!(utf8(pool, class.fields[0].descriptor_index), "I");
	assert_eq!(utf8(pool, class.methods[0].name_index), "go");
	assert_eq!(utf8(pool, class.methods[0].descriptor_index), "()V");
	assert_eq!(member_ref(pool, field_ref), ("com/example/A".to_owned(), "x".to_owned(), "I".to_owned()));
	assert_eq!(member_ref(pool, method_ref), ("com/example/A".to_owned(), "go".to_owned(), "()V".to_owned()));

	// the old entries are still there, with the same contents
	for (index, entry) in original.constant_pool.iter() {
		if matches!(entry, CpInfo::Utf8 { .. } | CpInfo::NameAndType { .. }) {
			assert_eq!(pool.get(index), Some(entry));
		}
	}
	Ok(())
}

#[test]
fn members_are_found_in_parents() -> Result<()> {
	let mut a = ClassMapping::new("com/example/A", "a");
	a.add_field("b", "x");
	let mut i = ClassMapping::new("com/example/Runnable", "i");
	i.add_method("m", "()V", "run");
	let mappings = Mappings::new(vec![a, i]);

	let mut hierarchy = Hierarchy::new();
	hierarchy.insert("c", vec!["a".to_owned(), "i".to_owned()]);
	hierarchy.insert("a", vec!["java/lang/Object".to_owned()]);

	let mut builder = PoolBuilder::default();
	let this_class = builder.class("c")?;
	let super_class = builder.class("a")?;
	let field_ref = builder.field_ref(this_class, "b", "I")?;
	let method_ref = builder.method_ref(this_class, "m", "()V")?;
	let unknown_ref = builder.method_ref(this_class, "n", "()V")?;
	let methods = vec![builder.method("m", "()V")?];
	let mut class = builder.build(this_class, super_class, vec![], methods);

	Remapper::new(&mappings, &hierarchy).remap_class(&mut class)?;

	let pool = &class.constant_pool;
	assert_eq!(remap::class_name(&class)?, "c");
	assert_eq!(class_name(pool, class.super_class), "com/example/A");
	assert_eq!(member_ref(pool, field_ref), ("c".to_owned(), "x".to_owned(), "I".to_owned()));
	assert_eq!(member_ref(pool, method_ref), ("c".to_owned(), "run".to_owned(), "()V".to_owned()));
	assert_eq!(member_ref(pool, unknown_ref), ("c".to_owned(), "n".to_owned(), "()V".to_owned()));
	// the implementation of the interface method gets the same name
	assert_eq!(utf8(pool, class.methods[0].name_index), "run");
	Ok(())
}

#[test]
fn descriptors_of_references_are_mapped() -> Result<()> {
	let mut a = ClassMapping::new("com/example/A", "a");
	a.add_method("c", "(Lcom/example/A;)V", "accept");
	let mappings = Mappings::new(vec![a]);
	let hierarchy = Hierarchy::new();

	let mut builder = PoolBuilder::default();
	let this_class = builder.class("a")?;
	let super_class = builder.class("java/lang/Object")?;
	let field_ref = builder.field_ref(this_class, "self", "La;")?;
	let method_ref = builder.method_ref(this_class, "c", "(La;)V")?;
	let descriptor_index = builder.utf8("(La;)La;")?;
	let method_type = builder.pool.push(CpInfo::MethodType { descriptor_index })?;
	let methods = vec![builder.method("c", "(La;)V")?];
	let mut class = builder.build(this_class, super_class, vec![], methods);

	Remapper::new(&mappings, &hierarchy).remap_class(&mut class)?;

	let pool = &class.constant_pool;
	assert_eq!(member_ref(pool, field_ref), ("com/example/A".to_owned(), "self".to_owned(), "Lcom/example/A;".to_owned()));
	assert_eq!(member_ref(pool, method_ref), ("com/example/A".to_owned(), "accept".to_owned(), "(Lcom/example/A;)V".to_owned()));
	match pool.get(method_type) {
		Some(&CpInfo::MethodType { descriptor_index }) => assert_eq!(utf8(pool, descriptor_index), "(Lcom/example/A;)Lcom/example/A;"),
		entry => panic!("expected method type, got {entry:?}"),
	}
	assert_eq!(utf8(pool, class.methods[0].name_index), "accept");
	assert_eq!(utf8(pool, class.methods[0].descriptor_index), "(Lcom/example/A;)V");
	Ok(())
}

#[test]
fn classes_without_mappings_stay_the_same() -> Result<()> {
	let mut a = ClassMapping::new("com/example/A", "a");
	a.add_field("b", "x");
	let mappings = Mappings::new(vec![a]);

	let mut builder = PoolBuilder::default();
	let this_class = builder.class("org/example/Main")?;
	let super_class = builder.class("java/lang/Object")?;
	builder.field_ref(this_class, "b", "I")?;
	builder.method_ref(super_class, "hashCode", "()I")?;
	let fields = vec![builder.field("b", "I")?];
	let methods = vec![builder.method("main", "([Ljava/lang/String;)V")?];
	let mut class = builder.build(this_class, super_class, fields, methods);
	let original = class.clone();

	let hierarchy = Hierarchy::from_classes([&class])?;
	Remapper::new(&mappings, &hierarchy).remap_class(&mut class)?;

	assert_eq!(class, original);
	assert_eq!(class.to_bytes(), original.to_bytes());
	Ok(())
}

#[test]
fn unmapped_members_get_out_of_the_way() -> Result<()> {
	let mut a = ClassMapping::new("com/example/A", "a");
	a.add_field("b", "x");
	a.add_method("c", "()V", "go");
	let mappings = Mappings::new(vec![a]);
	let hierarchy = Hierarchy::new();

	let mut builder = PoolBuilder::default();
	let this_class = builder.class("a")?;
	let super_class = builder.class("java/lang/Object")?;
	let x_ref = builder.field_ref(this_class, "x", "I")?;
	let fields = vec![builder.field("b", "I")?, builder.field("x", "I")?];
	let methods = vec![builder.method("c", "()V")?, builder.method("go", "()V")?, builder.method("go", "()I")?];
	let mut class = builder.build(this_class, super_class, fields, methods);

	let mappings = remap::resolve_collisions(&mappings, [&class])?;
	Remapper::new(&mappings, &hierarchy).remap_class(&mut class)?;

	let pool = &class.constant_pool;
	let field_names: Vec<String> = class.fields.iter().map(|field| utf8(pool, field.name_index)).collect();
	assert_eq!(field_names, vec!["x", "x_1"]);
	let method_names: Vec<String> = class.methods.iter().map(|method| utf8(pool, method.name_index)).collect();
	// a different descriptor doesn't collide
	assert_eq!(method_names, vec!["go", "go_1", "go"]);
	// references to the moved field follow it
	assert_eq!(member_ref(pool, x_ref), ("com/example/A".to_owned(), "x_1".to_owned(), "I".to_owned()));
	Ok(())
}

#[test]
fn other_classes_see_new_names_of_colliding_members() -> Result<()> {
	let mut a = ClassMapping::new("com/example/A", "a");
	a.add_field("b", "x");
	a.add_method("c", "()V", "go");
	let mappings = Mappings::new(vec![a]);

	let mut owner = colliding_class()?;

	let mut builder = PoolBuilder::default();
	let this_class = builder.class("d")?;
	let super_class = builder.class("java/lang/Object")?;
	let a_class = builder.class("a")?;
	let field_ref = builder.field_ref(a_class, "x", "I")?;
	let method_ref = builder.method_ref(a_class, "go", "()V")?;
	let mapped_ref = builder.field_ref(a_class, "b", "I")?;
	let mut user = builder.build(this_class, super_class, vec![], vec![]);

	let mut builder = PoolBuilder::default();
	let this_class = builder.class("e")?;
	let super_class = builder.class("a")?;
	let inherited_ref = builder.field_ref(this_class, "x", "I")?;
	let overriding = vec![builder.method("go", "()V")?];
	let mut subclass = builder.build(this_class, super_class, vec![], overriding);

	let hierarchy = Hierarchy::from_classes([&owner, &user, &subclass])?;
	let mappings = remap::resolve_collisions(&mappings, [&owner, &user, &subclass])?;
	let remapper = Remapper::new(&mappings, &hierarchy);

	// the users are remapped before the class declaring the members
	remapper.remap_class(&mut user)?;
	remapper.remap_class(&mut subclass)?;
	remapper.remap_class(&mut owner)?;

	let pool = &owner.constant_pool;
	let field_names: Vec<String> = owner.fields.iter().map(|field| utf8(pool, field.name_index)).collect();
	assert_eq!(field_names, vec!["x", "x_1"]);

	let pool = &user.constant_pool;
	assert_eq!(member_ref(pool, field_ref), ("com/example/A".to_owned(), "x_1".to_owned(), "I".to_owned()));
	assert_eq!(member_ref(pool, method_ref), ("com/example/A".to_owned(), "go_1".to_owned(), "()V".to_owned()));
	assert_eq!(member_ref(pool, mapped_ref), ("com/example/A".to_owned(), "x".to_owned(), "I".to_owned()));

	let pool = &subclass.constant_pool;
	assert_eq!(member_ref(pool, inherited_ref), ("e".to_owned(), "x_1".to_owned(), "I".to_owned()));
	assert_eq!(utf8(pool, subclass.methods[0].name_index), "go_1");
	Ok(())
}

#[test]
fn equal_references_share_new_entries() -> Result<()> {
	let mut a = ClassMapping::new("com/example/A", "a");
	a.add_field("b", "x");
	let mappings = Mappings::new(vec![a]);

	let mut hierarchy = Hierarchy::new();
	hierarchy.insert("c", vec!["a".to_owned()]);

	let mut builder = PoolBuilder::default();
	let this_class = builder.class("a")?;
	let super_class = builder.class("java/lang/Object")?;
	let other_class = builder.class("c")?;
	let first = builder.field_ref(this_class, "b", "I")?;
	let second = builder.field_ref(other_class, "b", "I")?;
	// already in the pool
	builder.utf8("x")?;
	let mut class = builder.build(this_class, super_class, vec![], vec![]);

	let name_and_types = count(&class.constant_pool, |entry| matches!(entry, CpInfo::NameAndType { .. }));
	Remapper::new(&mappings, &hierarchy).remap_class(&mut class)?;

	let pool = &class.constant_pool;
	assert_eq!(member_ref(pool, first), ("com/example/A".to_owned(), "x".to_owned(), "I".to_owned()));
	assert_eq!(member_ref(pool, second), ("c".to_owned(), "x".to_owned(), "I".to_owned()));
	assert_eq!(count(pool, |entry| matches!(entry, CpInfo::NameAndType { .. })), name_and_types + 1);
	assert_eq!(count(pool, |entry| entry == &CpInfo::Utf8 { bytes: b"x".to_vec() }), 1);
	Ok(())
}

#[test]
fn obfuscated_local_variables_are_renamed() -> Result<()> {
	let mappings = Mappings::new(vec![ClassMapping::new("com/example/A", "a")]);
	let hierarchy = Hierarchy::new();

	let mut builder = PoolBuilder::default();
	let this_class = builder.class("a")?;
	let super_class = builder.class("java/lang/Object")?;
	let code = builder.utf8("Code")?;
	let table = builder.utf8("LocalVariableTable")?;
	let type_table = builder.utf8("LocalVariableTypeTable")?;

	let locals = vec![
		LocalVariableTableEntry { start_pc: 0, length: 1, name_index: builder.utf8("this")?, descriptor_index: builder.utf8("La;")?, index: 0 },
		LocalVariableTableEntry { start_pc: 0, length: 1, name_index: builder.utf8("\u{2603}a")?, descriptor_index: builder.utf8("I")?, index: 1 },
	];
	let types = vec![
		LocalVariableTypeTableEntry { start_pc: 0, length: 1, name_index: builder.utf8("list")?, signature_index: builder.utf8("Ljava/util/List<La;>;")?, index: 2 },
	];

	let mut first = builder.method("<init>", "()V")?;
	let mut second = builder.method("b", "(I)V")?;
	second.attributes.push(AttributeInfo::Code {
		attribute_name_index: code,
		max_stack: 1,
		max_locals: 3,
		code: vec![0xb1], // return
		exception_table: vec![],
		attributes: vec![
			AttributeInfo::LocalVariableTable { attribute_name_index: table, local_variable_table: locals },
			AttributeInfo::LocalVariableTypeTable { attribute_name_index: type_table, local_variable_type_table: types },
		],
	});
	first.attributes.push(AttributeInfo::Code {
		attribute_name_index: code,
		max_stack: 0,
		max_locals: 1,
		code: vec![0xb1],
		exception_table: vec![],
		attributes: vec![],
	});
	let mut class = builder.build(this_class, super_class, vec![], vec![first, second]);

	Remapper::new(&mappings, &hierarchy).remap_class(&mut class)?;

	let pool = &class.constant_pool;
	let Some(AttributeInfo::Code { attributes, .. }) = class.methods[1].attributes.first() else {
		panic!("expected code attribute, got {:?}", class.methods[1].attributes);
	};
	assert_eq!(attributes.len(), 1);
	let Some(AttributeInfo::LocalVariableTable { local_variable_table, .. }) = attributes.first() else {
		panic!("expected local variable table, got {attributes:?}");
	};

	let names: Vec<(String, String)> = local_variable_table.iter()
		.map(|entry| (utf8(pool, entry.name_index), utf8(pool, entry.descriptor_index)))
		.collect();
	assert_eq!(names, vec![
		("this".to_owned(), "Lcom/example/A;".to_owned()),
		("local1_1".to_owned(), "I".to_owned()),
	]);
	Ok(())
}

#[test]
fn array_classes_and_inner_classes() -> Result<()> {
	let mappings = Mappings::new(vec![
		ClassMapping::new("com/example/A", "a"),
		ClassMapping::new("com/example/A$Inner", "a$b"),
		ClassMapping::new("com/example/Other", "a$c"),
	]);
	let hierarchy = Hierarchy::new();

	let mut builder = PoolBuilder::default();
	let this_class = builder.class("a")?;
	let super_class = builder.class("java/lang/Object")?;
	let array = builder.class("[[La;")?;
	let primitive_array = builder.class("[I")?;
	let inner = builder.class("a$b")?;
	let other = builder.class("a$c")?;
	let inner_classes = builder.utf8("InnerClasses")?;
	let inner_name = builder.utf8("b")?;
	let other_name = builder.utf8("c")?;
	let mut class = builder.build(this_class, super_class, vec![], vec![]);
	class.attributes.push(AttributeInfo::InnerClasses {
		attribute_name_index: inner_classes,
		classes: vec![
			InnerClassesEntry { inner_class_info_index: inner, outer_class_info_index: this_class, inner_name_index: inner_name, inner_class_access_flags: 0x0008 },
			InnerClassesEntry { inner_class_info_index: other, outer_class_info_index: this_class, inner_name_index: other_name, inner_class_access_flags: 0x0008 },
		],
	});

	Remapper::new(&mappings, &hierarchy).remap_class(&mut class)?;

	let pool = &class.constant_pool;
	assert_eq!(class_name(pool, array), "[[Lcom/example/A;");
	assert_eq!(class_name(pool, primitive_array), "[I");
	assert_eq!(class_name(pool, inner), "com/example/A$Inner");
	assert_eq!(class_name(pool, other), "com/example/Other");

	let Some(AttributeInfo::InnerClasses { classes, .. }) = class.attributes.first() else {
		panic!("expected inner classes attribute, got {:?}", class.attributes);
	};
	assert_eq!(utf8(pool, classes[0].inner_name_index), "Inner");
	// doesn't fit the outer class, so it's left alone
	assert_eq!(utf8(pool, classes[1].inner_name_index), "c");
	Ok(())
}

#[test]
fn remapped_class_can_be_written_and_read() -> Result<()> {
	let mut a = ClassMapping::new("com/example/A", "a");
	a.add_field("b", "x");
	let mappings = Mappings::new(vec![a]);
	let hierarchy = Hierarchy::new();

	let mut builder = PoolBuilder::default();
	let this_class = builder.class("a")?;
	let super_class = builder.class("java/lang/Object")?;
	builder.pool.push(CpInfo::Long { high_bytes: 1, low_bytes: 2 })?;
	builder.field_ref(this_class, "b", "La;")?;
	let fields = vec![builder.field("b", "La;")?];
	let mut class = builder.build(this_class, super_class, fields, vec![]);

	Remapper::new(&mappings, &hierarchy).remap_class(&mut class)?;

	let bytes = class.to_bytes();
	let read = ClassFile::read(&mut std::io::Cursor::new(&bytes))?;
	assert_eq!(read, class);
	assert_eq!(remap::class_name(&read)?, "com/example/A");
	Ok(())
}

#[test]
fn generic_signatures_are_mapped() -> Result<()> {
	let mappings = Mappings::new(vec![ClassMapping::new("com/example/A", "a")]);
	let hierarchy = Hierarchy::new();

	let mut builder = PoolBuilder::default();
	let this_class = builder.class("b")?;
	let super_class = builder.class("java/lang/Object")?;
	let signature = builder.utf8("Signature")?;
	let class_signature = builder.utf8("<T:La;>Ljava/lang/Object;Ljava/lang/Comparable<La;>;")?;
	let field_signature = builder.utf8("Ljava/util/List<La;>;")?;
	let method_signature = builder.utf8("(Ljava/util/List<La;>;)TT;")?;
	let unchanged_signature = builder.utf8("Ljava/util/List<Ljava/lang/String;>;")?;

	let mut field = builder.field("c", "Ljava/util/List;")?;
	field.attributes.push(AttributeInfo::Signature { attribute_name_index: signature, signature_index: field_signature });
	let mut other_field = builder.field("d", "Ljava/util/List;")?;
	other_field.attributes.push(AttributeInfo::Signature { attribute_name_index: signature, signature_index: unchanged_signature });
	let mut method = builder.method("e", "(Ljava/util/List;)Ljava/lang/Object;")?;
	method.attributes.push(AttributeInfo::Signature { attribute_name_index: signature, signature_index: method_signature });

	let mut class = builder.build(this_class, super_class, vec![field, other_field], vec![method]);
	class.attributes.push(AttributeInfo::Signature { attribute_name_index: signature, signature_index: class_signature });

	Remapper::new(&mappings, &hierarchy).remap_class(&mut class)?;

	let pool = &class.constant_pool;
	let signature_of = |attributes: &[AttributeInfo]| match attributes.first() {
		Some(&AttributeInfo::Signature { signature_index, .. }) => utf8(pool, signature_index),
		attribute => panic!("expected signature attribute, got {attribute:?}"),
	};

	assert_eq!(signature_of(class.attributes.as_slice()), "<T:Lcom/example/A;>Ljava/lang/Object;Ljava/lang/Comparable<Lcom/example/A;>;");
	assert_eq!(signature_of(class.fields[0].attributes.as_slice()), "Ljava/util/List<Lcom/example/A;>;");
	assert_eq!(signature_of(class.methods[0].attributes.as_slice()), "(Ljava/util/List<Lcom/example/A;>;)TT;");

	// a signature without mapped classes keeps its index
	assert_eq!(class.fields[1].attributes, vec![AttributeInfo::Signature { attribute_name_index: signature, signature_index: unchanged_signature }]);
	// the old texts are still there
	assert_eq!(utf8(pool, field_signature), "Ljava/util/List<La;>;");
	Ok(())
}
