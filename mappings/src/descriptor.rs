//! Conversion of java source type names into JVM descriptors.
//!
//! Proguard mapping files write types like `int[]` or `java.lang.String`, the class file uses `[I` and
//! `Ljava/lang/String;` instead.

/// Encodes a java source type name as a field descriptor.
///
/// Primitive types and `void` get their one letter code, every `[]` at the end adds a leading `[`, and everything
/// else is taken to be a binary class name.
/// ```
/// use mappings::descriptor::encode_type;
/// assert_eq!(encode_type("int[]"), "[I");
/// assert_eq!(encode_type("java.lang.String"), "Ljava/lang/String;");
/// ```
pub fn encode_type(s: &str) -> String {
	let mut element = s;
	let mut dimensions = 0;
	while let Some(inner) = element.strip_suffix("[]") {
		element = inner;
		dimensions += 1;
	}

	let mut desc = "[".repeat(dimensions);
	match element {
		"byte" => desc.push('B'),
		"char" => desc.push('C'),
		"double" => desc.push('D'),
		"float" => desc.push('F'),
		"int" => desc.push('I'),
		"short" => desc.push('S'),
		"long" => desc.push('J'),
		"boolean" => desc.push('Z'),
		"void" => desc.push('V'),
		class => {
			desc.push('L');
			desc.extend(class.chars().map(|ch| if ch == '.' { '/' } else { ch }));
			desc.push(';');
		},
	}
	desc
}

/// Encodes a method descriptor from the return type and the argument types, all as java source type names.
pub fn encode_method_type(return_type: &str, argument_types: &[&str]) -> String {
	let mut desc = String::from("(");
	for argument_type in argument_types {
		desc.push_str(&encode_type(argument_type));
	}
	desc.push(')');
	desc.push_str(&encode_type(return_type));
	desc
}
