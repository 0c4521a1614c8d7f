use std::borrow::Cow;
use indexmap::IndexMap;

/// Replaces the class names in a descriptor or generic signature.
///
/// A class name starts after an `L` and ends before the next `;`, `<` or `.`. If `class_names` has an entry for it,
/// it gets replaced by that, otherwise it's kept. Everything outside of class names is copied as is.
///
/// Gives back the input if nothing changed.
/// ```
/// use indexmap::IndexMap;
/// use remap::map_signature;
///
/// let class_names = IndexMap::from([("a/B".to_owned(), "x/Y".to_owned())]);
/// assert_eq!(map_signature("(La/B;I)La/B;", &class_names), "(Lx/Y;I)Lx/Y;");
/// ```
pub fn map_signature<'s>(signature: &'s str, class_names: &IndexMap<String, String>) -> Cow<'s, str> {
	if !signature.contains('L') {
		return Cow::Borrowed(signature);
	}

	let mut mapped = String::with_capacity(signature.len());
	let mut changed = false;

	let mut rest = signature;
	while let Some(start) = rest.find('L') {
		let (before, after) = rest.split_at(start + 1);
		mapped.push_str(before);

		// a name without end is kept as it is
		let Some(end) = after.find(|ch: char| matches!(ch, ';' | '<' | '.')) else {
			rest = after;
			break;
		};

		let (class_name, after) = after.split_at(end);
		match class_names.get(class_name) {
			Some(new_name) => {
				changed |= new_name != class_name;
				mapped.push_str(new_name);
			},
			None => mapped.push_str(class_name),
		}
		rest = after;
	}
	mapped.push_str(rest);

	if changed {
		Cow::Owned(mapped)
	} else {
		Cow::Borrowed(signature)
	}
}
