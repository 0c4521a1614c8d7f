//! Reading the input directory and writing the output directory.

use std::path::{Component, Path, PathBuf};
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, error};
use raw_class_file::ClassFile;
use walkdir::WalkDir;

const CLASS_EXTENSION: &str = "class";

/// All files of an input directory.
#[derive(Debug)]
pub(crate) struct InputFiles {
	/// The class files, already read, together with the path they were read from.
	pub(crate) classes: Vec<(PathBuf, ClassFile)>,
	/// Everything that isn't a class file.
	pub(crate) resources: Vec<PathBuf>,
}

/// Walks the directory `input` and reads all class files in it.
///
/// Fails if any class file can't be read, since the class hierarchy would be incomplete otherwise.
pub(crate) fn scan(input: &Path) -> Result<InputFiles> {
	let paths: Vec<PathBuf> = WalkDir::new(input)
		.sort_by_file_name() // make it deterministic
		.into_iter()
		.filter(|res| res.as_ref().is_ok_and(|entry| !entry.file_type().is_dir()))
		.map(|res| res.map(|entry| entry.into_path()))
		.collect::<Result<_, walkdir::Error>>()
		.with_context(|| anyhow!("failed to get files (recursively) for input dir {input:?}"))?;

	let mut classes = Vec::new();
	let mut resources = Vec::new();
	for path in paths {
		if path.extension().is_some_and(|ex| ex == CLASS_EXTENSION) {
			let class = ClassFile::read_from_path(&path)
				.with_context(|| anyhow!("failed to read class file {path:?}"))?;
			classes.push((path, class));
		} else {
			resources.push(path);
		}
	}

	debug!("found {} class files and {} other files in {input:?}", classes.len(), resources.len());

	Ok(InputFiles { classes, resources })
}

/// Copies the `resources` from `input` to the same relative location in `output`.
///
/// A file that fails to copy is logged and skipped. Returns how many files got copied.
pub(crate) fn copy_resources(input: &Path, output: &Path, resources: &[PathBuf]) -> usize {
	resources.iter()
		.filter(|path| match copy_resource(input, output, path) {
			Ok(()) => true,
			Err(e) => {
				error!("{e:#}");
				false
			},
		})
		.count()
}

fn copy_resource(input: &Path, output: &Path, path: &Path) -> Result<()> {
	let relative = path.strip_prefix(input)
		.with_context(|| anyhow!("file {path:?} is not inside of input dir {input:?}"))?;
	let target = output.join(relative);

	if let Some(parent) = target.parent() {
		std::fs::create_dir_all(parent)
			.with_context(|| anyhow!("failed to create parent directories for file {target:?}"))?;
	}

	std::fs::copy(path, &target)
		.with_context(|| anyhow!("failed to copy file {path:?} to {target:?}"))?;
	Ok(())
}

/// The path a class with the given internal name is written to, like `<output>/com/example/Main.class`.
///
/// Fails for names that would end up outside of `output`.
pub(crate) fn output_path(output: &Path, class_name: &str) -> Result<PathBuf> {
	if class_name.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
		bail!("class name {class_name:?} can't be used as a path");
	}

	let relative = Path::new(class_name);
	if !relative.components().all(|component| matches!(component, Component::Normal(_))) {
		bail!("class name {class_name:?} can't be used as a path");
	}

	let mut target = output.join(relative);
	let file_name = format!("{}.{CLASS_EXTENSION}", target.file_name().and_then(|name| name.to_str()).unwrap_or_default());
	target.set_file_name(file_name);
	Ok(target)
}

/// Writes a class file into `output`, at the place its name says.
pub(crate) fn write_class(output: &Path, class: &ClassFile) -> Result<()> {
	let name = remap::class_name(class)?;
	let target = output_path(output, &name)?;

	if let Some(parent) = target.parent() {
		std::fs::create_dir_all(parent)
			.with_context(|| anyhow!("failed to create parent directories for class file {target:?}"))?;
	}

	class.write_to_path(&target)
		.with_context(|| anyhow!("failed to write class file {target:?}"))
}
