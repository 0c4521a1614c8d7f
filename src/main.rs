use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info, LevelFilter};
use mappings::{Dialect, Mappings};
use remap::{batch, Hierarchy, Remapper};

mod files;

fn main() -> Result<()> {
	let cli: Cli = Cli::parse();

	setup_logger(cli.verbose)?;

	match cli.command {
		Command::Remap { mappings: mappings_path, format, input, output, copy_resources, threads } => {
			let workers = threads.unwrap_or_else(batch::default_workers).max(1);
			remap_directory(&mappings_path, format.into(), &input, &output, copy_resources, workers)
		},
		Command::Check { mappings: mappings_path, format } => {
			let classes = mappings::parse_file(format.into(), &mappings_path)?;
			println!("{}", classes.len());
			Ok(())
		},
	}
}

fn setup_logger(verbose: bool) -> Result<()> {
	let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()
		.with_context(|| anyhow!("failed to set up logging"))
}

fn remap_directory(mappings_path: &Path, dialect: Dialect, input: &Path, output: &Path, copy_resources: bool, workers: usize) -> Result<()> {
	if !input.is_dir() {
		bail!("input directory {input:?} doesn't exist");
	}

	info!("parsing obfuscation mapping...");
	let mappings = Mappings::new(mappings::parse_file(dialect, mappings_path)?);
	debug!("read mappings for {} classes", mappings.len());

	// also reads all the class files
	info!("building class hierarchy...");
	let input_files = files::scan(input)?;
	let hierarchy = Hierarchy::from_classes(input_files.classes.iter().map(|(_, class)| class))?;
	debug!("read {} class files, {} of them have parents", input_files.classes.len(), hierarchy.len());

	let mappings = remap::resolve_collisions(&mappings, input_files.classes.iter().map(|(_, class)| class))?;

	if copy_resources {
		let copied = files::copy_resources(input, output, &input_files.resources);
		info!("copied {copied} of {} other files", input_files.resources.len());
	}

	info!("deobfuscating...");
	let start = Instant::now();
	info!("number of worker threads: {workers}");

	let remapper = Remapper::new(&mappings, &hierarchy);
	let report = batch::run(input_files.classes, workers, |(path, mut class)| {
		remapper.remap_class(&mut class)
			.with_context(|| anyhow!("failed to remap class file {path:?}"))?;
		files::write_class(output, &class)
			.with_context(|| anyhow!("failed to write remapped class file {path:?}"))
	});

	info!("done in {}ms", start.elapsed().as_millis());
	info!("{} classes remapped, {} failed", report.processed, report.failed);

	Ok(())
}

#[derive(Debug, Parser)]
#[command(about = "Renames obfuscated class files back to their original names, using an obfuscation mapping")]
struct Cli {
	/// Be verbose.
	#[arg(short = 'v', long = "verbose", global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Remaps all class files in a directory
	Remap {
		/// The obfuscation mapping file
		#[arg(short = 'm', long = "mappings")]
		mappings: PathBuf,

		/// The format of the mapping file
		#[arg(short = 'f', long = "format", value_enum, default_value_t)]
		format: MappingFormat,

		/// The directory with the class files
		#[arg(short = 'i', long = "input")]
		input: PathBuf,

		/// The directory to write the remapped class files to
		#[arg(short = 'o', long = "output")]
		output: PathBuf,

		/// Also copy all other files to the output directory
		#[arg(long = "copy-resources")]
		copy_resources: bool,

		/// The number of worker threads, the default is the number of cores
		#[arg(short = 't', long = "threads")]
		threads: Option<usize>,
	},
	/// Reads a mapping file and prints the number of classes in it
	Check {
		/// The obfuscation mapping file
		#[arg(short = 'm', long = "mappings")]
		mappings: PathBuf,

		/// The format of the mapping file
		#[arg(short = 'f', long = "format", value_enum, default_value_t)]
		format: MappingFormat,
	},
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum MappingFormat {
	#[default]
	/// A `mapping.txt` as written by Proguard.
	Proguard,
	/// A `.srg` file.
	Srg,
}

impl Display for MappingFormat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		std::fmt::Debug::fmt(self, f)
	}
}

impl From<MappingFormat> for Dialect {
	fn from(value: MappingFormat) -> Dialect {
		match value {
			MappingFormat::Proguard => Dialect::Proguard,
			MappingFormat::Srg => Dialect::Srg,
		}
	}
}
