use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use jdts_cli::Commands;
use jdts_cli::JdtsCli;
use jdts_cli::OutputFormat;
use jdts_core::FileRewrite;
use jdts_core::JavadocTagEntry;
use jdts_core::JdtsCode;
use jdts_core::JdtsConfig;
use jdts_core::JdtsError;
use jdts_core::RunOptions;
use jdts_core::RunReport;
use jdts_core::ScanOptions;
use jdts_core::TagKind;
use jdts_core::collect_java_files;
use jdts_core::normalize_line_endings;
use jdts_core::read_source;
use jdts_core::run_pipeline;
use owo_colors::OwoColorize;
use serde::Serialize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,cyan) => {
		if color_enabled() {
			format!("{}", $text.cyan())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = r#"# jdts configuration
#
# Each entry in `tags` is applied, in order, to every Javadoc comment in the
# Java files under this directory.
tags:
  - tag: author
    tagValue: "Your Name"
    insertPosition: beginning
    overwrite: never
    allowedLocations: [class, interface, enum, annotationDefinition]
  - tag: since
    tagValue: "1.0.0"
    insertPosition: end
    overwrite: ifLower
    allowedLocations: [class, interface, enum, annotationDefinition, method]

# Map data files to template namespaces. Values are available in `tagValue`
# and `tagDescription` as {{ namespace.key }}.
# data:
#   project: project.yml

# Skip generated sources (gitignore syntax).
# exclude:
#   patterns: ["generated/"]
"#;

fn main() {
	let args = JdtsCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on_cached(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Update { dry_run, diff }) => run_update(&args, dry_run, diff),
		Some(Commands::Check { diff, format }) => run_check(&args, diff, format),
		Some(Commands::List) => run_list(&args),
		None => {
			eprintln!("No subcommand specified. Run `jdts --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<JdtsError>() {
			Ok(jdts_err) => {
				let report: miette::Report = (*jdts_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr. `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_filter = if verbose {
		"jdts_core=debug"
	} else {
		"jdts_core=info"
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init();
}

fn resolve_root(args: &JdtsCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(args: &JdtsCli, root: &Path) -> Result<JdtsConfig, Box<dyn std::error::Error>> {
	Ok(JdtsConfig::load_resolved(root, args.config.as_deref())?)
}

fn run_init(args: &JdtsCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = JdtsConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("jdts.yml");
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created config file: {}", config_path.display());
	println!();
	println!("Next steps:");
	println!(
		"  1. Edit {} to describe the tags you want",
		config_path.display()
	);
	println!("  2. Run `jdts check --diff` to preview the changes");
	println!("  3. Run `jdts update` to rewrite your Javadoc");

	Ok(())
}

fn run_update(args: &JdtsCli, dry_run: bool, show_diff: bool) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(args, &root)?;
	let report = run_pipeline(&root, &config, RunOptions { dry_run })?;
	let accumulator = &report.accumulator;

	if dry_run {
		if report.is_clean() {
			println!("All Javadoc tags are already up to date.");
			return Ok(());
		}

		println!(
			"Dry run: would update {} file(s):",
			accumulator.files_changed
		);
		for rewrite in &report.changed {
			print_rewrite(rewrite, &root, show_diff);
		}
		return Ok(());
	}

	println!(
		"Updated {} file(s), processed {} line(s).",
		accumulator.files_changed, accumulator.total_processed_lines
	);

	if args.verbose || show_diff {
		for rewrite in &report.changed {
			print_rewrite(rewrite, &root, show_diff);
		}
	}

	Ok(())
}

fn print_rewrite(rewrite: &FileRewrite, root: &Path, show_diff: bool) {
	let rel = make_relative(&rewrite.path, root);
	println!(
		"  {rel} ({} inserted, {} overwritten, {} removed)",
		rewrite.changes.inserted, rewrite.changes.overwritten, rewrite.changes.removed
	);
	if show_diff {
		print_diff(&rewrite.original, &rewrite.rewritten);
	}
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOutput {
	ok: bool,
	files_processed: usize,
	lines_processed: u64,
	stale: Vec<StaleFile>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StaleFile {
	file: String,
	inserted: usize,
	overwritten: usize,
	removed: usize,
}

impl CheckOutput {
	fn new(report: &RunReport, root: &Path) -> Self {
		Self {
			ok: report.is_clean(),
			files_processed: report.accumulator.files_processed,
			lines_processed: report.accumulator.total_processed_lines,
			stale: report
				.changed
				.iter()
				.map(|rewrite| {
					StaleFile {
						file: make_relative(&rewrite.path, root),
						inserted: rewrite.changes.inserted,
						overwritten: rewrite.changes.overwritten,
						removed: rewrite.changes.removed,
					}
				})
				.collect(),
		}
	}
}

fn run_check(args: &JdtsCli, show_diff: bool, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(args, &root)?;
	let report = run_pipeline(&root, &config, RunOptions { dry_run: true })?;

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string(&CheckOutput::new(&report, &root))?);
		}
		OutputFormat::Text if report.is_clean() => {
			println!("Check passed: all Javadoc tags are up to date.");
		}
		OutputFormat::Text => {
			eprintln!(
				"Check failed: {} file(s) need updating.",
				report.accumulator.files_changed
			);
			eprintln!();
			for rewrite in &report.changed {
				let rel = make_relative(&rewrite.path, &root);
				eprintln!(
					"  {rel} ({} inserted, {} overwritten, {} removed)",
					rewrite.changes.inserted, rewrite.changes.overwritten, rewrite.changes.removed
				);
				if show_diff {
					print_diff(&rewrite.original, &rewrite.rewritten);
				}
			}
			eprintln!();
			eprintln!("Run `jdts update` to fix.");
		}
	}

	if !report.is_clean() {
		process::exit(1);
	}

	Ok(())
}

fn run_list(args: &JdtsCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = match JdtsConfig::load_resolved(&root, args.config.as_deref()) {
		Ok(config) => config,
		Err(JdtsError::ConfigNotFound { .. }) if args.config.is_none() => JdtsConfig::default(),
		Err(e) => return Err(e.into()),
	};

	let scan_options = ScanOptions::from_config(&config);
	let files = collect_java_files(&root, &scan_options)?;
	let mut block_count = 0;
	let mut file_count = 0;

	for file in &files {
		let content = normalize_line_endings(&read_source(file, scan_options.max_file_size)?);
		let code = JdtsCode::parse(&content);
		if code.blocks().is_empty() {
			continue;
		}

		file_count += 1;
		block_count += code.blocks().len();
		println!("{}", colored!(make_relative(file, &root), bold));
		for block in code.blocks() {
			let tags: Vec<String> = block.tags().entries().iter().map(describe_tag).collect();
			let kind = format!("{:<22}", block.kind());
			let suffix = if block.raw().terminated {
				""
			} else {
				" (unterminated)"
			};
			println!(
				"  {:>5}  {} {}{suffix}",
				block.raw().line,
				colored!(kind, cyan),
				tags.join(", ")
			);
		}
	}

	if block_count == 0 {
		println!("No Javadoc blocks found.");
		return Ok(());
	}

	println!("\n{block_count} Javadoc block(s) in {file_count} file(s)");

	Ok(())
}

fn describe_tag(entry: &JavadocTagEntry) -> String {
	if entry.tag_type == TagKind::None {
		return format!("@{}", entry.value);
	}

	let mut text = format!("{} {}", entry.tag_type, entry.value);
	if !entry.description.is_empty() {
		text.push(' ');
		text.push_str(&entry.description);
	}
	text
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
