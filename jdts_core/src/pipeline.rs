use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use serde::Serialize;

use crate::BlockChanges;
use crate::JdtsCode;
use crate::JdtsConfig;
use crate::JdtsError;
use crate::JdtsResult;
use crate::config::DEFAULT_MAX_FILE_SIZE;

/// Options for controlling which files are discovered.
///
/// Use [`ScanOptions::default()`] for sensible defaults or
/// [`ScanOptions::from_config`] to construct from a [`JdtsConfig`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Maximum file size to process in bytes.
	pub max_file_size: u64,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			exclude_patterns: Vec::new(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

impl ScanOptions {
	pub fn from_config(config: &JdtsConfig) -> Self {
		Self {
			exclude_patterns: config.exclude.patterns.clone(),
			max_file_size: config.max_file_size,
			disable_gitignore: config.disable_gitignore,
		}
	}
}

/// Options for a single batch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
	/// Compute rewrites without writing any file.
	pub dry_run: bool,
}

/// Running totals for a batch.
#[derive(Debug, Clone, Serialize)]
pub struct FileAccumulator {
	pub root: PathBuf,
	pub files_processed: usize,
	pub files_changed: usize,
	/// Sum of the line counts of every rewritten file.
	pub total_processed_lines: u64,
	pub changes: BlockChanges,
}

impl FileAccumulator {
	pub fn new(root: &Path) -> Self {
		Self {
			root: root.to_path_buf(),
			files_processed: 0,
			files_changed: 0,
			total_processed_lines: 0,
			changes: BlockChanges::default(),
		}
	}

	fn record(&mut self, rewrite: &FileRewrite) {
		self.files_processed += 1;
		self.total_processed_lines += rewrite.line_count();
		self.changes += rewrite.changes;
		if rewrite.is_changed() {
			self.files_changed += 1;
		}
	}
}

/// The result of rewriting one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileRewrite {
	pub path: PathBuf,
	pub original: String,
	pub rewritten: String,
	pub changes: BlockChanges,
}

impl FileRewrite {
	pub fn is_changed(&self) -> bool {
		self.original != self.rewritten
	}

	pub fn line_count(&self) -> u64 {
		self.rewritten.lines().count() as u64
	}
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
	pub accumulator: FileAccumulator,
	/// Files whose content changed, in processing order.
	pub changed: Vec<FileRewrite>,
}

impl RunReport {
	pub fn is_clean(&self) -> bool {
		self.changed.is_empty()
	}
}

/// Rewrite every Java file under `root`.
///
/// Files are processed one at a time in sorted path order. The first read,
/// write or size error stops the batch; files already written stay
/// written.
pub fn run_pipeline(root: &Path, config: &JdtsConfig, options: RunOptions) -> JdtsResult<RunReport> {
	let scan_options = ScanOptions::from_config(config);
	let files = collect_java_files(root, &scan_options)?;
	tracing::info!(root = %root.display(), files = files.len(), dry_run = options.dry_run, "processing java sources");

	let mut accumulator = FileAccumulator::new(root);
	let mut changed = Vec::new();

	for file in files {
		let rewrite = process_file(&file, config, scan_options.max_file_size)?;
		accumulator.record(&rewrite);

		if rewrite.is_changed() {
			if !options.dry_run {
				write_file(&rewrite)?;
			}
			changed.push(rewrite);
		}
	}

	tracing::info!(
		processed = accumulator.files_processed,
		changed = accumulator.files_changed,
		lines = accumulator.total_processed_lines,
		"finished processing"
	);

	Ok(RunReport {
		accumulator,
		changed,
	})
}

/// Read a Java source file, enforcing the size limit. Errors name the file.
pub fn read_source(path: &Path, max_file_size: u64) -> JdtsResult<String> {
	let read_error = |source| {
		JdtsError::FileRead {
			path: path.display().to_string(),
			source,
		}
	};

	let size = std::fs::metadata(path).map_err(read_error)?.len();
	if size > max_file_size {
		return Err(JdtsError::FileTooLarge {
			path: path.display().to_string(),
			size,
			limit: max_file_size,
		});
	}

	std::fs::read_to_string(path).map_err(read_error)
}

/// Read one file and compute its rewritten content.
pub fn process_file(path: &Path, config: &JdtsConfig, max_file_size: u64) -> JdtsResult<FileRewrite> {
	let original = read_source(path, max_file_size)?;
	let crlf = original.contains("\r\n");
	let content = normalize_line_endings(&original);

	let mut code = JdtsCode::parse(&content);
	code.apply_policies(config.policies());
	let mut rewritten = code.render();
	if crlf {
		rewritten = rewritten.replace('\n', "\r\n");
	}

	let changes = code.changes();
	tracing::debug!(path = %path.display(), blocks = code.blocks().len(), edits = changes.total(), "processed file");

	Ok(FileRewrite {
		path: path.to_path_buf(),
		original,
		rewritten,
		changes,
	})
}

pub(crate) fn write_file(rewrite: &FileRewrite) -> JdtsResult<()> {
	std::fs::write(&rewrite.path, &rewrite.rewritten).map_err(|source| {
		JdtsError::FileWrite {
			path: rewrite.path.display().to_string(),
			source,
		}
	})
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n")
	} else {
		content.to_string()
	}
}

/// Build a `Gitignore` matcher from the configured exclude patterns.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> JdtsResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			JdtsError::InvalidExcludePattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}
	builder.build().map_err(|e| {
		JdtsError::InvalidExcludePattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

/// Collect all `.java` files under `root`, sorted by path.
pub fn collect_java_files(root: &Path, options: &ScanOptions) -> JdtsResult<Vec<PathBuf>> {
	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();

	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let custom_exclude = build_exclude_matcher(root, &options.exclude_patterns)?;

	walk_dir(root, &mut files, &gitignore, &custom_exclude, &mut visited_dirs)?;
	files.sort();
	Ok(files)
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn walk_dir(
	dir: &Path,
	files: &mut Vec<PathBuf>,
	gitignore: &Gitignore,
	custom_exclude: &Gitignore,
	visited_dirs: &mut HashSet<PathBuf>,
) -> JdtsResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Err(JdtsError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		let is_dir = path.is_dir();

		if is_dir
			&& path
				.file_name()
				.and_then(|n| n.to_str())
				.is_some_and(is_ignored_directory_name)
		{
			continue;
		}

		if gitignore.matched(&path, is_dir).is_ignore()
			|| custom_exclude.matched(&path, is_dir).is_ignore()
		{
			continue;
		}

		if is_dir {
			walk_dir(&path, files, gitignore, custom_exclude, visited_dirs)?;
		} else if is_java_file(&path) {
			files.push(path);
		}
	}

	Ok(())
}

fn is_java_file(path: &Path) -> bool {
	path.extension().and_then(|e| e.to_str()) == Some("java")
}
