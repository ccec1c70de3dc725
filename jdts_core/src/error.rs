use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum JdtsError {
	#[error(transparent)]
	#[diagnostic(code(jdts::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to load config file `{path}`: {reason}")]
	#[diagnostic(
		code(jdts::config_load),
		help("check that the file is valid YAML with a top-level `tags` list")
	)]
	ConfigLoad { path: String, reason: String },

	#[error("no jdts config found in `{root}`")]
	#[diagnostic(
		code(jdts::config_not_found),
		help("create a `jdts.yml` file, run `jdts init`, or pass `--config <path>`")
	)]
	ConfigNotFound { root: String },

	#[error("invalid policy for tag `@{tag}`: {reason}")]
	#[diagnostic(code(jdts::invalid_policy))]
	InvalidPolicy { tag: String, reason: String },

	#[error("failed to read `{path}`: {source}")]
	#[diagnostic(code(jdts::file_read))]
	FileRead {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to write `{path}`: {source}")]
	#[diagnostic(
		code(jdts::file_write),
		help("files processed before this one have already been rewritten")
	)]
	FileWrite {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to load data file `{path}`: {reason}")]
	#[diagnostic(code(jdts::data_file))]
	DataFile { path: String, reason: String },

	#[error("unsupported data file format: `{0}`")]
	#[diagnostic(
		code(jdts::unsupported_format),
		help("supported formats: text, json, toml, yaml, yml")
	)]
	UnsupportedDataFormat(String),

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(jdts::template_render))]
	TemplateRender(String),

	#[error("invalid exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(code(jdts::invalid_exclude_pattern))]
	InvalidExcludePattern { pattern: String, reason: String },

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(jdts::file_too_large),
		help("increase `maxFileSize` in jdts.yml or exclude this file")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(jdts::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

pub type JdtsResult<T> = Result<T, JdtsError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
