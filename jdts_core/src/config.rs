use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::DeclarationKind;
use crate::JdtsError;
use crate::JdtsResult;
use crate::TagKind;
use crate::tags::format_tag_line;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 4] =
	["jdts.yml", "jdts.yaml", ".jdts.yml", ".config/jdts.yml"];

/// Where a newly inserted tag line goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsertPosition {
	/// Before the first existing tag line, or after the description when the
	/// block has no tags yet.
	Beginning,
	/// At the end of the block.
	End,
	/// Leave existing tags where they are. New tags go to the end.
	Preserve,
	/// Unset. New tags go to the end.
	#[default]
	None,
}

/// When an existing tag's value is replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverwriteRule {
	Never,
	Always,
	/// Replace only when the existing value is a lower version than the
	/// configured one. Applies to version-bearing tags only.
	IfLower,
	/// Unset. Behaves like [`OverwriteRule::Never`].
	#[default]
	None,
}

/// A configured rule for one Javadoc tag.
///
/// ```yaml
/// - tag: since
///   tagValue: "{{ project.version }}"
///   insertPosition: end
///   overwrite: ifLower
///   allowedLocations: [class, interface, enum, method]
///   removeIfMisplaced: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPolicy {
	pub tag: TagKind,
	#[serde(default, deserialize_with = "null_as_default")]
	pub tag_value: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub tag_description: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub insert_position: InsertPosition,
	#[serde(default, deserialize_with = "null_as_default")]
	pub overwrite: OverwriteRule,
	/// Declaration kinds this tag belongs on. Empty means every Javadoc
	/// target kind.
	#[serde(default, deserialize_with = "null_as_default")]
	pub allowed_locations: Vec<DeclarationKind>,
	/// Delete existing occurrences of this tag found on a kind it does not
	/// belong on.
	#[serde(default, deserialize_with = "null_as_default")]
	pub remove_if_misplaced: bool,
}

impl TagPolicy {
	pub fn tag(&self) -> &TagKind {
		&self.tag
	}

	pub fn tag_value(&self) -> &str {
		&self.tag_value
	}

	pub fn tag_description(&self) -> &str {
		&self.tag_description
	}

	pub fn insert_position(&self) -> InsertPosition {
		self.insert_position
	}

	pub fn overwrite(&self) -> OverwriteRule {
		self.overwrite
	}

	pub fn remove_if_misplaced(&self) -> bool {
		self.remove_if_misplaced
	}

	/// Whether this tag belongs on a declaration of `kind`.
	pub fn is_properly_placed(&self, kind: DeclarationKind) -> bool {
		if self.allowed_locations.is_empty() {
			kind.is_javadoc_target()
		} else {
			self.allowed_locations.contains(&kind)
		}
	}

	/// Format this policy's tag as a comment line using `prefix` (e.g. `" * "`).
	pub fn format_line(&self, prefix: &str) -> String {
		format_tag_line(prefix, &self.tag, &self.tag_value, &self.tag_description)
	}

	fn validate(&self) -> JdtsResult<()> {
		if self.tag == TagKind::None {
			return Err(JdtsError::InvalidPolicy {
				tag: String::new(),
				reason: "the tag name must not be empty".to_string(),
			});
		}

		// A bare tag line re-parses as a degenerate tag, which would be
		// inserted again on every run.
		if self.tag_value.trim().is_empty() {
			return Err(JdtsError::InvalidPolicy {
				tag: self.tag.name().to_string(),
				reason: "`tagValue` must not be empty".to_string(),
			});
		}

		if self.tag_value.contains('\n') || self.tag_description.contains('\n') {
			return Err(JdtsError::InvalidPolicy {
				tag: self.tag.name().to_string(),
				reason: "`tagValue` and `tagDescription` must be single-line".to_string(),
			});
		}

		Ok(())
	}
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Data source entry for a `data` namespace.
///
/// ```yaml
/// data:
///   project: project.yml
///   release: { path: release-info, format: json }
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum DataSource {
	Path(PathBuf),
	Typed(TypedDataSource),
}

impl DataSource {
	pub fn path(&self) -> &Path {
		match self {
			Self::Path(path) => path.as_path(),
			Self::Typed(typed) => typed.path.as_path(),
		}
	}

	/// The explicit format, falling back to the file extension.
	pub fn format(&self) -> String {
		match self {
			Self::Path(path) => {
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("")
					.to_ascii_lowercase()
			}
			Self::Typed(typed) => typed.format.trim().to_ascii_lowercase(),
		}
	}
}

/// Typed data source configuration for `data` entries.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct TypedDataSource {
	pub path: PathBuf,
	pub format: String,
}

/// Configuration for excluding files and directories from scanning.
///
/// Patterns follow gitignore syntax and are applied on top of any
/// `.gitignore` rules (unless `disableGitignore` is set).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Configuration loaded from a `jdts.yml` file.
///
/// ```yaml
/// tags:
///   - tag: author
///     tagValue: "{{ project.team }}"
///     insertPosition: beginning
///     overwrite: never
///     allowedLocations: [class, interface, enum, annotationDefinition]
///   - tag: param
///     tagValue: TODO
///     allowedLocations: [method]
///     removeIfMisplaced: true
///
/// data:
///   project: project.yml
///
/// exclude:
///   patterns: ["generated/"]
///
/// maxFileSize: 10485760
/// disableGitignore: false
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdtsConfig {
	/// Tag policies, applied to each block in this order.
	#[serde(default)]
	pub tags: Vec<TagPolicy>,
	/// Map of namespace name to a data file used when rendering templated
	/// `tagValue` and `tagDescription` strings.
	#[serde(default)]
	pub data: HashMap<String, DataSource>,
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Maximum size in bytes of a Java file to process.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl Default for JdtsConfig {
	fn default() -> Self {
		Self {
			tags: Vec::new(),
			data: HashMap::new(),
			exclude: ExcludeConfig::default(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

impl JdtsConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is none. Templates are not rendered.
	pub fn load(root: &Path) -> JdtsResult<Option<JdtsConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_from_path(&config_path).map(Some)
	}

	/// Parse the config file at `path`. Templates are not rendered.
	pub fn load_from_path(path: &Path) -> JdtsResult<JdtsConfig> {
		let content = std::fs::read_to_string(path).map_err(|e| {
			JdtsError::ConfigLoad {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})?;

		Self::from_yaml_str(&content, &path.display().to_string())
	}

	pub fn from_yaml_str(content: &str, path_display: &str) -> JdtsResult<JdtsConfig> {
		serde_yaml_ng::from_str(content).map_err(|e| {
			JdtsError::ConfigLoad {
				path: path_display.to_string(),
				reason: e.to_string(),
			}
		})
	}

	/// Load, render and validate the config for a run. `explicit` overrides
	/// discovery under `root`.
	pub fn load_resolved(root: &Path, explicit: Option<&Path>) -> JdtsResult<JdtsConfig> {
		let path = match explicit {
			Some(path) => path.to_path_buf(),
			None => {
				Self::resolve_path(root).ok_or_else(|| {
					JdtsError::ConfigNotFound {
						root: root.display().to_string(),
					}
				})?
			}
		};

		let mut config = Self::load_from_path(&path)?;
		let data = config.load_data(root)?;
		config.render_templates(&data)?;
		config.validate()?;

		tracing::debug!(
			path = %path.display(),
			policies = config.tags.len(),
			"loaded jdts config"
		);

		Ok(config)
	}

	/// Tag policies in application order.
	pub fn policies(&self) -> &[TagPolicy] {
		&self.tags
	}

	/// Read each data file and parse it into a `serde_json::Value` keyed by
	/// namespace.
	pub fn load_data(&self, root: &Path) -> JdtsResult<HashMap<String, serde_json::Value>> {
		let mut data = HashMap::new();

		let mut namespaces: Vec<_> = self.data.iter().collect();
		namespaces.sort_by(|a, b| a.0.cmp(b.0));

		for (namespace, source) in namespaces {
			let rel_path = source.path();
			let content = std::fs::read_to_string(root.join(rel_path)).map_err(|e| {
				JdtsError::DataFile {
					path: rel_path.display().to_string(),
					reason: e.to_string(),
				}
			})?;
			let value = parse_data_file(&content, &source.format(), &rel_path.display().to_string())?;
			data.insert(namespace.clone(), value);
		}

		Ok(data)
	}

	/// Render templated `tagValue` and `tagDescription` strings in place.
	#[allow(clippy::implicit_hasher)]
	pub fn render_templates(&mut self, data: &HashMap<String, serde_json::Value>) -> JdtsResult<()> {
		for policy in &mut self.tags {
			policy.tag_value = render_template(&policy.tag_value, data)?;
			policy.tag_description = render_template(&policy.tag_description, data)?;
		}
		Ok(())
	}

	pub fn validate(&self) -> JdtsResult<()> {
		self.tags.iter().try_for_each(TagPolicy::validate)
	}
}

/// Render a templated string through minijinja using the given data
/// context. Strings without template syntax are returned unchanged.
/// Undefined variables are an error.
#[allow(clippy::implicit_hasher)]
pub fn render_template(
	content: &str,
	data: &HashMap<String, serde_json::Value>,
) -> JdtsResult<String> {
	if !has_template_syntax(content) {
		return Ok(content.to_string());
	}

	let mut env = minijinja::Environment::new();
	env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
	env.add_template("__inline__", content)
		.map_err(|e| JdtsError::TemplateRender(e.to_string()))?;

	let template = env
		.get_template("__inline__")
		.map_err(|e| JdtsError::TemplateRender(e.to_string()))?;

	let ctx = minijinja::Value::from_serialize(data);
	template
		.render(ctx)
		.map(|rendered| rendered.trim().to_string())
		.map_err(|e| JdtsError::TemplateRender(e.to_string()))
}

fn has_template_syntax(content: &str) -> bool {
	content.contains("{{") || content.contains("{%") || content.contains("{#")
}

/// Parse a data file's content into a `serde_json::Value` based on its
/// format.
fn parse_data_file(
	content: &str,
	format: &str,
	path_display: &str,
) -> JdtsResult<serde_json::Value> {
	match format {
		"text" | "txt" => Ok(serde_json::Value::String(content.trim().to_string())),
		"json" => {
			serde_json::from_str(content).map_err(|e| {
				JdtsError::DataFile {
					path: path_display.to_string(),
					reason: e.to_string(),
				}
			})
		}
		"toml" => {
			let toml_value: toml::Value = toml::from_str(content).map_err(|e| {
				JdtsError::DataFile {
					path: path_display.to_string(),
					reason: e.to_string(),
				}
			})?;
			Ok(toml_to_json(toml_value))
		}
		"yaml" | "yml" => {
			serde_yaml_ng::from_str(content).map_err(|e| {
				JdtsError::DataFile {
					path: path_display.to_string(),
					reason: e.to_string(),
				}
			})
		}
		other => Err(JdtsError::UnsupportedDataFormat(other.to_string())),
	}
}

/// Convert a `toml::Value` to a `serde_json::Value`. Non-finite floats
/// become strings.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
	match value {
		toml::Value::String(s) => serde_json::Value::String(s),
		toml::Value::Integer(i) => serde_json::Value::Number(i.into()),
		toml::Value::Float(f) => {
			serde_json::Number::from_f64(f)
				.map_or_else(|| serde_json::Value::String(f.to_string()), serde_json::Value::Number)
		}
		toml::Value::Boolean(b) => serde_json::Value::Bool(b),
		toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
		toml::Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect()),
		toml::Value::Table(table) => {
			serde_json::Value::Object(
				table
					.into_iter()
					.map(|(k, v)| (k, toml_to_json(v)))
					.collect(),
			)
		}
	}
}
