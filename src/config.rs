//! Build configuration for the graph pipeline.
//!
//! A single [`BuildConfig`] value is passed into the builder and resolver.
//! It can be parsed from a partial JSON document; any field left out keeps
//! its default.

use std::collections::{BTreeSet, HashMap};

use log::warn;
use serde::Deserialize;

use crate::graph::GraphError;

/// Extension to language-identifier mapping plus resolver tuning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
	/// File extension (without dot) to language identifier.
	pub languages: HashMap<String, String>,
	/// Languages for which imports are extracted. Files in other languages
	/// still become nodes but contribute no edges.
	pub supported_languages: BTreeSet<String>,
	/// Suffixes appended to a candidate path when probing for a file.
	pub resolve_suffixes: Vec<String>,
	/// Conventional source directory probed after the project root.
	pub source_dir: String,
}

const LANGUAGES: &[(&str, &str)] = &[
	("ts", "typescript"),
	("mts", "typescript"),
	("cts", "typescript"),
	("tsx", "typescriptreact"),
	("js", "javascript"),
	("mjs", "javascript"),
	("cjs", "javascript"),
	("jsx", "javascriptreact"),
	("vue", "vue"),
	("svelte", "svelte"),
	("py", "python"),
	("go", "go"),
	("rs", "rust"),
	("java", "java"),
	("kt", "kotlin"),
	("scala", "scala"),
	("cs", "csharp"),
	("c", "c"),
	("h", "c"),
	("cpp", "cpp"),
	("cc", "cpp"),
	("cxx", "cpp"),
	("hpp", "cpp"),
	("rb", "ruby"),
	("php", "php"),
	("lua", "lua"),
	("dart", "dart"),
	("swift", "swift"),
	("css", "css"),
	("scss", "scss"),
	("less", "less"),
];

const SUFFIXES: &[&str] = &[
	".ts",
	".tsx",
	".d.ts",
	".js",
	".jsx",
	".mjs",
	".vue",
	".svelte",
	".py",
	".go",
	".rs",
	".java",
	".kt",
	".cs",
	".c",
	".h",
	".cpp",
	".hpp",
	".rb",
	".php",
	".lua",
	".dart",
	".css",
	".scss",
	"/index.ts",
	"/index.tsx",
	"/index.js",
	"/index.jsx",
	"/mod.rs",
	"/__init__.py",
];

impl Default for BuildConfig {
	fn default() -> Self {
		let languages: HashMap<String, String> = LANGUAGES
			.iter()
			.map(|(ext, lang)| (ext.to_string(), lang.to_string()))
			.collect();
		// Swift imports are whole modules, never files.
		let supported_languages = languages
			.values()
			.filter(|lang| lang.as_str() != "swift")
			.cloned()
			.collect();
		Self {
			languages,
			supported_languages,
			resolve_suffixes: SUFFIXES.iter().map(|s| s.to_string()).collect(),
			source_dir: "src".to_string(),
		}
	}
}

impl BuildConfig {
	/// Parse a (possibly partial) JSON configuration.
	pub fn from_json(text: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(text)?)
	}

	/// Parse a JSON configuration, falling back to the defaults on any error.
	pub fn load_or_default(text: &str) -> Self {
		Self::from_json(text).unwrap_or_else(|e| {
			warn!("code-territory: invalid configuration, using defaults: {}", e);
			Self::default()
		})
	}

	/// Language identifier for a file extension, if mapped.
	pub fn language_for_extension(&self, ext: &str) -> Option<&str> {
		self.languages
			.get(&ext.to_ascii_lowercase())
			.map(String::as_str)
	}

	/// Whether imports are extracted for `language`.
	pub fn is_supported(&self, language: &str) -> bool {
		self.supported_languages.contains(language)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let cfg = BuildConfig::from_json(r#"{ "sourceDir": "lib" }"#).unwrap();
		assert_eq!(cfg.source_dir, "lib");
		assert_eq!(cfg.language_for_extension("TS"), Some("typescript"));
		assert!(cfg.is_supported("go"));
		assert!(!cfg.is_supported("swift"));
	}

	#[test]
	fn invalid_json_falls_back() {
		let cfg = BuildConfig::load_or_default("{ not json");
		assert_eq!(cfg.source_dir, "src");
		assert!(cfg.resolve_suffixes.iter().any(|s| s == "/index.ts"));
	}
}
