//! Heuristic import resolution.
//!
//! A raw import string is turned into concrete files through ordered
//! strategies; the first one producing a nonempty result wins:
//!
//! 1. relative to the importing file (only for `.`-prefixed imports),
//! 2. relative to the project root,
//! 3. relative to the conventional source directory under the root,
//! 4. fuzzy suffix match: drop leading module segments until something exists.
//!
//! Every strategy uses the same probe: the literal path, then the literal path
//! with each configured suffix, then (if it names a directory) every known
//! file directly inside that directory. Existence is answered by
//! [`KnownFiles`], so resolution never touches file contents.

use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::config::BuildConfig;

/// Index over the known file set answering file/directory existence.
#[derive(Clone, Debug, Default)]
pub struct KnownFiles {
	files: HashSet<PathBuf>,
	children: HashMap<PathBuf, Vec<PathBuf>>,
	dirs: HashSet<PathBuf>,
}

impl KnownFiles {
	pub fn new<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Self {
		let mut index = Self::default();
		for path in paths {
			let path = normalize(path);
			if let Some(parent) = path.parent() {
				index
					.children
					.entry(parent.to_path_buf())
					.or_default()
					.push(path.clone());
				for dir in parent.ancestors() {
					if !index.dirs.insert(dir.to_path_buf()) {
						break;
					}
				}
			}
			index.files.insert(path);
		}
		for list in index.children.values_mut() {
			list.sort();
			list.dedup();
		}
		index
	}

	pub fn is_file(&self, path: &Path) -> bool {
		self.files.contains(path)
	}

	pub fn is_dir(&self, path: &Path) -> bool {
		self.dirs.contains(path)
	}

	/// Known files whose direct parent is `dir`, sorted.
	pub fn children_of(&self, dir: &Path) -> &[PathBuf] {
		self.children.get(dir).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn len(&self) -> usize {
		self.files.len()
	}

	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}
}

/// Lexically normalize a path: drop `.` components and fold `..` into its parent.
pub fn normalize(path: &Path) -> PathBuf {
	let mut out = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				if !out.pop() {
					out.push("..");
				}
			}
			other => out.push(other.as_os_str()),
		}
	}
	out
}

/// Rewrite Python-style dotted relative modules (`.utils`, `..pkg.mod`) as paths.
fn expand_dotted_relative(import: &str) -> String {
	if !import.starts_with('.') || import.contains('/') {
		return import.to_string();
	}
	let dots = import.chars().take_while(|&c| c == '.').count();
	let rest = &import[dots..];
	if rest.is_empty() {
		return import.to_string();
	}
	let prefix = if dots == 1 {
		"./".to_string()
	} else {
		"../".repeat(dots - 1)
	};
	format!("{}{}", prefix, rest.replace('.', "/"))
}

/// Resolves raw import strings against a known file set.
pub struct ImportResolver<'a> {
	root: PathBuf,
	known: &'a KnownFiles,
	config: &'a BuildConfig,
}

impl<'a> ImportResolver<'a> {
	pub fn new(root: &Path, known: &'a KnownFiles, config: &'a BuildConfig) -> Self {
		Self {
			root: normalize(root),
			known,
			config,
		}
	}

	/// Files `import` (written in `source`) refers to. Empty when nothing matches.
	pub fn resolve(&self, import: &str, source: &Path) -> Vec<PathBuf> {
		let import = expand_dotted_relative(import.trim());
		if import.is_empty() {
			return Vec::new();
		}

		if import.starts_with('.') {
			if let Some(dir) = source.parent() {
				let hits = self.probe(&dir.join(&import));
				if !hits.is_empty() {
					return hits;
				}
			}
		}

		let hits = self.probe(&self.root.join(&import));
		if !hits.is_empty() {
			return hits;
		}

		let hits = self.probe(&self.root.join(&self.config.source_dir).join(&import));
		if !hits.is_empty() {
			return hits;
		}

		let hits = self.fuzzy(&import);
		if hits.is_empty() {
			debug!("code-territory: unresolved import {:?} in {}", import, source.display());
		}
		hits
	}

	/// Literal file, then suffixed file, then direct children of a directory.
	fn probe(&self, candidate: &Path) -> Vec<PathBuf> {
		let candidate = normalize(candidate);
		if self.known.is_file(&candidate) {
			return vec![candidate];
		}
		for suffix in &self.config.resolve_suffixes {
			let mut name: OsString = candidate.clone().into_os_string();
			name.push(suffix);
			let path = PathBuf::from(name);
			if self.known.is_file(&path) {
				return vec![path];
			}
		}
		if self.known.is_dir(&candidate) {
			return self.known.children_of(&candidate).to_vec();
		}
		Vec::new()
	}

	/// Try root-joined suffixes of the module path, most specific first.
	///
	/// A suffix that yields no files, such as a directory holding only
	/// subdirectories, falls through to the next shorter one.
	fn fuzzy(&self, import: &str) -> Vec<PathBuf> {
		let segments = self.module_segments(import);
		for start in 0..segments.len() {
			let tail = segments[start..].join("/");
			let hits = self.probe(&self.root.join(tail));
			if !hits.is_empty() {
				return hits;
			}
		}
		Vec::new()
	}

	fn module_segments<'s>(&self, import: &'s str) -> Vec<&'s str> {
		let parts: Vec<&str> = if import.contains('/') {
			import.split('/').collect()
		} else if import.contains("::") {
			import.split("::").collect()
		} else if import.contains('.') && !self.has_known_extension(import) {
			import.split('.').collect()
		} else {
			vec![import]
		};
		parts
			.into_iter()
			.filter(|seg| !seg.is_empty() && *seg != "." && *seg != "..")
			.collect()
	}

	fn has_known_extension(&self, import: &str) -> bool {
		import
			.rsplit_once('.')
			.map(|(_, ext)| {
				let ext = format!(".{}", ext);
				self.config.resolve_suffixes.iter().any(|s| *s == ext)
			})
			.unwrap_or(false)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn known(paths: &[&str]) -> KnownFiles {
		let owned: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
		KnownFiles::new(owned.iter().map(PathBuf::as_path))
	}

	fn resolve(files: &KnownFiles, import: &str, source: &str) -> Vec<String> {
		let config = BuildConfig::default();
		ImportResolver::new(Path::new("/p"), files, &config)
			.resolve(import, Path::new(source))
			.into_iter()
			.map(|p| p.to_string_lossy().into_owned())
			.collect()
	}

	#[test]
	fn normalize_folds_dots() {
		assert_eq!(normalize(Path::new("/p/src/./a/../b.ts")), PathBuf::from("/p/src/b.ts"));
	}

	#[test]
	fn relative_with_extension_and_index() {
		let files = known(&["/p/src/a.ts", "/p/src/b.ts", "/p/src/ui/index.tsx"]);
		assert_eq!(resolve(&files, "./b", "/p/src/a.ts"), vec!["/p/src/b.ts"]);
		assert_eq!(resolve(&files, "./b.ts", "/p/src/a.ts"), vec!["/p/src/b.ts"]);
		assert_eq!(resolve(&files, "./ui", "/p/src/a.ts"), vec!["/p/src/ui/index.tsx"]);
	}

	#[test]
	fn directory_hits_expand_to_direct_children_only() {
		let files = known(&["/p/lib/x.go", "/p/lib/y.go", "/p/lib/deep/z.go", "/p/main.go"]);
		assert_eq!(
			resolve(&files, "./lib", "/p/main.go"),
			vec!["/p/lib/x.go", "/p/lib/y.go"]
		);
	}

	#[test]
	fn root_then_src_relative() {
		let files = known(&["/p/shared/log.ts", "/p/src/components/button.ts"]);
		assert_eq!(resolve(&files, "shared/log", "/p/src/a.ts"), vec!["/p/shared/log.ts"]);
		assert_eq!(
			resolve(&files, "components/button", "/p/src/a.ts"),
			vec!["/p/src/components/button.ts"]
		);
	}

	#[test]
	fn root_relative_beats_fuzzy() {
		let files = known(&["/p/core/util.ts", "/p/util.ts", "/p/main.ts"]);
		assert_eq!(resolve(&files, "core/util", "/p/main.ts"), vec!["/p/core/util.ts"]);
	}

	#[test]
	fn fuzzy_maps_module_path_onto_local_dir() {
		let files = known(&["/p/pkg/util/strings.go", "/p/pkg/util/numbers.go", "/p/cmd/main.go"]);
		assert_eq!(
			resolve(&files, "github.com/acme/tool/pkg/util", "/p/cmd/main.go"),
			vec!["/p/pkg/util/numbers.go", "/p/pkg/util/strings.go"]
		);
	}

	#[test]
	fn fuzzy_skips_suffixes_that_yield_no_files() {
		// pkg/api exists but holds only a subdirectory, so the shorter `api` suffix wins.
		let files = known(&["/p/pkg/api/v1/handler.go", "/p/api/server.go", "/p/cmd/main.go"]);
		assert_eq!(
			resolve(&files, "github.com/acme/tool/pkg/api", "/p/cmd/main.go"),
			vec!["/p/api/server.go"]
		);
	}

	#[test]
	fn fuzzy_splits_dotted_module_names() {
		let files = known(&["/p/util/Strings.java", "/p/app/Main.java"]);
		assert_eq!(
			resolve(&files, "com.acme.util.Strings", "/p/app/Main.java"),
			vec!["/p/util/Strings.java"]
		);
	}

	#[test]
	fn python_dotted_relative() {
		let files = known(&["/p/pkg/utils.py", "/p/pkg/sub/mod.py", "/p/helpers/io.py"]);
		assert_eq!(resolve(&files, ".utils", "/p/pkg/sub/mod.py"), Vec::<String>::new());
		assert_eq!(resolve(&files, "..utils", "/p/pkg/sub/mod.py"), vec!["/p/pkg/utils.py"]);
		assert_eq!(resolve(&files, "helpers.io", "/p/pkg/utils.py"), vec!["/p/helpers/io.py"]);
	}

	#[test]
	fn misses_are_empty_and_deterministic() {
		let files = known(&["/p/a.ts"]);
		assert!(resolve(&files, "react", "/p/a.ts").is_empty());
		let first = resolve(&files, "./a", "/p/a.ts");
		assert_eq!(first, resolve(&files, "./a", "/p/a.ts"));
	}
}
