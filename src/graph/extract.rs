//! Best-effort import discovery.
//!
//! Each language has a small table of anchored patterns: quoted paths after an
//! `import`/`include`/`from` keyword, `require(...)` arguments, and
//! parenthesized import blocks. Nothing here parses; malformed text simply
//! fails to match.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

/// Extracts raw import strings from file text.
pub trait ImportExtractor: Send + Sync {
	/// Deduplicated raw import strings of `text`. Unsupported languages yield an empty set.
	fn extract(&self, text: &str, language: &str) -> BTreeSet<String>;
}

/// The regex-table extractor.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatternExtractor;

macro_rules! pattern {
	($name:ident, $re:expr) => {
		fn $name() -> &'static Regex {
			static RE: OnceLock<Regex> = OnceLock::new();
			RE.get_or_init(|| Regex::new($re).expect("import pattern must compile"))
		}
	};
}

pattern!(js_from, r#"\b(?:import|export)\s+(?:type\s+)?[\w*{}\s,$]*?\s*from\s*['"]([^'"\n]+)['"]"#);
pattern!(js_bare, r#"\bimport\s+['"]([^'"\n]+)['"]"#);
pattern!(js_require, r#"\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#);
pattern!(js_dynamic, r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#);

pattern!(py_from, r"(?m)^\s*from\s+(\.*[\w.]*)\s+import\b");
pattern!(py_import, r"(?m)^\s*import\s+([\w.]+(?:\s+as\s+\w+)?(?:\s*,\s*[\w.]+(?:\s+as\s+\w+)?)*)");

pattern!(go_single, r#"(?m)^\s*import\s+(?:[\w.]+\s+)?"([^"]+)""#);
pattern!(go_block, r"(?ms)^\s*import\s*\((.*?)\)");
pattern!(go_block_entry, r#"^\s*(?:[\w.]+\s+)?"([^"]+)""#);

pattern!(rust_mod, r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?mod\s+(\w+)\s*;");
pattern!(rust_use, r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+crate::([\w:]+)");

pattern!(c_include, r#"(?m)^\s*#\s*include\s*"([^"\n]+)""#);
pattern!(jvm_import, r"(?m)^\s*import\s+(?:static\s+)?([\w.]+)");
pattern!(cs_using, r"(?m)^\s*using\s+(?:static\s+)?([A-Z][\w.]*)\s*;");
pattern!(ruby_require, r#"(?m)^\s*require(_relative)?\s*\(?\s*['"]([^'"\n]+)['"]"#);
pattern!(php_include, r#"\b(?:require|include)(?:_once)?\s*\(?\s*['"]([^'"\n]+)['"]"#);
pattern!(lua_require, r#"\brequire\s*\(?\s*['"]([^'"\n]+)['"]"#);
pattern!(dart_import, r#"(?m)^\s*(?:import|export|part)\s+['"]([^'"\n]+)['"]"#);
pattern!(css_import, r#"@(?:import|use|forward)\s+(?:url\(\s*)?['"]([^'"\n]+)['"]"#);

fn collect(re: &Regex, text: &str, out: &mut BTreeSet<String>) {
	for caps in re.captures_iter(text) {
		if let Some(m) = caps.get(1) {
			let value = m.as_str().trim();
			if !value.is_empty() {
				out.insert(value.to_string());
			}
		}
	}
}

fn extract_js(text: &str, out: &mut BTreeSet<String>) {
	for re in [js_from(), js_bare(), js_require(), js_dynamic()] {
		collect(re, text, out);
	}
}

fn extract_python(text: &str, out: &mut BTreeSet<String>) {
	for caps in py_from().captures_iter(text) {
		let module = &caps[1];
		// `from . import x` names no module of its own.
		if module.chars().any(|c| c != '.') {
			out.insert(module.to_string());
		}
	}
	for caps in py_import().captures_iter(text) {
		for item in caps[1].split(',') {
			if let Some(module) = item.split_whitespace().next() {
				out.insert(module.to_string());
			}
		}
	}
}

fn extract_go(text: &str, out: &mut BTreeSet<String>) {
	collect(go_single(), text, out);
	for block in go_block().captures_iter(text) {
		for line in block[1].lines() {
			collect(go_block_entry(), line, out);
		}
	}
}

fn extract_rust(text: &str, out: &mut BTreeSet<String>) {
	for caps in rust_mod().captures_iter(text) {
		out.insert(format!("./{}", &caps[1]));
	}
	for caps in rust_use().captures_iter(text) {
		let modules: Vec<&str> = caps[1]
			.split("::")
			.take_while(|seg| seg.starts_with(|c: char| c.is_ascii_lowercase() || c == '_'))
			.collect();
		if !modules.is_empty() {
			out.insert(modules.join("/"));
		}
	}
}

fn extract_jvm(text: &str, out: &mut BTreeSet<String>) {
	for caps in jvm_import().captures_iter(text) {
		let name = caps[1].trim_end_matches('.');
		if !name.is_empty() {
			out.insert(name.to_string());
		}
	}
}

fn extract_ruby(text: &str, out: &mut BTreeSet<String>) {
	for caps in ruby_require().captures_iter(text) {
		let target = &caps[2];
		if caps.get(1).is_some() && !target.starts_with('.') {
			out.insert(format!("./{}", target));
		} else {
			out.insert(target.to_string());
		}
	}
}

fn extract_dart(text: &str, out: &mut BTreeSet<String>) {
	for caps in dart_import().captures_iter(text) {
		let target = &caps[1];
		if !target.starts_with("dart:") {
			out.insert(target.to_string());
		}
	}
}

impl ImportExtractor for PatternExtractor {
	fn extract(&self, text: &str, language: &str) -> BTreeSet<String> {
		let mut out = BTreeSet::new();
		match language {
			"typescript" | "typescriptreact" | "javascript" | "javascriptreact" | "vue"
			| "svelte" => extract_js(text, &mut out),
			"python" => extract_python(text, &mut out),
			"go" => extract_go(text, &mut out),
			"rust" => extract_rust(text, &mut out),
			"c" | "cpp" => collect(c_include(), text, &mut out),
			"java" | "kotlin" | "scala" => extract_jvm(text, &mut out),
			"csharp" => collect(cs_using(), text, &mut out),
			"ruby" => extract_ruby(text, &mut out),
			"php" => collect(php_include(), text, &mut out),
			"lua" => collect(lua_require(), text, &mut out),
			"dart" => extract_dart(text, &mut out),
			"css" | "scss" | "less" => collect(css_import(), text, &mut out),
			_ => {}
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn extract(text: &str, language: &str) -> Vec<String> {
		PatternExtractor.extract(text, language).into_iter().collect()
	}

	#[test]
	fn go_import_block_is_scanned_line_by_line() {
		let src = "package main\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n\nfunc main() {}\n";
		assert_eq!(extract(src, "go"), vec!["fmt", "os"]);
	}

	#[test]
	fn go_aliases_and_single_imports() {
		let src = "import log \"github.com/acme/log\"\nimport (\n\tu \"example.com/util\"\n\t_ \"embed\"\n)\n";
		assert_eq!(
			extract(src, "go"),
			vec!["embed", "example.com/util", "github.com/acme/log"]
		);
	}

	#[test]
	fn typescript_forms() {
		let src = r#"
import React from "react";
import { a,
  b } from './multi';
import type { T } from "./types";
import './side-effect';
export * from "../reexport";
const x = require('./legacy');
const y = await import("./lazy");
const important = 1;
"#;
		assert_eq!(
			extract(src, "typescript"),
			vec![
				"../reexport",
				"./lazy",
				"./legacy",
				"./multi",
				"./side-effect",
				"./types",
				"react"
			]
		);
	}

	#[test]
	fn duplicates_within_a_file_collapse() {
		let src = "import a from './b';\nimport c from './b';\n";
		assert_eq!(extract(src, "javascript"), vec!["./b"]);
	}

	#[test]
	fn python_forms() {
		let src = "import os, sys as system\nfrom .utils import helper\nfrom . import sibling\nfrom pkg.mod import thing\n";
		assert_eq!(extract(src, "python"), vec![".utils", "os", "pkg.mod", "sys"]);
	}

	#[test]
	fn rust_mods_and_crate_paths() {
		let src = "mod graph;\npub(crate) mod render;\nuse crate::graph::build::GraphBuilder;\nuse std::fmt;\n";
		assert_eq!(extract(src, "rust"), vec!["./graph", "./render", "graph/build"]);
	}

	#[test]
	fn c_only_quoted_includes() {
		let src = "#include <stdio.h>\n#include \"util/strings.h\"\n";
		assert_eq!(extract(src, "c"), vec!["util/strings.h"]);
	}

	#[test]
	fn ruby_relative_requires_are_marked() {
		let src = "require 'json'\nrequire_relative 'lib/helper'\n";
		assert_eq!(extract(src, "ruby"), vec!["./lib/helper", "json"]);
	}

	#[test]
	fn jvm_wildcards_keep_package() {
		let src = "import com.acme.util.Strings;\nimport static com.acme.Math.max;\nimport com.acme.io.*;\n";
		assert_eq!(
			extract(src, "java"),
			vec!["com.acme.Math.max", "com.acme.io", "com.acme.util.Strings"]
		);
	}

	#[test]
	fn unsupported_language_and_garbage_yield_nothing() {
		assert!(extract("import Foundation", "swift").is_empty());
		assert!(extract("import ( \"unterminated", "go").is_empty());
		assert!(extract("", "typescript").is_empty());
	}
}
