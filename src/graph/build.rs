//! Graph construction: extraction and resolution across the whole file set.
//!
//! Node ids are assigned by enumeration order before any file is read, so
//! they are stable for the duration of one build. Files are then processed in
//! parallel; a file that cannot be read is recorded in the [`BuildReport`] and
//! contributes no edges, but never aborts the batch.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;
use thiserror::Error;

use super::extract::{ImportExtractor, PatternExtractor};
use super::resolve::{ImportResolver, KnownFiles, normalize};
use super::types::{FileRecord, GraphData, GraphEdge, GraphNode, NodeData, Point};
use crate::config::BuildConfig;

/// Errors surfaced by the graph pipeline.
#[derive(Debug, Error)]
pub enum GraphError {
	/// No project root to build against. The only error that fails a build.
	#[error("no workspace root available")]
	NoWorkspace,

	/// A single file could not be read. Recorded per file, never propagated.
	#[error("failed to read {}: {source}", .path.display())]
	Read { path: PathBuf, source: io::Error },

	/// Configuration JSON could not be parsed.
	#[error("invalid configuration: {0}")]
	Config(#[from] serde_json::Error),
}

/// Supplies file text to the builder.
pub trait ContentReader: Send + Sync {
	fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads file contents from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsReader;

impl ContentReader for FsReader {
	fn read(&self, path: &Path) -> io::Result<String> {
		fs::read_to_string(path)
	}
}

/// A file that contributed no edges because of an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileFailure {
	pub path: PathBuf,
	pub message: String,
}

/// Diagnostic summary of one build.
#[derive(Clone, Debug, Default)]
pub struct BuildReport {
	pub files: usize,
	pub edges: usize,
	pub failures: Vec<FileFailure>,
}

/// Result of a build: the (possibly partial) graph and its report.
#[derive(Clone, Debug, Default)]
pub struct BuildOutput {
	pub graph: GraphData,
	pub report: BuildReport,
}

/// Orchestrates extraction and resolution into a node/edge graph.
pub struct GraphBuilder<R = FsReader, E = PatternExtractor> {
	config: BuildConfig,
	reader: R,
	extractor: E,
}

impl GraphBuilder {
	pub fn new(config: BuildConfig) -> Self {
		Self {
			config,
			reader: FsReader,
			extractor: PatternExtractor,
		}
	}
}

impl<R: ContentReader, E: ImportExtractor> GraphBuilder<R, E> {
	/// Replace the content reader.
	pub fn with_reader<R2: ContentReader>(self, reader: R2) -> GraphBuilder<R2, E> {
		GraphBuilder {
			config: self.config,
			reader,
			extractor: self.extractor,
		}
	}

	/// Replace the import extractor.
	pub fn with_extractor<E2: ImportExtractor>(self, extractor: E2) -> GraphBuilder<R, E2> {
		GraphBuilder {
			config: self.config,
			reader: self.reader,
			extractor,
		}
	}

	pub fn config(&self) -> &BuildConfig {
		&self.config
	}

	/// File records for `paths`, with languages taken from the extension mapping.
	pub fn records<I>(&self, root: &Path, paths: I) -> Vec<FileRecord>
	where
		I: IntoIterator<Item = PathBuf>,
	{
		paths
			.into_iter()
			.map(|path| {
				let language = path
					.extension()
					.and_then(|ext| self.config.language_for_extension(&ext.to_string_lossy()))
					.unwrap_or_default()
					.to_string();
				FileRecord::new(root, path, language)
			})
			.collect()
	}

	/// Build the graph for `files` under `root`.
	pub fn build(&self, root: &Path, files: &[FileRecord]) -> Result<BuildOutput, GraphError> {
		if root.as_os_str().is_empty() {
			return Err(GraphError::NoWorkspace);
		}

		let nodes: Vec<GraphNode> = files
			.iter()
			.enumerate()
			.map(|(i, file)| GraphNode {
				id: i.to_string(),
				position: Point::default(),
				data: NodeData {
					label: file.label.clone(),
					full_path: file.path.to_string_lossy().into_owned(),
					directory: file.directory.clone(),
				},
			})
			.collect();

		let mut ids: HashMap<PathBuf, usize> = HashMap::with_capacity(files.len());
		for (i, file) in files.iter().enumerate() {
			ids.entry(normalize(&file.path)).or_insert(i);
		}
		let known = KnownFiles::new(files.iter().map(|f| f.path.as_path()));
		let resolver = ImportResolver::new(root, &known, &self.config);

		let results: Vec<Result<Vec<(usize, usize)>, GraphError>> = files
			.par_iter()
			.enumerate()
			.filter(|(_, file)| self.config.is_supported(&file.language))
			.map(|(i, file)| self.file_edges(i, file, &resolver, &ids))
			.collect();

		let mut pairs = Vec::new();
		let mut failures = Vec::new();
		for result in results {
			match result {
				Ok(found) => pairs.extend(found),
				Err(GraphError::Read { path, source }) => {
					warn!("code-territory: skipping {}: {}", path.display(), source);
					failures.push(FileFailure {
						message: source.to_string(),
						path,
					});
				}
				Err(other) => {
					warn!("code-territory: {}", other);
				}
			}
		}

		let edges: Vec<GraphEdge> = pairs
			.into_iter()
			.enumerate()
			.map(|(n, (source, target))| GraphEdge {
				id: format!("e{}", n),
				source: source.to_string(),
				target: target.to_string(),
			})
			.collect();

		info!(
			"code-territory: built {} nodes, {} edges ({} unreadable files)",
			nodes.len(),
			edges.len(),
			failures.len()
		);

		Ok(BuildOutput {
			report: BuildReport {
				files: nodes.len(),
				edges: edges.len(),
				failures,
			},
			graph: GraphData { nodes, edges },
		})
	}

	fn file_edges(
		&self,
		index: usize,
		file: &FileRecord,
		resolver: &ImportResolver<'_>,
		ids: &HashMap<PathBuf, usize>,
	) -> Result<Vec<(usize, usize)>, GraphError> {
		let text = self.reader.read(&file.path).map_err(|source| GraphError::Read {
			path: file.path.clone(),
			source,
		})?;

		let mut out = Vec::new();
		for import in self.extractor.extract(&text, &file.language) {
			for target in resolver.resolve(&import, &file.path) {
				match ids.get(&target) {
					Some(&target) if target != index => out.push((index, target)),
					_ => {}
				}
			}
		}
		Ok(out)
	}
}
