//! Graph data structures shared by the native pipeline and the map component.
//!
//! The serialized form of [`GraphData`] is the hand-off format between the
//! graph builder and the rendering host:
//!
//! ```json
//! { "nodes": [{ "id": "0", "position": { "x": 0, "y": 0 },
//!               "data": { "label": "a.ts", "fullPath": "/p/a.ts", "directory": "(root)" } }],
//!   "edges": [{ "id": "e0", "source": "0", "target": "1" }] }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory label given to files that live directly in the project root.
pub const ROOT_DIRECTORY: &str = "(root)";

/// A 2D point in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// One discovered source file. Immutable for the duration of a build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
	pub path: PathBuf,
	/// Basename, used as the node label.
	pub label: String,
	/// Language identifier, e.g. `typescript`. Empty when the extension is unmapped.
	pub language: String,
	/// Directory relative to the project root, `/`-separated, or [`ROOT_DIRECTORY`].
	pub directory: String,
}

impl FileRecord {
	pub fn new(root: &Path, path: PathBuf, language: impl Into<String>) -> Self {
		let label = path
			.file_name()
			.map(|n| n.to_string_lossy().into_owned())
			.unwrap_or_else(|| path.to_string_lossy().into_owned());
		let directory = relative_directory(root, &path);
		Self {
			path,
			label,
			language: language.into(),
			directory,
		}
	}
}

/// Directory of `path` relative to `root`, with the root itself mapped to [`ROOT_DIRECTORY`].
pub fn relative_directory(root: &Path, path: &Path) -> String {
	let parent = path.parent().unwrap_or(Path::new(""));
	let relative = parent.strip_prefix(root).unwrap_or(parent);
	let joined = relative
		.components()
		.map(|c| c.as_os_str().to_string_lossy())
		.collect::<Vec<_>>()
		.join("/");
	if joined.is_empty() {
		ROOT_DIRECTORY.to_string()
	} else {
		joined
	}
}

/// Display payload carried by each node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
	pub label: String,
	pub full_path: String,
	pub directory: String,
}

/// A file vertex. `position` is a placeholder at hand-off; the layout owns real positions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: String,
	#[serde(default)]
	pub position: Point,
	pub data: NodeData,
}

/// A directed import relationship: `source` imports `target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub id: String,
	pub source: String,
	pub target: String,
}

/// Complete graph: nodes and edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	/// Ids of all nodes sharing an edge with `id`, in either direction.
	pub fn neighbors(&self, id: &str) -> std::collections::HashSet<String> {
		let mut out = std::collections::HashSet::new();
		for edge in &self.edges {
			if edge.source == id {
				out.insert(edge.target.clone());
			} else if edge.target == id {
				out.insert(edge.source.clone());
			}
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn root_files_get_sentinel_directory() {
		let root = Path::new("/proj");
		let rec = FileRecord::new(root, PathBuf::from("/proj/a.ts"), "typescript");
		assert_eq!(rec.directory, ROOT_DIRECTORY);
		assert_eq!(rec.label, "a.ts");

		let nested = FileRecord::new(root, PathBuf::from("/proj/src/ui/b.ts"), "typescript");
		assert_eq!(nested.directory, "src/ui");
	}

	#[test]
	fn serializes_host_contract() {
		let data = GraphData {
			nodes: vec![GraphNode {
				id: "0".into(),
				position: Point::default(),
				data: NodeData {
					label: "a.ts".into(),
					full_path: "/p/a.ts".into(),
					directory: ROOT_DIRECTORY.into(),
				},
			}],
			edges: vec![],
		};
		let json = serde_json::to_value(&data).unwrap();
		assert_eq!(json["nodes"][0]["data"]["fullPath"], "/p/a.ts");
		assert_eq!(json["nodes"][0]["position"]["x"], 0.0);
		assert!(json["edges"].as_array().unwrap().is_empty());
	}
}
