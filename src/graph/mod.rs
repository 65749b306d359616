//! Native graph pipeline: file set → imports → resolved files → nodes and edges.

mod build;
mod extract;
mod resolve;
mod types;

pub use build::{
	BuildOutput, BuildReport, ContentReader, FileFailure, FsReader, GraphBuilder, GraphError,
};
pub use extract::{ImportExtractor, PatternExtractor};
pub use resolve::{ImportResolver, KnownFiles, normalize};
pub use types::{
	FileRecord, GraphData, GraphEdge, GraphNode, NodeData, Point, ROOT_DIRECTORY,
	relative_directory,
};
