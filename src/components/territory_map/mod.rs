//! Territory map of a codebase's import graph.
//!
//! Renders files as settlements on an interactive canvas:
//! - Force-directed layout that pulls each directory's files into a cluster
//! - Directory "plates" (Voronoi cells) on a landmass wrapping the whole graph
//! - Pan, zoom, node dragging and hover
//! - Double click to select a file or directory and fly the camera to it
//!
//! # Example
//!
//! ```ignore
//! use code_territory::components::territory_map::TerritoryMapCanvas;
//! use code_territory::graph::GraphData;
//!
//! let data: GraphData = serde_json::from_str(json)?;
//! view! { <TerritoryMapCanvas data=data fullscreen=true /> }
//! ```

pub mod camera;
pub mod click;
mod component;
pub mod controller;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod layout;
mod render;
pub mod scale;
pub mod style;
pub mod theme;

pub use component::TerritoryMapCanvas;
pub use controller::{ControllerConfig, GraphController, OpenFileRequest};
pub use theme::Theme;
