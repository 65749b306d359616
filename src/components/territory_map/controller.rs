//! Orchestration of layout, geometry, input, selection and camera.
//!
//! The controller is plain Rust: the canvas component forwards DOM events in
//! screen coordinates with their timestamps, calls [`GraphController::tick`]
//! once per animation frame and then paints from the controller's accessors.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::Serialize;

use crate::graph::{GraphData, GraphNode, Point};

use super::camera::{Camera, CameraConfig, ViewTransform, fit_transform};
use super::click::{Click, ClickTracker, HitTarget};
use super::geometry::{GeometryConfig, RegionMap, bounds, compute_regions};
use super::hit::{hit_test, node_at};
use super::input::{InputConfig, InputEvent, InteractionInput};
use super::layout::{ForceLayout, LayoutConfig};
use super::scale::{ScaleConfig, ScaledValues};
use super::style::SelectionState;
use super::theme::Theme;

/// Every tunable of the map in one place.
#[derive(Clone, Debug, Default)]
pub struct ControllerConfig {
	pub layout: LayoutConfig,
	pub geometry: GeometryConfig,
	pub scale: ScaleConfig,
	pub input: InputConfig,
	pub camera: CameraConfig,
	pub theme: Theme,
}

/// Request for the host to open a file in the editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenFileRequest {
	pub command: &'static str,
	pub path: String,
}

impl OpenFileRequest {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			command: "openFile",
			path: path.into(),
		}
	}
}

/// Mouse cursor the canvas should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
	Grab,
	Grabbing,
	Pointer,
}

impl Cursor {
	pub fn as_css(self) -> &'static str {
		match self {
			Cursor::Grab => "grab",
			Cursor::Grabbing => "grabbing",
			Cursor::Pointer => "pointer",
		}
	}
}

/// Human-readable description of the current selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionSummary {
	Node {
		label: String,
		directory: String,
		path: String,
		neighbors: usize,
	},
	Cluster {
		directory: String,
		members: usize,
	},
}

#[derive(Clone, Copy, Debug)]
struct Drag {
	index: usize,
	/// Pointer offset from the node center, in world units.
	offset: Point,
}

pub struct GraphController {
	config: ControllerConfig,
	nodes: Vec<GraphNode>,
	directories: Vec<String>,
	edges: Vec<(usize, usize)>,
	index_of: HashMap<String, usize>,
	layout: ForceLayout,
	regions: RegionMap,
	camera: Camera,
	input: InteractionInput,
	clicks: ClickTracker,
	selection: SelectionState,
	hovered: Option<usize>,
	drag: Option<Drag>,
	/// Keep the camera fitted to the graph until the user takes over.
	follow_fit: bool,
	width: f64,
	height: f64,
}

impl GraphController {
	pub fn new(data: &GraphData, width: f64, height: f64, config: ControllerConfig) -> Self {
		let mut controller = Self {
			layout: ForceLayout::new(config.layout.clone()),
			input: InteractionInput::new(config.input.clone()),
			config,
			nodes: Vec::new(),
			directories: Vec::new(),
			edges: Vec::new(),
			index_of: HashMap::new(),
			regions: RegionMap::default(),
			camera: Camera::default(),
			clicks: ClickTracker::default(),
			selection: SelectionState::None,
			hovered: None,
			drag: None,
			follow_fit: true,
			width,
			height,
		};
		controller.set_data(data);
		controller
	}

	/// Replace the graph wholesale and restart the layout.
	pub fn set_data(&mut self, data: &GraphData) {
		self.nodes = data.nodes.clone();
		self.directories = self.nodes.iter().map(|n| n.data.directory.clone()).collect();
		self.index_of = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		self.edges = data
			.edges
			.iter()
			.filter_map(|e| {
				let pair = (*self.index_of.get(&e.source)?, *self.index_of.get(&e.target)?);
				(pair.0 != pair.1).then_some(pair)
			})
			.collect();
		if self.edges.len() != data.edges.len() {
			debug!(
				"code-territory: ignored {} edges with unknown or identical endpoints",
				data.edges.len() - self.edges.len()
			);
		}

		self.layout.set_data(&data.nodes, &data.edges);
		self.selection = SelectionState::None;
		self.hovered = None;
		self.drag = None;
		self.clicks.reset();
		self.input.set_pan_enabled(true);
		self.follow_fit = true;
		self.refresh_regions();
		let fit = self.fit();
		self.camera.set(fit);
	}

	/// Advance one animation frame. Returns `true` when anything moved.
	pub fn tick(&mut self) -> bool {
		let moved = self.layout.tick();
		if moved {
			self.refresh_regions();
			if self.follow_fit {
				let fit = self.fit();
				self.camera.set(fit);
			}
		}
		let animating = self.camera.step();
		moved || animating
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.update_zoom_bounds();
		if self.follow_fit {
			let fit = self.fit();
			self.camera.set(fit);
		}
	}

	/// Press at screen `(sx, sy)` at `now_ms`. Returns what was hit.
	///
	/// A press while a drag or pan is in progress is only hit-tested; the
	/// gesture already running keeps the pointer until [`Self::pointer_up`].
	pub fn pointer_down(&mut self, sx: f64, sy: f64, now_ms: f64) -> HitTarget {
		let world = self.camera.transform.to_world(sx, sy);
		let scale = self.scaled();
		let target = hit_test(self.layout.positions(), &self.regions, world, scale.hit_radius);
		if self.drag.is_some() || self.input.is_panning() {
			return target;
		}
		let click = self.clicks.press(&target, now_ms);

		match &target {
			HitTarget::Node(index) => {
				let p = self.layout.positions()[*index];
				self.drag = Some(Drag {
					index: *index,
					offset: Point::new(world.x - p.x, world.y - p.y),
				});
				self.layout.drag_start();
				self.input.set_pan_enabled(false);
				if click == Click::Double {
					self.select_node(*index);
					self.focus_selection();
				}
			}
			HitTarget::Plate(directory) => {
				self.input.pointer_down(sx, sy, false);
				if click == Click::Double {
					self.select_cluster(directory);
					self.focus_selection();
				}
			}
			HitTarget::Background => {
				self.input.pointer_down(sx, sy, true);
				match click {
					Click::Single => self.clear_selection(),
					Click::Double => {
						self.clear_selection();
						self.reset_view();
					}
				}
			}
		}
		target
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		let world = self.camera.transform.to_world(sx, sy);
		if let Some(drag) = self.drag {
			self.layout
				.drag_move(drag.index, world.x - drag.offset.x, world.y - drag.offset.y);
			return;
		}
		if let Some(InputEvent::Pan { dx, dy }) = self.input.pointer_move(sx, sy) {
			let t = self.camera.transform;
			self.take_camera(ViewTransform {
				x: t.x + dx,
				y: t.y + dy,
				k: t.k,
			});
			return;
		}
		let radius = self.scaled().hit_radius;
		self.hovered = node_at(self.layout.positions(), world, radius);
	}

	/// Release, wherever it happens.
	pub fn pointer_up(&mut self) {
		if let Some(drag) = self.drag.take() {
			self.layout.drag_end(drag.index);
			self.input.set_pan_enabled(true);
		}
		self.input.pointer_up();
	}

	/// Pointer left the canvas. Drags and pans continue under capture.
	pub fn pointer_leave(&mut self) {
		self.hovered = None;
	}

	pub fn wheel(&mut self, delta_y: f64, sx: f64, sy: f64) {
		let current = self.camera.transform;
		if let Some(InputEvent::Zoom {
			scale,
			anchor_x,
			anchor_y,
		}) = self.input.wheel(delta_y, sx, sy, current.k)
		{
			self.take_camera(current.zoomed_at(scale, anchor_x, anchor_y));
		}
	}

	pub fn select_node(&mut self, index: usize) {
		let Some(node) = self.nodes.get(index) else {
			return;
		};
		let neighbors = self.neighbors(index);
		debug!(
			"code-territory: selected {} ({} neighbors)",
			node.data.label,
			neighbors.len()
		);
		self.selection = SelectionState::Node {
			index,
			directory: node.data.directory.clone(),
			neighbors,
		};
	}

	pub fn select_node_by_id(&mut self, id: &str) {
		if let Some(&index) = self.index_of.get(id) {
			self.select_node(index);
		}
	}

	pub fn select_cluster(&mut self, directory: &str) {
		debug!("code-territory: selected cluster {}", directory);
		self.selection = SelectionState::Cluster {
			directory: directory.to_string(),
		};
	}

	pub fn clear_selection(&mut self) {
		if !self.selection.is_none() {
			debug!("code-territory: selection cleared");
		}
		self.selection = SelectionState::None;
	}

	/// Animate back to the whole-graph overview.
	pub fn reset_view(&mut self) {
		debug!("code-territory: camera reset");
		self.follow_fit = false;
		let fit = self.fit();
		self.camera.animate_to(fit, self.config.camera.frames);
	}

	/// Direct neighbors of node `index`, ignoring edge direction.
	pub fn neighbors(&self, index: usize) -> HashSet<usize> {
		self.edges
			.iter()
			.filter_map(|&(s, t)| match (s == index, t == index) {
				(true, false) => Some(t),
				(false, true) => Some(s),
				_ => None,
			})
			.collect()
	}

	/// Open request for the selected node.
	pub fn open_selected(&self) -> Option<OpenFileRequest> {
		match &self.selection {
			SelectionState::Node { index, .. } => {
				self.nodes.get(*index).map(|n| OpenFileRequest::new(n.data.full_path.clone()))
			}
			_ => None,
		}
	}

	pub fn selection_summary(&self) -> Option<SelectionSummary> {
		match &self.selection {
			SelectionState::None => None,
			SelectionState::Node {
				index, neighbors, ..
			} => self.nodes.get(*index).map(|n| SelectionSummary::Node {
				label: n.data.label.clone(),
				directory: n.data.directory.clone(),
				path: n.data.full_path.clone(),
				neighbors: neighbors.len(),
			}),
			SelectionState::Cluster { directory } => Some(SelectionSummary::Cluster {
				directory: directory.clone(),
				members: self.directories.iter().filter(|d| *d == directory).count(),
			}),
		}
	}

	pub fn cursor(&self) -> Cursor {
		if self.drag.is_some() || self.input.is_panning() {
			Cursor::Grabbing
		} else if self.hovered.is_some() {
			Cursor::Pointer
		} else {
			Cursor::Grab
		}
	}

	pub fn scaled(&self) -> ScaledValues {
		ScaledValues::new(&self.config.scale, self.camera.transform.k)
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// Directory of each node, by ordinal.
	pub fn directories(&self) -> &[String] {
		&self.directories
	}

	/// Resolved edges as node ordinal pairs.
	pub fn edges(&self) -> &[(usize, usize)] {
		&self.edges
	}

	pub fn positions(&self) -> &[Point] {
		self.layout.positions()
	}

	pub fn regions(&self) -> &RegionMap {
		&self.regions
	}

	pub fn selection(&self) -> &SelectionState {
		&self.selection
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	pub fn transform(&self) -> ViewTransform {
		self.camera.transform
	}

	pub fn theme(&self) -> &Theme {
		&self.config.theme
	}

	pub fn min_scale(&self) -> f64 {
		self.input.min_scale()
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	pub fn is_settled(&self) -> bool {
		!self.layout.is_running() && !self.camera.is_animating()
	}

	fn take_camera(&mut self, transform: ViewTransform) {
		self.follow_fit = false;
		self.camera.set(transform);
	}

	fn focus_selection(&mut self) {
		self.follow_fit = false;
		let frames = self.config.camera.frames;
		match &self.selection {
			SelectionState::None => {}
			SelectionState::Node { index, .. } => {
				let p = self.layout.positions()[*index];
				let k = self.input.clamp_scale(self.config.camera.node_focus_scale);
				self.camera.smooth_look_at(p.x, p.y, k, self.width, self.height, frames);
			}
			SelectionState::Cluster { directory } => {
				let members: Vec<Point> = self
					.layout
					.positions()
					.iter()
					.zip(&self.directories)
					.filter(|(_, d)| *d == directory)
					.map(|(p, _)| *p)
					.collect();
				if let Some((lo, hi)) = bounds(&members) {
					let fit = fit_transform(
						lo,
						hi,
						self.width,
						self.height,
						self.config.camera.fit_padding,
						self.config.camera.cluster_focus_scale,
					);
					let k = self.input.clamp_scale(fit.k);
					let (cx, cy) = ((lo.x + hi.x) / 2.0, (lo.y + hi.y) / 2.0);
					self.camera.smooth_look_at(cx, cy, k, self.width, self.height, frames);
				}
			}
		}
	}

	fn refresh_regions(&mut self) {
		self.regions = compute_regions(self.layout.positions(), &self.directories, &self.config.geometry);
		self.update_zoom_bounds();
	}

	/// Zoom-out limit follows the fit-to-screen zoom of the current extent.
	fn update_zoom_bounds(&mut self) {
		let fit = self.fit();
		self.input.set_min_scale(fit.k * self.config.camera.min_zoom_ratio);
	}

	fn extent(&self) -> Option<(Point, Point)> {
		match &self.regions.landmass {
			Some(land) => bounds(&land.polygon),
			None => bounds(self.layout.positions()),
		}
	}

	fn fit(&self) -> ViewTransform {
		match self.extent() {
			Some((lo, hi)) => fit_transform(
				lo,
				hi,
				self.width,
				self.height,
				self.config.camera.fit_padding,
				self.input.max_scale(),
			),
			None => ViewTransform::centered_on(0.0, 0.0, 1.0, self.width, self.height),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{GraphEdge, NodeData};

	fn node(id: &str, label: &str, dir: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			position: Point::default(),
			data: NodeData {
				label: label.into(),
				full_path: format!("/p/{}", label),
				directory: dir.into(),
			},
		}
	}

	/// a.ts imports b.ts; c.ts stands alone.
	fn abc() -> GraphController {
		let data = GraphData {
			nodes: vec![
				node("0", "a.ts", "(root)"),
				node("1", "b.ts", "(root)"),
				node("2", "c.ts", "lib"),
			],
			edges: vec![GraphEdge {
				id: "e0".into(),
				source: "0".into(),
				target: "1".into(),
			}],
		};
		GraphController::new(&data, 800.0, 600.0, ControllerConfig::default())
	}

	fn screen_of(c: &GraphController, index: usize) -> (f64, f64) {
		c.transform().to_screen(c.positions()[index])
	}

	fn click(c: &mut GraphController, (x, y): (f64, f64), at: f64) -> HitTarget {
		let hit = c.pointer_down(x, y, at);
		c.pointer_up();
		hit
	}

	#[test]
	fn double_click_on_same_node_selects_it() {
		let mut c = abc();
		let b = screen_of(&c, 1);
		assert_eq!(click(&mut c, b, 1000.0), HitTarget::Node(1));
		assert!(c.selection().is_none());
		click(&mut c, b, 1150.0);
		assert!(matches!(c.selection(), SelectionState::Node { index: 1, .. }));
	}

	#[test]
	fn clicks_on_different_nodes_do_not_select() {
		let mut c = abc();
		let (a, b) = (screen_of(&c, 0), screen_of(&c, 1));
		click(&mut c, a, 1000.0);
		click(&mut c, b, 1100.0);
		assert!(c.selection().is_none());
	}

	#[test]
	fn selecting_b_yields_neighbor_a() {
		let mut c = abc();
		c.select_node_by_id("1");
		match c.selection() {
			SelectionState::Node { index, neighbors, .. } => {
				assert_eq!(*index, 1);
				assert_eq!(neighbors, &HashSet::from([0]));
			}
			other => panic!("unexpected selection {:?}", other),
		}
		assert_eq!(c.open_selected(), Some(OpenFileRequest::new("/p/b.ts")));
	}

	#[test]
	fn background_single_click_clears_and_double_resets() {
		let mut c = abc();
		c.select_cluster("lib");
		// Far corner of the canvas lands in the sea.
		let sea = (1.0, 1.0);
		assert_eq!(click(&mut c, sea, 0.0), HitTarget::Background);
		assert!(c.selection().is_none());

		c.wheel(-1.0, 400.0, 300.0);
		let zoomed = c.transform();
		click(&mut c, sea, 1000.0);
		click(&mut c, sea, 1100.0);
		while c.tick() {}
		assert_ne!(c.transform(), zoomed);
		assert!(c.is_settled());
	}

	#[test]
	fn dragging_pins_node_under_pointer() {
		let mut c = abc();
		let a = screen_of(&c, 0);
		c.pointer_down(a.0, a.1, 0.0);
		c.pointer_move(a.0 + 40.0, a.1 + 10.0);
		let expected = c.transform().to_world(a.0 + 40.0, a.1 + 10.0);
		for _ in 0..5 {
			c.tick();
		}
		// Ticks may move the camera; the pin holds in world space.
		assert!(c.positions()[0].distance(expected) < 1e-9);
		assert_eq!(c.cursor(), Cursor::Grabbing);
		c.pointer_up();
		assert_eq!(c.cursor(), Cursor::Grab);
	}

	#[test]
	fn second_press_during_drag_leaves_no_pin_behind() {
		let mut c = abc();
		let (a, b) = (screen_of(&c, 0), screen_of(&c, 1));
		c.pointer_down(a.0, a.1, 0.0);
		c.pointer_move(a.0 + 30.0, a.1);
		assert_eq!(c.pointer_down(b.0, b.1, 10.0), HitTarget::Node(1));
		assert!(c.layout.is_pinned(0));
		assert!(!c.layout.is_pinned(1));
		c.pointer_up();
		c.pointer_up();
		assert!(!c.layout.is_pinned(0));
		assert!(!c.layout.is_pinned(1));
		assert_eq!(c.cursor(), Cursor::Grab);
	}

	#[test]
	fn zoom_never_goes_below_fit_bound() {
		let mut c = abc();
		for _ in 0..200 {
			c.wheel(1.0, 400.0, 300.0);
		}
		assert!(c.transform().k >= c.min_scale() - 1e-12);
		assert!(c.min_scale() > 0.0);
	}

	#[test]
	fn open_request_serializes_camel_case() {
		let json = serde_json::to_string(&OpenFileRequest::new("/p/a.ts")).unwrap();
		assert_eq!(json, r#"{"command":"openFile","path":"/p/a.ts"}"#);
	}

	#[test]
	fn cluster_summary_counts_members() {
		let mut c = abc();
		c.select_cluster("(root)");
		assert_eq!(
			c.selection_summary(),
			Some(SelectionSummary::Cluster {
				directory: "(root)".into(),
				members: 2
			})
		);
		assert_eq!(c.open_selected(), None);
	}
}
