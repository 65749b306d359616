//! Force-directed layout with directory clustering.
//!
//! Link attraction and node repulsion come from the `force_graph`
//! simulation. On top of it each tick applies a centering pull, an attraction
//! toward the node's directory anchor and pairwise collision avoidance. All
//! of it is scaled by a decaying energy value (`alpha`); once it falls below
//! `alpha_min` the layout is at rest and ticks become no-ops.
//!
//! The layout owns node positions. Readers borrow [`ForceLayout::positions`],
//! a snapshot indexed by node ordinal that only changes inside [`ForceLayout::tick`].

use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use crate::graph::{GraphEdge, GraphNode, Point};

/// Physics tuning.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
	pub node_mass: f32,
	/// Simulation step at full energy, in seconds.
	pub time_step: f32,
	/// Fraction of the centroid offset removed per tick.
	pub center_strength: f64,
	/// Pull toward the directory anchor, scaled by alpha.
	pub cluster_strength: f64,
	/// Nodes closer than twice this radius are pushed apart.
	pub collision_radius: f64,
	/// Arc length reserved per directory on the anchor circle.
	pub cluster_spacing: f64,
	pub min_cluster_radius: f64,
	/// Spacing of the initial spiral around each anchor.
	pub seed_spacing: f64,
	pub alpha_decay: f64,
	pub alpha_min: f64,
	/// Energy floor held while a node is dragged.
	pub drag_alpha_target: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			node_mass: 10.0,
			time_step: 0.016,
			center_strength: 0.05,
			cluster_strength: 0.08,
			collision_radius: 14.0,
			cluster_spacing: 260.0,
			min_cluster_radius: 180.0,
			seed_spacing: 18.0,
			// Reaches alpha_min from 1.0 in ~300 ticks.
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			alpha_min: 0.001,
			drag_alpha_target: 0.3,
		}
	}
}

/// Per-node metadata carried inside the simulation.
#[derive(Clone, Debug, Default)]
pub struct LayoutNode {
	/// Node ordinal in the data set.
	pub index: usize,
	/// Index into [`ForceLayout::directories`].
	pub cluster: usize,
}

/// Continuously evolving node positions.
pub struct ForceLayout {
	graph: ForceGraph<LayoutNode, ()>,
	config: LayoutConfig,
	directories: Vec<String>,
	clusters: Vec<usize>,
	anchors: Vec<Point>,
	positions: Vec<Point>,
	pins: HashMap<usize, Point>,
	alpha: f64,
	alpha_target: f64,
}

impl ForceLayout {
	pub fn new(config: LayoutConfig) -> Self {
		Self {
			graph: ForceGraph::new(simulation_parameters(&config)),
			config,
			directories: Vec::new(),
			clusters: Vec::new(),
			anchors: Vec::new(),
			positions: Vec::new(),
			pins: HashMap::new(),
			alpha: 0.0,
			alpha_target: 0.0,
		}
	}

	/// Replace the working set, recompute anchors and restart at full energy.
	pub fn set_data(&mut self, nodes: &[GraphNode], edges: &[GraphEdge]) {
		let mut cluster_of_dir: HashMap<&str, usize> = HashMap::new();
		self.directories.clear();
		self.clusters = nodes
			.iter()
			.map(|node| {
				let dir = node.data.directory.as_str();
				*cluster_of_dir.entry(dir).or_insert_with(|| {
					self.directories.push(dir.to_string());
					self.directories.len() - 1
				})
			})
			.collect();
		self.anchors = cluster_anchors(self.directories.len(), &self.config);

		let mut members = vec![0usize; self.directories.len()];
		self.positions = self
			.clusters
			.iter()
			.map(|&cluster| {
				let rank = members[cluster];
				members[cluster] += 1;
				seed_position(self.anchors[cluster], rank, self.config.seed_spacing)
			})
			.collect();

		self.graph = ForceGraph::new(simulation_parameters(&self.config));
		let handles: Vec<DefaultNodeIdx> = self
			.positions
			.iter()
			.enumerate()
			.map(|(index, p)| {
				self.graph.add_node(NodeData {
					x: p.x as f32,
					y: p.y as f32,
					mass: self.config.node_mass,
					is_anchor: false,
					user_data: LayoutNode {
						index,
						cluster: self.clusters[index],
					},
				})
			})
			.collect();

		let index_of: HashMap<&str, usize> = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();
		for edge in edges {
			match (index_of.get(edge.source.as_str()), index_of.get(edge.target.as_str())) {
				(Some(&s), Some(&t)) if s != t => {
					self.graph.add_edge(handles[s], handles[t], EdgeData::default());
				}
				(Some(_), Some(_)) => {}
				_ => debug!("code-territory: edge {} references an unknown node", edge.id),
			}
		}

		self.pins.clear();
		self.alpha = 1.0;
		self.alpha_target = 0.0;
		debug!(
			"code-territory: layout restarted with {} nodes in {} clusters",
			nodes.len(),
			self.directories.len()
		);
	}

	/// Advance one step. Returns `false` when the layout is at rest.
	pub fn tick(&mut self) -> bool {
		if !self.is_running() {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.graph.update(self.config.time_step * self.alpha as f32);
		self.read_positions();
		self.apply_center();
		self.apply_clusters();
		self.apply_collisions();
		for (&index, &pin) in &self.pins {
			self.positions[index] = pin;
		}
		self.write_positions();
		true
	}

	/// Hold the energy floor so the graph keeps reacting while a node is held.
	pub fn drag_start(&mut self) {
		self.alpha_target = self.config.drag_alpha_target;
	}

	/// Pin node `index` exactly at `(x, y)`.
	pub fn drag_move(&mut self, index: usize, x: f64, y: f64) {
		if index >= self.positions.len() {
			return;
		}
		let pin = Point::new(x, y);
		self.pins.insert(index, pin);
		self.positions[index] = pin;
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data.index == index {
				node.data.x = x as f32;
				node.data.y = y as f32;
				node.data.is_anchor = true;
			}
		});
	}

	/// Release the energy floor and return node `index` to the simulation.
	pub fn drag_end(&mut self, index: usize) {
		self.alpha_target = 0.0;
		if self.pins.remove(&index).is_some() {
			self.graph.visit_nodes_mut(|node| {
				if node.data.user_data.index == index {
					node.data.is_anchor = false;
				}
			});
		}
	}

	pub fn is_running(&self) -> bool {
		self.alpha >= self.config.alpha_min || self.alpha_target > 0.0
	}

	pub fn is_pinned(&self, index: usize) -> bool {
		self.pins.contains_key(&index)
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Current positions, indexed by node ordinal.
	pub fn positions(&self) -> &[Point] {
		&self.positions
	}

	/// Distinct directories, in first-seen order.
	pub fn directories(&self) -> &[String] {
		&self.directories
	}

	/// Anchor of each cluster on the layout circle.
	pub fn anchors(&self) -> &[Point] {
		&self.anchors
	}

	fn read_positions(&mut self) {
		let positions = &mut self.positions;
		self.graph.visit_nodes(|node| {
			let index = node.data.user_data.index;
			let (x, y) = (node.x() as f64, node.y() as f64);
			if x.is_finite() && y.is_finite() {
				positions[index] = Point::new(x, y);
			}
		});
	}

	fn write_positions(&mut self) {
		let positions = &self.positions;
		self.graph.visit_nodes_mut(|node| {
			let p = positions[node.data.user_data.index];
			node.data.x = p.x as f32;
			node.data.y = p.y as f32;
		});
	}

	fn apply_center(&mut self) {
		let n = self.positions.len();
		if n == 0 {
			return;
		}
		let (sx, sy) = self
			.positions
			.iter()
			.fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
		let (shift_x, shift_y) = (
			sx / n as f64 * self.config.center_strength,
			sy / n as f64 * self.config.center_strength,
		);
		for (i, p) in self.positions.iter_mut().enumerate() {
			if !self.pins.contains_key(&i) {
				p.x -= shift_x;
				p.y -= shift_y;
			}
		}
	}

	fn apply_clusters(&mut self) {
		let strength = self.config.cluster_strength * self.alpha;
		for (i, p) in self.positions.iter_mut().enumerate() {
			if self.pins.contains_key(&i) {
				continue;
			}
			let anchor = self.anchors[self.clusters[i]];
			p.x += (anchor.x - p.x) * strength;
			p.y += (anchor.y - p.y) * strength;
		}
	}

	fn apply_collisions(&mut self) {
		let min_dist = self.config.collision_radius * 2.0;
		let n = self.positions.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (self.positions[i], self.positions[j]);
				let (mut dx, mut dy) = (b.x - a.x, b.y - a.y);
				let mut dist = (dx * dx + dy * dy).sqrt();
				if dist >= min_dist {
					continue;
				}
				if dist < 1e-6 {
					// Coincident nodes: separate along an index-derived direction.
					let angle = (i * 31 + j * 17) as f64;
					(dx, dy, dist) = (angle.cos(), angle.sin(), 1.0);
				}
				let overlap = min_dist - dist.min(min_dist);
				let (ux, uy) = (dx / dist, dy / dist);
				let (pin_i, pin_j) = (self.pins.contains_key(&i), self.pins.contains_key(&j));
				let (share_i, share_j) = match (pin_i, pin_j) {
					(true, true) => (0.0, 0.0),
					(true, false) => (0.0, 1.0),
					(false, true) => (1.0, 0.0),
					(false, false) => (0.5, 0.5),
				};
				self.positions[i].x -= ux * overlap * share_i;
				self.positions[i].y -= uy * overlap * share_i;
				self.positions[j].x += ux * overlap * share_j;
				self.positions[j].y += uy * overlap * share_j;
			}
		}
	}
}

fn simulation_parameters(config: &LayoutConfig) -> SimulationParameters {
	SimulationParameters {
		force_charge: config.force_charge,
		force_spring: config.force_spring,
		force_max: config.force_max,
		node_speed: config.node_speed,
		damping_factor: config.damping_factor,
	}
}

/// Anchors evenly spaced on a circle whose radius grows with the cluster count.
pub fn cluster_anchors(count: usize, config: &LayoutConfig) -> Vec<Point> {
	if count <= 1 {
		return vec![Point::default(); count];
	}
	let radius = (count as f64 * config.cluster_spacing / TAU).max(config.min_cluster_radius);
	(0..count)
		.map(|i| {
			let angle = TAU * i as f64 / count as f64;
			Point::new(radius * angle.cos(), radius * angle.sin())
		})
		.collect()
}

/// Sunflower spiral around `anchor`, so seeded nodes never coincide.
fn seed_position(anchor: Point, rank: usize, spacing: f64) -> Point {
	let golden = PI * (3.0 - 5.0_f64.sqrt());
	let angle = rank as f64 * golden;
	let r = spacing * (rank as f64 + 0.5).sqrt();
	Point::new(anchor.x + r * angle.cos(), anchor.y + r * angle.sin())
}
