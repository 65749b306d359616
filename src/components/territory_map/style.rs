//! Selection-dependent styling.
//!
//! Computes how each node, edge and plate should look for the current
//! selection and hover, without touching the canvas. The painter only
//! applies the returned looks.

use std::collections::HashSet;

use super::scale::ScaledValues;
use super::theme::{Color, Theme};

/// What the user has singled out. Node and cluster selection are exclusive.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SelectionState {
	#[default]
	None,
	Node {
		index: usize,
		directory: String,
		neighbors: HashSet<usize>,
	},
	Cluster {
		directory: String,
	},
}

impl SelectionState {
	pub fn is_none(&self) -> bool {
		matches!(self, SelectionState::None)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
	Normal,
	Selected,
	Neighbor,
	Member,
	Dimmed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeLook {
	pub role: NodeRole,
	/// World-space radius.
	pub radius: f64,
	pub fill: Color,
	/// Draw the hover ring.
	pub ring: bool,
	/// Label opacity multiplier; zero hides the label.
	pub label_alpha: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLook {
	pub color: Color,
	/// World-space width.
	pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlateLook {
	pub fill: Color,
	pub label_alpha: f64,
}

pub fn node_role(index: usize, directory: &str, selection: &SelectionState) -> NodeRole {
	match selection {
		SelectionState::None => NodeRole::Normal,
		SelectionState::Node { index: selected, neighbors, .. } => {
			if index == *selected {
				NodeRole::Selected
			} else if neighbors.contains(&index) {
				NodeRole::Neighbor
			} else {
				NodeRole::Dimmed
			}
		}
		SelectionState::Cluster { directory: selected } => {
			if directory == selected {
				NodeRole::Member
			} else {
				NodeRole::Dimmed
			}
		}
	}
}

pub fn node_look(
	index: usize,
	directory: &str,
	selection: &SelectionState,
	hovered: Option<usize>,
	scale: &ScaledValues,
	theme: &Theme,
) -> NodeLook {
	let style = &theme.node;
	let role = node_role(index, directory, selection);
	let r = scale.node_radius;
	let (radius, fill, label_alpha) = match role {
		NodeRole::Normal => (r, style.color, scale.label_alpha),
		NodeRole::Selected => (r * 1.7, style.selected, 1.0),
		NodeRole::Neighbor => (r * 1.25, style.neighbor, 1.0),
		NodeRole::Member => (r * 1.4, style.color, scale.label_alpha.max(0.6)),
		NodeRole::Dimmed => (r * 0.7, style.color.with_alpha(style.dimmed_alpha), 0.0),
	};
	let ring = hovered == Some(index);
	NodeLook {
		role,
		radius: if ring { radius * 1.2 } else { radius },
		fill,
		ring,
		label_alpha: if ring { 1.0 } else { label_alpha },
	}
}

/// Edge from `source` to `target`; `local` when both ends share a directory.
pub fn edge_look(
	(source, target): (usize, usize),
	(source_dir, target_dir): (&str, &str),
	selection: &SelectionState,
	scale: &ScaledValues,
	theme: &Theme,
) -> EdgeLook {
	let style = &theme.edge;
	let w = scale.edge_line_width;
	let local = source_dir == target_dir;
	let base = if local {
		EdgeLook {
			color: style.color.with_alpha(style.local_alpha),
			width: w * 1.6,
		}
	} else {
		EdgeLook {
			color: style.color.with_alpha(style.alpha),
			width: w,
		}
	};
	let dimmed = EdgeLook {
		color: style.color.with_alpha(style.dimmed_alpha),
		width: w,
	};
	match selection {
		SelectionState::None => base,
		SelectionState::Node { index, .. } => {
			if source == *index || target == *index {
				EdgeLook {
					color: style.highlight.with_alpha(0.9),
					width: w * 2.2,
				}
			} else {
				dimmed
			}
		}
		SelectionState::Cluster { directory } => {
			if source_dir == directory && target_dir == directory {
				base
			} else {
				dimmed
			}
		}
	}
}

pub fn plate_look(directory: &str, color: Color, selection: &SelectionState, theme: &Theme) -> PlateLook {
	let terrain = &theme.terrain;
	let (alpha, label_alpha) = match selection {
		SelectionState::None => (terrain.plate_alpha, 1.0),
		SelectionState::Node { directory: dir, .. } | SelectionState::Cluster { directory: dir } => {
			if dir == directory {
				(terrain.plate_selected_alpha, 1.0)
			} else {
				(terrain.plate_dimmed_alpha, 0.4)
			}
		}
	};
	PlateLook {
		fill: color.with_alpha(alpha),
		label_alpha,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::territory_map::scale::ScaleConfig;

	fn scale() -> ScaledValues {
		ScaledValues::new(&ScaleConfig::default(), 1.0)
	}

	#[test]
	fn selected_neighbor_and_other_look_different() {
		let theme = Theme::default();
		let (a, b, c) = (0, 1, 2);
		let selection = SelectionState::Node {
			index: b,
			directory: "(root)".into(),
			neighbors: HashSet::from([a]),
		};
		let look = |i| node_look(i, "(root)", &selection, None, &scale(), &theme);
		let (la, lb, lc) = (look(a), look(b), look(c));
		assert_eq!((la.role, lb.role, lc.role), (NodeRole::Neighbor, NodeRole::Selected, NodeRole::Dimmed));
		assert!(lb.radius > la.radius && la.radius > lc.radius);
		assert_ne!(la.fill, lb.fill);
		assert_ne!(la.fill, lc.fill);
		assert_ne!(lb.fill, lc.fill);
		assert_eq!(lc.label_alpha, 0.0);
	}

	#[test]
	fn edges_touching_selection_are_boosted() {
		let theme = Theme::default();
		let selection = SelectionState::Node {
			index: 1,
			directory: "x".into(),
			neighbors: HashSet::from([0]),
		};
		let touching = edge_look((0, 1), ("x", "x"), &selection, &scale(), &theme);
		let other = edge_look((2, 3), ("x", "y"), &selection, &scale(), &theme);
		assert!(touching.width > other.width);
		assert!(other.color.a > 0.0, "dimmed edges stay visible");
		assert!(touching.color.a > other.color.a);
	}

	#[test]
	fn same_directory_edges_are_boosted_without_selection() {
		let theme = Theme::default();
		let local = edge_look((0, 1), ("x", "x"), &SelectionState::None, &scale(), &theme);
		let cross = edge_look((0, 2), ("x", "y"), &SelectionState::None, &scale(), &theme);
		assert!(local.width > cross.width);
		assert!(local.color.a > cross.color.a);
	}

	#[test]
	fn cluster_selection_enlarges_members_and_their_plate() {
		let theme = Theme::default();
		let selection = SelectionState::Cluster { directory: "ui".into() };
		let member = node_look(0, "ui", &selection, None, &scale(), &theme);
		let other = node_look(1, "core", &selection, None, &scale(), &theme);
		assert_eq!(member.role, NodeRole::Member);
		assert!(member.radius > scale().node_radius);
		assert_eq!(other.role, NodeRole::Dimmed);
		let color = Color::rgb(10, 20, 30);
		let selected = plate_look("ui", color, &selection, &theme);
		let dimmed = plate_look("core", color, &selection, &theme);
		assert!(selected.fill.a > theme.terrain.plate_alpha);
		assert!(dimmed.fill.a > 0.0 && dimmed.fill.a < selected.fill.a);
	}

	#[test]
	fn hover_adds_ring() {
		let theme = Theme::default();
		let look = node_look(3, "d", &SelectionState::None, Some(3), &scale(), &theme);
		assert!(look.ring);
		assert!(look.radius > scale().node_radius);
	}
}
