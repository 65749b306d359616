//! Zoom-dependent scaling configuration for map visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: the coordinate system of the layout. Values in
//!   world-space scale proportionally with zoom.
//! - **Screen-space**: pixel coordinates on the canvas. Values in
//!   screen-space stay constant regardless of zoom level.
//!
//! Every size handed to the painter and the hit-tester is computed once per
//! frame in [`ScaledValues`], already converted to world-space.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k
				let min_world = min_screen / k;
				let max_world = max_screen / k;
				base.clamp(min_world, max_world)
			}
		}
	}
}

/// Defines how alpha/opacity scales with zoom level.
#[derive(Clone, Debug)]
pub enum AlphaBehavior {
	/// Constant alpha regardless of zoom.
	Constant,
	/// Fully visible at `full_alpha_k`, fades to zero at `zero_alpha_k`.
	Fade {
		zero_alpha_k: f64,
		full_alpha_k: f64,
	},
}

impl AlphaBehavior {
	/// Alpha multiplier for a given zoom level.
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				let t = (k - zero_alpha_k) / (full_alpha_k - zero_alpha_k);
				t.clamp(0.0, 1.0)
			}
		}
	}
}

/// Settlement (node) sizing.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Base node radius in world units.
	pub radius: f64,
	pub radius_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	pub hit_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// How file labels fade in with zoom.
	pub label_alpha_behavior: AlphaBehavior,
}

/// Road (edge) sizing.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Base line width in screen pixels.
	pub line_width: f64,
}

/// Plate label sizing.
#[derive(Clone, Debug)]
pub struct RegionScaleConfig {
	/// Directory label font size in screen pixels.
	pub label_size: f64,
	/// How directory labels fade with zoom (visible when zoomed out).
	pub label_alpha_behavior: AlphaBehavior,
}

/// Complete scale configuration for all map elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	pub region: RegionScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 6.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 3.0,
					max_screen: 24.0,
				},
				hit_radius: 10.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 6.0,
					max_screen: f64::INFINITY,
				},
				label_size: 11.0,
				label_alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.6,
					full_alpha_k: 1.0,
				},
			},
			edge: EdgeScaleConfig { line_width: 1.2 },
			region: RegionScaleConfig {
				label_size: 13.0,
				label_alpha_behavior: AlphaBehavior::Constant,
			},
		}
	}
}

/// Pre-computed scale values for a specific zoom level, in world-space.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	pub node_radius: f64,
	pub hit_radius: f64,
	/// File label font, e.g. "11px sans-serif".
	pub label_font: String,
	/// File label alpha multiplier [0, 1].
	pub label_alpha: f64,
	pub edge_line_width: f64,
	/// Directory label font.
	pub region_font: String,
	pub region_label_alpha: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			k,
			node_radius: config.node.radius_behavior.apply(config.node.radius, k),
			hit_radius: config.node.hit_behavior.apply(config.node.hit_radius, k),
			label_font: format!("{}px sans-serif", config.node.label_size / k),
			label_alpha: config.node.label_alpha_behavior.apply(k),
			edge_line_width: config.edge.line_width / k,
			region_font: format!("600 {}px sans-serif", config.region.label_size / k),
			region_label_alpha: config.region.label_alpha_behavior.apply(k),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_radius_keeps_minimum_screen_size() {
		let config = ScaleConfig::default();
		let zoomed_out = ScaledValues::new(&config, 0.1);
		assert!((zoomed_out.node_radius * 0.1 - 3.0).abs() < 1e-9);
		let normal = ScaledValues::new(&config, 1.0);
		assert_eq!(normal.node_radius, 6.0);
	}

	#[test]
	fn labels_fade_in_with_zoom() {
		let config = ScaleConfig::default();
		assert_eq!(ScaledValues::new(&config, 0.5).label_alpha, 0.0);
		assert_eq!(ScaledValues::new(&config, 1.5).label_alpha, 1.0);
	}
}
