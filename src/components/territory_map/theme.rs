//! Visual theming for the territory map.
//!
//! Plate colors are not part of a theme: they are hashed from the directory
//! name so a directory keeps its color across rebuilds and theme changes.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Deterministic color for a directory name.
///
/// A 31-multiplier string hash whose low 24 bits become the RGB channels.
/// Channels are lifted toward the middle of the range so plates never come
/// out near-black or near-white.
pub fn directory_color(name: &str) -> Color {
	let hash = name
		.chars()
		.fold(0i32, |h, c| (h << 5).wrapping_sub(h).wrapping_add(c as i32));
	let bits = hash as u32;
	let channel = |shift: u32| {
		let raw = ((bits >> shift) & 0xff) as f64;
		(60.0 + raw * (170.0 / 255.0)) as u8
	};
	Color::rgb(channel(16), channel(8), channel(0))
}

/// Sea, landmass and coastline styling.
#[derive(Clone, Debug)]
pub struct TerrainStyle {
	/// Sea (canvas background)
	pub sea: Color,
	/// Landmass fill
	pub land: Color,
	/// Coastline stroke
	pub coast: Color,
	/// Coastline stroke width in screen pixels
	pub coast_width: f64,
	/// Plate border stroke
	pub plate_border: Color,
	/// Plate fill opacity with nothing selected
	pub plate_alpha: f64,
	/// Fill opacity of the selected cluster's plate
	pub plate_selected_alpha: f64,
	/// Fill opacity of plates dimmed by a selection
	pub plate_dimmed_alpha: f64,
	/// Plate label color
	pub plate_label: Color,
}

/// Road (edge) styling.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Base edge color
	pub color: Color,
	/// Color of edges touching the selection
	pub highlight: Color,
	/// Opacity of edges that cross directories
	pub alpha: f64,
	/// Opacity of edges inside one directory
	pub local_alpha: f64,
	/// Opacity of edges dimmed by a selection
	pub dimmed_alpha: f64,
}

/// Settlement (node) styling.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Default settlement color
	pub color: Color,
	/// Selected node color
	pub selected: Color,
	/// Neighbor-of-selection color
	pub neighbor: Color,
	/// Border color
	pub border: Color,
	/// Border width in screen pixels
	pub border_width: f64,
	/// Label color
	pub label: Color,
	/// Opacity of nodes dimmed by a selection
	pub dimmed_alpha: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub terrain: TerrainStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
}

impl Theme {
	/// Dark sea with muted land (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			terrain: TerrainStyle {
				sea: Color::rgb(18, 30, 44),
				land: Color::rgb(46, 52, 48),
				coast: Color::rgba(160, 190, 200, 0.6),
				coast_width: 2.0,
				plate_border: Color::rgba(220, 225, 230, 0.25),
				plate_alpha: 0.22,
				plate_selected_alpha: 0.5,
				plate_dimmed_alpha: 0.08,
				plate_label: Color::rgba(235, 238, 240, 0.7),
			},
			edge: EdgeStyle {
				color: Color::rgb(170, 180, 190),
				highlight: Color::rgb(255, 214, 102),
				alpha: 0.35,
				local_alpha: 0.6,
				dimmed_alpha: 0.08,
			},
			node: NodeStyle {
				color: Color::rgb(226, 230, 235),
				selected: Color::rgb(255, 196, 61),
				neighbor: Color::rgb(94, 200, 229),
				border: Color::rgba(10, 15, 20, 0.8),
				border_width: 1.0,
				label: Color::rgba(240, 242, 245, 0.9),
				dimmed_alpha: 0.25,
			},
		}
	}

	/// Old-map look: pale sea, parchment land
	pub fn parchment() -> Self {
		Self {
			name: "parchment",
			terrain: TerrainStyle {
				sea: Color::rgb(196, 214, 222),
				land: Color::rgb(236, 224, 196),
				coast: Color::rgba(90, 70, 50, 0.7),
				coast_width: 2.0,
				plate_border: Color::rgba(90, 70, 50, 0.3),
				plate_alpha: 0.3,
				plate_selected_alpha: 0.6,
				plate_dimmed_alpha: 0.1,
				plate_label: Color::rgba(70, 50, 35, 0.75),
			},
			edge: EdgeStyle {
				color: Color::rgb(110, 90, 70),
				highlight: Color::rgb(170, 40, 30),
				alpha: 0.4,
				local_alpha: 0.65,
				dimmed_alpha: 0.1,
			},
			node: NodeStyle {
				color: Color::rgb(60, 45, 35),
				selected: Color::rgb(170, 40, 30),
				neighbor: Color::rgb(30, 90, 140),
				border: Color::rgba(250, 245, 230, 0.9),
				border_width: 1.0,
				label: Color::rgba(40, 30, 20, 0.9),
				dimmed_alpha: 0.3,
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn directory_color_is_deterministic() {
		assert_eq!(directory_color("src/ui"), directory_color("src/ui"));
		assert_ne!(directory_color("src/ui"), directory_color("src/core"));
		assert_eq!(directory_color("anything").a, 1.0);
	}

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}
}
