//! Per-shape single/double click disambiguation.

use std::collections::HashMap;

/// Anything on the map that can be pressed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HitTarget {
	/// Node ordinal.
	Node(usize),
	/// Plate, by directory.
	Plate(String),
	Background,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Click {
	Single,
	Double,
}

/// Second press within this many milliseconds on the same shape is a double click.
pub const DOUBLE_CLICK_MS: f64 = 300.0;

/// Remembers the last press per shape.
#[derive(Clone, Debug)]
pub struct ClickTracker {
	window_ms: f64,
	armed: HashMap<HitTarget, f64>,
}

impl Default for ClickTracker {
	fn default() -> Self {
		Self::new(DOUBLE_CLICK_MS)
	}
}

impl ClickTracker {
	pub fn new(window_ms: f64) -> Self {
		Self {
			window_ms,
			armed: HashMap::new(),
		}
	}

	/// Register a press on `target` at `now_ms`.
	///
	/// A double click disarms the shape, so a third quick press starts over.
	pub fn press(&mut self, target: &HitTarget, now_ms: f64) -> Click {
		let window = self.window_ms;
		self.armed.retain(|_, at| now_ms - *at <= window);
		if self.armed.remove(target).is_some() {
			Click::Double
		} else {
			self.armed.insert(target.clone(), now_ms);
			Click::Single
		}
	}

	pub fn reset(&mut self) {
		self.armed.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn same_shape_within_window_is_double() {
		let mut clicks = ClickTracker::default();
		assert_eq!(clicks.press(&HitTarget::Node(1), 1000.0), Click::Single);
		assert_eq!(clicks.press(&HitTarget::Node(1), 1200.0), Click::Double);
		assert_eq!(clicks.press(&HitTarget::Node(1), 1250.0), Click::Single);
	}

	#[test]
	fn different_shapes_are_independent_singles() {
		let mut clicks = ClickTracker::default();
		assert_eq!(clicks.press(&HitTarget::Node(1), 1000.0), Click::Single);
		assert_eq!(clicks.press(&HitTarget::Node(2), 1100.0), Click::Single);
		assert_eq!(clicks.press(&HitTarget::Plate("src".into()), 1150.0), Click::Single);
		assert_eq!(clicks.press(&HitTarget::Background, 1160.0), Click::Single);
	}

	#[test]
	fn slow_second_press_is_single() {
		let mut clicks = ClickTracker::default();
		clicks.press(&HitTarget::Background, 0.0);
		assert_eq!(clicks.press(&HitTarget::Background, 301.0), Click::Single);
		assert_eq!(clicks.press(&HitTarget::Background, 500.0), Click::Double);
	}
}
