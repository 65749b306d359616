//! Pointer and wheel translation into pan and zoom.
//!
//! The tracker holds no DOM state. The component captures the pointer on
//! press, so moves keep arriving after the pointer leaves the canvas and the
//! release always reaches [`InteractionInput::pointer_up`].

/// Zoom limits and wheel steps.
#[derive(Clone, Debug)]
pub struct InputConfig {
	/// Scale factor per wheel notch toward the user.
	pub zoom_in: f64,
	/// Scale factor per wheel notch away from the user.
	pub zoom_out: f64,
	pub max_scale: f64,
	/// Minimum scale before the first fit-to-screen computation.
	pub initial_min_scale: f64,
}

impl Default for InputConfig {
	fn default() -> Self {
		Self {
			zoom_in: 1.1,
			zoom_out: 0.9,
			max_scale: 8.0,
			initial_min_scale: 0.05,
		}
	}
}

/// Semantic result of a raw input event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
	/// New absolute scale, keeping the screen point `(anchor_x, anchor_y)` fixed.
	Zoom { scale: f64, anchor_x: f64, anchor_y: f64 },
	/// Screen-space translation since the previous move.
	Pan { dx: f64, dy: f64 },
}

#[derive(Clone, Debug)]
pub struct InteractionInput {
	config: InputConfig,
	min_scale: f64,
	pan_enabled: bool,
	/// Last pointer position of an active background pan.
	pan_from: Option<(f64, f64)>,
}

impl InteractionInput {
	pub fn new(config: InputConfig) -> Self {
		Self {
			min_scale: config.initial_min_scale,
			config,
			pan_enabled: true,
			pan_from: None,
		}
	}

	/// Start a pan when the press landed on the background.
	pub fn pointer_down(&mut self, x: f64, y: f64, on_background: bool) {
		self.pan_from = (on_background && self.pan_enabled).then_some((x, y));
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<InputEvent> {
		let (px, py) = self.pan_from?;
		self.pan_from = Some((x, y));
		Some(InputEvent::Pan { dx: x - px, dy: y - py })
	}

	pub fn pointer_up(&mut self) {
		self.pan_from = None;
	}

	/// Zoom step for a wheel event at `(x, y)`; `None` when already at a limit.
	pub fn wheel(&self, delta_y: f64, x: f64, y: f64, current: f64) -> Option<InputEvent> {
		if delta_y == 0.0 {
			return None;
		}
		// Clamp toward the wheel's direction only.
		let scale = if delta_y > 0.0 {
			(current * self.config.zoom_out).max(self.min_scale).min(current)
		} else {
			(current * self.config.zoom_in).min(self.config.max_scale).max(current)
		};
		if (scale - current).abs() < f64::EPSILON {
			return None;
		}
		Some(InputEvent::Zoom {
			scale,
			anchor_x: x,
			anchor_y: y,
		})
	}

	/// Disabling also ends any pan in progress.
	pub fn set_pan_enabled(&mut self, enabled: bool) {
		self.pan_enabled = enabled;
		if !enabled {
			self.pan_from = None;
		}
	}

	pub fn set_min_scale(&mut self, scale: f64) {
		self.min_scale = scale.min(self.config.max_scale);
	}

	pub fn clamp_scale(&self, scale: f64) -> f64 {
		scale.clamp(self.min_scale, self.config.max_scale)
	}

	pub fn min_scale(&self) -> f64 {
		self.min_scale
	}

	pub fn max_scale(&self) -> f64 {
		self.config.max_scale
	}

	pub fn is_panning(&self) -> bool {
		self.pan_from.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn input() -> InteractionInput {
		InteractionInput::new(InputConfig::default())
	}

	#[test]
	fn background_press_pans_by_deltas() {
		let mut input = input();
		input.pointer_down(10.0, 10.0, true);
		assert_eq!(input.pointer_move(15.0, 7.0), Some(InputEvent::Pan { dx: 5.0, dy: -3.0 }));
		assert_eq!(input.pointer_move(15.0, 10.0), Some(InputEvent::Pan { dx: 0.0, dy: 3.0 }));
		input.pointer_up();
		assert_eq!(input.pointer_move(20.0, 20.0), None);
	}

	#[test]
	fn shape_press_does_not_pan() {
		let mut input = input();
		input.pointer_down(10.0, 10.0, false);
		assert!(!input.is_panning());
		assert_eq!(input.pointer_move(30.0, 30.0), None);
	}

	#[test]
	fn disabling_pan_cancels_and_blocks() {
		let mut input = input();
		input.pointer_down(0.0, 0.0, true);
		input.set_pan_enabled(false);
		assert_eq!(input.pointer_move(5.0, 5.0), None);
		input.pointer_down(0.0, 0.0, true);
		assert!(!input.is_panning());
		input.set_pan_enabled(true);
		input.pointer_down(0.0, 0.0, true);
		assert!(input.is_panning());
	}

	#[test]
	fn moves_outside_the_surface_keep_panning_until_release() {
		let mut input = input();
		input.pointer_down(100.0, 100.0, true);
		assert!(input.pointer_move(-50.0, 2000.0).is_some());
		assert!(input.pointer_move(100.0, 100.0).is_some());
		input.pointer_up();
		assert!(!input.is_panning());
	}

	#[test]
	fn wheel_zoom_is_clamped() {
		let mut input = input();
		match input.wheel(-1.0, 50.0, 60.0, 1.0) {
			Some(InputEvent::Zoom { scale, anchor_x, anchor_y }) => {
				assert!((scale - 1.1).abs() < 1e-12);
				assert_eq!((anchor_x, anchor_y), (50.0, 60.0));
			}
			other => panic!("expected zoom, got {:?}", other),
		}
		assert_eq!(input.wheel(-1.0, 0.0, 0.0, 8.0), None);

		input.set_min_scale(0.5);
		match input.wheel(1.0, 0.0, 0.0, 0.52) {
			Some(InputEvent::Zoom { scale, .. }) => assert_eq!(scale, 0.5),
			other => panic!("expected zoom, got {:?}", other),
		}
		assert_eq!(input.wheel(1.0, 0.0, 0.0, 0.5), None);
		assert_eq!(input.wheel(0.0, 0.0, 0.0, 1.0), None);
	}

	#[test]
	fn wheel_moves_only_in_its_direction_below_a_raised_floor() {
		let mut input = input();
		input.set_min_scale(0.8);
		assert_eq!(input.wheel(1.0, 0.0, 0.0, 0.4), None);
		match input.wheel(-1.0, 0.0, 0.0, 0.4) {
			Some(InputEvent::Zoom { scale, .. }) => assert!((scale - 0.44).abs() < 1e-12),
			other => panic!("expected zoom, got {:?}", other),
		}
	}
}
