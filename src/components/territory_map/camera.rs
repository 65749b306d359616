//! View transform and eased camera motion.

use crate::graph::Point;

/// Pan and zoom transform: `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

impl ViewTransform {
	pub fn to_world(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn to_screen(&self, p: Point) -> (f64, f64) {
		(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Transform that places world `(tx, ty)` under the center of a `width`×`height` viewport.
	pub fn centered_on(tx: f64, ty: f64, k: f64, width: f64, height: f64) -> Self {
		Self {
			x: width / 2.0 - tx * k,
			y: height / 2.0 - ty * k,
			k,
		}
	}

	/// Zoom to `k` keeping the screen point `(ax, ay)` fixed.
	pub fn zoomed_at(&self, k: f64, ax: f64, ay: f64) -> Self {
		let ratio = k / self.k;
		Self {
			x: ax - (ax - self.x) * ratio,
			y: ay - (ay - self.y) * ratio,
			k,
		}
	}

	fn lerp(&self, other: &ViewTransform, t: f64) -> Self {
		Self {
			x: self.x + (other.x - self.x) * t,
			y: self.y + (other.y - self.y) * t,
			k: self.k + (other.k - self.k) * t,
		}
	}
}

/// Camera tuning.
#[derive(Clone, Debug)]
pub struct CameraConfig {
	/// Length of a `smooth_look_at` animation in frames.
	pub frames: u32,
	/// Zoom used when focusing a node.
	pub node_focus_scale: f64,
	/// Upper bound on zoom when focusing a cluster.
	pub cluster_focus_scale: f64,
	/// Screen margin kept around the graph when fitting.
	pub fit_padding: f64,
	/// Minimum zoom as a fraction of the fit-to-screen zoom.
	pub min_zoom_ratio: f64,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			frames: 36,
			node_focus_scale: 1.8,
			cluster_focus_scale: 2.0,
			fit_padding: 60.0,
			min_zoom_ratio: 0.75,
		}
	}
}

/// Zoom and offset that fit the world box `lo..hi` into the viewport.
pub fn fit_transform(lo: Point, hi: Point, width: f64, height: f64, padding: f64, max_k: f64) -> ViewTransform {
	let (w, h) = ((hi.x - lo.x).max(1.0), (hi.y - lo.y).max(1.0));
	let (avail_w, avail_h) = ((width - 2.0 * padding).max(1.0), (height - 2.0 * padding).max(1.0));
	let k = (avail_w / w).min(avail_h / h).min(max_k);
	ViewTransform::centered_on((lo.x + hi.x) / 2.0, (lo.y + hi.y) / 2.0, k, width, height)
}

/// Cubic ease-out on `t` in 0..=1.
pub fn ease_out(t: f64) -> f64 {
	let u = 1.0 - t.clamp(0.0, 1.0);
	1.0 - u * u * u
}

/// Frame-counted interpolation between two transforms.
#[derive(Clone, Debug)]
pub struct CameraAnimation {
	from: ViewTransform,
	to: ViewTransform,
	frame: u32,
	frames: u32,
}

impl CameraAnimation {
	pub fn new(from: ViewTransform, to: ViewTransform, frames: u32) -> Self {
		Self {
			from,
			to,
			frame: 0,
			frames: frames.max(1),
		}
	}

	/// Advance one frame and return the transform to show.
	pub fn step(&mut self) -> ViewTransform {
		self.frame = (self.frame + 1).min(self.frames);
		if self.finished() {
			return self.to;
		}
		let t = ease_out(self.frame as f64 / self.frames as f64);
		self.from.lerp(&self.to, t)
	}

	pub fn finished(&self) -> bool {
		self.frame >= self.frames
	}
}

/// Current transform plus at most one animation in flight.
#[derive(Clone, Debug, Default)]
pub struct Camera {
	pub transform: ViewTransform,
	animation: Option<CameraAnimation>,
}

impl Camera {
	/// Animate so world `(tx, ty)` ends under the viewport center at zoom `k`.
	///
	/// Starts from the current transform, replacing any animation in flight.
	pub fn smooth_look_at(&mut self, tx: f64, ty: f64, k: f64, width: f64, height: f64, frames: u32) {
		let to = ViewTransform::centered_on(tx, ty, k, width, height);
		self.animate_to(to, frames);
	}

	pub fn animate_to(&mut self, to: ViewTransform, frames: u32) {
		self.animation = Some(CameraAnimation::new(self.transform, to, frames));
	}

	/// Jump to `transform`, cancelling any animation.
	pub fn set(&mut self, transform: ViewTransform) {
		self.animation = None;
		self.transform = transform;
	}

	/// Advance the animation by one frame. Returns `true` while animating.
	pub fn step(&mut self) -> bool {
		let Some(anim) = self.animation.as_mut() else {
			return false;
		};
		self.transform = anim.step();
		if anim.finished() {
			self.animation = None;
		}
		true
	}

	pub fn is_animating(&self) -> bool {
		self.animation.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn world_screen_round_trip() {
		let t = ViewTransform { x: 30.0, y: -10.0, k: 2.0 };
		let w = t.to_world(130.0, 90.0);
		assert_eq!(w, Point::new(50.0, 50.0));
		assert_eq!(t.to_screen(w), (130.0, 90.0));
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let t = ViewTransform { x: 10.0, y: 20.0, k: 1.0 };
		let before = t.to_world(200.0, 150.0);
		let after = t.zoomed_at(2.5, 200.0, 150.0).to_world(200.0, 150.0);
		assert!(before.distance(after) < 1e-9);
	}

	#[test]
	fn fit_centers_and_respects_padding() {
		let t = fit_transform(Point::new(-100.0, -50.0), Point::new(100.0, 50.0), 800.0, 600.0, 100.0, 10.0);
		assert_eq!(t.k, 3.0);
		assert_eq!(t.to_screen(Point::new(0.0, 0.0)), (400.0, 300.0));
		let capped = fit_transform(Point::new(0.0, 0.0), Point::new(1.0, 1.0), 800.0, 600.0, 0.0, 4.0);
		assert_eq!(capped.k, 4.0);
	}

	#[test]
	fn look_at_eases_out_and_lands_on_target() {
		let mut camera = Camera::default();
		camera.smooth_look_at(50.0, 25.0, 2.0, 800.0, 600.0, 10);
		assert!(camera.step());
		let first = camera.transform;
		// Ease-out covers more than a linear tenth on the first frame.
		assert!(first.k - 1.0 > 0.1);
		while camera.step() {}
		assert_eq!(camera.transform, ViewTransform::centered_on(50.0, 25.0, 2.0, 800.0, 600.0));
		assert_eq!(camera.transform.to_screen(Point::new(50.0, 25.0)), (400.0, 300.0));
	}

	#[test]
	fn new_look_at_supersedes_the_old_one() {
		let mut camera = Camera::default();
		camera.smooth_look_at(500.0, 500.0, 3.0, 800.0, 600.0, 10);
		camera.step();
		let midway = camera.transform;
		camera.smooth_look_at(0.0, 0.0, 1.0, 800.0, 600.0, 10);
		camera.step();
		assert_ne!(camera.transform, midway);
		while camera.step() {}
		assert_eq!(camera.transform, ViewTransform::centered_on(0.0, 0.0, 1.0, 800.0, 600.0));
	}

	#[test]
	fn set_cancels_animation() {
		let mut camera = Camera::default();
		camera.smooth_look_at(1.0, 1.0, 2.0, 100.0, 100.0, 5);
		camera.set(ViewTransform::default());
		assert!(!camera.is_animating());
		assert!(!camera.step());
	}
}
