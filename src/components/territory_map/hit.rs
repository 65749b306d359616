//! Hit-testing in world space.
//!
//! Nodes win over plates. Plates only count inside the landmass, matching
//! what the painter shows; everything else is background.

use crate::graph::Point;

use super::click::HitTarget;
use super::geometry::RegionMap;

/// Nearest node within `radius` of `at`.
pub fn node_at(positions: &[Point], at: Point, radius: f64) -> Option<usize> {
	positions
		.iter()
		.enumerate()
		.map(|(i, p)| (i, p.distance(at)))
		.filter(|&(_, d)| d <= radius)
		.min_by(|a, b| a.1.total_cmp(&b.1))
		.map(|(i, _)| i)
}

pub fn hit_test(positions: &[Point], regions: &RegionMap, at: Point, node_radius: f64) -> HitTarget {
	if let Some(index) = node_at(positions, at, node_radius) {
		return HitTarget::Node(index);
	}
	let on_land = regions.landmass.as_ref().is_some_and(|land| land.contains(at));
	if on_land {
		if let Some(plate) = regions.plates.iter().find(|plate| plate.contains(at)) {
			return HitTarget::Plate(plate.directory.clone());
		}
	}
	HitTarget::Background
}

#[cfg(test)]
mod tests {
	use super::super::geometry::{GeometryConfig, compute_regions};
	use super::*;

	fn setup() -> (Vec<Point>, RegionMap) {
		let positions = vec![
			Point::new(-100.0, 0.0),
			Point::new(-90.0, 10.0),
			Point::new(100.0, 0.0),
		];
		let regions = compute_regions(&positions, &["a", "a", "b"], &GeometryConfig::default());
		(positions, regions)
	}

	#[test]
	fn nodes_take_priority() {
		let (positions, regions) = setup();
		assert_eq!(
			hit_test(&positions, &regions, Point::new(-98.0, 1.0), 6.0),
			HitTarget::Node(0)
		);
		assert_eq!(node_at(&positions, Point::new(-95.0, 5.0), 10.0), Some(0));
	}

	#[test]
	fn plates_only_on_land() {
		let (positions, regions) = setup();
		assert_eq!(
			hit_test(&positions, &regions, Point::new(80.0, 20.0), 6.0),
			HitTarget::Plate("b".into())
		);
		assert_eq!(
			hit_test(&positions, &regions, Point::new(80.0, 900.0), 6.0),
			HitTarget::Background
		);
	}

	#[test]
	fn empty_map_is_all_background() {
		assert_eq!(
			hit_test(&[], &RegionMap::default(), Point::new(0.0, 0.0), 6.0),
			HitTarget::Background
		);
	}
}
