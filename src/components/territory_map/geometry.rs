//! Region geometry: directory plates and the landmass.
//!
//! Plates are Voronoi cells around the centroid of each directory's nodes,
//! built by clipping a large square with the perpendicular bisector toward
//! every other centroid. The landmass is the convex hull of every node
//! position expanded into four padded corners. Both are recomputed from a
//! borrowed position slice and never write back to it.

use std::collections::HashMap;

use crate::graph::Point;

use super::theme::{Color, directory_color};

/// Region tuning.
#[derive(Clone, Debug)]
pub struct GeometryConfig {
	/// Minimum half-extent of the square that clips plate cells, centered on the origin.
	/// Grows with the node spread.
	pub bound: f64,
	/// Clearance between a node and the coastline.
	pub hull_padding: f64,
}

impl Default for GeometryConfig {
	fn default() -> Self {
		Self {
			bound: 10_000.0,
			hull_padding: 40.0,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionKind {
	Plate,
	Landmass,
}

/// A closed polygon with its fill color.
#[derive(Clone, Debug)]
pub struct Region {
	pub kind: RegionKind,
	/// Owning directory. Empty for the landmass.
	pub directory: String,
	/// Vertices in order; the closing edge is implicit.
	pub polygon: Vec<Point>,
	pub color: Color,
	/// Where the region's label goes: the directory centroid for plates.
	pub anchor: Point,
	/// Number of nodes in the directory.
	pub members: usize,
}

impl Region {
	pub fn contains(&self, p: Point) -> bool {
		point_in_polygon(&self.polygon, p)
	}
}

/// All regions derived from one layout snapshot.
#[derive(Clone, Debug, Default)]
pub struct RegionMap {
	pub landmass: Option<Region>,
	/// One per distinct directory, in first-seen order.
	pub plates: Vec<Region>,
}

impl RegionMap {
	pub fn is_empty(&self) -> bool {
		self.landmass.is_none() && self.plates.is_empty()
	}

	pub fn plate(&self, directory: &str) -> Option<&Region> {
		self.plates.iter().find(|r| r.directory == directory)
	}
}

/// Compute plates and landmass. `directories[i]` is the directory of the node at `positions[i]`.
///
/// Returns an empty map for fewer than three nodes.
pub fn compute_regions<S: AsRef<str>>(
	positions: &[Point],
	directories: &[S],
	config: &GeometryConfig,
) -> RegionMap {
	if positions.len() < 3 || directories.len() != positions.len() {
		return RegionMap::default();
	}

	let mut order: Vec<&str> = Vec::new();
	let mut sums: HashMap<&str, (f64, f64, usize)> = HashMap::new();
	for (p, dir) in positions.iter().zip(directories) {
		let dir = dir.as_ref();
		let entry = sums.entry(dir).or_insert_with(|| {
			order.push(dir);
			(0.0, 0.0, 0)
		});
		entry.0 += p.x;
		entry.1 += p.y;
		entry.2 += 1;
	}
	let sites: Vec<(&str, Point, usize)> = order
		.iter()
		.map(|&dir| {
			let (sx, sy, n) = sums[dir];
			(dir, Point::new(sx / n as f64, sy / n as f64), n)
		})
		.collect();

	let b = clip_extent(positions, config);
	let frame = vec![
		Point::new(-b, -b),
		Point::new(b, -b),
		Point::new(b, b),
		Point::new(-b, b),
	];
	let plates = sites
		.iter()
		.enumerate()
		.map(|(i, &(dir, site, members))| {
			let polygon = sites
				.iter()
				.enumerate()
				.filter(|&(j, _)| j != i)
				.fold(frame.clone(), |cell, (_, &(_, other, _))| {
					clip_toward(&cell, site, other)
				});
			Region {
				kind: RegionKind::Plate,
				directory: dir.to_string(),
				polygon,
				color: directory_color(dir),
				anchor: site,
				members,
			}
		})
		.collect();

	let pad = config.hull_padding;
	let corners: Vec<Point> = positions
		.iter()
		.flat_map(|p| {
			[
				Point::new(p.x - pad, p.y - pad),
				Point::new(p.x + pad, p.y - pad),
				Point::new(p.x + pad, p.y + pad),
				Point::new(p.x - pad, p.y + pad),
			]
		})
		.collect();
	let hull = convex_hull(corners);
	let landmass = (hull.len() >= 3).then(|| Region {
		kind: RegionKind::Landmass,
		directory: String::new(),
		anchor: polygon_centroid(&hull),
		polygon: hull,
		color: Color::rgb(0, 0, 0),
		members: positions.len(),
	});

	RegionMap { landmass, plates }
}

/// Half-extent of the clipping square: the configured bound, grown to cover the spread.
fn clip_extent(positions: &[Point], config: &GeometryConfig) -> f64 {
	let spread = positions
		.iter()
		.fold(0.0_f64, |m, p| m.max(p.x.abs()).max(p.y.abs()));
	config.bound.max(2.0 * spread + config.hull_padding)
}

/// Keep the part of `polygon` closer to `site` than to `other`.
fn clip_toward(polygon: &[Point], site: Point, other: Point) -> Vec<Point> {
	let (nx, ny) = (other.x - site.x, other.y - site.y);
	if nx.abs() < 1e-9 && ny.abs() < 1e-9 {
		return polygon.to_vec();
	}
	let c = (other.x * other.x + other.y * other.y - site.x * site.x - site.y * site.y) / 2.0;
	let side = |p: Point| nx * p.x + ny * p.y - c;

	let mut out = Vec::with_capacity(polygon.len() + 1);
	for (i, &current) in polygon.iter().enumerate() {
		let prev = polygon[(i + polygon.len() - 1) % polygon.len()];
		let (sc, sp) = (side(current), side(prev));
		if sc <= 0.0 {
			if sp > 0.0 {
				out.push(intersect(prev, current, sp, sc));
			}
			out.push(current);
		} else if sp <= 0.0 {
			out.push(intersect(prev, current, sp, sc));
		}
	}
	out
}

fn intersect(a: Point, b: Point, sa: f64, sb: f64) -> Point {
	let t = sa / (sa - sb);
	Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Andrew's monotone chain. Counter-clockwise, no repeated endpoint.
pub fn convex_hull(mut points: Vec<Point>) -> Vec<Point> {
	points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
	points.dedup();
	if points.len() < 3 {
		return points;
	}

	let cross = |o: Point, a: Point, b: Point| (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x);
	let mut lower: Vec<Point> = Vec::new();
	for &p in &points {
		while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
			lower.pop();
		}
		lower.push(p);
	}
	let mut upper: Vec<Point> = Vec::new();
	for &p in points.iter().rev() {
		while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
			upper.pop();
		}
		upper.push(p);
	}
	lower.pop();
	upper.pop();
	lower.extend(upper);
	lower
}

/// Even-odd ray casting.
pub fn point_in_polygon(polygon: &[Point], p: Point) -> bool {
	let n = polygon.len();
	if n < 3 {
		return false;
	}
	let mut inside = false;
	let mut j = n - 1;
	for i in 0..n {
		let (a, b) = (polygon[i], polygon[j]);
		if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
			inside = !inside;
		}
		j = i;
	}
	inside
}

/// Vertex average; good enough for label placement on convex shapes.
pub fn polygon_centroid(polygon: &[Point]) -> Point {
	if polygon.is_empty() {
		return Point::default();
	}
	let (sx, sy) = polygon.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
	let n = polygon.len() as f64;
	Point::new(sx / n, sy / n)
}

/// Axis-aligned bounds of `points` as (min, max), or `None` when empty.
pub fn bounds(points: &[Point]) -> Option<(Point, Point)> {
	let first = *points.first()?;
	Some(points.iter().fold((first, first), |(lo, hi), p| {
		(
			Point::new(lo.x.min(p.x), lo.y.min(p.y)),
			Point::new(hi.x.max(p.x), hi.y.max(p.y)),
		)
	}))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config() -> GeometryConfig {
		GeometryConfig::default()
	}

	#[test]
	fn fewer_than_three_nodes_yield_no_regions() {
		let positions = [Point::new(0.0, 0.0), Point::new(50.0, 0.0)];
		let map = compute_regions(&positions, &["a", "b"], &config());
		assert!(map.is_empty());
		let map = compute_regions::<&str>(&[], &[], &config());
		assert!(map.landmass.is_none());
	}

	#[test]
	fn plates_keep_their_sites_beyond_the_default_bound() {
		use super::super::layout::{LayoutConfig, cluster_anchors};

		let sites = cluster_anchors(300, &LayoutConfig::default());
		assert!(sites.iter().any(|p| p.x.abs() > config().bound));
		let dirs: Vec<String> = (0..sites.len()).map(|i| format!("dir{}", i)).collect();
		let map = compute_regions(&sites, &dirs, &config());
		assert_eq!(map.plates.len(), 300);
		for (site, dir) in sites.iter().zip(&dirs) {
			assert!(map.plate(dir).is_some_and(|plate| plate.contains(*site)), "{} lost its site", dir);
		}
	}

	#[test]
	fn one_plate_per_directory() {
		let positions = [
			Point::new(-200.0, 0.0),
			Point::new(-180.0, 20.0),
			Point::new(200.0, 0.0),
			Point::new(0.0, 250.0),
			Point::new(10.0, 270.0),
		];
		let dirs = ["ui", "ui", "core", "net", "net"];
		let map = compute_regions(&positions, &dirs, &config());
		assert_eq!(map.plates.len(), 3);
		let names: Vec<&str> = map.plates.iter().map(|p| p.directory.as_str()).collect();
		assert_eq!(names, ["ui", "core", "net"]);
		for (p, dir) in positions.iter().zip(dirs) {
			assert!(map.plate(dir).is_some_and(|plate| plate.contains(*p)), "{} outside {}", dir, dir);
		}
		assert_eq!(map.plate("ui").map(|p| p.members), Some(2));
		assert_eq!(map.plate("core").map(|p| p.color), Some(directory_color("core")));
	}

	#[test]
	fn landmass_wraps_every_node_with_clearance() {
		let positions = [Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(50.0, 80.0)];
		let map = compute_regions(&positions, &["a", "a", "b"], &config());
		let land = map.landmass.expect("landmass");
		assert_eq!(land.kind, RegionKind::Landmass);
		for p in positions {
			assert!(land.contains(p));
			assert!(land.contains(Point::new(p.x + 39.0, p.y + 39.0)));
		}
		assert!(!land.contains(Point::new(500.0, 500.0)));
	}

	#[test]
	fn two_sites_split_along_the_bisector() {
		let frame = vec![
			Point::new(-10.0, -10.0),
			Point::new(10.0, -10.0),
			Point::new(10.0, 10.0),
			Point::new(-10.0, 10.0),
		];
		let left = clip_toward(&frame, Point::new(-5.0, 0.0), Point::new(5.0, 0.0));
		assert!(left.iter().all(|p| p.x <= 1e-9));
		assert!(point_in_polygon(&left, Point::new(-3.0, 2.0)));
		assert!(!point_in_polygon(&left, Point::new(3.0, 2.0)));
	}

	#[test]
	fn hull_drops_interior_points() {
		let hull = convex_hull(vec![
			Point::new(0.0, 0.0),
			Point::new(4.0, 0.0),
			Point::new(4.0, 4.0),
			Point::new(0.0, 4.0),
			Point::new(2.0, 2.0),
			Point::new(1.0, 3.0),
		]);
		assert_eq!(hull.len(), 4);
		assert!(!hull.contains(&Point::new(2.0, 2.0)));
	}

	#[test]
	fn bounds_of_points() {
		let (lo, hi) = bounds(&[Point::new(1.0, -2.0), Point::new(-3.0, 5.0)]).unwrap();
		assert_eq!((lo, hi), (Point::new(-3.0, -2.0), Point::new(1.0, 5.0)));
		assert!(bounds(&[]).is_none());
	}
}
