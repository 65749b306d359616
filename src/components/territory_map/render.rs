//! Canvas painting for the territory map.
//!
//! Layers, bottom to top:
//! 1. Sea (screen space)
//! 2. Landmass, plates clipped to it, then the dashed coastline
//! 3. Edges
//! 4. Nodes: unemphasized first, then selected/neighbor/hovered on top
//! 5. Plate labels, then node labels

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::graph::Point;

use super::controller::GraphController;
use super::geometry::Region;
use super::scale::ScaledValues;
use super::style::{NodeLook, NodeRole, edge_look, node_look, plate_look};
use super::theme::Theme;

/// Paint one frame.
pub fn render(controller: &GraphController, ctx: &CanvasRenderingContext2d) {
	let theme = controller.theme();
	let scale = controller.scaled();
	let transform = controller.transform();
	let (width, height) = controller.size();

	ctx.set_fill_style_str(&theme.terrain.sea.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);

	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	draw_regions(controller, ctx, &scale, theme);
	draw_edges(controller, ctx, &scale, theme);
	let looks = draw_nodes(controller, ctx, &scale, theme);
	draw_plate_labels(controller, ctx, &scale, theme);
	draw_node_labels(controller, ctx, &scale, theme, &looks);

	ctx.restore();
}

fn trace(ctx: &CanvasRenderingContext2d, polygon: &[Point]) {
	ctx.begin_path();
	let mut points = polygon.iter();
	if let Some(first) = points.next() {
		ctx.move_to(first.x, first.y);
		for p in points {
			ctx.line_to(p.x, p.y);
		}
		ctx.close_path();
	}
}

fn draw_regions(controller: &GraphController, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let regions = controller.regions();
	let Some(land) = &regions.landmass else {
		return;
	};
	let terrain = &theme.terrain;

	trace(ctx, &land.polygon);
	ctx.set_fill_style_str(&terrain.land.to_css());
	ctx.fill();

	ctx.save();
	trace(ctx, &land.polygon);
	ctx.clip();
	for plate in &regions.plates {
		draw_plate(controller, ctx, scale, theme, plate);
	}
	ctx.restore();

	trace(ctx, &land.polygon);
	ctx.set_stroke_style_str(&terrain.coast.to_css());
	ctx.set_line_width(terrain.coast_width / scale.k);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(8.0 / scale.k),
		&JsValue::from_f64(5.0 / scale.k),
	));
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_plate(
	controller: &GraphController,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	plate: &Region,
) {
	let look = plate_look(&plate.directory, plate.color, controller.selection(), theme);
	trace(ctx, &plate.polygon);
	ctx.set_fill_style_str(&look.fill.to_css());
	ctx.fill();
	ctx.set_stroke_style_str(&theme.terrain.plate_border.to_css());
	ctx.set_line_width(1.0 / scale.k);
	ctx.stroke();
}

fn draw_edges(controller: &GraphController, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let positions = controller.positions();
	let dirs = controller.directories();
	let selection = controller.selection();

	for &(s, t) in controller.edges() {
		let (a, b) = (positions[s], positions[t]);
		if a.distance(b) < 0.001 {
			continue;
		}
		let look = edge_look((s, t), (dirs[s].as_str(), dirs[t].as_str()), selection, scale, theme);
		ctx.set_stroke_style_str(&look.color.to_css());
		ctx.set_line_width(look.width);
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
}

/// Draws every node and returns their looks for the label pass.
fn draw_nodes(
	controller: &GraphController,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) -> Vec<NodeLook> {
	let positions = controller.positions();
	let dirs = controller.directories();
	let looks: Vec<NodeLook> = (0..positions.len())
		.map(|i| node_look(i, &dirs[i], controller.selection(), controller.hovered(), scale, theme))
		.collect();

	let emphasized = |look: &NodeLook| {
		look.ring || matches!(look.role, NodeRole::Selected | NodeRole::Neighbor)
	};

	// Pass 1: background nodes
	for (p, look) in positions.iter().zip(&looks).filter(|(_, l)| !emphasized(*l)) {
		draw_node(ctx, *p, look, scale, theme);
	}
	// Pass 2: emphasized nodes on top
	for (p, look) in positions.iter().zip(&looks).filter(|(_, l)| emphasized(*l)) {
		draw_node(ctx, *p, look, scale, theme);
	}
	looks
}

fn draw_node(ctx: &CanvasRenderingContext2d, p: Point, look: &NodeLook, scale: &ScaledValues, theme: &Theme) {
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, look.radius, 0.0, TAU);
	ctx.set_fill_style_str(&look.fill.to_css());
	ctx.fill();
	ctx.set_stroke_style_str(&theme.node.border.with_alpha(theme.node.border.a * look.fill.a).to_css());
	ctx.set_line_width(theme.node.border_width / scale.k);
	ctx.stroke();

	if look.ring {
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, look.radius + 3.0 / scale.k, 0.0, TAU);
		ctx.set_stroke_style_str(&theme.node.selected.lighten(0.3).with_alpha(0.85).to_css());
		ctx.set_line_width(1.5 / scale.k);
		ctx.stroke();
	}
}

fn draw_plate_labels(
	controller: &GraphController,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	if scale.region_label_alpha < 0.01 {
		return;
	}
	ctx.set_font(&scale.region_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for plate in &controller.regions().plates {
		let look = plate_look(&plate.directory, plate.color, controller.selection(), theme);
		let color = theme.terrain.plate_label.lerp(plate.color.darken(0.2), 0.15);
		let alpha = color.a * look.label_alpha * scale.region_label_alpha;
		ctx.set_fill_style_str(&color.with_alpha(alpha).to_css());
		let _ = ctx.fill_text(&plate.directory, plate.anchor.x, plate.anchor.y);
	}
}

fn draw_node_labels(
	controller: &GraphController,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	looks: &[NodeLook],
) {
	ctx.set_font(&scale.label_font);
	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	let label = theme.node.label;
	for ((node, p), look) in controller.nodes().iter().zip(controller.positions()).zip(looks) {
		if look.label_alpha < 0.01 {
			continue;
		}
		ctx.set_fill_style_str(&label.with_alpha(label.a * look.label_alpha).to_css());
		let _ = ctx.fill_text(&node.data.label, p.x + look.radius + 4.0 / scale.k, p.y);
	}
}
