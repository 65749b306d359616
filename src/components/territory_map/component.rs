//! Leptos component wrapping the territory map canvas.
//!
//! The component creates an HTML canvas and forwards pointer and wheel events
//! to the [`GraphController`]. Pointer capture keeps drags and pans alive when
//! the pointer leaves the canvas. An animation loop runs via
//! `requestAnimationFrame`, ticking the controller and repainting each frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent, Window,
};

use super::controller::{ControllerConfig, GraphController, OpenFileRequest, SelectionSummary};
use super::render;
use super::theme::Theme;
use crate::graph::GraphData;

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback: f64| v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback);
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

/// Pointer position relative to the canvas.
fn local_point(canvas: &HtmlCanvasElement, x: i32, y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(x as f64 - rect.left(), y as f64 - rect.top())
}

fn set_cursor(canvas: &HtmlCanvasElement, controller: &GraphController) {
	let _ = web_sys::HtmlElement::style(canvas).set_property("cursor", controller.cursor().as_css());
}

/// Post an open request to the embedding host, or to this window when not embedded.
fn post_open_request(request: &OpenFileRequest) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let target = window.parent().ok().flatten().unwrap_or_else(|| window.clone());
	let posted = serde_json::to_string(request)
		.map_err(|e| e.to_string())
		.and_then(|json| {
			target
				.post_message(&JsValue::from_str(&json), "*")
				.map_err(|e| format!("{:?}", e))
		});
	if let Err(e) = posted {
		warn!("code-territory: could not request {}: {}", request.path, e);
	}
}

fn summary_title(summary: &Option<SelectionSummary>) -> String {
	match summary {
		Some(SelectionSummary::Node { label, .. }) => label.clone(),
		Some(SelectionSummary::Cluster { directory, .. }) => directory.clone(),
		None => String::new(),
	}
}

fn summary_detail(summary: &Option<SelectionSummary>) -> String {
	match summary {
		Some(SelectionSummary::Node {
			path, neighbors, ..
		}) => format!("{} · {} connected", path, neighbors),
		Some(SelectionSummary::Cluster { members, .. }) => format!("{} files", members),
		None => String::new(),
	}
}

/// Renders the interactive territory map on a canvas element.
///
/// Pass graph data via the reactive `data` signal; new data replaces the map
/// wholesale. The component sizes itself to its parent container by default;
/// set `fullscreen = true` to fill the viewport and follow window resizes.
#[component]
pub fn TerritoryMapCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] theme: Option<Theme>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphController>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let summary = RwSignal::new(None::<SelectionSummary>);
	// Pointer holding the capture; other pointers are ignored until it is released.
	let active_pointer: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let graph = data.get();
		summary.set(None);
		if let Some(ref mut controller) = *context_init.borrow_mut() {
			controller.set_data(&graph);
			return;
		}

		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				warn!("code-territory: canvas 2d context unavailable");
				return;
			}
		};

		let config = ControllerConfig {
			theme: theme.clone().unwrap_or_default(),
			..ControllerConfig::default()
		};
		*context_init.borrow_mut() = Some(GraphController::new(&graph, w, h, config));

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut controller) = *context_resize.borrow_mut() {
					controller.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut controller) = *context_anim.borrow_mut() {
				controller.tick();
				render::render(controller, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (context_pd, active_pd) = (context.clone(), active_pointer.clone());
	let on_pointerdown = move |ev: PointerEvent| {
		if active_pd.get().is_some() {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		active_pd.set(Some(ev.pointer_id()));
		let _ = canvas.set_pointer_capture(ev.pointer_id());
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());

		if let Some(ref mut controller) = *context_pd.borrow_mut() {
			controller.pointer_down(x, y, ev.time_stamp());
			summary.set(controller.selection_summary());
			set_cursor(&canvas, controller);
		}
	};

	let (context_pm, active_pm) = (context.clone(), active_pointer.clone());
	let on_pointermove = move |ev: PointerEvent| {
		if active_pm.get().is_some_and(|id| id != ev.pointer_id()) {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());

		if let Some(ref mut controller) = *context_pm.borrow_mut() {
			controller.pointer_move(x, y);
			set_cursor(&canvas, controller);
		}
	};

	let (context_pu, active_pu) = (context.clone(), active_pointer.clone());
	let on_pointerup = move |ev: PointerEvent| {
		if active_pu.get() != Some(ev.pointer_id()) {
			return;
		}
		active_pu.set(None);
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let _ = canvas.release_pointer_capture(ev.pointer_id());

		if let Some(ref mut controller) = *context_pu.borrow_mut() {
			controller.pointer_up();
			set_cursor(&canvas, controller);
		}
	};

	let context_pl = context.clone();
	let on_pointerleave = move |_: PointerEvent| {
		if let Some(ref mut controller) = *context_pl.borrow_mut() {
			controller.pointer_leave();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());

		if let Some(ref mut controller) = *context_wh.borrow_mut() {
			controller.wheel(ev.delta_y(), x, y);
		}
	};

	let context_open = context.clone();
	let on_open = move |_: MouseEvent| {
		let request = context_open
			.borrow()
			.as_ref()
			.and_then(|controller| controller.open_selected());
		if let Some(request) = request {
			post_open_request(&request);
		}
	};

	let is_node = move || matches!(summary.get(), Some(SelectionSummary::Node { .. }));

	view! {
		<canvas
			node_ref=canvas_ref
			class="territory-map-canvas"
			on:pointerdown=on_pointerdown
			on:pointermove=on_pointermove
			on:pointercancel=on_pointerup.clone()
			on:pointerup=on_pointerup
			on:pointerleave=on_pointerleave
			on:wheel=on_wheel
			style="display: block; cursor: grab; touch-action: none;"
		/>
		<div
			class="selection-overlay"
			style:display=move || if summary.get().is_some() { "block" } else { "none" }
		>
			<h2>{move || summary_title(&summary.get())}</h2>
			<p class="selection-detail">{move || summary_detail(&summary.get())}</p>
			<button
				class="open-file"
				style:display=move || if is_node() { "inline-block" } else { "none" }
				on:click=on_open
			>
				"Open file"
			</button>
		</div>
	}
}
