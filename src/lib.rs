//! code-territory: a codebase import graph drawn as a territory map.
//!
//! The native side ([`graph`]) turns a file set into a node/edge graph by
//! extracting import statements and resolving them against the known files.
//! The browser side ([`components::territory_map`]) lays that graph out as
//! directory "plates" on a landmass, with pan, zoom, dragging and selection.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

#[cfg(test)]
use tempfile as _;

pub mod components;
pub mod config;
pub mod graph;

pub use components::territory_map::{TerritoryMapCanvas, Theme};
pub use config::BuildConfig;
pub use graph::{GraphBuilder, GraphData, GraphEdge, GraphError, GraphNode};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("code-territory: logging initialized");
}

/// Text of the `<script>` element with the given id.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }
fn load_graph_data() -> Option<GraphData> {
	let json_text = script_text("graph-data")?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"code-territory: loaded {} nodes, {} edges",
				data.nodes.len(),
				data.edges.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("code-territory: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Theme named by the `data-theme` attribute of the graph script, if any.
fn load_theme() -> Theme {
	let name = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id("graph-data"))
		.and_then(|e| e.get_attribute("data-theme"));
	match name.as_deref() {
		Some("parchment") => Theme::parchment(),
		_ => Theme::default_theme(),
	}
}

/// Main application component.
/// Loads graph data from DOM and renders the territory map.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let theme = load_theme();
	let theme_name = theme.name;
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=theme_name />
		<Title text="Code Territory" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<TerritoryMapCanvas data=graph_signal fullscreen=true theme=theme />
			<div class="graph-overlay">
				<h1>"Code Territory"</h1>
				<p class="subtitle">"Double-click a file or directory to focus it. Drag files to move them. Scroll to zoom, drag the sea to pan."</p>
			</div>
		</div>
	}
}
