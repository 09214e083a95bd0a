//! cloud-graph: interactive, collapsible tree of cloud infrastructure.
//!
//! The core is [`builder::build`], a pure function from the static
//! [`hierarchy::HierarchyStore`], the [`expansion::ExpansionState`] and the
//! active [`filter::FilterEvaluator`] to the nodes and edges to draw. The
//! WASM front end re-runs it on every state change and draws the result on a
//! canvas with pan/zoom, drag, and click-to-expand.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod builder;
pub mod components;
pub mod expansion;
pub mod filter;
pub mod hierarchy;
pub mod style;

pub use builder::{GraphBuilder, LayoutConfig, VisibleEdge, VisibleGraph, VisibleNode, build};
pub use components::{FilterPanel, TreeGraphCanvas};
pub use expansion::ExpansionState;
pub use filter::{FilterError, FilterEvaluator, FilterMode};
pub use hierarchy::{HierarchyDocument, HierarchyError, HierarchyStore, NodeRecord};
pub use style::{Color, NodePalette, NodeStyle};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("cloud-graph: logging initialized");
}

/// Everything the view needs at startup.
#[derive(Clone, Debug)]
pub struct ViewSetup {
	/// The hierarchy to show.
	pub store: HierarchyStore,
	/// Filter with the document's initial mode applied.
	pub filter: FilterEvaluator,
	/// Layout spacing.
	pub layout: LayoutConfig,
}

impl ViewSetup {
	/// Resolve the embedded document, falling back to the sample hierarchy.
	///
	/// An unknown filter name keeps the default mode, and a hierarchy that is
	/// not a proper tree is still shown; both are only logged.
	pub fn from_document(document: Option<HierarchyDocument>) -> Self {
		let (store, filter_name, layout) = match document {
			Some(doc) => doc.into_parts(),
			None => {
				info!("cloud-graph: no embedded hierarchy, using sample data");
				(HierarchyStore::sample(), None, LayoutConfig::default())
			}
		};

		let mut filter = FilterEvaluator::default();
		if let Some(name) = filter_name {
			if let Err(e) = filter.select(&name) {
				warn!("cloud-graph: {e}; keeping '{}'", filter.mode());
			}
		}

		if let Err(e) = store.validate() {
			warn!("cloud-graph: hierarchy is not a clean tree: {e}");
		}
		info!(
			"cloud-graph: {} nodes under '{}', filter '{}'",
			store.len(),
			store.root_id(),
			filter.mode()
		);

		Self {
			store,
			filter,
			layout,
		}
	}
}

/// Load the hierarchy document from a script element with id="hierarchy-data".
/// Expected format: JSON with { root?, filter?, layout?, nodes: [...] }
fn load_document() -> Option<HierarchyDocument> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("hierarchy-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match HierarchyDocument::from_json(&json_text) {
		Ok(doc) => Some(doc),
		Err(e) => {
			warn!("cloud-graph: failed to parse hierarchy data: {}", e);
			None
		}
	}
}

/// Main application component.
///
/// Owns the only mutable state, expansion and filter mode, and rebuilds the
/// visible graph whenever either changes.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let ViewSetup {
		store,
		filter,
		layout,
	} = ViewSetup::from_document(load_document());

	let (expansion, set_expansion) = signal(ExpansionState::new(store.root_id()));
	let (filter, set_filter) = signal(filter);
	let store = StoredValue::new(store);

	let visible = Memo::new(move |_| {
		store.with_value(|store| {
			expansion.with(|expansion| {
				filter.with(|filter| {
					GraphBuilder::new(store, expansion, filter)
						.with_layout(layout)
						.build(store.root_id())
				})
			})
		})
	});

	// Clicks on childless nodes never toggle.
	let on_node_click = Callback::new(move |id: String| {
		if store.with_value(|s| s.has_children(&id)) {
			set_expansion.update(|e| {
				e.toggle(&id);
			});
		}
	});
	let on_select = Callback::new(move |mode: FilterMode| {
		set_filter.update(|f| f.set_mode(mode));
	});
	let active_mode = Signal::derive(move || filter.with(|f| f.mode()));

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Cloud Infrastructure" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph" style="position: relative; width: 100vw; height: 100vh;">
			<TreeGraphCanvas data=visible on_node_click=on_node_click fullscreen=true />
			<FilterPanel active=active_mode on_select=on_select />
			<div
				class="graph-overlay"
				style="position: absolute; bottom: 16px; left: 16px; color: #4b5563; font-size: 12px;"
			>
				<p>"Click ➕ nodes to expand. Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
			</div>
		</div>
	}
}
