//! Visible-graph derivation.
//!
//! Walks the hierarchy depth-first from the root and produces the nodes and
//! edges the canvas should draw for one snapshot of expansion and filter
//! state. The walk is pure: the same inputs always yield the same lists in
//! the same order (pre-order, children in declared order).
//!
//! Two rules decide what is reached:
//! - a node failing the filter is dropped together with its whole subtree,
//!   even if descendants would pass on their own;
//! - a collapsed node is emitted but its children are never visited, so they
//!   are not filter-evaluated either.
//!
//! Each ID is emitted at most once. A child that is already on screen (a
//! cycle back to an ancestor, or a node shared by two parents) is skipped,
//! so the walk terminates on any input.

use std::collections::HashSet;

use log::debug;
use serde::Deserialize;

use crate::expansion::ExpansionState;
use crate::filter::FilterEvaluator;
use crate::hierarchy::{HierarchyStore, NodeRecord};
use crate::style::{NodePalette, NodeStyle};

/// Spacing of the left-to-right tree layout, in world units.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Horizontal distance from a parent to each of its children.
	pub horizontal_step: f64,
	/// Vertical distance between adjacent siblings.
	pub vertical_step: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			horizontal_step: 300.0,
			vertical_step: 150.0,
		}
	}
}

/// World-space position of a node center.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	/// Grows to the right, away from the root.
	pub x: f64,
	/// Grows downwards.
	pub y: f64,
}

/// A node that passed the filter and sits under expanded ancestors.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleNode {
	/// ID of the underlying record.
	pub id: String,
	/// Layout position; the root sits at the origin.
	pub position: Position,
	/// Decorated, multi-line label.
	pub label: String,
	/// Colors, size and clickability.
	pub style: NodeStyle,
}

/// Parent-to-child connection between two visible nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleEdge {
	/// `edge-{source}-{target}`.
	pub id: String,
	/// Parent ID.
	pub source: String,
	/// Child ID.
	pub target: String,
}

/// Everything the render surface draws for one state snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleGraph {
	/// Nodes in pre-order.
	pub nodes: Vec<VisibleNode>,
	/// Edges in the order their targets were emitted.
	pub edges: Vec<VisibleEdge>,
}

impl VisibleGraph {
	/// Look up a visible node by ID.
	pub fn node(&self, id: &str) -> Option<&VisibleNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// True when not even the root is visible.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Build the visible graph with the default layout and palette.
pub fn build(
	store: &HierarchyStore,
	root_id: &str,
	expansion: &ExpansionState,
	filter: &FilterEvaluator,
) -> VisibleGraph {
	GraphBuilder::new(store, expansion, filter).build(root_id)
}

/// Traversal inputs for one build. Holds no state between builds.
pub struct GraphBuilder<'a> {
	store: &'a HierarchyStore,
	expansion: &'a ExpansionState,
	filter: &'a FilterEvaluator,
	layout: LayoutConfig,
	palette: NodePalette,
}

impl<'a> GraphBuilder<'a> {
	/// Builder with the default layout and palette.
	pub fn new(
		store: &'a HierarchyStore,
		expansion: &'a ExpansionState,
		filter: &'a FilterEvaluator,
	) -> Self {
		Self {
			store,
			expansion,
			filter,
			layout: LayoutConfig::default(),
			palette: NodePalette::default(),
		}
	}

	/// Override the sibling and depth spacing.
	pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
		self.layout = layout;
		self
	}

	/// Override node colors and sizes.
	pub fn with_palette(mut self, palette: NodePalette) -> Self {
		self.palette = palette;
		self
	}

	/// Walk from `root_id`. A missing or filtered-out root yields an empty graph.
	pub fn build(&self, root_id: &str) -> VisibleGraph {
		let mut out = VisibleGraph::default();
		let mut emitted = HashSet::new();
		if let Some(root) = self.admit(root_id) {
			self.visit(root, Position::default(), root_id, &mut emitted, &mut out);
		}
		debug!(
			"built visible graph from '{}' ({} filter): {} nodes, {} edges",
			root_id,
			self.filter.mode(),
			out.nodes.len(),
			out.edges.len()
		);
		out
	}

	/// Resolve `id` and apply the filter. `None` prunes the branch.
	fn admit(&self, id: &str) -> Option<&'a NodeRecord> {
		let Some(record) = self.store.get(id) else {
			debug!("skipping dangling reference '{id}'");
			return None;
		};
		self.filter.is_visible(record).then_some(record)
	}

	fn visit(
		&self,
		record: &'a NodeRecord,
		at: Position,
		root_id: &str,
		emitted: &mut HashSet<&'a str>,
		out: &mut VisibleGraph,
	) {
		emitted.insert(record.id.as_str());
		let has_children = record.has_children();
		let is_expanded = self.expansion.contains(&record.id);

		out.nodes.push(VisibleNode {
			id: record.id.clone(),
			position: at,
			label: self.filter.decorate_label(record, has_children, is_expanded),
			style: self.palette.style_for(record, record.id == root_id),
		});

		if !is_expanded || !has_children {
			return;
		}

		// Siblings are centered on the parent's row, counting every declared
		// child so that pruned siblings keep their slots.
		let center = (record.children.len() - 1) as f64 / 2.0;
		for (i, child_id) in record.children.iter().enumerate() {
			if emitted.contains(child_id.as_str()) {
				debug!("skipping '{child_id}' under '{}': already shown", record.id);
				continue;
			}
			let Some(child) = self.admit(child_id) else {
				continue;
			};
			let child_at = Position {
				x: at.x + self.layout.horizontal_step,
				y: at.y + (i as f64 - center) * self.layout.vertical_step,
			};
			out.edges.push(VisibleEdge {
				id: format!("edge-{}-{}", record.id, child.id),
				source: record.id.clone(),
				target: child.id.clone(),
			});
			self.visit(child, child_at, root_id, emitted, out);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use crate::filter::FilterMode;
	use crate::hierarchy::tests::record;
	use crate::style::Color;

	fn chain_store() -> HierarchyStore {
		HierarchyStore::new(
			"cloud",
			vec![
				record("cloud", 2, 0, &["aws"]),
				record("aws", 0, 0, &["ec2"]),
				record("ec2", 2, 0, &[]),
			],
		)
	}

	fn ids(graph: &VisibleGraph) -> Vec<&str> {
		graph.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	fn descendants<'s>(store: &'s HierarchyStore, id: &str, acc: &mut Vec<&'s str>) {
		if let Some(node) = store.get(id) {
			for child in &node.children {
				acc.push(child);
				descendants(store, child, acc);
			}
		}
	}

	#[test]
	fn pruned_child_hides_alerting_grandchild() {
		let store = chain_store();
		let mut expansion = ExpansionState::new("cloud");
		expansion.toggle("aws");

		let graph = build(
			&store,
			"cloud",
			&expansion,
			&FilterEvaluator::new(FilterMode::Alerts),
		);
		assert_eq!(ids(&graph), ["cloud"]);
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn collapsed_child_stops_traversal() {
		let store = chain_store();
		let expansion = ExpansionState::new("cloud");

		let graph = build(&store, "cloud", &expansion, &FilterEvaluator::default());
		assert_eq!(ids(&graph), ["cloud", "aws"]);
		assert_eq!(
			graph.edges,
			[VisibleEdge {
				id: "edge-cloud-aws".to_string(),
				source: "cloud".to_string(),
				target: "aws".to_string(),
			}]
		);
		assert!(graph.node("aws").unwrap().label.ends_with('➕'));
		assert!(graph.node("cloud").unwrap().label.ends_with('➖'));
	}

	#[test]
	fn children_are_centered_on_parent() {
		let store = HierarchyStore::new(
			"cloud",
			vec![
				record("cloud", 0, 0, &["a", "b", "c"]),
				record("a", 0, 0, &[]),
				record("b", 0, 0, &["d", "e"]),
				record("c", 0, 0, &[]),
				record("d", 0, 0, &[]),
				record("e", 0, 0, &[]),
			],
		);
		let mut expansion = ExpansionState::new("cloud");
		expansion.toggle("b");
		let graph = build(&store, "cloud", &expansion, &FilterEvaluator::default());

		assert_eq!(ids(&graph), ["cloud", "a", "b", "d", "e", "c"]);
		let at = |id: &str| graph.node(id).unwrap().position;
		assert_eq!(at("cloud"), Position { x: 0.0, y: 0.0 });
		assert_eq!(at("a"), Position { x: 300.0, y: -150.0 });
		assert_eq!(at("b"), Position { x: 300.0, y: 0.0 });
		assert_eq!(at("c"), Position { x: 300.0, y: 150.0 });
		assert_eq!(at("d"), Position { x: 600.0, y: -75.0 });
		assert_eq!(at("e"), Position { x: 600.0, y: 75.0 });
	}

	#[test]
	fn custom_layout_spacing() {
		let store = HierarchyStore::new(
			"cloud",
			vec![
				record("cloud", 0, 0, &["a", "b"]),
				record("a", 0, 0, &[]),
				record("b", 0, 0, &[]),
			],
		);
		let expansion = ExpansionState::new("cloud");
		let filter = FilterEvaluator::default();
		let graph = GraphBuilder::new(&store, &expansion, &filter)
			.with_layout(LayoutConfig {
				horizontal_step: 100.0,
				vertical_step: 40.0,
			})
			.build("cloud");

		assert_eq!(graph.node("a").unwrap().position, Position { x: 100.0, y: -20.0 });
		assert_eq!(graph.node("b").unwrap().position, Position { x: 100.0, y: 20.0 });
	}

	#[test]
	fn filtered_sibling_keeps_its_slot() {
		let store = HierarchyStore::new(
			"cloud",
			vec![
				record("cloud", 1, 0, &["quiet", "loud"]),
				record("quiet", 0, 0, &[]),
				record("loud", 1, 0, &[]),
			],
		);
		let expansion = ExpansionState::new("cloud");
		let graph = build(
			&store,
			"cloud",
			&expansion,
			&FilterEvaluator::new(FilterMode::Alerts),
		);

		assert_eq!(ids(&graph), ["cloud", "loud"]);
		assert_eq!(graph.node("loud").unwrap().position.y, 75.0);
		assert_eq!(graph.edges.len(), 1);
	}

	#[test]
	fn dangling_references_are_skipped() {
		let store = HierarchyStore::new(
			"cloud",
			vec![
				record("cloud", 0, 0, &["ghost", "aws"]),
				record("aws", 0, 0, &[]),
			],
		);
		let expansion = ExpansionState::new("cloud");
		let graph = build(&store, "cloud", &expansion, &FilterEvaluator::default());

		assert_eq!(ids(&graph), ["cloud", "aws"]);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.node("aws").unwrap().position.y, 75.0);
	}

	#[test]
	fn missing_or_filtered_root_yields_empty_graph() {
		let store = chain_store();
		let expansion = ExpansionState::new("cloud");
		assert!(build(&store, "nowhere", &expansion, &FilterEvaluator::default()).is_empty());
		assert!(
			build(
				&store,
				"cloud",
				&expansion,
				&FilterEvaluator::new(FilterMode::Misconfigs)
			)
			.is_empty()
		);
	}

	#[test]
	fn style_hints_follow_root_and_type() {
		let store = HierarchyStore::sample();
		let expansion = ExpansionState::new("cloud");
		let graph = build(&store, "cloud", &expansion, &FilterEvaluator::default());

		let cloud = &graph.node("cloud").unwrap().style;
		let aws = &graph.node("aws").unwrap().style;
		let azure = &graph.node("azure").unwrap().style;
		assert_eq!(cloud.fill, Color::rgb(255, 255, 255));
		assert_eq!(cloud.diameter, 120.0);
		assert_eq!(aws.fill, Color::rgb(0xff, 0x95, 0x00));
		assert_eq!(aws.diameter, 100.0);
		assert_eq!(azure.fill, Color::rgb(0x10, 0xb9, 0x81));
		assert!(cloud.clickable && aws.clickable);
	}

	#[test]
	fn custom_palette_styles_nodes() {
		let store = chain_store();
		let expansion = ExpansionState::new("cloud");
		let filter = FilterEvaluator::default();
		let palette = NodePalette {
			provider_fills: Vec::new(),
			fallback_fill: Color::rgb(0x11, 0x22, 0x33),
			diameter: 64.0,
			root_diameter: 80.0,
			..NodePalette::default()
		};
		let graph = GraphBuilder::new(&store, &expansion, &filter)
			.with_palette(palette)
			.build("cloud");

		let aws = &graph.node("aws").unwrap().style;
		assert_eq!(aws.fill, Color::rgb(0x11, 0x22, 0x33));
		assert_eq!(aws.diameter, 64.0);
		assert_eq!(graph.node("cloud").unwrap().style.diameter, 80.0);
	}

	#[test]
	fn cycles_back_to_an_ancestor_terminate() {
		let expansion = {
			let mut e = ExpansionState::new("cloud");
			e.toggle("a");
			e
		};
		let filter = FilterEvaluator::default();

		let self_loop = HierarchyStore::new("cloud", vec![record("cloud", 0, 0, &["cloud"])]);
		let graph = build(&self_loop, "cloud", &expansion, &filter);
		assert_eq!(ids(&graph), ["cloud"]);
		assert!(graph.edges.is_empty());

		let through_child = HierarchyStore::new(
			"cloud",
			vec![
				record("cloud", 0, 0, &["a"]),
				record("a", 0, 0, &["cloud", "b"]),
				record("b", 0, 0, &[]),
			],
		);
		let graph = build(&through_child, "cloud", &expansion, &filter);
		assert_eq!(ids(&graph), ["cloud", "a", "b"]);
		let targets: Vec<&str> = graph.edges.iter().map(|e| e.target.as_str()).collect();
		assert_eq!(targets, ["a", "b"]);
		// "b" keeps its slot below the skipped back-reference.
		assert_eq!(graph.node("b").unwrap().position.y, 75.0);
	}

	#[test]
	fn shared_child_is_emitted_once() {
		let store = HierarchyStore::new(
			"cloud",
			vec![
				record("cloud", 0, 0, &["a", "b"]),
				record("a", 0, 0, &["c"]),
				record("b", 0, 0, &["c"]),
				record("c", 0, 0, &[]),
			],
		);
		let mut expansion = ExpansionState::new("cloud");
		expansion.toggle("a");
		expansion.toggle("b");
		let graph = build(&store, "cloud", &expansion, &FilterEvaluator::default());

		assert_eq!(ids(&graph), ["cloud", "a", "c", "b"]);
		assert!(graph.edges.iter().all(|e| e.id != "edge-b-c"));
	}

	#[test]
	fn invariants_hold_across_states() {
		let store = HierarchyStore::sample();
		let expansion_sets: [&[&str]; 4] = [
			&[],
			&["aws"],
			&["aws", "aws-ec2", "gcp", "gcp-gke"],
			&["azure", "gcp-gke"],
		];

		for mode in FilterMode::MODES {
			let filter = FilterEvaluator::new(mode);
			for extra in expansion_sets {
				let mut expansion = ExpansionState::new("cloud");
				for id in extra {
					expansion.toggle(id);
				}

				let graph = build(&store, "cloud", &expansion, &filter);
				assert_eq!(graph, build(&store, "cloud", &expansion, &filter));

				let visible: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
				assert_eq!(visible.len(), graph.nodes.len());

				for record in store.nodes() {
					if !filter.is_visible(record) {
						let mut hidden = vec![record.id.as_str()];
						descendants(&store, &record.id, &mut hidden);
						assert!(hidden.iter().all(|id| !visible.contains(id)));
					}
					if !expansion.contains(&record.id) {
						assert!(record.children.iter().all(|c| !visible.contains(c.as_str())));
						assert!(graph.edges.iter().all(|e| e.source != record.id));
					}
				}

				for edge in &graph.edges {
					assert!(visible.contains(edge.source.as_str()));
					assert!(visible.contains(edge.target.as_str()));
					let parent = store.get(&edge.source).unwrap();
					assert!(parent.children.contains(&edge.target));
				}
			}
		}
	}
}
