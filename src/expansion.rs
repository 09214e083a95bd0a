//! Which nodes currently show their children.

use std::collections::HashSet;

use log::debug;

/// Set of expanded node IDs.
///
/// Membership only decides whether the builder descends into a node's
/// children; it never hides the node itself. Toggling an ID that has no
/// children, or that the hierarchy does not know, is accepted and has no
/// visible effect.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpansionState {
	expanded: HashSet<String>,
}

impl ExpansionState {
	/// Initial state: only the root is expanded.
	pub fn new(root: impl Into<String>) -> Self {
		Self {
			expanded: HashSet::from([root.into()]),
		}
	}

	/// Whether `id` currently shows its children.
	pub fn contains(&self, id: &str) -> bool {
		self.expanded.contains(id)
	}

	/// Flip `id` between collapsed and expanded. Returns whether it is now expanded.
	pub fn toggle(&mut self, id: &str) -> bool {
		if self.expanded.remove(id) {
			debug!("collapsed {id}");
			false
		} else {
			self.expanded.insert(id.to_string());
			debug!("expanded {id}");
			true
		}
	}

	/// Number of expanded IDs.
	pub fn len(&self) -> usize {
		self.expanded.len()
	}

	/// True when even the root is collapsed.
	pub fn is_empty(&self) -> bool {
		self.expanded.is_empty()
	}
}
