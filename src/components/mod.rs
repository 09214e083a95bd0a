//! UI components.

pub mod filter_panel;
pub mod tree_graph;

pub use filter_panel::FilterPanel;
pub use tree_graph::TreeGraphCanvas;
