//! Collapsible tree graph canvas.
//!
//! Renders the output of [`crate::builder`] on an HTML canvas with:
//! - Left-to-right tree layout computed by the builder
//! - Pan, zoom, and node dragging interactions
//! - Click-to-toggle reporting for nodes that have children
//! - An eased camera fit after every rebuild
//!
//! # Example
//!
//! ```ignore
//! use cloud_graph::components::tree_graph::TreeGraphCanvas;
//!
//! view! { <TreeGraphCanvas data=visible on_node_click=toggle fullscreen=true /> }
//! ```

mod component;
mod render;
pub mod scale;
pub mod state;
pub mod theme;

pub use component::TreeGraphCanvas;
pub use theme::Theme;
