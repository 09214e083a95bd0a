//! Visual theming for the tree graph.
//!
//! Background, edge and shared node appearance of the canvas. Per-node
//! colors come from [`NodePalette`], re-exported here with [`Color`].

pub use crate::style::{Color, NodePalette};

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Canvas fill
	pub color: Color,
	/// Dot grid color
	pub dot_color: Color,
	/// Distance between grid dots in world units (0 disables the grid)
	pub dot_gap: f64,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Stroke color of every edge.
	pub color: Color,
}

/// Node visual style shared by all nodes; per-node colors come from [`NodePalette`].
#[derive(Clone, Debug)]
pub struct NodeAppearance {
	/// Drop shadow color
	pub shadow_color: Color,
	/// Drop shadow blur in screen pixels
	pub shadow_blur: f64,
	/// Vertical drop shadow offset in screen pixels
	pub shadow_offset_y: f64,
	/// How much the fill darkens at full hover intensity
	pub hover_darken: f64,
	/// Hover ring color
	pub ring_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas fill and dot grid.
	pub background: BackgroundStyle,
	/// Edge stroke.
	pub edge: EdgeStyle,
	/// Shared node effects.
	pub node: NodeAppearance,
}

impl Theme {
	/// Light theme with a dot grid and blue connectors (default)
	pub fn light() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(250, 250, 250),
				dot_color: Color::rgb(0x91, 0x91, 0x9a),
				dot_gap: 20.0,
			},
			edge: EdgeStyle {
				color: Color::rgb(0x25, 0x63, 0xeb),
			},
			node: NodeAppearance {
				shadow_color: Color::rgba(0, 0, 0, 0.1),
				shadow_blur: 8.0,
				shadow_offset_y: 4.0,
				hover_darken: 0.12,
				ring_color: Color::rgb(0x25, 0x63, 0xeb),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}
