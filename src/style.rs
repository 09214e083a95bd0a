//! Node presentation hints computed by the builder.
//!
//! Kept free of any canvas types so the traversal core can style nodes
//! without depending on the render surface.

use crate::hierarchy::NodeRecord;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color from its channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with opacity replaced.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Presentation hints for a circular node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Circle fill.
	pub fill: Color,
	/// Label color.
	pub text: Color,
	/// Circle outline.
	pub border: Color,
	/// Circle diameter in world units.
	pub diameter: f64,
	/// Whether clicking the node toggles its expansion (it has children).
	pub clickable: bool,
}

/// Node colors and sizes keyed by root-ness and provider kind.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Fill of the root node.
	pub root_fill: Color,
	/// Label color of the root node.
	pub root_text: Color,
	/// Diameter of the root node.
	pub root_diameter: f64,
	/// Fill per provider kind; kinds not listed use `fallback_fill`.
	pub provider_fills: Vec<(String, Color)>,
	/// Fill for kinds missing from `provider_fills`.
	pub fallback_fill: Color,
	/// Label color of every non-root node.
	pub provider_text: Color,
	/// Diameter of every non-root node.
	pub diameter: f64,
	/// Outline shared by all nodes.
	pub border: Color,
}

impl NodePalette {
	/// Style for `record`; the root gets its own fill, text and size.
	pub fn style_for(&self, record: &NodeRecord, is_root: bool) -> NodeStyle {
		let (fill, text, diameter) = if is_root {
			(self.root_fill, self.root_text, self.root_diameter)
		} else {
			let fill = self
				.provider_fills
				.iter()
				.find(|(kind, _)| *kind == record.kind)
				.map_or(self.fallback_fill, |&(_, color)| color);
			(fill, self.provider_text, self.diameter)
		};
		NodeStyle {
			fill,
			text,
			border: self.border,
			diameter,
			clickable: record.has_children(),
		}
	}
}

impl Default for NodePalette {
	fn default() -> Self {
		Self {
			root_fill: Color::rgb(255, 255, 255),
			root_text: Color::rgb(0x33, 0x33, 0x33),
			root_diameter: 120.0,
			provider_fills: vec![("aws".to_string(), Color::rgb(0xff, 0x95, 0x00))],
			fallback_fill: Color::rgb(0x10, 0xb9, 0x81),
			provider_text: Color::rgb(255, 255, 255),
			diameter: 100.0,
			border: Color::rgb(0x25, 0x63, 0xeb),
		}
	}
}
