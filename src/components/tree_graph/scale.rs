//! Zoom-dependent scaling configuration for graph visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: The coordinate system of the layout. Node diameters and
//!   layout steps live here and scale with zoom.
//! - **Screen-space**: Pixel coordinates on the canvas. Values in screen-space
//!   remain constant regardless of zoom level.
//!
//! # Scaling Behaviors
//!
//! - [`ScaleBehavior::World`]: Scales with zoom.
//! - [`ScaleBehavior::Screen`]: Constant screen size. Divides by `k` to counteract
//!   the canvas transform.
//! - [`ScaleBehavior::Clamped`]: World-space scaling with min/max screen-size bounds,
//!   so thin strokes never vanish when zoomed out.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped {
		/// Smallest on-screen size in pixels.
		min_screen: f64,
		/// Largest on-screen size in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Zoom range over which an element fades in.
///
/// Fully visible at `full_alpha_k` and above, invisible at `zero_alpha_k` and below.
#[derive(Clone, Debug)]
pub struct AlphaFade {
	/// Zoom at and below which the element is hidden.
	pub zero_alpha_k: f64,
	/// Zoom at and above which the element is opaque.
	pub full_alpha_k: f64,
}

impl AlphaFade {
	/// Compute alpha multiplier for a given zoom level.
	pub fn apply(&self, k: f64) -> f64 {
		if self.zero_alpha_k == self.full_alpha_k {
			return 1.0;
		}
		((k - self.zero_alpha_k) / (self.full_alpha_k - self.zero_alpha_k)).clamp(0.0, 1.0)
	}
}

/// Configuration for node visual scaling.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Border width in world units.
	pub border_width: f64,
	/// How `border_width` reacts to zoom.
	pub border_behavior: ScaleBehavior,
	/// Extra hit margin around the circle, in screen pixels.
	pub hit_slop: f64,
	/// Label font size in world units.
	pub label_size: f64,
	/// How `label_size` reacts to zoom.
	pub label_size_behavior: ScaleBehavior,
	/// Line height as a multiple of the font size.
	pub label_line_height: f64,
	/// Labels fade out when zoomed far out.
	pub label_fade: AlphaFade,
}

/// Configuration for edge visual scaling.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Line width in world units.
	pub line_width: f64,
	/// How `line_width` reacts to zoom.
	pub line_behavior: ScaleBehavior,
}

/// Configuration for hover ring effects.
#[derive(Clone, Debug)]
pub struct RingScaleConfig {
	/// Stroke width for hover ring in screen pixels.
	pub width: f64,
	/// Ring offset from node edge in screen pixels.
	pub offset: f64,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node borders, hit area and labels.
	pub node: NodeScaleConfig,
	/// Edge strokes.
	pub edge: EdgeScaleConfig,
	/// Hover ring.
	pub ring: RingScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				border_width: 2.0,
				border_behavior: ScaleBehavior::Clamped {
					min_screen: 1.0,
					max_screen: f64::INFINITY,
				},
				hit_slop: 4.0,
				label_size: 12.0,
				label_size_behavior: ScaleBehavior::World,
				label_line_height: 1.3,
				label_fade: AlphaFade {
					zero_alpha_k: 0.15,
					full_alpha_k: 0.35,
				},
			},
			edge: EdgeScaleConfig {
				line_width: 3.0,
				line_behavior: ScaleBehavior::Clamped {
					min_screen: 1.0,
					max_screen: f64::INFINITY,
				},
			},
			ring: RingScaleConfig {
				width: 2.0,
				offset: 4.0,
			},
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in world-space (ready to use after canvas transform).
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Node border width.
	pub border_width: f64,
	/// Hit margin in world-space.
	pub hit_slop: f64,
	/// Label font string (e.g., "bold 12px sans-serif").
	pub label_font: String,
	/// Distance between label rows.
	pub label_line_height: f64,
	/// Label alpha multiplier [0, 1].
	pub label_alpha: f64,
	/// Edge stroke width.
	pub edge_line_width: f64,
	/// Hover ring stroke width.
	pub ring_width: f64,
	/// Gap between node edge and hover ring.
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Compute scaled values from configuration and current zoom level.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_size = config
			.node
			.label_size_behavior
			.apply(config.node.label_size, k);

		Self {
			k,
			border_width: config
				.node
				.border_behavior
				.apply(config.node.border_width, k),
			hit_slop: ScaleBehavior::Screen.apply(config.node.hit_slop, k),
			label_font: format!("bold {}px sans-serif", label_size),
			label_line_height: label_size * config.node.label_line_height,
			label_alpha: config.node.label_fade.apply(k),
			edge_line_width: config.edge.line_behavior.apply(config.edge.line_width, k),
			ring_width: config.ring.width / k,
			ring_offset: config.ring.offset / k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_strokes_keep_a_minimum_screen_width() {
		let config = ScaleConfig::default();
		let near = ScaledValues::new(&config, 1.0);
		assert_eq!(near.edge_line_width, 3.0);

		// At k = 0.1 a 3-unit line would be 0.3px on screen.
		let far = ScaledValues::new(&config, 0.1);
		assert!((far.edge_line_width * 0.1 - 1.0).abs() < 1e-9);
	}

	#[test]
	fn labels_fade_when_zoomed_out() {
		let config = ScaleConfig::default();
		assert_eq!(ScaledValues::new(&config, 1.0).label_alpha, 1.0);
		assert_eq!(ScaledValues::new(&config, 0.1).label_alpha, 0.0);
		let mid = ScaledValues::new(&config, 0.25).label_alpha;
		assert!(mid > 0.0 && mid < 1.0);
	}
}
