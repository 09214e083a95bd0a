//! Canvas view state and interaction tracking.
//!
//! Holds the most recent visible graph together with the pan/zoom transform,
//! in-progress drag and pan gestures, hover highlight intensities and the
//! camera-fit animation that runs after every rebuild.

use std::collections::HashMap;

use crate::builder::VisibleGraph;

use super::scale::ScaledValues;

/// Lower zoom limit.
pub const MIN_ZOOM: f64 = 0.1;
/// Upper zoom limit for wheel zooming.
pub const MAX_ZOOM: f64 = 10.0;

/// Fitting never zooms in past this level, so small trees keep natural size.
const MAX_FIT_ZOOM: f64 = 2.0;

/// Fraction of the fitted bounds added as margin on each side.
const FIT_PADDING: f64 = 0.1;
/// Seconds to wait after a rebuild before the camera starts moving.
const FIT_DELAY: f64 = 0.1;
/// Seconds the camera takes to reach the fitted view.
const FIT_DURATION: f64 = 0.3;

/// Pointer travel (screen pixels) below which a press-release counts as a click.
const CLICK_SLOP: f64 = 4.0;

/// Minimum time (seconds) a hover ring is held before it can fade out.
/// This prevents flashing when the mouse briefly touches a hover zone.
const MIN_HOLD_TIME: f64 = 0.12;

/// Cubic ease-in-out on `[0, 1]`.
pub fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	/// Horizontal screen offset of the world origin.
	pub x: f64,
	/// Vertical screen offset of the world origin.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl ViewTransform {
	fn lerp(self, to: ViewTransform, t: f64) -> Self {
		Self {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// A node is held.
	pub active: bool,
	/// Index of the held node.
	pub node_idx: Option<usize>,
	/// Screen position of the press.
	pub start_x: f64,
	/// Screen position of the press.
	pub start_y: f64,
	/// World position of the node at the press.
	pub node_start_x: f64,
	/// World position of the node at the press.
	pub node_start_y: f64,
	/// Set once the pointer leaves the click slop; the release is then not a click.
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// The background is held.
	pub active: bool,
	/// Screen position of the press.
	pub start_x: f64,
	/// Screen position of the press.
	pub start_y: f64,
	/// Transform offset at the press.
	pub transform_start_x: f64,
	/// Transform offset at the press.
	pub transform_start_y: f64,
}

/// Eased camera move from one transform to another.
#[derive(Clone, Debug)]
pub struct CameraFit {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
}

impl CameraFit {
	/// Advance by `dt` and return the transform for this frame, or `None`
	/// once the move has finished (the final frame returns `to` exactly).
	fn step(&mut self, dt: f64) -> Option<ViewTransform> {
		if self.elapsed >= FIT_DELAY + FIT_DURATION {
			return None;
		}
		self.elapsed += dt;
		let t = ((self.elapsed - FIT_DELAY) / FIT_DURATION).clamp(0.0, 1.0);
		Some(self.from.lerp(self.to, smooth_step(t)))
	}
}

/// Smoothly fading hover ring, one intensity per node.
///
/// Intensities follow exponential smoothing towards 1.0 for the hovered node
/// and back to 0.0 for everything else once its hold time has elapsed.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	/// Currently hovered node (if any)
	pub hovered: Option<usize>,
	ring_intensity: HashMap<usize, f64>,
	hold_timer: HashMap<usize, f64>,
}

impl HoverState {
	/// Change the hovered node, starting its hold timer.
	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		if let Some(idx) = node {
			self.hold_timer.insert(idx, MIN_HOLD_TIME);
		}
	}

	/// Advance the fades by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 6.0; // ~150ms to 95%
		const FADE_OUT_SPEED: f64 = 4.0; // ~250ms to 95%

		let fade_in_factor = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out_decay = (-FADE_OUT_SPEED * dt).exp();

		if let Some(idx) = self.hovered {
			let intensity = self.ring_intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in_factor;
		}

		let hovered = self.hovered;
		self.hold_timer.retain(|idx, timer| {
			if hovered == Some(*idx) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		let hold_timer = &self.hold_timer;
		self.ring_intensity.retain(|idx, intensity| {
			if hovered == Some(*idx) {
				return true;
			}
			if hold_timer.get(idx).copied().unwrap_or(0.0) <= 0.0 {
				*intensity *= fade_out_decay;
			}
			*intensity > 0.005
		});
	}

	/// Ring intensity in `[0, 1]` for a node index.
	pub fn ring_intensity(&self, idx: usize) -> f64 {
		self.ring_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Drop all hover state; node indices are meaningless after a rebuild.
	pub fn clear(&mut self) {
		*self = Self::default();
	}
}

/// Everything the canvas needs between frames.
///
/// `graph` is the builder's latest output. Node drags move positions inside
/// this copy only; the next rebuild replaces it wholesale.
pub struct TreeGraphState {
	/// Graph being drawn.
	pub graph: VisibleGraph,
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Node drag in progress.
	pub drag: DragState,
	/// Background pan in progress.
	pub pan: PanState,
	/// Hover ring fades.
	pub hover: HoverState,
	/// Running camera fit, if any.
	pub camera: Option<CameraFit>,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	edges: Vec<(usize, usize)>,
}

impl TreeGraphState {
	/// Start already fitted to `graph`, without animating.
	pub fn new(graph: VisibleGraph, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: VisibleGraph::default(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			camera: None,
			width,
			height,
			edges: Vec::new(),
		};
		state.replace_graph(graph);
		if let Some(fit) = state.fit_transform() {
			state.transform = fit;
		}
		state
	}

	/// Swap in a freshly built graph and ease the camera to fit it.
	pub fn set_graph(&mut self, graph: VisibleGraph) {
		self.replace_graph(graph);
		self.camera = self.fit_transform().map(|to| CameraFit {
			from: self.transform,
			to,
			elapsed: 0.0,
		});
	}

	fn replace_graph(&mut self, graph: VisibleGraph) {
		let index: HashMap<&str, usize> = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();
		self.edges = graph
			.edges
			.iter()
			.filter_map(|e| Some((*index.get(e.source.as_str())?, *index.get(e.target.as_str())?)))
			.collect();
		self.graph = graph;
		self.drag = DragState::default();
		self.hover.clear();
	}

	/// Resolved `(source, target)` node indices of the visible edges.
	pub fn edges(&self) -> &[(usize, usize)] {
		&self.edges
	}

	/// Transform that frames every node with [`FIT_PADDING`] margin.
	/// `None` for an empty graph.
	pub fn fit_transform(&self) -> Option<ViewTransform> {
		let mut nodes = self.graph.nodes.iter();
		let first = nodes.next()?;
		let r = first.style.diameter / 2.0;
		let (mut min_x, mut min_y, mut max_x, mut max_y) = (
			first.position.x - r,
			first.position.y - r,
			first.position.x + r,
			first.position.y + r,
		);
		for node in nodes {
			let r = node.style.diameter / 2.0;
			min_x = min_x.min(node.position.x - r);
			min_y = min_y.min(node.position.y - r);
			max_x = max_x.max(node.position.x + r);
			max_y = max_y.max(node.position.y + r);
		}

		let (bw, bh) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let k = ((self.width / bw).min(self.height / bh) / (1.0 + 2.0 * FIT_PADDING))
			.clamp(MIN_ZOOM, MAX_FIT_ZOOM);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		Some(ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		})
	}

	/// Convert a canvas position to world coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position. Later nodes are drawn on top.
	pub fn node_at_position(&self, sx: f64, sy: f64, scale: &ScaledValues) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.graph.nodes.iter().rposition(|node| {
			let (dx, dy) = (node.position.x - gx, node.position.y - gy);
			(dx * dx + dy * dy).sqrt() < node.style.diameter / 2.0 + scale.hit_slop
		})
	}

	/// Pointer pressed: grab a node, or start panning the background.
	pub fn press(&mut self, sx: f64, sy: f64, scale: &ScaledValues) {
		self.camera = None;
		if let Some(idx) = self.node_at_position(sx, sy, scale) {
			let at = self.graph.nodes[idx].position;
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				start_x: sx,
				start_y: sy,
				node_start_x: at.x,
				node_start_y: at.y,
				moved: false,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	/// Pointer moved: continue a drag or pan, otherwise update hover.
	pub fn pointer_move(&mut self, sx: f64, sy: f64, scale: &ScaledValues) {
		if self.drag.active {
			let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if !self.drag.moved && (dx * dx + dy * dy).sqrt() < CLICK_SLOP {
				return;
			}
			self.drag.moved = true;
			if let Some(node) = self.drag.node_idx.and_then(|i| self.graph.nodes.get_mut(i)) {
				node.position.x = self.drag.node_start_x + dx / self.transform.k;
				node.position.y = self.drag.node_start_y + dy / self.transform.k;
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		} else {
			let hovered = self.node_at_position(sx, sy, scale);
			self.hover.set_hover(hovered);
		}
	}

	/// Pointer released. Returns the ID of a clickable node that was pressed
	/// and released without being dragged.
	pub fn release(&mut self) -> Option<String> {
		let clicked = if self.drag.active && !self.drag.moved {
			self.drag
				.node_idx
				.and_then(|i| self.graph.nodes.get(i))
				.filter(|node| node.style.clickable)
				.map(|node| node.id.clone())
		} else {
			None
		};
		self.drag = DragState::default();
		self.pan.active = false;
		clicked
	}

	/// Pointer left the canvas: abandon gestures and hover.
	pub fn leave(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.hover.set_hover(None);
	}

	/// Zoom by `factor` around a screen position.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.camera = None;
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Whether the pointer should show as clickable at its last hover position.
	pub fn hovering_clickable(&self) -> bool {
		self.hover
			.hovered
			.and_then(|i| self.graph.nodes.get(i))
			.is_some_and(|n| n.style.clickable)
	}

	/// Advance camera and hover animations by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		if let Some(fit) = self.camera.as_mut() {
			match fit.step(dt) {
				Some(transform) => self.transform = transform,
				None => self.camera = None,
			}
		}
		self.hover.tick(dt);
	}

	/// Canvas resized: re-fit the graph without the rebuild delay.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		if let Some(to) = self.fit_transform() {
			self.camera = Some(CameraFit {
				from: self.transform,
				to,
				elapsed: FIT_DELAY,
			});
		}
	}
}
