//! Canvas rendering for the tree graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background fill and dot grid
//! 2. Edges (world space)
//! 3. Nodes with their labels, in build order, hover rings on top of their node

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use crate::builder::VisibleNode;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{TreeGraphState, smooth_step};
use super::theme::Theme;

/// Dot grids denser than this many screen pixels are skipped.
const MIN_DOT_SPACING: f64 = 6.0;

/// Renders the complete graph to the canvas.
pub fn render(
	state: &TreeGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();
}

fn draw_background(state: &TreeGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.background.color.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let gap = theme.background.dot_gap * state.transform.k;
	if gap < MIN_DOT_SPACING {
		return;
	}

	// Grid is anchored in world space so it pans and zooms with the graph.
	let offset_x = state.transform.x.rem_euclid(gap);
	let offset_y = state.transform.y.rem_euclid(gap);
	let radius = (state.transform.k).clamp(0.5, 1.5);
	ctx.set_fill_style_str(&theme.background.dot_color.to_css());

	let mut y = offset_y;
	while y < state.height {
		let mut x = offset_x;
		while x < state.width {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, PI * 2.0);
			ctx.fill();
			x += gap;
		}
		y += gap;
	}
}

fn draw_edges(
	state: &TreeGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	ctx.set_stroke_style_str(&theme.edge.color.to_css());
	ctx.set_line_width(scale.edge_line_width);

	for &(source, target) in state.edges() {
		let (Some(from), Some(to)) = (state.graph.nodes.get(source), state.graph.nodes.get(target))
		else {
			continue;
		};

		// Leave the parent on its right side and enter the child on its left.
		let (x1, y1) = (from.position.x + from.style.diameter / 2.0, from.position.y);
		let (x2, y2) = (to.position.x - to.style.diameter / 2.0, to.position.y);

		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
}

fn draw_nodes(
	state: &TreeGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	for (idx, node) in state.graph.nodes.iter().enumerate() {
		let hover_t = smooth_step(state.hover.ring_intensity(idx));
		draw_node(ctx, node, scale, theme, hover_t);
		if hover_t > 0.01 {
			draw_hover_ring(ctx, node, scale, theme, hover_t);
		}
		if scale.label_alpha > 0.01 {
			draw_label(ctx, node, scale);
		}
	}
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &VisibleNode,
	scale: &ScaledValues,
	theme: &Theme,
	hover_t: f64,
) {
	let (x, y) = (node.position.x, node.position.y);
	let radius = node.style.diameter / 2.0;
	let fill = node
		.style
		.fill
		.lerp(node.style.fill.darken(theme.node.hover_darken), hover_t);

	// Shadow parameters are in screen pixels and ignore the canvas transform.
	ctx.save();
	ctx.set_shadow_color(&theme.node.shadow_color.to_css());
	ctx.set_shadow_blur(theme.node.shadow_blur);
	ctx.set_shadow_offset_y(theme.node.shadow_offset_y);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill();
	ctx.restore();

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&node.style.border.to_css());
	ctx.set_line_width(scale.border_width);
	ctx.stroke();
}

fn draw_hover_ring(
	ctx: &CanvasRenderingContext2d,
	node: &VisibleNode,
	scale: &ScaledValues,
	theme: &Theme,
	hover_t: f64,
) {
	let radius = node.style.diameter / 2.0 + scale.ring_offset;
	let color = theme.node.ring_color;
	ctx.begin_path();
	let _ = ctx.arc(node.position.x, node.position.y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&color.with_alpha(color.a * 0.8 * hover_t).to_css());
	ctx.set_line_width(scale.ring_width);
	ctx.stroke();
}

/// Draws the multi-line label centered on the node, one row per line.
fn draw_label(ctx: &CanvasRenderingContext2d, node: &VisibleNode, scale: &ScaledValues) {
	let lines: Vec<&str> = node.label.lines().collect();
	let first_y =
		node.position.y - (lines.len().saturating_sub(1)) as f64 * scale.label_line_height / 2.0;

	ctx.set_global_alpha(scale.label_alpha);
	ctx.set_fill_style_str(&node.style.text.to_css());
	ctx.set_font(&scale.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(
			line,
			node.position.x,
			first_y + i as f64 * scale.label_line_height,
		);
	}
	ctx.set_global_alpha(1.0);
}
