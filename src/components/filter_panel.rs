//! Filter mode selector overlaid on the canvas.

use leptos::prelude::*;

use crate::filter::FilterMode;
use crate::style::Color;

const INACTIVE_BACKGROUND: Color = Color::rgb(243, 244, 246);
const INACTIVE_TEXT: Color = Color::rgb(55, 65, 81);

/// Background of the active button for each mode.
fn accent(mode: FilterMode) -> Color {
	match mode {
		FilterMode::All => Color::rgb(0x3b, 0x82, 0xf6),
		FilterMode::Alerts => Color::rgb(0xef, 0x44, 0x44),
		FilterMode::Misconfigs => Color::rgb(0xf9, 0x73, 0x16),
	}
}

fn button_style(mode: FilterMode, active: bool) -> String {
	let (background, text) = if active {
		(accent(mode), Color::rgb(255, 255, 255))
	} else {
		(INACTIVE_BACKGROUND, INACTIVE_TEXT)
	};
	format!(
		"padding: 8px 12px; font-size: 14px; border: none; border-radius: 4px; \
		 cursor: pointer; text-align: left; background: {}; color: {};",
		background.to_css(),
		text.to_css()
	)
}

/// Three mutually exclusive buttons, one per [`FilterMode`].
#[component]
pub fn FilterPanel(
	#[prop(into)] active: Signal<FilterMode>,
	#[prop(into)] on_select: Callback<FilterMode>,
) -> impl IntoView {
	view! {
		<div
			class="filter-panel"
			style="position: absolute; top: 16px; left: 16px; z-index: 10; background: #ffffff; \
			       padding: 16px; border-radius: 8px; border: 1px solid #e5e7eb; \
			       box-shadow: 0 10px 15px rgba(0, 0, 0, 0.1);"
		>
			<h3 style="margin: 0 0 12px; font-size: 14px; font-weight: bold; color: #374151;">
				"Filter Nodes"
			</h3>
			<div style="display: flex; flex-direction: column; gap: 8px;">
				{FilterMode::MODES
					.into_iter()
					.map(move |mode| {
						view! {
							<button
								style=move || button_style(mode, active.get() == mode)
								on:click=move |_| on_select.run(mode)
							>
								{mode.caption()}
							</button>
						}
					})
					.collect_view()}
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_active_button_uses_accent() {
		let active = button_style(FilterMode::Alerts, true);
		assert!(active.contains("#ef4444"));
		assert!(active.contains("color: #ffffff"));

		let idle = button_style(FilterMode::Alerts, false);
		assert!(!idle.contains("#ef4444"));
		assert!(idle.contains("#f3f4f6"));
	}
}
