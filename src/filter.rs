//! Health filter: which nodes qualify for display and how their labels read.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hierarchy::NodeRecord;

const ALERT_GLYPH: &str = "🔺";
const MISCONFIG_GLYPH: &str = "⚙️";
const COLLAPSE_GLYPH: &str = "➖";
const EXPAND_GLYPH: &str = "➕";

/// Errors from selecting a filter by name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FilterError {
	/// The name matches no [`FilterMode`].
	#[error("invalid filter mode '{0}', expected one of: all, alerts, misconfigs")]
	InvalidFilterMode(String),
}

/// The single active filter. Exactly one mode is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
	/// Every node qualifies.
	#[default]
	All,
	/// Only nodes with at least one alert.
	Alerts,
	/// Only nodes with at least one misconfiguration.
	Misconfigs,
}

impl FilterMode {
	/// All modes in the order the filter panel lists them.
	pub const MODES: [FilterMode; 3] = [FilterMode::All, FilterMode::Alerts, FilterMode::Misconfigs];

	/// Lowercase name, as accepted by [`FromStr`].
	pub fn as_str(self) -> &'static str {
		match self {
			FilterMode::All => "all",
			FilterMode::Alerts => "alerts",
			FilterMode::Misconfigs => "misconfigs",
		}
	}

	/// Button caption in the filter panel.
	pub fn caption(self) -> &'static str {
		match self {
			FilterMode::All => "🌐 All Nodes",
			FilterMode::Alerts => "🔺 Alerts Only",
			FilterMode::Misconfigs => "⚙️ Misconfigs Only",
		}
	}
}

impl fmt::Display for FilterMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for FilterMode {
	type Err = FilterError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"all" => Ok(FilterMode::All),
			"alerts" => Ok(FilterMode::Alerts),
			"misconfigs" => Ok(FilterMode::Misconfigs),
			other => Err(FilterError::InvalidFilterMode(other.to_string())),
		}
	}
}

/// Holds the active [`FilterMode`] and derives the visibility predicate and
/// label decoration from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterEvaluator {
	mode: FilterMode,
}

impl FilterEvaluator {
	/// Evaluator with `mode` active.
	pub fn new(mode: FilterMode) -> Self {
		Self { mode }
	}

	/// The active mode.
	pub fn mode(&self) -> FilterMode {
		self.mode
	}

	/// Replace the active mode wholesale.
	pub fn set_mode(&mut self, mode: FilterMode) {
		self.mode = mode;
	}

	/// Replace the active mode by name. On an unknown name the current mode is kept.
	pub fn select(&mut self, name: &str) -> Result<FilterMode, FilterError> {
		let mode = name.parse()?;
		self.mode = mode;
		Ok(mode)
	}

	/// Per-node predicate. Ancestors and descendants are not consulted.
	pub fn is_visible(&self, node: &NodeRecord) -> bool {
		match self.mode {
			FilterMode::All => true,
			FilterMode::Alerts => node.alerts > 0,
			FilterMode::Misconfigs => node.misconfigs > 0,
		}
	}

	/// Multi-line display label: name, the counts this mode cares about, and
	/// an expand/collapse glyph for nodes that have children.
	pub fn decorate_label(&self, node: &NodeRecord, has_children: bool, is_expanded: bool) -> String {
		let mut label = node.label.clone();
		label.push('\n');
		match self.mode {
			FilterMode::All => label.push_str(&format!(
				"{ALERT_GLYPH}{} {MISCONFIG_GLYPH}{}",
				node.alerts, node.misconfigs
			)),
			FilterMode::Alerts => label.push_str(&format!("{ALERT_GLYPH}{}", node.alerts)),
			FilterMode::Misconfigs => {
				label.push_str(&format!("{MISCONFIG_GLYPH}{}", node.misconfigs))
			}
		}
		if has_children {
			label.push('\n');
			label.push_str(if is_expanded { COLLAPSE_GLYPH } else { EXPAND_GLYPH });
		}
		label
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hierarchy::tests::record;

	#[test]
	fn visibility_per_mode() {
		let quiet = record("quiet", 0, 0, &[]);
		let alerting = record("alerting", 2, 0, &[]);
		let drifted = record("drifted", 0, 7, &[]);

		let all = FilterEvaluator::new(FilterMode::All);
		assert!(all.is_visible(&quiet));
		assert!(all.is_visible(&alerting));

		let alerts = FilterEvaluator::new(FilterMode::Alerts);
		assert!(!alerts.is_visible(&quiet));
		assert!(alerts.is_visible(&alerting));
		assert!(!alerts.is_visible(&drifted));

		let misconfigs = FilterEvaluator::new(FilterMode::Misconfigs);
		assert!(!misconfigs.is_visible(&quiet));
		assert!(!misconfigs.is_visible(&alerting));
		assert!(misconfigs.is_visible(&drifted));
	}

	#[test]
	fn label_shows_counts_for_active_mode() {
		let node = record("ec2", 3, 5, &[]);

		let alerts = FilterEvaluator::new(FilterMode::Alerts).decorate_label(&node, false, false);
		assert!(alerts.contains('3'));
		assert!(!alerts.contains('5'));

		let misconfigs =
			FilterEvaluator::new(FilterMode::Misconfigs).decorate_label(&node, false, false);
		assert!(misconfigs.contains('5'));
		assert!(!misconfigs.contains('3'));

		let all = FilterEvaluator::default().decorate_label(&node, false, false);
		assert_eq!(all, "EC2\n🔺3 ⚙️5");
	}

	#[test]
	fn label_glyph_only_for_parents() {
		let filter = FilterEvaluator::new(FilterMode::Alerts);
		let node = record("aws", 1, 0, &["ec2"]);
		assert_eq!(filter.decorate_label(&node, true, true), "AWS\n🔺1\n➖");
		assert_eq!(filter.decorate_label(&node, true, false), "AWS\n🔺1\n➕");
		assert_eq!(filter.decorate_label(&node, false, true).lines().count(), 2);
	}

	#[test]
	fn select_rejects_unknown_mode_and_keeps_state() {
		let mut filter = FilterEvaluator::new(FilterMode::Alerts);
		assert_eq!(
			filter.select("critical"),
			Err(FilterError::InvalidFilterMode("critical".to_string()))
		);
		assert_eq!(filter.mode(), FilterMode::Alerts);

		assert_eq!(filter.select("misconfigs"), Ok(FilterMode::Misconfigs));
		assert_eq!(filter.mode(), FilterMode::Misconfigs);
	}

	#[test]
	fn mode_names_round_trip_through_serde() {
		for mode in FilterMode::MODES {
			let json = serde_json::to_string(&mode).unwrap();
			assert_eq!(json, format!("\"{mode}\""));
			assert_eq!(mode.as_str().parse::<FilterMode>(), Ok(mode));
		}
	}
}
