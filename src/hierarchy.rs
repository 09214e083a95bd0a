//! The static infrastructure hierarchy.
//!
//! Records are stored flat and reference their children by ID. The records
//! are expected to form a single tree below the root, but nothing downstream
//! relies on that: [`HierarchyStore::validate`] reports violations, and the
//! builder skips references it cannot resolve or has already emitted.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use thiserror::Error;

use crate::builder::LayoutConfig;

/// ID of the cloud root used when a document does not name one.
pub const DEFAULT_ROOT_ID: &str = "cloud";

/// One infrastructure entity: the cloud root, an account or a service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NodeRecord {
	/// Unique identifier, referenced from parents' `children`.
	pub id: String,
	/// Display name.
	pub label: String,
	/// Provider kind (e.g. "aws"). Only affects coloring.
	#[serde(rename = "type", default)]
	pub kind: String,
	/// Number of open alerts on this entity.
	#[serde(default)]
	pub alerts: u32,
	/// Number of detected misconfigurations on this entity.
	#[serde(default)]
	pub misconfigs: u32,
	/// Child IDs in display order.
	#[serde(default)]
	pub children: Vec<String>,
}

impl NodeRecord {
	/// Whether the record declares any child references.
	pub fn has_children(&self) -> bool {
		!self.children.is_empty()
	}
}

/// A violation of the single-rooted tree shape.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HierarchyError {
	/// The configured root ID has no record.
	#[error("root node '{0}' is not in the hierarchy")]
	MissingRoot(String),
	/// Two records share an ID.
	#[error("node id '{0}' is defined more than once")]
	DuplicateId(String),
	/// A `children` entry names no record.
	#[error("node '{parent}' references missing child '{child}'")]
	DanglingReference {
		/// Record holding the reference.
		parent: String,
		/// The unresolved ID.
		child: String,
	},
	/// The root is listed as somebody's child, which closes a cycle.
	#[error("root node '{root}' is listed as a child of '{parent}'")]
	RootHasParent {
		/// The root ID.
		root: String,
		/// Record listing the root among its children.
		parent: String,
	},
	/// A record is listed under more than one parent.
	#[error("node '{child}' is a child of both '{first_parent}' and '{second_parent}'")]
	SharedChild {
		/// The shared record.
		child: String,
		/// Parent encountered first in declaration order.
		first_parent: String,
		/// Parent encountered second.
		second_parent: String,
	},
	/// A record the root cannot reach.
	#[error("node '{0}' cannot be reached from the root")]
	Unreachable(String),
}

/// Read-only collection of node records with an ID index.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyStore {
	root: String,
	nodes: Vec<NodeRecord>,
	index: HashMap<String, usize>,
}

impl HierarchyStore {
	/// Index `nodes` under the given root. On duplicate IDs the first record wins.
	pub fn new(root: impl Into<String>, nodes: Vec<NodeRecord>) -> Self {
		let mut index = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			index.entry(node.id.clone()).or_insert(i);
		}
		Self {
			root: root.into(),
			nodes,
			index,
		}
	}

	/// ID the builder starts from.
	pub fn root_id(&self) -> &str {
		&self.root
	}

	/// Record for `id`, if any.
	pub fn get(&self, id: &str) -> Option<&NodeRecord> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// Whether `id` exists and has at least one child reference.
	pub fn has_children(&self, id: &str) -> bool {
		self.get(id).is_some_and(NodeRecord::has_children)
	}

	/// Number of records, duplicates included.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True when the store holds no records.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// All records in declaration order.
	pub fn nodes(&self) -> &[NodeRecord] {
		&self.nodes
	}

	/// Check that the records form one tree below the root.
	///
	/// Reports the first violation found, scanning records in declaration order.
	pub fn validate(&self) -> Result<(), HierarchyError> {
		if self.get(&self.root).is_none() {
			return Err(HierarchyError::MissingRoot(self.root.clone()));
		}

		let mut seen = HashSet::with_capacity(self.nodes.len());
		for node in &self.nodes {
			if !seen.insert(node.id.as_str()) {
				return Err(HierarchyError::DuplicateId(node.id.clone()));
			}
		}

		let mut parent_of: HashMap<&str, &str> = HashMap::new();
		for node in &self.nodes {
			for child in &node.children {
				if self.get(child).is_none() {
					return Err(HierarchyError::DanglingReference {
						parent: node.id.clone(),
						child: child.clone(),
					});
				}
				if *child == self.root {
					return Err(HierarchyError::RootHasParent {
						root: self.root.clone(),
						parent: node.id.clone(),
					});
				}
				if let Some(first) = parent_of.insert(child.as_str(), node.id.as_str()) {
					return Err(HierarchyError::SharedChild {
						child: child.clone(),
						first_parent: first.to_string(),
						second_parent: node.id.clone(),
					});
				}
			}
		}

		// With unique parents, anything the root cannot reach is either a
		// second root or sits on a detached cycle.
		let mut reached = HashSet::with_capacity(self.nodes.len());
		let mut stack = vec![self.root.as_str()];
		while let Some(id) = stack.pop() {
			if !reached.insert(id) {
				continue;
			}
			if let Some(node) = self.get(id) {
				stack.extend(node.children.iter().map(String::as_str));
			}
		}
		match self.nodes.iter().find(|n| !reached.contains(n.id.as_str())) {
			Some(orphan) => Err(HierarchyError::Unreachable(orphan.id.clone())),
			None => Ok(()),
		}
	}

	/// Built-in dataset shown when the page does not embed one.
	pub fn sample() -> Self {
		fn node(
			id: &str,
			label: &str,
			kind: &str,
			alerts: u32,
			misconfigs: u32,
			children: &[&str],
		) -> NodeRecord {
			NodeRecord {
				id: id.to_string(),
				label: label.to_string(),
				kind: kind.to_string(),
				alerts,
				misconfigs,
				children: children.iter().map(|c| c.to_string()).collect(),
			}
		}

		Self::new(
			DEFAULT_ROOT_ID,
			vec![
				node("cloud", "Cloud", "cloud", 14, 11, &["aws", "azure", "gcp"]),
				node("aws", "AWS", "aws", 8, 4, &["aws-ec2", "aws-s3", "aws-iam", "aws-rds"]),
				node("aws-ec2", "EC2", "aws", 5, 1, &["aws-ec2-web", "aws-ec2-batch"]),
				node("aws-ec2-web", "web-01", "aws", 5, 0, &[]),
				node("aws-ec2-batch", "batch-02", "aws", 0, 1, &[]),
				node("aws-s3", "S3", "aws", 0, 3, &[]),
				node("aws-iam", "IAM", "aws", 3, 0, &[]),
				node("aws-rds", "RDS", "aws", 0, 0, &[]),
				node("azure", "Azure", "azure", 2, 5, &["azure-vm", "azure-blob"]),
				node("azure-vm", "Virtual Machines", "azure", 2, 1, &[]),
				node("azure-blob", "Blob Storage", "azure", 0, 4, &[]),
				node("gcp", "GCP", "gcp", 4, 2, &["gcp-gke", "gcp-gcs", "gcp-sql"]),
				node("gcp-gke", "GKE", "gcp", 4, 0, &["gcp-gke-prod"]),
				node("gcp-gke-prod", "prod-cluster", "gcp", 4, 0, &[]),
				node("gcp-gcs", "Cloud Storage", "gcp", 0, 2, &[]),
				node("gcp-sql", "Cloud SQL", "gcp", 0, 0, &[]),
			],
		)
	}
}

/// Page-embedded document carrying the hierarchy and its view settings.
#[derive(Clone, Debug, Deserialize)]
pub struct HierarchyDocument {
	/// Root node ID.
	#[serde(default = "default_root")]
	pub root: String,
	/// Initial filter mode name; parsed by [`crate::filter::FilterEvaluator::select`].
	#[serde(default)]
	pub filter: Option<String>,
	/// Layout spacing overrides.
	#[serde(default)]
	pub layout: LayoutConfig,
	/// Flat node records.
	pub nodes: Vec<NodeRecord>,
}

fn default_root() -> String {
	DEFAULT_ROOT_ID.to_string()
}

impl HierarchyDocument {
	/// Parse the JSON embedded in the page.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Split into the store and the settings that configure the view.
	pub fn into_parts(self) -> (HierarchyStore, Option<String>, LayoutConfig) {
		(HierarchyStore::new(self.root, self.nodes), self.filter, self.layout)
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	pub(crate) fn record(id: &str, alerts: u32, misconfigs: u32, children: &[&str]) -> NodeRecord {
		NodeRecord {
			id: id.to_string(),
			label: id.to_uppercase(),
			kind: "aws".to_string(),
			alerts,
			misconfigs,
			children: children.iter().map(|c| c.to_string()).collect(),
		}
	}

	#[test]
	fn sample_is_a_valid_tree() {
		let store = HierarchyStore::sample();
		assert_eq!(store.validate(), Ok(()));
		assert_eq!(store.root_id(), DEFAULT_ROOT_ID);
		assert!(store.has_children("aws"));
		assert!(!store.has_children("aws-s3"));
		assert!(!store.has_children("no-such-node"));
	}

	#[test]
	fn validate_reports_missing_root() {
		let store = HierarchyStore::new("cloud", vec![record("aws", 0, 0, &[])]);
		assert_eq!(
			store.validate(),
			Err(HierarchyError::MissingRoot("cloud".to_string()))
		);
	}

	#[test]
	fn validate_reports_dangling_child() {
		let store = HierarchyStore::new("cloud", vec![record("cloud", 0, 0, &["ghost"])]);
		assert_eq!(
			store.validate(),
			Err(HierarchyError::DanglingReference {
				parent: "cloud".to_string(),
				child: "ghost".to_string(),
			})
		);
	}

	#[test]
	fn validate_reports_shared_child() {
		let store = HierarchyStore::new(
			"cloud",
			vec![
				record("cloud", 0, 0, &["a", "b"]),
				record("a", 0, 0, &["c"]),
				record("b", 0, 0, &["c"]),
				record("c", 0, 0, &[]),
			],
		);
		assert_eq!(
			store.validate(),
			Err(HierarchyError::SharedChild {
				child: "c".to_string(),
				first_parent: "a".to_string(),
				second_parent: "b".to_string(),
			})
		);
	}

	#[test]
	fn validate_reports_duplicates_and_detached_cycles() {
		let dup = HierarchyStore::new(
			"cloud",
			vec![record("cloud", 0, 0, &[]), record("cloud", 1, 1, &[])],
		);
		assert_eq!(
			dup.validate(),
			Err(HierarchyError::DuplicateId("cloud".to_string()))
		);
		// First definition wins in the index.
		assert_eq!(dup.get("cloud").map(|n| n.alerts), Some(0));

		let cycle = HierarchyStore::new(
			"cloud",
			vec![
				record("cloud", 0, 0, &[]),
				record("x", 0, 0, &["y"]),
				record("y", 0, 0, &["x"]),
			],
		);
		assert_eq!(
			cycle.validate(),
			Err(HierarchyError::Unreachable("x".to_string()))
		);
	}

	#[test]
	fn validate_reports_cycles_through_the_root() {
		let self_loop = HierarchyStore::new("cloud", vec![record("cloud", 0, 0, &["cloud"])]);
		assert_eq!(
			self_loop.validate(),
			Err(HierarchyError::RootHasParent {
				root: "cloud".to_string(),
				parent: "cloud".to_string(),
			})
		);

		let via_child = HierarchyStore::new(
			"cloud",
			vec![record("cloud", 0, 0, &["a"]), record("a", 0, 0, &["cloud"])],
		);
		assert_eq!(
			via_child.validate(),
			Err(HierarchyError::RootHasParent {
				root: "cloud".to_string(),
				parent: "a".to_string(),
			})
		);
	}

	#[test]
	fn document_defaults_and_type_field() {
		let doc = HierarchyDocument::from_json(
			r#"{ "nodes": [ { "id": "cloud", "label": "Cloud", "type": "cloud",
			     "alerts": 1, "children": ["aws"] },
			   { "id": "aws", "label": "AWS", "type": "aws" } ] }"#,
		)
		.unwrap();
		assert_eq!(doc.root, "cloud");
		assert_eq!(doc.filter, None);
		assert_eq!(doc.layout, LayoutConfig::default());

		let (store, filter, _) = doc.into_parts();
		assert_eq!(filter, None);
		let cloud = store.get("cloud").unwrap();
		assert_eq!(cloud.kind, "cloud");
		assert_eq!((cloud.alerts, cloud.misconfigs), (1, 0));
		assert_eq!(store.get("aws").unwrap().children, Vec::<String>::new());
		assert_eq!(store.validate(), Ok(()));
	}

	#[test]
	fn document_rejects_negative_counts() {
		let err = HierarchyDocument::from_json(
			r#"{ "nodes": [ { "id": "cloud", "label": "Cloud", "alerts": -1 } ] }"#,
		);
		assert!(err.is_err());
	}
}
