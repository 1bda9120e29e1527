//! Read-only reference data: canned expansions for common questions plus the trigger words
//! that map a query onto program categories and eligibility groups.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_json::{Map, Value};

const BUNDLED_CATALOG_JSON: &str = include_str!("../data/catalog.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
	#[error("Failed to read reference catalog at {path:?}.")]
	Read { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse reference catalog.")]
	Parse {
		#[from]
		source: serde_json::Error,
	},
}

/// A canned keyword expansion for a frequently asked question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommonQuery {
	pub category: String,
	pub name: String,
	pub patterns: Vec<String>,
	pub keywords_to_search: String,
}

/// A program category or an eligibility group. Both share the same trigger shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerGroup {
	pub id: String,
	pub name: String,
	pub trigger_keywords: Vec<String>,
	pub search_keywords: String,
}
impl TriggerGroup {
	fn triggered_by(&self, lowered_query: &str) -> bool {
		self.trigger_keywords
			.iter()
			.any(|keyword| !keyword.is_empty() && lowered_query.contains(&keyword.to_lowercase()))
	}
}

/// Categories and groups whose triggers appear in a query, in catalog order.
#[derive(Clone, Debug, Default)]
pub struct Detections<'a> {
	pub categories: Vec<&'a TriggerGroup>,
	pub groups: Vec<&'a TriggerGroup>,
}
impl<'a> Detections<'a> {
	pub fn is_empty(&self) -> bool {
		self.categories.is_empty() && self.groups.is_empty()
	}

	pub fn search_keywords(&self) -> impl Iterator<Item = &'a str> + '_ {
		self.categories
			.iter()
			.chain(self.groups.iter())
			.copied()
			.map(|group| group.search_keywords.as_str())
	}
}

/// Immutable after construction and shared by every request.
#[derive(Clone, Debug, Default)]
pub struct ReferenceCatalog {
	common_queries: Vec<CommonQuery>,
	program_categories: Vec<TriggerGroup>,
	eligibility_groups: Vec<TriggerGroup>,
}
impl ReferenceCatalog {
	pub fn empty() -> Self {
		Self::default()
	}

	/// The catalog compiled into the binary.
	pub fn bundled() -> Result<Self, CatalogError> {
		Self::from_json(BUNDLED_CATALOG_JSON)
	}

	pub fn load(path: &Path) -> Result<Self, CatalogError> {
		let raw = fs::read_to_string(path)
			.map_err(|source| CatalogError::Read { path: path.to_path_buf(), source })?;

		Self::from_json(&raw)
	}

	pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
		let raw: RawCatalog = serde_json::from_str(raw)?;
		let mut common_queries = Vec::new();

		for (category, patterns) in raw.common_queries {
			let patterns: Map<String, Value> = serde_json::from_value(patterns)?;

			for (name, entry) in patterns {
				let entry: RawCommonQuery = serde_json::from_value(entry)?;

				common_queries.push(CommonQuery {
					category: category.clone(),
					name,
					patterns: entry.patterns,
					keywords_to_search: entry.keywords_to_search,
				});
			}
		}

		Ok(Self {
			common_queries,
			program_categories: trigger_groups(raw.program_categories)?,
			eligibility_groups: trigger_groups(raw.eligibility_groups)?,
		})
	}

	pub fn is_empty(&self) -> bool {
		self.common_queries.is_empty()
			&& self.program_categories.is_empty()
			&& self.eligibility_groups.is_empty()
	}

	pub fn common_queries(&self) -> &[CommonQuery] {
		&self.common_queries
	}

	pub fn program_categories(&self) -> &[TriggerGroup] {
		&self.program_categories
	}

	pub fn eligibility_groups(&self) -> &[TriggerGroup] {
		&self.eligibility_groups
	}

	/// First common query with a pattern contained in `query`, scanning categories and pattern
	/// names in catalog order.
	pub fn match_common_query(&self, query: &str) -> Option<&CommonQuery> {
		let lowered = query.to_lowercase();

		self.common_queries.iter().find(|entry| {
			entry
				.patterns
				.iter()
				.any(|pattern| !pattern.is_empty() && lowered.contains(&pattern.to_lowercase()))
		})
	}

	pub fn detect(&self, query: &str) -> Detections<'_> {
		let lowered = query.to_lowercase();

		Detections {
			categories: self
				.program_categories
				.iter()
				.filter(|group| group.triggered_by(&lowered))
				.collect(),
			groups: self
				.eligibility_groups
				.iter()
				.filter(|group| group.triggered_by(&lowered))
				.collect(),
		}
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalog {
	#[serde(default)]
	common_queries: Map<String, Value>,
	#[serde(default)]
	program_categories: Map<String, Value>,
	#[serde(default)]
	eligibility_groups: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawCommonQuery {
	#[serde(default)]
	patterns: Vec<String>,
	keywords_to_search: String,
}

#[derive(Deserialize)]
struct RawTriggerGroup {
	name: String,
	#[serde(default)]
	trigger_keywords: Vec<String>,
	#[serde(default)]
	search_keywords: String,
}

/// Keeps document order: `serde_json` is built with `preserve_order`.
fn trigger_groups(table: Map<String, Value>) -> Result<Vec<TriggerGroup>, serde_json::Error> {
	table
		.into_iter()
		.map(|(id, raw)| {
			let raw: RawTriggerGroup = serde_json::from_value(raw)?;

			Ok(TriggerGroup {
				id,
				name: raw.name,
				trigger_keywords: raw.trigger_keywords,
				search_keywords: raw.search_keywords,
			})
		})
		.collect()
}
