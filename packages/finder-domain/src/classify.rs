//! Decides how much work a query needs before it can be searched.
//!
//! Stages run cheapest first and the first one that produces keywords wins. Only a query that
//! falls through every offline stage is worth a metered model call.

use finder_config::Pipeline;

use crate::{catalog::ReferenceCatalog, synonyms};

/// Keywords to search for, and whether the model was skipped to get them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
	pub keywords: String,
	pub skipped_llm: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
	CommonQuery,
	ShortQuery,
	TriggerMatch,
	Model,
}
impl Stage {
	pub fn label(self) -> &'static str {
		match self {
			Self::CommonQuery => "common_query",
			Self::ShortQuery => "short_query",
			Self::TriggerMatch => "trigger_match",
			Self::Model => "model",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
	Resolved { stage: Stage, classification: Classification },
	NeedsModel,
}

struct StageInput<'a> {
	query: &'a str,
	catalog: &'a ReferenceCatalog,
	pipeline: &'a Pipeline,
}

type StageFn = fn(&StageInput<'_>) -> Option<Classification>;

const OFFLINE_STAGES: [(Stage, StageFn); 3] = [
	(Stage::CommonQuery, common_query_stage),
	(Stage::ShortQuery, short_query_stage),
	(Stage::TriggerMatch, trigger_match_stage),
];

#[derive(Clone, Copy)]
pub struct QueryClassifier<'a> {
	catalog: &'a ReferenceCatalog,
	pipeline: &'a Pipeline,
}
impl<'a> QueryClassifier<'a> {
	pub fn new(catalog: &'a ReferenceCatalog, pipeline: &'a Pipeline) -> Self {
		Self { catalog, pipeline }
	}

	/// Runs the offline stages in order. `NeedsModel` means none of them matched.
	pub fn resolve_offline(&self, query: &str) -> Resolution {
		let input = StageInput { query, catalog: self.catalog, pipeline: self.pipeline };

		for (stage, run) in OFFLINE_STAGES {
			if let Some(classification) = run(&input) {
				return Resolution::Resolved { stage, classification };
			}
		}

		Resolution::NeedsModel
	}

	/// Keywords used whenever the model is unavailable or fails.
	pub fn synonym_fallback(&self, query: &str) -> Classification {
		let detections = self.catalog.detect(query);

		Classification {
			keywords: synonyms::expand(
				query,
				detections.search_keywords(),
				self.pipeline.max_expanded_terms,
			),
			skipped_llm: true,
		}
	}
}

fn common_query_stage(input: &StageInput<'_>) -> Option<Classification> {
	input.catalog.match_common_query(input.query).map(|entry| Classification {
		keywords: entry.keywords_to_search.clone(),
		skipped_llm: true,
	})
}

fn short_query_stage(input: &StageInput<'_>) -> Option<Classification> {
	if input.query.split_whitespace().count() > input.pipeline.short_query_max_words {
		return None;
	}

	Some(Classification {
		keywords: synonyms::expand(input.query, [], input.pipeline.max_expanded_terms),
		skipped_llm: true,
	})
}

fn trigger_match_stage(input: &StageInput<'_>) -> Option<Classification> {
	let detections = input.catalog.detect(input.query);

	if detections.is_empty() {
		return None;
	}

	Some(Classification {
		keywords: synonyms::expand(
			input.query,
			detections.search_keywords(),
			input.pipeline.max_expanded_terms,
		),
		skipped_llm: true,
	})
}
