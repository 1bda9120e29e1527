use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use finder_domain::{
	Classification, Location, ProgramCard, QueryClassifier, Resolution, SearchFilter,
	extract_location, format_cards,
};

use crate::{Error, FallbackReason, Fetched, FinderService, Result};

pub const MESSAGE_REQUIRED: &str = "Please provide a message.";
pub const SEARCH_NOT_CONFIGURED: &str =
	"Smart assistant search is not configured. Please try again later.";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatTurn {
	pub role: String,
	pub content: String,
}

/// An inbound request as sent by the chat client. Fields stay untyped until validated so a
/// wrong type is reported as a bad message rather than a decode failure.
#[derive(Clone, Debug, Default)]
pub struct AssistRequest {
	pub message: Value,
	pub conversation_history: Value,
}
impl AssistRequest {
	/// Reads a request body. Anything but a JSON object is a bad message.
	pub fn from_slice(body: &[u8]) -> Result<Self> {
		let mut object: Map<String, Value> = serde_json::from_slice(body).map_err(|err| {
			tracing::info!(error = %err, "Request body is not a JSON object.");

			Error::InvalidRequest { message: MESSAGE_REQUIRED.to_string() }
		})?;

		Ok(Self {
			message: object.remove("message").unwrap_or_default(),
			conversation_history: object.remove("conversationHistory").unwrap_or_default(),
		})
	}

	pub fn new(message: impl Into<String>) -> Self {
		Self { message: Value::String(message.into()), conversation_history: Value::Null }
	}

	pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
		self.conversation_history = serde_json::to_value(history).unwrap_or(Value::Null);

		self
	}

	/// The trimmed message, cut to `max_chars` characters.
	pub fn message_text(&self, max_chars: usize) -> Result<String> {
		let text = self.message.as_str().map(str::trim).unwrap_or_default();

		if text.is_empty() {
			return Err(Error::InvalidRequest { message: MESSAGE_REQUIRED.to_string() });
		}

		Ok(text.chars().take(max_chars).collect())
	}

	/// The last `limit` well-formed turns. Malformed entries are skipped.
	pub fn recent_history(&self, limit: usize) -> Vec<ChatTurn> {
		let turns: Vec<ChatTurn> = self
			.conversation_history
			.as_array()
			.map(|entries| {
				entries
					.iter()
					.filter_map(|entry| serde_json::from_value(entry.clone()).ok())
					.collect()
			})
			.unwrap_or_default();
		let skip = turns.len().saturating_sub(limit);

		turns.into_iter().skip(skip).collect()
	}
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistResponse {
	pub programs: Vec<ProgramCard>,
	pub programs_found: usize,
	pub search_query: String,
	pub location: Option<Location>,
	#[serde(rename = "skippedLLM")]
	pub skipped_llm: bool,
}

impl FinderService {
	/// Runs the whole pipeline for one request.
	///
	/// Only a missing message or an unconfigured search backend is reported as an error. Model
	/// and search failures degrade to synonym keywords and an empty result list.
	pub async fn assist(&self, request: AssistRequest) -> Result<AssistResponse> {
		let pipeline = &self.cfg.pipeline;
		let message = request.message_text(pipeline.max_message_chars)?;
		let Some(backend) = self.cfg.providers.search.backend() else {
			tracing::error!("Search backend is not configured; rejecting request.");

			return Err(Error::NotConfigured { message: SEARCH_NOT_CONFIGURED.to_string() });
		};
		let history = request.recent_history(pipeline.history_limit);
		let location = extract_location(&message);
		let classification = self.classify(&message, &history).await;
		let filter = SearchFilter::for_location(location.as_ref());
		let records =
			match self.find_programs(backend, &classification.keywords, filter.as_ref()).await {
				Fetched::Ok(records) => records,
				Fetched::Fallback(reason) => {
					tracing::warn!(%reason, "Program search failed; answering with no programs.");

					Vec::new()
				},
			};
		let programs = format_cards(&records, pipeline.max_cards, pipeline.card_description_chars);

		tracing::info!(
			programs_found = records.len(),
			skipped_llm = classification.skipped_llm,
			has_location = location.is_some(),
			"Assist request answered."
		);

		Ok(AssistResponse {
			programs,
			programs_found: records.len(),
			search_query: classification.keywords,
			location,
			skipped_llm: classification.skipped_llm,
		})
	}

	/// Resolves keywords offline when possible, asking the model only as a last resort.
	pub async fn classify(&self, message: &str, history: &[ChatTurn]) -> Classification {
		let classifier = QueryClassifier::new(&self.catalog, &self.cfg.pipeline);

		if let Resolution::Resolved { stage, classification } = classifier.resolve_offline(message)
		{
			tracing::debug!(stage = stage.label(), "Query resolved without the model.");

			return classification;
		}

		match self.extract_keywords(message, history).await {
			Fetched::Ok(keywords) => Classification { keywords, skipped_llm: false },
			Fetched::Fallback(FallbackReason::NotConfigured) => {
				tracing::debug!("Model is not configured; using synonym expansion.");

				classifier.synonym_fallback(message)
			},
			Fetched::Fallback(reason) => {
				tracing::warn!(%reason, "Keyword extraction failed; using synonym expansion.");

				classifier.synonym_fallback(message)
			},
		}
	}
}
