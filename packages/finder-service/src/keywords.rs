use serde_json::Value;

use crate::{ChatTurn, FallbackReason, Fetched, FinderService};

const SYSTEM_PROMPT: &str = "You turn requests for help into search keywords for a directory \
of community assistance programs in the San Francisco Bay Area. Reply with 3 to 8 lowercase \
keywords separated by single spaces. Do not include place names, punctuation, or explanations.

Examples:
Request: my mom is 80 and can't get to her doctor appointments anymore
Keywords: senior transportation medical rides paratransit
Request: we just lost our apartment and I have two little kids
Keywords: emergency housing shelter families children
Request: I got laid off and can't afford groceries this month
Keywords: food groceries calfresh pantry unemployment
Request: my son has autism and we need someone to help at school
Keywords: disability children special education advocacy";

/// Builds the two-message prompt. Recent turns ride along inside the user message.
pub fn build_keyword_messages(query: &str, history: &[ChatTurn]) -> Vec<Value> {
	let mut user_prompt = String::new();

	if !history.is_empty() {
		user_prompt.push_str("Recent conversation:\n");

		for turn in history {
			user_prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
		}

		user_prompt.push('\n');
	}

	user_prompt.push_str(&format!("Request: {query}\nKeywords:"));

	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}

impl FinderService {
	/// Asks the model for keywords. Never fails: every problem becomes a fallback reason.
	pub async fn extract_keywords(&self, query: &str, history: &[ChatTurn]) -> Fetched<String> {
		let llm = &self.cfg.providers.llm;

		if !llm.is_configured() {
			return Fetched::Fallback(FallbackReason::NotConfigured);
		}

		let messages = build_keyword_messages(query, history);
		let call = self.providers.keywords.extract_keywords(llm, &messages);

		match Fetched::settle(tokio::time::timeout(self.call_timeout(), call).await) {
			Fetched::Ok(keywords) if keywords.trim().is_empty() => {
				Fetched::Fallback(FallbackReason::Empty)
			},
			Fetched::Ok(keywords) => Fetched::Ok(keywords.trim().to_string()),
			fallback => fallback,
		}
	}
}
