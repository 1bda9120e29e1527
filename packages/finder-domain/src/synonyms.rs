use std::collections::HashSet;

/// Closed synonym groups: every member expands to every other member of its group, and no word
/// belongs to two groups, so expansion is idempotent on its term set.
const SYNONYM_GROUPS: &[&[&str]] = &[
	&["food", "groceries", "meals", "nutrition", "pantry"],
	&["hungry", "hunger"],
	&["help", "assistance", "support", "aid", "services"],
	&["senior", "seniors", "elderly", "aging"],
	&["housing", "shelter", "rent", "rental"],
	&["homeless", "unhoused"],
	&["transportation", "transit", "rides", "paratransit"],
	&["ride", "rideshare"],
	&["doctor", "medical", "clinic", "health"],
	&["dentist", "dental"],
	&["therapy", "counseling", "therapist"],
	&["job", "jobs", "employment", "work"],
	&["training", "career"],
	&["money", "cash", "financial", "income"],
	&["kids", "children", "youth", "child"],
	&["family", "families", "parents"],
	&["disability", "disabled", "disabilities", "accessible"],
	&["veteran", "veterans", "military"],
	&["legal", "lawyer", "attorney"],
	&["bills", "utilities", "utility"],
	&["free", "no-cost"],
];

pub fn synonyms_of(word: &str) -> Option<&'static [&'static str]> {
	SYNONYM_GROUPS.iter().copied().find(|group| group.contains(&word))
}

/// Expands a query with synonyms and the search keywords of any detected categories or groups.
///
/// Terms keep first-added order: the query's own tokens, then their synonyms, then the extra
/// keywords. At most `max_terms` distinct terms survive.
pub fn expand<'a, I>(query: &str, extra_keywords: I, max_terms: usize) -> String
where
	I: IntoIterator<Item = &'a str>,
{
	let tokens: Vec<String> = tokenize(query).collect();
	let mut terms = TermSet::new(max_terms);

	for token in &tokens {
		terms.push(token);
	}
	for token in &tokens {
		if let Some(group) = synonyms_of(token) {
			for synonym in group {
				terms.push(synonym);
			}
		}
	}
	for keywords in extra_keywords {
		for token in tokenize(keywords) {
			terms.push(&token);
		}
	}

	terms.into_query()
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
	text.split_whitespace()
		.map(|token| token.trim_matches(|ch: char| !ch.is_alphanumeric()).to_lowercase())
		.filter(|token| !token.is_empty())
}

struct TermSet {
	terms: Vec<String>,
	seen: HashSet<String>,
	cap: usize,
}
impl TermSet {
	fn new(cap: usize) -> Self {
		Self { terms: Vec::new(), seen: HashSet::new(), cap }
	}

	fn push(&mut self, term: &str) {
		if self.terms.len() >= self.cap {
			return;
		}
		if self.seen.insert(term.to_string()) {
			self.terms.push(term.to_string());
		}
	}

	fn into_query(self) -> String {
		self.terms.join(" ")
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn no_word_belongs_to_two_groups() {
		let mut seen = HashSet::new();

		for group in SYNONYM_GROUPS {
			for word in *group {
				assert!(seen.insert(*word), "{word} appears in more than one group.");
				assert!(!word.contains(' '), "{word} must be a single term.");
			}
		}
	}

	#[test]
	fn expands_single_word() {
		assert_eq!(expand("help", [], 30), "help assistance support aid services");
	}

	#[test]
	fn original_tokens_come_first_and_duplicates_collapse() {
		assert_eq!(expand("Food, food pantry!", [], 30), "food pantry groceries meals nutrition");
	}

	#[test]
	fn folds_in_detected_keywords() {
		let expanded = expand("bus pass", ["transportation rides transit"], 30);

		assert_eq!(expanded, "bus pass transportation rides transit");
	}

	#[test]
	fn caps_terms_in_first_added_order() {
		let expanded = expand("food help senior housing transportation doctor job", [], 30);
		let terms: Vec<&str> = expanded.split(' ').collect();

		assert_eq!(terms.len(), 30);
		assert_eq!(
			&terms[..7],
			&["food", "help", "senior", "housing", "transportation", "doctor", "job"]
		);
	}

	#[test]
	fn re_expansion_adds_no_terms() {
		for query in ["help", "I need food help", "rides for my disabled veteran dad", "zzz"] {
			let once = expand(query, [], 30);
			let twice = expand(&once, [], 30);

			assert_eq!(once, twice, "Expansion of {query:?} is not idempotent.");
		}
	}

	#[test]
	fn re_expansion_at_the_cap_is_stable() {
		let once = expand("food help senior housing transportation doctor job money kids", [], 30);

		assert_eq!(expand(&once, [], 30), once);
	}

	#[test]
	fn empty_query_expands_to_nothing() {
		assert_eq!(expand("   ", [], 30), "");
	}
}
