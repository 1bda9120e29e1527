use serde::{Deserialize, Deserializer, Serialize};

/// Fields requested from the index for each match.
pub const SELECT_FIELDS: [&str; 9] =
	["id", "name", "category", "description", "groups", "areas", "city", "website", "phone"];
/// Fields the index matches keywords against.
pub const SEARCH_FIELDS: [&str; 6] =
	["name", "category", "description", "whatTheyOffer", "howToGetIt", "groups"];

const ELLIPSIS: &str = "...";

/// A program as stored in the search index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgramRecord {
	pub id: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub name: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub category: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub description: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub groups: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub areas: Vec<String>,
	#[serde(default)]
	pub city: Option<String>,
	#[serde(default)]
	pub website: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
}

/// The index sends `null` for unset fields; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The compact projection of a program sent back to the chat client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProgramCard {
	pub id: String,
	pub name: String,
	pub category: String,
	pub description: String,
	pub city: Option<String>,
	pub phone: Option<String>,
	pub website: Option<String>,
}
impl ProgramCard {
	pub fn from_record(record: &ProgramRecord, description_chars: usize) -> Self {
		Self {
			id: record.id.clone(),
			name: record.name.clone(),
			category: record.category.clone(),
			description: truncate_description(&record.description, description_chars),
			city: record.city.clone(),
			phone: record.phone.clone(),
			website: record.website.clone(),
		}
	}
}

/// Keeps the index's order and cuts the list at `max_cards`.
pub fn format_cards(
	records: &[ProgramRecord],
	max_cards: usize,
	description_chars: usize,
) -> Vec<ProgramCard> {
	records
		.iter()
		.take(max_cards)
		.map(|record| ProgramCard::from_record(record, description_chars))
		.collect()
}

/// Cuts `text` to `max_chars` characters and appends an ellipsis when anything was dropped.
pub fn truncate_description(text: &str, max_chars: usize) -> String {
	match text.char_indices().nth(max_chars) {
		Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
		None => text.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(id: &str, description: &str) -> ProgramRecord {
		ProgramRecord {
			id: id.to_string(),
			name: format!("Program {id}"),
			description: description.to_string(),
			..ProgramRecord::default()
		}
	}

	#[test]
	fn long_descriptions_are_cut_with_ellipsis() {
		let long = "a".repeat(151);
		let card = ProgramCard::from_record(&record("1", &long), 150);

		assert_eq!(card.description.chars().count(), 153);
		assert!(card.description.ends_with("..."));
		assert_eq!(&card.description[..150], &long[..150]);
	}

	#[test]
	fn descriptions_at_the_limit_pass_through() {
		let exact = "b".repeat(150);

		assert_eq!(truncate_description(&exact, 150), exact);
		assert_eq!(truncate_description("short", 150), "short");
	}

	#[test]
	fn truncation_counts_characters_not_bytes() {
		let text = "é".repeat(200);
		let cut = truncate_description(&text, 150);

		assert_eq!(cut.chars().filter(|ch| *ch == 'é').count(), 150);
	}

	#[test]
	fn caps_cards_and_keeps_index_order() {
		let records: Vec<ProgramRecord> =
			(0..10).map(|index| record(&index.to_string(), "desc")).collect();
		let cards = format_cards(&records, 5, 150);

		assert_eq!(cards.len(), 5);
		assert_eq!(
			cards.iter().map(|card| card.id.as_str()).collect::<Vec<_>>(),
			vec!["0", "1", "2", "3", "4"]
		);
	}

	#[test]
	fn record_deserializes_with_missing_optional_fields() {
		let record: ProgramRecord = serde_json::from_value(serde_json::json!({
			"@search.score": 1.5,
			"id": "p-1",
			"name": "Meals on Wheels",
			"areas": ["Alameda County"]
		}))
		.expect("Record must deserialize.");

		assert_eq!(record.name, "Meals on Wheels");
		assert!(record.groups.is_empty());
		assert_eq!(record.phone, None);
	}
}
