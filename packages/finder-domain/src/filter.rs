use crate::location::Location;

/// Areas whose programs serve everyone in the region, whatever the detected location.
pub const ALWAYS_INCLUDED_AREAS: [&str; 4] = ["Bay Area", "Statewide", "California", "Nationwide"];

/// Restricts matches to programs serving a detected location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchFilter {
	pub areas: Vec<String>,
	pub city: Option<String>,
}
impl SearchFilter {
	/// No location means no filter: results are never narrowed on a guess.
	pub fn for_location(location: Option<&Location>) -> Option<Self> {
		let location = location?;
		let mut areas: Vec<String> =
			ALWAYS_INCLUDED_AREAS.iter().map(|area| area.to_string()).collect();

		areas.push(location.county.clone());

		if let Some(city) = location.city.as_ref() {
			areas.push(city.clone());
		}

		Some(Self { areas, city: location.city.clone() })
	}

	/// Renders the filter as an OData expression over the `areas` collection and `city` field.
	pub fn to_odata(&self) -> String {
		let clauses: Vec<String> =
			self.areas.iter().map(|area| format!("a eq {}", odata_literal(area))).collect();
		let mut expr = format!("areas/any(a: {})", clauses.join(" or "));

		if let Some(city) = self.city.as_deref() {
			expr.push_str(&format!(" or city eq {}", odata_literal(city)));
		}

		expr
	}
}

fn odata_literal(value: &str) -> String {
	format!("'{}'", value.replace('\'', "''"))
}
