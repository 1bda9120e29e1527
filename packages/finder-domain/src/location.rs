use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// The nine Bay Area counties every city resolves to.
pub const COUNTIES: [&str; 9] = [
	"Alameda County",
	"Contra Costa County",
	"Marin County",
	"Napa County",
	"San Francisco County",
	"San Mateo County",
	"Santa Clara County",
	"Solano County",
	"Sonoma County",
];

/// City to county, scanned in order. A name that contains another city's name must come first.
pub const CITY_COUNTIES: &[(&str, &str)] = &[
	("South San Francisco", "San Mateo County"),
	("East Palo Alto", "San Mateo County"),
	("Oakland", "Alameda County"),
	("Berkeley", "Alameda County"),
	("Alameda", "Alameda County"),
	("Emeryville", "Alameda County"),
	("Albany", "Alameda County"),
	("Fremont", "Alameda County"),
	("Hayward", "Alameda County"),
	("San Leandro", "Alameda County"),
	("Castro Valley", "Alameda County"),
	("Union City", "Alameda County"),
	("Newark", "Alameda County"),
	("Pleasanton", "Alameda County"),
	("Livermore", "Alameda County"),
	("Dublin", "Alameda County"),
	("Richmond", "Contra Costa County"),
	("El Cerrito", "Contra Costa County"),
	("Concord", "Contra Costa County"),
	("Walnut Creek", "Contra Costa County"),
	("Antioch", "Contra Costa County"),
	("Pittsburg", "Contra Costa County"),
	("Martinez", "Contra Costa County"),
	("San Ramon", "Contra Costa County"),
	("Danville", "Contra Costa County"),
	("San Rafael", "Marin County"),
	("Novato", "Marin County"),
	("Mill Valley", "Marin County"),
	("Sausalito", "Marin County"),
	("American Canyon", "Napa County"),
	("Napa", "Napa County"),
	("San Francisco", "San Francisco County"),
	("Daly City", "San Mateo County"),
	("San Mateo", "San Mateo County"),
	("Redwood City", "San Mateo County"),
	("Menlo Park", "San Mateo County"),
	("Burlingame", "San Mateo County"),
	("San Bruno", "San Mateo County"),
	("Pacifica", "San Mateo County"),
	("Foster City", "San Mateo County"),
	("San Jose", "Santa Clara County"),
	("Santa Clara", "Santa Clara County"),
	("Sunnyvale", "Santa Clara County"),
	("Mountain View", "Santa Clara County"),
	("Palo Alto", "Santa Clara County"),
	("Milpitas", "Santa Clara County"),
	("Cupertino", "Santa Clara County"),
	("Campbell", "Santa Clara County"),
	("Los Gatos", "Santa Clara County"),
	("Gilroy", "Santa Clara County"),
	("Vallejo", "Solano County"),
	("Fairfield", "Solano County"),
	("Vacaville", "Solano County"),
	("Benicia", "Solano County"),
	("Santa Rosa", "Sonoma County"),
	("Petaluma", "Sonoma County"),
	("Rohnert Park", "Sonoma County"),
	("Sonoma", "Sonoma County"),
];

pub const ZIP_CITIES: &[(&str, &str)] = &[
	("94601", "Oakland"),
	("94602", "Oakland"),
	("94603", "Oakland"),
	("94605", "Oakland"),
	("94606", "Oakland"),
	("94607", "Oakland"),
	("94608", "Emeryville"),
	("94609", "Oakland"),
	("94610", "Oakland"),
	("94611", "Oakland"),
	("94612", "Oakland"),
	("94613", "Oakland"),
	("94618", "Oakland"),
	("94619", "Oakland"),
	("94621", "Oakland"),
	("94702", "Berkeley"),
	("94703", "Berkeley"),
	("94704", "Berkeley"),
	("94705", "Berkeley"),
	("94707", "Berkeley"),
	("94708", "Berkeley"),
	("94709", "Berkeley"),
	("94710", "Berkeley"),
	("94501", "Alameda"),
	("94502", "Alameda"),
	("94536", "Fremont"),
	("94538", "Fremont"),
	("94539", "Fremont"),
	("94555", "Fremont"),
	("94541", "Hayward"),
	("94542", "Hayward"),
	("94544", "Hayward"),
	("94545", "Hayward"),
	("94577", "San Leandro"),
	("94578", "San Leandro"),
	("94801", "Richmond"),
	("94804", "Richmond"),
	("94805", "Richmond"),
	("94518", "Concord"),
	("94519", "Concord"),
	("94520", "Concord"),
	("94521", "Concord"),
	("94595", "Walnut Creek"),
	("94596", "Walnut Creek"),
	("94597", "Walnut Creek"),
	("94598", "Walnut Creek"),
	("94509", "Antioch"),
	("94531", "Antioch"),
	("94901", "San Rafael"),
	("94903", "San Rafael"),
	("94945", "Novato"),
	("94947", "Novato"),
	("94558", "Napa"),
	("94559", "Napa"),
	("94102", "San Francisco"),
	("94103", "San Francisco"),
	("94104", "San Francisco"),
	("94105", "San Francisco"),
	("94107", "San Francisco"),
	("94108", "San Francisco"),
	("94109", "San Francisco"),
	("94110", "San Francisco"),
	("94111", "San Francisco"),
	("94112", "San Francisco"),
	("94114", "San Francisco"),
	("94115", "San Francisco"),
	("94116", "San Francisco"),
	("94117", "San Francisco"),
	("94118", "San Francisco"),
	("94121", "San Francisco"),
	("94122", "San Francisco"),
	("94123", "San Francisco"),
	("94124", "San Francisco"),
	("94127", "San Francisco"),
	("94131", "San Francisco"),
	("94132", "San Francisco"),
	("94133", "San Francisco"),
	("94134", "San Francisco"),
	("94080", "South San Francisco"),
	("94014", "Daly City"),
	("94015", "Daly City"),
	("94401", "San Mateo"),
	("94402", "San Mateo"),
	("94403", "San Mateo"),
	("94061", "Redwood City"),
	("94063", "Redwood City"),
	("94065", "Redwood City"),
	("94303", "East Palo Alto"),
	("94301", "Palo Alto"),
	("94304", "Palo Alto"),
	("94306", "Palo Alto"),
	("94040", "Mountain View"),
	("94041", "Mountain View"),
	("94043", "Mountain View"),
	("94085", "Sunnyvale"),
	("94086", "Sunnyvale"),
	("94087", "Sunnyvale"),
	("94089", "Sunnyvale"),
	("95050", "Santa Clara"),
	("95051", "Santa Clara"),
	("95054", "Santa Clara"),
	("95110", "San Jose"),
	("95111", "San Jose"),
	("95112", "San Jose"),
	("95116", "San Jose"),
	("95117", "San Jose"),
	("95122", "San Jose"),
	("95123", "San Jose"),
	("95125", "San Jose"),
	("95126", "San Jose"),
	("95127", "San Jose"),
	("95128", "San Jose"),
	("95131", "San Jose"),
	("95133", "San Jose"),
	("95035", "Milpitas"),
	("94589", "Vallejo"),
	("94590", "Vallejo"),
	("94591", "Vallejo"),
	("94533", "Fairfield"),
	("94534", "Fairfield"),
	("95687", "Vacaville"),
	("95688", "Vacaville"),
	("95401", "Santa Rosa"),
	("95403", "Santa Rosa"),
	("95404", "Santa Rosa"),
	("95405", "Santa Rosa"),
	("95407", "Santa Rosa"),
	("94952", "Petaluma"),
	("94954", "Petaluma"),
];

static ZIP_TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\b\d{5}\b").ok());

/// Where a query says the user is. `county` is always resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Location {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub zip: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
	pub county: String,
}

/// Finds a ZIP code, city, or county in free text.
///
/// A ZIP that resolves wins. Otherwise city names are matched before county names, both as
/// case-insensitive substrings, so a city embedded in an unrelated word still matches.
pub fn extract_location(query: &str) -> Option<Location> {
	if let Some(location) = ZIP_TOKEN
		.as_ref()
		.and_then(|re| re.find(query))
		.and_then(|token| location_for_zip(token.as_str()))
	{
		return Some(location);
	}

	let lowered = query.to_lowercase();

	for (city, county) in CITY_COUNTIES {
		if lowered.contains(&city.to_lowercase()) {
			return Some(Location {
				zip: None,
				city: Some(city.to_string()),
				county: county.to_string(),
			});
		}
	}

	for county in COUNTIES {
		let full = county.to_lowercase();
		let short = full.trim_end_matches(" county");

		if lowered.contains(&full) || lowered.contains(short) {
			return Some(Location { zip: None, city: None, county: county.to_string() });
		}
	}

	None
}

pub fn location_for_zip(zip: &str) -> Option<Location> {
	let (_, city) = ZIP_CITIES.iter().find(|(candidate, _)| *candidate == zip)?;
	let county = county_for_city(city)?;

	Some(Location {
		zip: Some(zip.to_string()),
		city: Some(city.to_string()),
		county: county.to_string(),
	})
}

pub fn county_for_city(city: &str) -> Option<&'static str> {
	CITY_COUNTIES.iter().find(|(candidate, _)| *candidate == city).map(|(_, county)| *county)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_city_maps_to_a_known_county() {
		for (city, county) in CITY_COUNTIES {
			assert!(COUNTIES.contains(county), "{city} maps to unknown county {county}.");
		}
	}

	#[test]
	fn every_zip_maps_to_a_known_city() {
		for (zip, city) in ZIP_CITIES {
			assert_eq!(zip.len(), 5);
			assert!(county_for_city(city).is_some(), "{zip} maps to unknown city {city}.");
		}
	}

	#[test]
	fn each_city_is_found_by_its_own_name() {
		for (city, county) in CITY_COUNTIES {
			let location = extract_location(&format!("help near {city}"))
				.unwrap_or_else(|| panic!("{city} was not detected."));

			assert_eq!(location.city.as_deref(), Some(*city), "{city} is shadowed by an earlier city.");
			assert_eq!(location.county, *county);
		}
	}

	#[test]
	fn resolves_zip_to_city_and_county() {
		let location =
			extract_location("senior transportation in 94612").expect("ZIP must resolve.");

		assert_eq!(
			location,
			Location {
				zip: Some("94612".to_string()),
				city: Some("Oakland".to_string()),
				county: "Alameda County".to_string(),
			}
		);
	}

	#[test]
	fn resolved_zip_beats_city_name() {
		let location =
			extract_location("I live in Berkeley, zip 94110").expect("ZIP must resolve.");

		assert_eq!(location.city.as_deref(), Some("San Francisco"));
		assert_eq!(location.zip.as_deref(), Some("94110"));
	}

	#[test]
	fn unknown_zip_without_place_name_yields_nothing() {
		assert_eq!(extract_location("food pantry near 10001"), None);
	}

	#[test]
	fn unknown_zip_falls_through_to_city_scan() {
		let location = extract_location("10001 or maybe Oakland").expect("City must resolve.");

		assert_eq!(location.zip, None);
		assert_eq!(location.city.as_deref(), Some("Oakland"));
	}

	#[test]
	fn six_digit_numbers_are_not_zips() {
		assert_eq!(extract_location("case number 946123"), None);
	}

	#[test]
	fn city_match_is_case_insensitive() {
		let location = extract_location("food for my senior mother in OAKLAND")
			.expect("City must resolve.");

		assert_eq!(location.city.as_deref(), Some("Oakland"));
		assert_eq!(location.county, "Alameda County");
	}

	#[test]
	fn county_matches_with_or_without_suffix() {
		let location = extract_location("housing in marin").expect("County must resolve.");

		assert_eq!(location, Location { zip: None, city: None, county: "Marin County".to_string() });

		let location =
			extract_location("Contra Costa County clinics").expect("County must resolve.");

		assert_eq!(location.county, "Contra Costa County");
		assert_eq!(location.city, None);
	}

	#[test]
	fn substring_matching_false_positives_are_kept() {
		// "napa" sits inside "Napalm".
		let location = extract_location("Napalm stories").expect("Substring must match.");

		assert_eq!(location.city.as_deref(), Some("Napa"));
	}
}
