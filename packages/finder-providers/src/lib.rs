pub mod keywords;
pub mod search;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};

const API_KEY: HeaderName = HeaderName::from_static("api-key");

pub fn bearer_headers(token: &str) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);

	Ok(headers)
}

pub fn api_key_headers(api_key: &str) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();
	let mut value = HeaderValue::from_str(api_key)?;

	value.set_sensitive(true);
	headers.insert(API_KEY, value);

	Ok(headers)
}

fn client(timeout_ms: u64) -> Result<Client> {
	Ok(Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?)
}
