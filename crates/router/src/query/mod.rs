//! Query string decoding.

use indexmap::IndexMap;

/// Decoded query parameters in first-occurrence order.
pub type QueryParams = IndexMap<String, String>;

/// Splits an encoded query string into decoded name/value pairs.
///
/// `&` separates pairs and the first `=` of a pair separates name from value. A pair
/// without `=` has an empty value, pairs with an empty name are dropped, and a repeated
/// name keeps its first position but takes the last value.
pub fn parse_query(query: Option<&str>) -> QueryParams {
	let mut params = QueryParams::new();
	let Some(query) = query.filter(|q| !q.is_empty()) else {
		return params;
	};

	for pair in query.split('&') {
		let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
		if name.is_empty() {
			continue;
		}
		params.insert(decode(name), decode(value));
	}

	params
}

/// Percent-decodes one component. `+` is kept literally; invalid UTF-8 is replaced.
pub fn decode(component: &str) -> String {
	let bytes = urlencoding::decode_binary(component.as_bytes());
	String::from_utf8_lossy(&bytes).into_owned()
}
