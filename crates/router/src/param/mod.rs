//! Typed parameter binding.
//!
//! Query values arrive as strings; each route declares the type of every parameter it
//! accepts. [`bind`] converts one value and stores it in the request's [`Extras`].
//!
//! Binding is best-effort per parameter: the outcome is reported as a [`BindOutcome`]
//! and a malformed value never fails the surrounding resolution.

use indexmap::IndexMap;

/// Declared type of a route parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
	Boolean,
	Byte,
	Short,
	Int,
	Long,
	Float,
	Double,
	String,
	/// Structured value; cannot be carried by a query string.
	Parcelable,
	/// Arbitrary object; stored as the raw string.
	Object,
	/// Legacy or unrecognized numeric tag; stored as the raw string.
	Fallback(i32),
}

impl ParamKind {
	/// Maps a numeric type tag emitted by route generators.
	pub fn from_tag(tag: i32) -> Self {
		match tag {
			0 => Self::Boolean,
			1 => Self::Byte,
			2 => Self::Short,
			3 => Self::Int,
			4 => Self::Long,
			6 => Self::Float,
			7 => Self::Double,
			8 => Self::String,
			10 => Self::Parcelable,
			11 => Self::Object,
			other => Self::Fallback(other),
		}
	}
}

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
	Bool(bool),
	Byte(i8),
	Short(i16),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	String(String),
}

impl ParamValue {
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i32> {
		match self {
			Self::Int(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_long(&self) -> Option<i64> {
		match self {
			Self::Long(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_double(&self) -> Option<f64> {
		match self {
			Self::Double(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(v) => Some(v),
			_ => None,
		}
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Bool(_) => "bool",
			Self::Byte(_) => "byte",
			Self::Short(_) => "short",
			Self::Int(_) => "int",
			Self::Long(_) => "long",
			Self::Float(_) => "float",
			Self::Double(_) => "double",
			Self::String(_) => "string",
		}
	}
}

/// Typed extras carried by a request, in binding order.
pub type Extras = IndexMap<String, ParamValue>;

/// Why a parameter was not bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
	/// Name or value was absent or empty.
	Empty,
	/// The declared kind cannot be represented by a string.
	Unsupported,
	/// The value did not parse as the declared kind.
	Malformed(String),
}

/// Result of binding one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
	Bound,
	Skipped(SkipReason),
}

/// Converts `raw` according to `kind` and stores it under `name`.
pub fn bind(extras: &mut Extras, kind: ParamKind, name: &str, raw: Option<&str>) -> BindOutcome {
	let raw = match raw {
		Some(raw) if !name.is_empty() && !raw.is_empty() => raw,
		_ => return BindOutcome::Skipped(SkipReason::Empty),
	};

	match convert(kind, raw) {
		Ok(Some(value)) => {
			extras.insert(name.to_string(), value);
			BindOutcome::Bound
		}
		Ok(None) => BindOutcome::Skipped(SkipReason::Unsupported),
		Err(reason) => {
			tracing::warn!(param = name, kind = ?kind, value = raw, %reason, "failed to bind route parameter");
			BindOutcome::Skipped(SkipReason::Malformed(reason))
		}
	}
}

fn convert(kind: ParamKind, raw: &str) -> Result<Option<ParamValue>, String> {
	let value = match kind {
		ParamKind::Boolean => ParamValue::Bool(parse_bool(raw)?),
		ParamKind::Byte => ParamValue::Byte(parse_num(raw, "byte")?),
		ParamKind::Short => ParamValue::Short(parse_num(raw, "short")?),
		ParamKind::Int => ParamValue::Int(parse_num(raw, "int")?),
		ParamKind::Long => ParamValue::Long(parse_num(raw, "long")?),
		ParamKind::Float => ParamValue::Float(parse_num(raw, "float")?),
		ParamKind::Double => ParamValue::Double(parse_num(raw, "double")?),
		ParamKind::String | ParamKind::Object | ParamKind::Fallback(_) => ParamValue::String(raw.to_string()),
		ParamKind::Parcelable => return Ok(None),
	};
	Ok(Some(value))
}

fn parse_bool(raw: &str) -> Result<bool, String> {
	if raw.eq_ignore_ascii_case("true") {
		Ok(true)
	} else if raw.eq_ignore_ascii_case("false") {
		Ok(false)
	} else {
		Err(format!("invalid boolean: '{raw}' (expected true/false)"))
	}
}

fn parse_num<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, String> {
	raw.parse::<T>().map_err(|_| format!("invalid {what}: '{raw}'"))
}
