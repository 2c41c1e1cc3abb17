/* Copyright © 2025 multa contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

use serde::Deserialize;

// ---------------
// -- RECEIVING --
// ---------------
//
// The envelope published by the BCRP statistics API. Field names mirror
// the upstream JSON, which is in Spanish.

#[derive(Debug, Deserialize)]
pub struct SeriesEnvelope {
	#[serde(default)]
	pub series: Vec<Series>,
}

#[derive(Debug, Deserialize)]
pub struct Series {
	#[serde(default)]
	pub periodos: Vec<Period>,
}

#[derive(Debug, Deserialize)]
pub struct Period {
	pub fecha: String,

	#[serde(default, deserialize_with = "deserialize_values")]
	pub valores: Vec<String>,
}

impl Period {
	/// The first value of the period parsed as a number, if there is one
	/// and it is numeric.
	pub fn first_value(&self) -> Option<f64> {
		self.valores.first().and_then(|v| v.parse::<f64>().ok())
	}
}

/// The API has been observed emitting values both as JSON strings and as
/// bare numbers; accept either and normalize to strings.
fn deserialize_values<'de, D>(
	deserializer: D,
) -> Result<Vec<String>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
	raw.into_iter()
		.map(|value| match value {
			serde_json::Value::String(s) => Ok(s),
			serde_json::Value::Number(num) => Ok(num.to_string()),
			_ => Err(serde::de::Error::custom("expected a number or string")),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_string_values() {
		let body = r#"{"series":[{"periodos":[{"fecha":"2024-12-31","valores":["3.745"]}]}]}"#;
		let envelope: SeriesEnvelope = serde_json::from_str(body).unwrap();
		let period = &envelope.series[0].periodos[0];
		assert_eq!(period.fecha, "2024-12-31");
		assert_eq!(period.first_value(), Some(3.745));
	}

	#[test]
	fn test_parse_numeric_values() {
		let body = r#"{"series":[{"periodos":[{"fecha":"2024-12-31","valores":[3.745]}]}]}"#;
		let envelope: SeriesEnvelope = serde_json::from_str(body).unwrap();
		assert_eq!(envelope.series[0].periodos[0].first_value(), Some(3.745));
	}

	#[test]
	fn test_non_numeric_value_is_none() {
		let body = r#"{"series":[{"periodos":[{"fecha":"2024-12-31","valores":["n.d."]}]}]}"#;
		let envelope: SeriesEnvelope = serde_json::from_str(body).unwrap();
		assert_eq!(envelope.series[0].periodos[0].first_value(), None);
	}

	#[test]
	fn test_missing_pieces_default_to_empty() {
		let envelope: SeriesEnvelope = serde_json::from_str("{}").unwrap();
		assert!(envelope.series.is_empty());

		let envelope: SeriesEnvelope =
			serde_json::from_str(r#"{"series":[{}]}"#).unwrap();
		assert!(envelope.series[0].periodos.is_empty());
	}
}
