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

use crate::rate::resolver::{self, SeriesSource, TransportPolicy};
use crate::util::date::Date;
use serde_json::json;

/// What the boundary hands back to its host: a status code plus a JSON
/// body. The host decides how to deliver it (the CLI prints the body and
/// maps the status to an exit code).
pub struct Response {
	pub status: u16,
	pub body: String,
}

/// Handles one rate lookup. `fecha` arrives as an optional raw query
/// parameter; a missing or unparseable date is the caller's fault (400),
/// while anything that goes wrong during resolution is reported as a
/// server-side failure (500) with the error's message verbatim. No retry
/// happens at this layer.
pub fn handle(
	source: &dyn SeriesSource,
	fecha: Option<&str>,
	policy: TransportPolicy,
) -> Response {
	let fecha = match fecha {
		Some(f) if !f.is_empty() => f,
		_ => return error_response(400, "Falta el parámetro de fecha."),
	};

	let date = match Date::from_str(fecha) {
		Ok(date) => date,
		Err(e) => return error_response(400, &e.to_string()),
	};

	match resolver::resolve(source, date, resolver::MAX_ATTEMPTS, policy) {
		Ok(resolution) => Response {
			status: 200,
			body: json!({
				"tc": resolution.rate,
				"fechaUtilizada": resolution.effective_date,
			})
			.to_string(),
		},
		Err(e) => error_response(500, &e.to_string()),
	}
}

fn error_response(status: u16, message: &str) -> Response {
	Response {
		status,
		body: json!({ "error": message }).to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rate::resolver::ResolveError;
	use std::cell::RefCell;

	struct ScriptedSource {
		responses: RefCell<Vec<Result<String, ResolveError>>>,
		calls: RefCell<u32>,
	}

	impl ScriptedSource {
		fn new(responses: Vec<Result<String, ResolveError>>) -> Self {
			Self {
				responses: RefCell::new(responses),
				calls: RefCell::new(0),
			}
		}

		fn calls(&self) -> u32 {
			*self.calls.borrow()
		}
	}

	impl SeriesSource for ScriptedSource {
		fn fetch(&self, _date: &Date) -> Result<String, ResolveError> {
			*self.calls.borrow_mut() += 1;
			self.responses.borrow_mut().remove(0)
		}
	}

	fn body_json(response: &Response) -> serde_json::Value {
		serde_json::from_str(&response.body).unwrap()
	}

	#[test]
	fn test_missing_fecha_is_client_error_without_queries() {
		let source = ScriptedSource::new(vec![]);

		for fecha in [None, Some("")] {
			let response =
				handle(&source, fecha, TransportPolicy::Fatal);
			assert_eq!(response.status, 400);
			assert_eq!(
				body_json(&response)["error"],
				"Falta el parámetro de fecha."
			);
		}

		assert_eq!(source.calls(), 0);
	}

	#[test]
	fn test_unparseable_fecha_is_client_error_without_queries() {
		let source = ScriptedSource::new(vec![]);

		let response =
			handle(&source, Some("yesterday"), TransportPolicy::Fatal);

		assert_eq!(response.status, 400);
		assert_eq!(source.calls(), 0);
	}

	#[test]
	fn test_success_reports_rate_and_effective_date() {
		let source = ScriptedSource::new(vec![Ok(r#"{"series":[{"periodos":[{"fecha":"2025-01-02","valores":["3.745"]}]}]}"#.to_string())]);

		let response =
			handle(&source, Some("2025-01-02"), TransportPolicy::Fatal);

		assert_eq!(response.status, 200);
		let body = body_json(&response);
		assert_eq!(body["tc"], 3.745);
		assert_eq!(body["fechaUtilizada"], "2025-01-02");
		assert_eq!(source.calls(), 1);
	}

	#[test]
	fn test_holiday_resolves_to_prior_business_day() {
		// 2025-01-01 is a holiday; data exists from 2024-12-31 back.
		let source = ScriptedSource::new(vec![
			Ok(r#"{"series":[]}"#.to_string()),
			Ok(r#"{"series":[{"periodos":[{"fecha":"2024-12-31","valores":["3.745"]}]}]}"#.to_string()),
		]);

		let response =
			handle(&source, Some("2025-01-01"), TransportPolicy::Fatal);

		assert_eq!(response.status, 200);
		let body = body_json(&response);
		assert_eq!(body["tc"], 3.745);
		assert_eq!(body["fechaUtilizada"], "2024-12-31");
		assert_eq!(source.calls(), 2);
	}

	#[test]
	fn test_exhausted_budget_is_server_error() {
		let source = ScriptedSource::new(
			std::iter::repeat_with(|| Ok(r#"{"series":[]}"#.to_string()))
				.take(5)
				.collect(),
		);

		let response =
			handle(&source, Some("2025-01-01"), TransportPolicy::Fatal);

		assert_eq!(response.status, 500);
		assert_eq!(source.calls(), 5);
		let body = body_json(&response);
		assert!(body["error"]
			.as_str()
			.unwrap()
			.contains("5 intentos"));
	}

	#[test]
	fn test_transport_failure_is_server_error() {
		let source = ScriptedSource::new(vec![Err(
			ResolveError::Transport("connection refused".to_string()),
		)]);

		let response =
			handle(&source, Some("2025-01-02"), TransportPolicy::Fatal);

		assert_eq!(response.status, 500);
		assert!(body_json(&response)["error"]
			.as_str()
			.unwrap()
			.contains("BCRP"));
	}
}
