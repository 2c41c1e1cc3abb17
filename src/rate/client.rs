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

use crate::rate::resolver::{ResolveError, SeriesSource};
use crate::util::date::Date;

pub const BCRP_API_URL: &str =
	"https://estadisticas.bcrp.gob.pe/estadisticas/series/api";

/// Tipo de cambio venta, daily series
pub const DEFAULT_SERIES: &str = "PD04641PD";

const FORMAT: &str = "json";

/// Thin client for the BCRP statistics API. Each call queries a zero-width
/// date range, i.e. exactly one day.
pub struct Client {
	client: reqwest::blocking::Client,
	base_url: String,
	series: String,
}

impl Client {
	pub fn new(base_url: &str, series: &str) -> Self {
		Client {
			client: reqwest::blocking::Client::new(),
			base_url: base_url.trim_end_matches('/').to_string(),
			series: series.to_string(),
		}
	}
}

impl SeriesSource for Client {
	/// Sends a GET for a single date and returns the raw body. Errors on
	/// non-2xx response codes; the body is never inspected here, because
	/// classifying it is the resolver's job.
	fn fetch(&self, date: &Date) -> Result<String, ResolveError> {
		let url = format!(
			"{}/{}/{}/{}/{}",
			self.base_url, self.series, FORMAT, date, date
		);

		println!("Sending GET to {}", url);
		let response = self
			.client
			.get(&url)
			.send()
			.map_err(|e| ResolveError::Transport(e.to_string()))?;

		if !response.status().is_success() {
			return Err(ResolveError::Transport(format!(
				"request failed with status: {}",
				response.status()
			)));
		}

		response
			.text()
			.map_err(|e| ResolveError::Transport(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rate::resolver::{self, TransportPolicy};
	use httpmock::prelude::*;

	#[test]
	fn test_fetch_returns_raw_body() {
		let server = MockServer::start();
		let mock = server.mock(|when, then| {
			when.method(GET)
				.path("/PD04641PD/json/2025-01-02/2025-01-02");
			then.status(200).body("<html>not json</html>");
		});

		let client = Client::new(&server.base_url(), DEFAULT_SERIES);
		let body = client
			.fetch(&Date::from_str("2025-01-02").unwrap())
			.unwrap();

		mock.assert();
		assert_eq!(body, "<html>not json</html>");
	}

	#[test]
	fn test_non_success_status_is_transport_failure() {
		let server = MockServer::start();
		server.mock(|when, then| {
			when.method(GET);
			then.status(502);
		});

		let client = Client::new(&server.base_url(), DEFAULT_SERIES);
		let result = client.fetch(&Date::from_str("2025-01-02").unwrap());

		match result {
			Err(ResolveError::Transport(msg)) => {
				assert!(msg.contains("502"), "unexpected message: {}", msg)
			},
			other => panic!("expected transport failure, got {:?}", other),
		}
	}

	#[test]
	fn test_resolver_backs_off_through_real_transport() {
		let server = MockServer::start();

		// Holiday with nothing published, then the prior business day.
		let holiday = server.mock(|when, then| {
			when.method(GET)
				.path("/PD04641PD/json/2025-01-01/2025-01-01");
			then.status(200).body(r#"{"series":[]}"#);
		});
		let business_day = server.mock(|when, then| {
			when.method(GET)
				.path("/PD04641PD/json/2024-12-31/2024-12-31");
			then.status(200).body(
				r#"{"series":[{"periodos":[{"fecha":"2024-12-31","valores":["3.745"]}]}]}"#,
			);
		});

		let client = Client::new(&server.base_url(), DEFAULT_SERIES);
		let resolution = resolver::resolve(
			&client,
			Date::from_str("2025-01-01").unwrap(),
			resolver::MAX_ATTEMPTS,
			TransportPolicy::Fatal,
		)
		.unwrap();

		holiday.assert();
		business_day.assert();
		assert_eq!(resolution.rate, 3.745);
		assert_eq!(resolution.effective_date, "2024-12-31");
	}
}
