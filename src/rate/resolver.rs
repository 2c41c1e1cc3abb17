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

use crate::rate::models::SeriesEnvelope;
use crate::util::date::Date;
use thiserror::Error;

/// Maximum number of point-in-time queries per resolution. The SUNAT rule
/// is to fall back to the nearest prior business day with a published
/// rate; five steps is enough to clear any weekend-plus-holidays run.
pub const MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum ResolveError {
	/// No valid rate within the allotted backward steps. User-facing
	/// message, so it is worded like the rest of the interface.
	#[error("No se pudo obtener el tipo de cambio después de {attempts} intentos. Intente con otra fecha.")]
	ExhaustedBudget { attempts: u32 },

	/// The upstream request itself failed (network error, non-2xx status).
	#[error("Error al consultar la API del BCRP: {0}")]
	Transport(String),
}

/// What to do when a transport failure occurs on an intermediate backward
/// step: abort the whole resolution, or count it as one more day with no
/// data and keep stepping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TransportPolicy {
	#[default]
	Fatal,
	StepBack,
}

/// A single point-in-time query against the upstream series. Returns the
/// raw response body; interpreting it is the resolver's job, so that the
/// classification policy is testable without a transport.
pub trait SeriesSource {
	fn fetch(&self, date: &Date) -> Result<String, ResolveError>;
}

/// A successfully resolved rate. `effective_date` is whatever date the
/// upstream reports for the observation, which may precede the queried
/// date; it is passed through verbatim.
#[derive(Debug, PartialEq)]
pub struct Resolution {
	pub rate: f64,
	pub effective_date: String,
}

/// Outcome of inspecting one raw upstream body.
#[derive(Debug, PartialEq)]
enum Classification {
	Valid { rate: f64, effective_date: String },
	Empty,
	Malformed,
}

/// The BCRP omits weekends and holidays from the series, and for some of
/// those dates answers with an HTML error page instead of JSON. Both mean
/// "no rate for this day": a malformed body is never fatal here.
fn classify(body: &str) -> Classification {
	let envelope: SeriesEnvelope = match serde_json::from_str(body) {
		Ok(envelope) => envelope,
		Err(_) => return Classification::Malformed,
	};

	let period =
		match envelope.series.first().and_then(|s| s.periodos.first()) {
			Some(period) => period,
			None => return Classification::Empty,
		};

	// A present but zero, negative, or non-numeric value counts the same
	// as an absent one.
	match period.first_value() {
		Some(rate) if rate.is_finite() && rate > 0.0 => {
			Classification::Valid {
				rate,
				effective_date: period.fecha.clone(),
			}
		},
		_ => Classification::Empty,
	}
}

/// Resolves the exchange rate at or before `date`, stepping backward one
/// calendar day per failed lookup, issuing at most `attempts` queries.
/// The first date at or before the requested one with a valid positive
/// value wins; there is no look-ahead and no averaging.
pub fn resolve(
	source: &dyn SeriesSource,
	date: Date,
	attempts: u32,
	policy: TransportPolicy,
) -> Result<Resolution, ResolveError> {
	let mut current = date;
	let mut remaining = attempts;

	while remaining > 0 {
		let outcome = match source.fetch(&current) {
			Ok(body) => classify(&body),
			Err(e) => match policy {
				TransportPolicy::Fatal => return Err(e),
				TransportPolicy::StepBack => Classification::Malformed,
			},
		};

		match outcome {
			Classification::Valid {
				rate,
				effective_date,
			} => {
				return Ok(Resolution {
					rate,
					effective_date,
				})
			},
			Classification::Empty | Classification::Malformed => {
				println!(
					"[{}] no published rate; stepping back one day",
					current
				);
				current = current.prev();
				remaining -= 1;
			},
		}
	}

	Err(ResolveError::ExhaustedBudget { attempts })
}
