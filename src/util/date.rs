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

use anyhow::{bail, Error};
use std::fmt;

/// A plain calendar date with no time or timezone component. Backoff math
/// is exact day arithmetic, so a date parsed from "YYYY-MM-DD" always
/// renders back to the same string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date {
	year: u32,
	month: u8,
	day: u8,
}

impl Date {
	/// Constructor to parse a string in the "YYYY-mm-dd" format
	pub fn from_str(date_str: &str) -> Result<Date, Error> {
		let parts: Vec<&str> = date_str.split('-').collect();
		if parts.len() != 3 {
			bail!("Date format must be YYYY-MM-DD");
		}

		let year = parts[0].parse::<u32>()?;
		let month = parts[1].parse::<u8>()?;
		let day = parts[2].parse::<u8>()?;

		if !Date::is_valid_date(year, month, day) {
			bail!("Invalid date");
		}

		Ok(Date { year, month, day })
	}

	/// The previous calendar day, exact across month and year boundaries
	pub fn prev(&self) -> Date {
		if self.day > 1 {
			Date {
				day: self.day - 1,
				..*self
			}
		} else if self.month > 1 {
			let month = self.month - 1;
			Date {
				year: self.year,
				month,
				day: Date::days_in_month(self.year, month),
			}
		} else {
			Date {
				year: self.year - 1,
				month: 12,
				day: 31,
			}
		}
	}

	fn is_leap_year(year: u32) -> bool {
		(year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
	}

	fn days_in_month(year: u32, month: u8) -> u8 {
		match month {
			1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
			4 | 6 | 9 | 11 => 30,
			2 => {
				if Date::is_leap_year(year) {
					29
				} else {
					28
				}
			},
			_ => 0, // Invalid month
		}
	}

	fn is_valid_date(year: u32, month: u8, day: u8) -> bool {
		if !(1..=12).contains(&month) {
			return false;
		}
		if day < 1 || day > Date::days_in_month(year, month) {
			return false;
		}
		true
	}
}

impl fmt::Display for Date {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
	}
}
