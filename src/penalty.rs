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

/// SUNAT fine rule: twice the tax owed
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Converts the tax amount to soles at the given rate and applies the
/// penalty multiplier.
pub fn penalty_in_soles(tax_usd: f64, rate: f64, multiplier: f64) -> f64 {
	tax_usd * rate * multiplier
}
