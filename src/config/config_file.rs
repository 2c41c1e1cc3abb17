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

use anyhow::{anyhow, Error};
use dirs::home_dir;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub bcrp: Option<Bcrp>,
	pub multa: Option<Multa>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Bcrp {
	pub api_url: Option<String>,

	/// Series identifier to query; defaults to the daily sale rate
	pub series: Option<String>,

	/// If true, a failed request during backoff counts as one more day
	/// with no data instead of aborting the resolution
	pub retry_on_transport: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Multa {
	/// Penalty multiplier applied on top of the converted tax amount
	pub multiplier: Option<f64>,
}

/// Fetches the config from the given path, or the default path if none.
/// A missing file at the default path is not an error; every key has a
/// built-in default.
pub fn get_config(
	custom_config_path: Option<&String>,
) -> Result<Config, Error> {
	let config_path = match custom_config_path {
		None => {
			let home_dir = home_dir().ok_or_else(|| {
				anyhow!("Unable to determine home directory")
			})?;
			home_dir.join(".config/multa/config.toml")
		},
		Some(p) => PathBuf::from(p),
	};

	if !config_path.exists() && custom_config_path.is_none() {
		return Ok(Config::default());
	}

	let content = fs::read_to_string(config_path)?;
	let config: Config = toml::from_str(&content)
		.map_err(|e| anyhow!("failed to parse config: {}", e))?;

	Ok(config)
}
