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
use crate::config::config_file;
use crate::rate::client::{Client, BCRP_API_URL, DEFAULT_SERIES};
use crate::rate::resolver::{self, Resolution, TransportPolicy};
use crate::util::date::Date;
use anyhow::{bail, Error};
use chrono::Local;
use clap::{Parser, ValueEnum};

mod config;
mod handler;
mod penalty;
mod rate;
mod util;

#[derive(Parser)]
#[command(
	name = "multa",
	version = "1.0",
	about = "Calculates SUNAT fines in soles from a USD tax amount, using the official BCRP sale exchange rate"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	// -----------
	// -- FLAGS --
	// -----------
	/// Infraction date (YYYY-MM-DD)
	#[arg(short, long)]
	fecha: Option<String>,

	/// Tax amount in USD the fine is based on
	#[arg(short, long)]
	monto: Option<f64>,

	/// Custom config file location (default: ~/.config/multa/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Print the raw lookup response as JSON instead of human output
	#[arg(long)]
	json: bool,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if let Some(monto) = self.monto {
			if !monto.is_finite() || monto <= 0.0 {
				bail!("Monto must be a positive amount in USD");
			}
		}

		if self.command == Directive::Multa && self.monto.is_none() {
			bail!("No amount specified; pass the tax amount with -m");
		}

		if self.json && self.command != Directive::Tc {
			bail!("--json is only available for the tc command");
		}

		Ok(())
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Tc,    // look up the exchange rate for a date
	Multa, // compute the full fine in soles
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	args.validate()?;

	let config = config_file::get_config(args.config.as_ref())?;
	let bcrp = config.bcrp.unwrap_or_default();

	let client = Client::new(
		bcrp.api_url.as_deref().unwrap_or(BCRP_API_URL),
		bcrp.series.as_deref().unwrap_or(DEFAULT_SERIES),
	);

	let policy = if bcrp.retry_on_transport.unwrap_or(false) {
		TransportPolicy::StepBack
	} else {
		TransportPolicy::Fatal
	};

	// In json mode the handler owns the whole exchange, including the
	// missing-parameter case; emit its body verbatim like the original
	// endpoint would.
	if args.json {
		let response = handler::handle(&client, args.fecha.as_deref(), policy);
		println!("{}", response.body);
		if response.status != 200 {
			std::process::exit(1);
		}
		return Ok(());
	}

	let fecha = match &args.fecha {
		Some(f) => Date::from_str(f)?,
		None => bail!("No date specified"),
	};

	if fecha > today() {
		bail!("Date is in the future; the BCRP has not published a rate for it yet");
	}

	let resolution =
		resolver::resolve(&client, fecha, resolver::MAX_ATTEMPTS, policy)?;

	print_rate(&resolution);

	if args.command == Directive::Multa {
		// presence was checked in validate()
		let monto = args.monto.unwrap();

		let multiplier = config
			.multa
			.unwrap_or_default()
			.multiplier
			.unwrap_or(penalty::DEFAULT_MULTIPLIER);

		let total =
			penalty::penalty_in_soles(monto, resolution.rate, multiplier);
		println!("Multa total: S/ {:.2}", total);
	}

	Ok(())
}

fn print_rate(resolution: &Resolution) {
	println!(
		"T.C. Venta: {:.4} S/ (dato del BCRP para la fecha: {})",
		resolution.rate, resolution.effective_date
	);
}

fn today() -> Date {
	Date::from_str(&Local::now().date_naive().to_string()).unwrap()
}
