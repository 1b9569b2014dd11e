/// CLI entry point: builds one daily report and prints it as JSON.
///
/// Usage:
///   airguide_service <station> [age_group] [condition]
///
/// The station is any Korean place name; age group and condition default
/// to elementary_low / none. Endpoints and timeouts come from the
/// environment (see `config`), with `.env` files honored.

use std::env;
use std::error::Error;
use std::process;

use dotenv::dotenv;
use tracing::{info, warn};

use airguide_service::config::ServiceConfig;
use airguide_service::decision::freshness::{ReadingAge, classify_reading_age};
use airguide_service::ingest;
use airguide_service::ingest::advice::HttpAdviceApi;
use airguide_service::ingest::air::HttpAirQualityApi;
use airguide_service::logging;
use airguide_service::model::{AgeGroup, Condition, ProfileInput};
use airguide_service::report::build_daily_report;
use airguide_service::stations::StationHints;

fn parse_age_group(value: &str) -> Result<AgeGroup, String> {
    match value {
        "infant" => Ok(AgeGroup::Infant),
        "toddler" => Ok(AgeGroup::Toddler),
        "elementary_low" => Ok(AgeGroup::ElementaryLow),
        "elementary_high" => Ok(AgeGroup::ElementaryHigh),
        "teen_adult" => Ok(AgeGroup::TeenAdult),
        other => Err(format!(
            "unknown age group \"{other}\" (expected infant, toddler, elementary_low, \
             elementary_high or teen_adult)"
        )),
    }
}

fn parse_condition(value: &str) -> Result<Condition, String> {
    match value {
        "none" => Ok(Condition::None),
        "rhinitis" => Ok(Condition::Rhinitis),
        "asthma" => Ok(Condition::Asthma),
        "atopy" => Ok(Condition::Atopy),
        other => {
            Err(format!("unknown condition \"{other}\" (expected none, rhinitis, asthma or atopy)"))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    logging::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(station_name) = args.first() else {
        eprintln!("Usage: airguide_service <station> [age_group] [condition]");
        process::exit(2);
    };

    let mut profile = ProfileInput::default();
    if let Some(value) = args.get(1) {
        match parse_age_group(value) {
            Ok(age_group) => profile.age_group = age_group,
            Err(message) => {
                eprintln!("{message}");
                process::exit(2);
            }
        }
    }
    if let Some(value) = args.get(2) {
        match parse_condition(value) {
            Ok(condition) => profile.condition = condition,
            Err(message) => {
                eprintln!("{message}");
                process::exit(2);
            }
        }
    }

    let config = ServiceConfig::from_env();
    let hints = match &config.station_hints_file {
        Some(path) => StationHints::load(path)?,
        None => StationHints::builtin(),
    };

    let client = ingest::build_http_client(config.request_timeout)?;
    let air_api = HttpAirQualityApi::new(client.clone(), &config.data_api_url);
    let advice_api = HttpAdviceApi::new(client, &config.ai_api_url);

    info!("building daily report for \"{station_name}\"");
    let report = build_daily_report(&air_api, &advice_api, &hints, station_name, &profile).await;

    match classify_reading_age(report.air_quality.data_time.as_deref()) {
        ReadingAge::Fresh => {}
        age => warn!(
            "air reading for \"{}\" is {age:?} (measured at {:?})",
            report.air_quality.station_name, report.air_quality.data_time
        ),
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
