// Taxi Trip Analytics - Main executable
// Author: Gabriel Demetrios Lafis

use anyhow::{bail, Context};
use clap::{Arg, ArgMatches, Command};
use log::{error, info};

use taxi_trip_analytics::{
    api::{AppState, Server, ServerConfig},
    data::source_for_path,
    processing::{TripQuery, TripService},
    storage::DatasetSlot,
    utils::{init_logging, init_logging_to_file, AppError, Config},
};

fn cli() -> Command<'static> {
    let dataset_arg = Arg::new("dataset")
        .short('d')
        .long("dataset")
        .value_name("FILE")
        .help("Trip data file (.csv or .json)")
        .takes_value(true);

    Command::new("Taxi Trip Analytics")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Analytical queries over taxi trip records")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the API server")
                .arg(
                    Arg::new("host")
                        .short('H')
                        .long("host")
                        .value_name("HOST")
                        .help("Sets the server host")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Sets the server port")
                        .takes_value(true),
                )
                .arg(dataset_arg.clone()),
        )
        .subcommand(
            Command::new("summary")
                .about("Print the dataset summary as JSON")
                .arg(dataset_arg),
        )
}

/// Load the trip file named on the command line or in the config
fn load_dataset(config: &Config, matches: &ArgMatches) -> anyhow::Result<DatasetSlot> {
    let path = matches
        .value_of("dataset")
        .map(str::to_string)
        .or_else(|| config.dataset.path.clone())
        .context("No dataset given; pass --dataset or set dataset.path")?;

    let slot = DatasetSlot::new();
    let source = source_for_path(&path, config.dataset.delimiter);
    slot.load(source.as_ref())
        .with_context(|| format!("Failed to load dataset from {}", path))?;

    Ok(slot)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    // Load configuration
    let config = match matches.value_of("config") {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Error loading config file {}", path))?,
        None => Config::default(),
    };

    // Initialize logging
    let logging = match &config.logging.file {
        Some(file) => init_logging_to_file(config.log_level_filter(), file),
        None => init_logging(config.log_level_filter())
            .map_err(|e| AppError::Other(e.to_string())),
    };
    if let Err(err) = logging {
        eprintln!("Error initializing logger: {}", err);
    }

    match matches.subcommand() {
        Some(("serve", sub)) => {
            let slot = load_dataset(&config, sub)?;

            let host = sub.value_of("host").unwrap_or(&config.server.host).to_string();
            let port = match sub.value_of("port") {
                Some(port) => port.parse::<u16>().context("Invalid port")?,
                None => config.server.port,
            };

            let server_config = ServerConfig {
                host,
                port,
                workers: config.server.workers.unwrap_or_else(num_cpus::get),
                enable_cors: config.server.enable_cors,
            };

            let state = AppState::new(slot, config.query_options());
            Server::new(state, server_config).run().await?;
        }
        Some(("summary", sub)) => {
            let slot = load_dataset(&config, sub)?;
            let service = TripService::with_options(slot.current()?, config.query_options());
            let summary = service.execute(&TripQuery::DatasetSummary)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        _ => {
            error!("No subcommand specified");
            bail!("No subcommand specified. Use --help for usage information.");
        }
    }

    info!("Shutting down");
    Ok(())
}
