use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::{error, LevelFilter};

use exifkit::utils::logger::Logger;
use exifkit::commands::{CommandFactory, ExifkitCommandFactory};

fn main() {
    let matches = ClapCommand::new("ExifKit")
        .version("1.0")
        .author("Maurice Schilpp")
        .about("Read, rewrite and strip Exif metadata in JPEG photos")
        .arg(
            Arg::new("inputs")
                .help("Input JPEG files")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output and list every tag after the report")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dump")
                .short('d')
                .long("dump")
                .help("List every tag of every IFD instead of the report")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("set-gps")
                .long("set-gps")
                .help("Write a new GPS position, e.g. '37.2343,-115.8067' or '37.2343N,115.8067W'")
                .value_name("LAT,LON")
                .allow_hyphen_values(true)
                .conflicts_with_all(["strip", "dump"])
                .required(false),
        )
        .arg(
            Arg::new("strip")
                .short('s')
                .long("strip")
                .help("Remove all Exif metadata")
                .conflicts_with("dump")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output JPEG file for --set-gps and --strip")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("little-endian")
                .long("little-endian")
                .help("Write Exif data in Intel (II) byte order instead of Motorola (MM)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log records and reports to this file")
                .value_name("FILE")
                .required(false),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };

    let logger = match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            let report_log = format!("{}.reports", log_file);
            let logger = match Logger::new(&report_log) {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("Error initializing logger: {}", e);
                    process::exit(1);
                }
            };
            if let Err(e) = Logger::init_global_logger(log_file, level) {
                eprintln!("Error setting up global logger: {}", e);
                process::exit(1);
            }
            logger
        }
        None => {
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(level.as_str()),
            )
            .format_timestamp(None)
            .try_init();
            Logger::console()
        }
    };

    let factory = ExifkitCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
