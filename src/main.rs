use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{format_err, Result};
use clap::{Parser, Subcommand};
use clio::Output;
use flexi_logger::LoggerHandle;
use log::info;
use opendota::hero_list::render_hero_list;
use opendota::utils::{print_err, unwrap_or_def_verbose};
use opendota::{store, Config, HeroId, MatchId, Mode, OpenDota};
use serde_json::Value;

mod logging;

/// Rate limited OpenDota API client
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// API base URL. Falls back to the config file, then $OPEN_DOTA_API.
    #[clap(long)]
    host: Option<String>,

    #[clap(long)]
    api_key: Option<String>,

    /// Minimum delay between requests in milliseconds
    #[clap(long)]
    cooldown_ms: Option<u64>,

    /// 0 waits for the cooldown, -1 skips when not ready, anything else sends at once
    #[clap(long, allow_negative_numbers = true)]
    mode: Option<i32>,

    /// Give up after this many retries of a failing request
    #[clap(long)]
    max_retries: Option<u32>,

    /// Skip TLS certificate verification
    #[clap(long)]
    insecure: bool,

    #[clap(long, short)]
    verbose: bool,

    /// Config file, defaults to config.yaml in the data directory
    #[clap(long)]
    config: Option<PathBuf>,

    /// File to write output
    #[clap(long, short, value_parser, default_value = "-")]
    output: Output,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// GET /heroes
    Heroes {
        /// Print "id name" lines instead of JSON
        #[clap(long)]
        list: bool,
    },
    /// GET /heroes/{hero_id}/matches
    HeroMatches { hero_id: u32 },
    /// GET /matches/{match_id}
    Match { match_id: u64 },
    /// GET an arbitrary endpoint
    Get {
        path: String,
        #[clap(short, long = "data", value_parser = parse_key_val)]
        data: Vec<(String, String)>,
    },
    /// POST form data to an arbitrary endpoint
    Post {
        path: String,
        #[clap(short, long = "data", value_parser = parse_key_val)]
        data: Vec<(String, String)>,
    },
    /// Write the default config file
    InitConfig,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{s}`"))
}

fn config_path(args: &Args) -> Result<PathBuf> {
    match &args.config {
        Some(path) => Ok(path.clone()),
        None => store::config_file_path(),
    }
}

fn effective_config(args: &Args) -> Config {
    let mut config = unwrap_or_def_verbose(config_path(args).and_then(|p| store::load_config_from(&p)));
    if args.host.is_some() {
        config.hostname = args.host.clone();
    }
    if args.api_key.is_some() {
        config.api_key = args.api_key.clone();
    }
    if let Some(cooldown_ms) = args.cooldown_ms {
        config.cooldown_ms = cooldown_ms;
    }
    if args.max_retries.is_some() {
        config.max_retries = args.max_retries;
    }
    if let Some(mode) = args.mode {
        config.mode = Mode::from(mode);
    }
    config.insecure |= args.insecure;
    config.verbose |= args.verbose;
    config
}

fn borrowed(data: &[(String, String)]) -> Vec<(&str, &str)> {
    data.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

fn write_json(output: &mut Output, value: &Value) -> Result<()> {
    serde_json::to_writer_pretty(&mut *output, value)?;
    writeln!(output)?;
    Ok(())
}

fn run(mut args: Args, logger: Option<&mut LoggerHandle>) -> Result<()> {
    let config = effective_config(&args);
    if let Some(logger) = logger {
        logging::apply_verbosity(logger, config.verbose);
    }
    let mode = config.mode;
    let client = || OpenDota::new(&config);

    let result = match &args.command {
        Command::InitConfig => {
            let path = config_path(&args)?;
            store::store_default_config(&path)?;
            info!("Default config written to {}", path.to_string_lossy());
            return Ok(());
        }
        Command::Heroes { list: true } => {
            let heroes = client()?.heroes(mode);
            render_hero_list(&heroes, &mut args.output)?;
            return heroes.map(|_| ()).map_err(|e| format_err!(e));
        }
        Command::Heroes { list: false } => client()?.heroes(mode),
        Command::HeroMatches { hero_id } => client()?.hero_matches(HeroId::from(*hero_id), mode),
        Command::Match { match_id } => client()?.match_details(MatchId::from(*match_id), mode),
        Command::Get { path, data } => client()?.request(path, mode, &borrowed(data), false),
        Command::Post { path, data } => client()?.request(path, mode, &borrowed(data), true),
    };
    let value = result?;
    write_json(&mut args.output, &value)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut logger = match logging::init(args.verbose) {
        Ok(logger) => Some(logger),
        Err(e) => {
            eprintln!("Logging disabled: {e:#}");
            None
        }
    };
    match run(args, logger.as_mut()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_err(&e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_pairs() {
        assert_eq!(
            parse_key_val("sql=select 1=1"),
            Ok(("sql".to_string(), "select 1=1".to_string()))
        );
        assert!(parse_key_val("novalue").is_err());
    }

    #[test]
    fn command_line_overrides_config() {
        let args = Args::parse_from([
            "opendota",
            "--config",
            "/nonexistent/opendota/config.yaml",
            "--host",
            "https://mirror.local/api",
            "--cooldown-ms",
            "500",
            "--mode",
            "-1",
            "match",
            "42",
        ]);
        let config = effective_config(&args);
        assert_eq!(config.hostname.as_deref(), Some("https://mirror.local/api"));
        assert_eq!(config.cooldown_ms, 500);
        assert_eq!(config.mode, Mode::Skip);
        assert!(matches!(args.command, Command::Match { match_id: 42 }));
    }

    #[test]
    fn verbose_from_config_file_without_flag() -> Result<()> {
        let dir = tempdir::TempDir::new("opendota")?;
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "verbose: true\nmode: immediate\n")?;

        let args = Args::parse_from(["opendota", "--config", path.to_str().unwrap(), "heroes"]);
        let config = effective_config(&args);

        assert!(!args.verbose);
        assert!(config.verbose);
        assert!(matches!(
            logging::stderr_duplication(config.verbose),
            flexi_logger::Duplicate::Info
        ));
        assert_eq!(config.mode, Mode::Immediate);
        Ok(())
    }

    #[test]
    fn get_collects_data_pairs() {
        let args = Args::parse_from(["opendota", "get", "explorer", "-d", "sql=select 1"]);
        match args.command {
            Command::Get { path, data } => {
                assert_eq!(path, "explorer");
                assert_eq!(data, vec![("sql".to_string(), "select 1".to_string())]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
