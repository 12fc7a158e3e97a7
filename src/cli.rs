use std::env;
use std::path::PathBuf;

/// Default API port when `--serve` is given without `--port`.
pub const DEFAULT_PORT: u16 = 3000;

/// Parsed command-line options.
#[derive(Debug)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub export: Option<PathBuf>,
    pub quiet: bool,
    pub serve: bool,
    pub port: u16,
}

/// Result of parsing: either options to run with, or a request for help.
#[derive(Debug)]
pub enum Parsed {
    Run(CliOptions),
    Help,
}

pub fn parse_args() -> Result<Parsed, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

pub fn parse_args_from(args: &[String]) -> Result<Parsed, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut seed = None;
    let mut export = None;
    let mut quiet = false;
    let mut serve = false;
    let mut port = None;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --scenario (expected a TOML path)")?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let value = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                seed = Some(value);
            }
            "--export" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --export (expected a file path)")?;
                if export.replace(PathBuf::from(path)).is_some() {
                    return Err("--export provided more than once".to_string());
                }
            }
            "--quiet" | "-q" => quiet = true,
            "--serve" => serve = true,
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let value = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                port = Some(value);
            }
            "--help" | "-h" => return Ok(Parsed::Help),
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }
    if port.is_some() && !serve {
        return Err("`--port` requires `--serve`".to_string());
    }

    if scenario.is_none() && preset.is_none() {
        preset = Some("line".to_string());
    }

    Ok(Parsed::Run(CliOptions {
        scenario,
        preset,
        seed,
        export,
        quiet,
        serve,
        port: port.unwrap_or(DEFAULT_PORT),
    }))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("powernet: power-network connectivity simulator");
    eprintln!();
    eprintln!("Usage: powernet [--scenario <path> | --preset <name>] [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load scenario from TOML config file");
    eprintln!("  --preset <name>     Use a built-in preset (line, split, tiers, bridge, scatter)");
    eprintln!("  --seed <u64>        Override random seed");
    eprintln!("  --export <path>     Write per-conductor membership CSV");
    eprintln!("  -q, --quiet         Do not print the event log");
    eprintln!("  --serve             Start REST API server after the run (feature `api`)");
    eprintln!("  --port <u16>        API server port (default: {DEFAULT_PORT})");
    eprintln!("  -h, --help          Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the line preset is used.");
}
