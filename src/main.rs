//! powernet entry point: CLI wiring and config-driven scenario runs.

use std::path::Path;
use std::process;

use powernet::cli::{self, Parsed};
use powernet::config::ScenarioConfig;
use powernet::io::export::export_csv;
use powernet::report::{NetworkReport, membership_rows};
use powernet::runner::run_scenario;
use tracing::info;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let opts = match cli::parse_args() {
        Ok(Parsed::Run(opts)) => opts,
        Ok(Parsed::Help) => {
            cli::print_usage();
            process::exit(0);
        }
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    // Load config: --scenario takes priority, then --preset
    let loaded = match (&opts.scenario, &opts.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path),
        (None, Some(name)) => ScenarioConfig::from_preset(name),
        (None, None) => Ok(ScenarioConfig::line()),
    };
    let mut scenario = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Some(seed) = opts.seed {
        scenario.simulation.seed = seed;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let outcome = run_scenario(&scenario);

    if !opts.quiet {
        for record in &outcome.events {
            println!("{record}");
        }
    }

    let report = NetworkReport::from_world(&outcome.name, &outcome.world);
    println!("\n{report}");

    let rows = membership_rows(&outcome.world);
    if let Some(ref path) = opts.export {
        if let Err(e) = export_csv(&rows, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        info!(path = %path.display(), rows = rows.len(), "membership written");
    }

    if opts.serve {
        serve(report, rows, opts.port);
    }
}

#[cfg(feature = "api")]
fn serve(report: NetworkReport, members: Vec<powernet::report::MembershipRow>, port: u16) {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(powernet::api::AppState { report, members });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });
    rt.block_on(powernet::api::serve(state, addr));
}

#[cfg(not(feature = "api"))]
fn serve(_report: NetworkReport, _members: Vec<powernet::report::MembershipRow>, _port: u16) {
    eprintln!("error: --serve requires building with `--features api`");
    process::exit(1);
}
