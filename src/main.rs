use anyhow::Context;
use readygate::config::GateConfig;
use readygate::engine::PollEngine;
use readygate::notify::{Notifier, TracingNotifier};
use readygate::probe::HttpProber;
use readygate::telemetry;
use std::sync::Arc;

enum CliCommand {
    Run { strict: bool, print_config: bool },
    Help,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise telemetry")?;

    match parse_cli_args()? {
        CliCommand::Run {
            strict,
            print_config,
        } => {
            let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
            let mut config =
                GateConfig::from_env(notifier.as_ref()).context("invalid configuration")?;
            if strict {
                config.strict_errors = true;
            }

            if print_config {
                print_resolved_config(&config);
                return Ok(());
            }

            let prober = Arc::new(HttpProber::new().context("failed to construct HTTP prober")?);
            let mut engine = PollEngine::new(config, prober, notifier);

            // A pipeline caller depends on the exit contract: 0 once every
            // endpoint has reported ready, non-zero with the reason otherwise.
            engine.run().await.context("readiness gate failed")?;
            Ok(())
        }
        CliCommand::Help => {
            print_help();
            Ok(())
        }
    }
}

fn parse_cli_args() -> anyhow::Result<CliCommand> {
    let mut strict = false;
    let mut print_config = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--strict" => strict = true,
            "--print-config" => print_config = true,
            "-h" | "--help" => return Ok(CliCommand::Help),
            other => anyhow::bail!("unrecognised argument `{other}`"),
        }
    }

    Ok(CliCommand::Run {
        strict,
        print_config,
    })
}

fn print_resolved_config(config: &GateConfig) {
    println!("endpoints:");
    for endpoint in config.endpoints() {
        println!("  - {endpoint}");
    }
    println!(
        "http_timeout: {}",
        humantime::format_duration(config.request_timeout)
    );
    match config.deadline_minutes {
        Some(minutes) => println!("max_wait_minutes: {minutes}"),
        None => println!("max_wait_minutes: none"),
    }
    println!("strict_errors: {}", config.strict_errors);
    println!(
        "sweep_pause: {}",
        humantime::format_duration(config.sweep_pause)
    );
}

fn print_help() {
    println!(
        "\
Usage: readygate [OPTIONS]

Polls the endpoints in READYGATE_ENDPOINTS until all return HTTP 200, then
exits 0. Exits non-zero if the deadline passes first.

Options:
      --strict           Abort on non-transient probe errors
      --print-config     Print the resolved configuration and exit
  -h, --help             Print this help message

Environment:
  READYGATE_ENDPOINTS          Space-delimited URL list (required)
  READYGATE_HTTP_TIMEOUT       Per-request timeout in seconds (default 1)
  READYGATE_MAX_WAIT_MINUTES   Overall deadline in minutes, or `none` (default 15)
  READYGATE_STRICT_ERRORS      Abort on non-transient probe errors (default false)
  READYGATE_SWEEP_PAUSE        Pause between sweeps, e.g. `250ms` (default 500ms)
"
    );
}
