mod cli;

use anyhow::Result;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use plugin_runner::{Config, FunctionResponse, Invoker};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // stdout carries the JSON payload, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("plugin_runner=warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::Cli::parse();

    let mut cfg = Config::load();
    if let Some(dir) = &args.plugins_dir {
        cfg.set("PLUGINS_PATH", dir.to_string_lossy());
    }
    let settings = cfg.invoker_settings()?;
    tracing::debug!(
        plugins_dir = %settings.plugins_dir.display(),
        mode = ?settings.runtime_mode,
        "loaded configuration"
    );
    let invoker = Invoker::new(settings);

    // Exit status stays 0 whenever a response was produced; callers read `success`.
    match args.command {
        cli::Command::Describe { id } => {
            let response = invoker.describe(&id).await;
            print_response(&response, args.pretty);
        }
        cli::Command::Execute {
            id,
            parameters,
            output,
        } => {
            let response = invoker.execute(&id, &parameters).await;
            tracing::debug!(success = response.success, output = %output.display(), "writing results");
            response.persist(&output)?;
        }
        cli::Command::List { details: true } => {
            let response = invoker.list_details().await;
            print_response(&response, args.pretty);
        }
        cli::Command::List { details: false } => {
            let response = invoker.list();
            if std::io::stdout().is_terminal() && response.success {
                print_ids(&response);
            } else {
                print_response(&response, args.pretty);
            }
        }
    }
    Ok(())
}

fn print_response(response: &FunctionResponse, pretty: bool) {
    println!("{}", response.to_json(pretty));
}

fn print_ids(response: &FunctionResponse) {
    if let Some(ids) = response.data.as_array() {
        for id in ids.iter().filter_map(|v| v.as_str()) {
            println!("{}", id.green());
        }
    }
}
