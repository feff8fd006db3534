/*!
Binary entry point. Only the `run` subcommand is built - the CLI's other
subcommands (menu-bar toggle, settings, etc.) belong to the out-of-scope
front-end (§1) and are not part of this crate.
*/

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "portal", version, about = "Local UI-automation agent for macOS")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Launch or attach to an application and serve the HTTP API scoped to it.
  Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
  /// Display name, `.app` path, or bundle identifier of the target app.
  app_spec: String,

  /// Host to bind the HTTP server to.
  #[arg(long, default_value = "127.0.0.1")]
  host: String,

  /// Port to bind to. `0` picks a free ephemeral port (§4.5).
  #[arg(long, default_value_t = 7676)]
  port: u16,
}

fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  let cli = Cli::parse();
  let Command::Run(args) = cli.command;

  let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
    Ok(runtime) => runtime,
    Err(err) => {
      eprintln!("failed to start async runtime: {err}");
      std::process::exit(1);
    }
  };

  let result = runtime.block_on(portal_server::lifecycle::run(&args.app_spec, &args.host, args.port));
  if let Err(err) = result {
    log::error!("{err}");
    std::process::exit(1);
  }
}
