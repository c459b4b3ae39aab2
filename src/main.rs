use std::time::Duration;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use reqtrap::{cli, config, error, types::ListenConfig, utils};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Wait for a single HTTP request and report what was received
    Wait(WaitOptions),

    /// Show the most recently saved capture
    Last(LastOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct WaitOptions {
    /// Port to listen on
    #[clap(value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Address to bind
    #[clap(long)]
    pub address: Option<String>,

    /// HTTP status code for the response
    #[clap(long)]
    pub status: Option<u16>,

    /// Response header as "Name: Value"; can be repeated
    #[clap(
        long = "header",
        value_parser = utils::parse_header,
        action = ArgAction::Append,
        num_args = 1
    )]
    pub headers: Vec<(String, String)>,

    /// Response body
    #[clap(long)]
    pub body: Option<String>,

    /// Name of the correlation header echoed in the response
    #[clap(long)]
    pub id_header: Option<String>,

    /// Seconds to wait for a request before giving up
    #[clap(long, default_value_t = 60)]
    pub timeout: u64,

    /// Per-connection read timeout in seconds
    #[clap(long, default_value_t = 10)]
    pub read_timeout: u64,

    /// Open this URL in the default browser once the listener is up
    #[clap(long)]
    pub open: Option<String>,

    /// Print the captured request as JSON
    #[clap(long)]
    pub json: bool,

    /// Save the capture so it can be shown again with `last`
    #[clap(long)]
    pub save: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct LastOptions {
    /// Print the capture as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Wait(opt) => {
            let mut listen = ListenConfig::new(opt.port);
            if let Some(address) = opt.address {
                listen.bind_address = address;
            }
            if let Some(status) = opt.status {
                listen.response_status = status;
            }
            for (name, value) in &opt.headers {
                listen.set_response_header(name, value);
            }
            if let Some(body) = opt.body {
                listen.response_body = body.into_bytes();
            }
            if let Some(name) = opt.id_header {
                listen.correlation_header = name;
            }
            listen.read_timeout = Duration::from_secs(opt.read_timeout);

            cli::wait(
                listen,
                Duration::from_secs(opt.timeout),
                opt.open,
                opt.json,
                opt.save,
            )
            .await
        }

        Command::Last(opt) => cli::last(opt.json).await,

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
