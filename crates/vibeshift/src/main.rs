use crate::prelude::*;
use clap::Parser;

mod client;
mod clipboard;
mod error;
mod prelude;
mod provider;
mod samples;
mod server;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Rewrite source code in the voice of a generation (Gen Z, Millennial, Boomer)"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "VIBESHIFT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Run the transform HTTP endpoint
    Serve(crate::server::ServeOptions),

    /// Transform code through a running endpoint
    ///
    /// Streamed output is printed as it arrives. If the stream fails halfway,
    /// the text already printed is incomplete and a warning follows it.
    Transform(crate::client::TransformOptions),

    /// List or print the built-in code samples
    Samples(crate::samples::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Serve(options) => crate::server::run(options, app.global).await,
        SubCommands::Transform(options) => crate::client::run(options, app.global).await,
        SubCommands::Samples(sub_app) => crate::samples::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
