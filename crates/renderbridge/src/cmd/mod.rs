use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod render;
pub mod request;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the render bridge on an IPC address.
    Serve(ServeArgs),
    /// Render a state payload locally, without a socket.
    Render(RenderArgs),
    /// Send a state payload to a running bridge and print the reply.
    Request(RequestArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Render(args) => render::run(args, format),
        Command::Request(args) => request::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind, e.g. ipc:///tmp/myapp or a socket path.
    pub addr: String,
    /// index.html template file (split at <head> and <!--APP-->).
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,
    /// Socket permission mode, octal (default 600).
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// JSON state payload.
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read the state payload from a file (`-` reads stdin).
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
    /// index.html template file (split at <head> and <!--APP-->).
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Address of the running bridge, e.g. ipc:///tmp/myapp.
    pub addr: String,
    /// JSON state payload.
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read the state payload from a file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
    /// Send/receive timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build details.
    #[arg(long)]
    pub extended: bool,
}
