mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "renderbridge", version, about = "HTML render bridge CLI")]
struct Cli {
    /// Output format for replies and documents.
    #[arg(long, value_name = "FORMAT", default_value = "raw", global = true)]
    format: OutputFormat,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match cmd::run(cli.command, cli.format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from(["renderbridge", "serve", "ipc:///tmp/myapp"])
            .expect("serve args should parse");
        assert!(matches!(cli.command, Command::Serve(_)));
    }

    #[test]
    fn parses_request_with_json_payload() {
        let cli = Cli::try_parse_from([
            "renderbridge",
            "request",
            "ipc:///tmp/myapp",
            "--json",
            r#"{"title":"Home"}"#,
            "--timeout",
            "3s",
        ])
        .expect("request args should parse");
        assert!(matches!(cli.command, Command::Request(_)));
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "renderbridge",
            "request",
            "ipc:///tmp/myapp",
            "--json",
            "{}",
            "--file",
            "/tmp/state.json",
        ])
        .expect_err("conflicting args should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_render_subcommand() {
        let cli = Cli::try_parse_from(["renderbridge", "render", "--json", "{}"])
            .expect("render args should parse");
        assert!(matches!(cli.command, Command::Render(_)));
    }
}
