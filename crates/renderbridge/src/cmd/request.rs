use std::time::Duration;

use renderbridge::channel::ChannelConfig;
use renderbridge::transport::IpcAddress;
use renderbridge::{request_document_with_config, RequestError};

use crate::cmd::RequestArgs;
use crate::exit::{request_error, transport_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_document, OutputFormat};

pub fn run(args: RequestArgs, format: OutputFormat) -> CliResult<i32> {
    let addr = IpcAddress::parse(&args.addr)
        .map_err(|err| transport_error("invalid address", err))?;
    let timeout = parse_duration(&args.timeout)?;
    let payload = resolve_payload(&args)?;

    let config = ChannelConfig {
        recv_timeout: Some(timeout),
        send_timeout: Some(timeout),
        ..ChannelConfig::default()
    };

    match request_document_with_config(&addr, &payload, config) {
        Ok(document) => {
            print_document("document", &document, format);
            Ok(SUCCESS)
        }
        Err(RequestError::ErrorReply { document }) => {
            // The bridge answered; show what it said, fail the exit code.
            print_document("error", &document, format);
            Ok(FAILURE)
        }
        Err(err) => Err(request_error("request failed", err)),
    }
}

fn resolve_payload(args: &RequestArgs) -> CliResult<Vec<u8>> {
    if let Some(json) = &args.json {
        serde_json::from_str::<serde_json::Value>(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")))?;
        return Ok(json.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return std::fs::read(path).map_err(|err| {
            crate::exit::io_error(&format!("failed reading {}", path.display()), err)
        });
    }
    Err(CliError::new(USAGE, "one of --json or --file is required"))
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
