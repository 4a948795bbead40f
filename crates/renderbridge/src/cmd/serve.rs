use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use renderbridge::channel::ReplyListener;
use renderbridge::render::{DocumentTemplate, OutlineRenderer};
use renderbridge::transport::IpcAddress;
use renderbridge::Bridge;

use crate::cmd::ServeArgs;
use crate::exit::{channel_error, render_error, transport_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let addr = IpcAddress::parse(&args.addr)
        .map_err(|err| transport_error("invalid address", err))?;

    let template = load_template(args.template.as_deref())?;

    let listener = match &args.mode {
        Some(mode) => {
            let mode = u32::from_str_radix(mode, 8)
                .map_err(|_| CliError::new(USAGE, format!("invalid octal mode: {mode}")))?;
            ReplyListener::bind_with_mode(&addr, mode)
        }
        None => ReplyListener::bind(&addr),
    }
    .map_err(|err| channel_error("bind failed", err))?;

    let bridge = Bridge::new(listener, OutlineRenderer).with_template(template);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    bridge
        .serve(&running)
        .map_err(|err| channel_error("serve failed", err))?;

    Ok(SUCCESS)
}

pub(crate) fn load_template(path: Option<&std::path::Path>) -> CliResult<DocumentTemplate> {
    match path {
        Some(path) => {
            let html = std::fs::read_to_string(path).map_err(|err| {
                crate::exit::io_error(&format!("failed reading {}", path.display()), err)
            })?;
            DocumentTemplate::from_index_html(&html)
                .map_err(|err| render_error("template load failed", err))
        }
        None => Ok(DocumentTemplate::default()),
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
