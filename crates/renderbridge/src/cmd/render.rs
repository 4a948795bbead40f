use std::io::Read;
use std::path::Path;

use renderbridge::render::OutlineRenderer;
use renderbridge::render_document;

use crate::cmd::serve::load_template;
use crate::cmd::RenderArgs;
use crate::exit::{render_error, CliResult, SUCCESS};
use crate::output::{print_document, OutputFormat};

pub fn run(args: RenderArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let template = load_template(args.template.as_deref())?;

    let document = render_document(&OutlineRenderer, &template, &payload)
        .map_err(|err| render_error("render failed", err))?;

    print_document("document", &document, format);
    Ok(SUCCESS)
}

fn resolve_payload(args: &RenderArgs) -> CliResult<Vec<u8>> {
    if let Some(json) = &args.json {
        return Ok(json.as_bytes().to_vec());
    }
    match args.file.as_deref() {
        Some(path) if path == Path::new("-") => read_stdin(),
        Some(path) => std::fs::read(path).map_err(|err| {
            crate::exit::io_error(&format!("failed reading {}", path.display()), err)
        }),
        None => read_stdin(),
    }
}

fn read_stdin() -> CliResult<Vec<u8>> {
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .map_err(|err| crate::exit::io_error("failed reading stdin", err))?;
    Ok(buf)
}
