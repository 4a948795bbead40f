use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// The document itself, as-is.
    Raw,
    /// A JSON envelope with kind and size metadata.
    Json,
}

#[derive(Serialize)]
struct DocumentOutput<'a> {
    kind: &'a str,
    size: usize,
    document: &'a str,
}

/// Print a document (or error document) to stdout.
pub fn print_document(kind: &str, document: &str, format: OutputFormat) {
    match format {
        OutputFormat::Raw => println!("{document}"),
        OutputFormat::Json => {
            let out = DocumentOutput {
                kind,
                size: document.len(),
                document,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
    }
}
