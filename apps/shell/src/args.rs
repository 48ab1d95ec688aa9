//! # CLI Argument Definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cdmi")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Store and inspect CDMI data objects on the local filesystem")]
pub(crate) struct Cli {
    /// Configuration file (defaults to ./cdmi.{toml,yaml,json} when present)
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Overrides `storage.base_directory`
    #[arg(long, global = true)]
    pub(crate) base: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Create a CDMI data object
    Put {
        /// Object path, e.g. docs/readme.txt
        path: String,
        /// MIME type (text/plain when omitted)
        #[arg(long)]
        mime: Option<String>,
        /// Keep this object ID instead of generating one
        #[arg(long)]
        id: Option<String>,
        /// User metadata entry, repeatable
        #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        metadata: Vec<(String, String)>,
        #[command(flatten)]
        input: Input,
    },
    /// Create an object from a non-CDMI request
    PutRaw {
        path: String,
        /// Recorded as the object's MIME type
        #[arg(long)]
        content_type: String,
        #[command(flatten)]
        input: Input,
    },
    /// Print an object as JSON
    Get { path: String },
    /// List the operations the store implements
    Capabilities,
}

/// The object value: inline or read from a file.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub(crate) struct Input {
    pub(crate) value: Option<String>,
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
