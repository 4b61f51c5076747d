use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "parcel",
    about = "Parcel indexer: resolve submitted property documents from IPFS into records",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Derive the CID of a 32-byte hex content hash
    Cid(CidArgs),
    /// Show the effective gateway list
    Gateways,
    /// Fetch a CID through the gateways and print its JSON
    Resolve(ResolveArgs),
    /// Process a file of submission events
    Ingest(IngestArgs),
    /// Print a stored record
    Show(ShowArgs),
}

#[derive(Args)]
pub struct CidArgs {
    /// Hex digest, optionally 0x-prefixed
    pub hash: String,
}

#[derive(Args)]
pub struct ResolveArgs {
    pub cid: String,
    /// Require a root metadata document (non-empty label)
    #[arg(long)]
    pub metadata: bool,
}

#[derive(Args)]
pub struct IngestArgs {
    /// JSON array or JSON-lines file of events
    pub events: PathBuf,
    /// Persist records under this directory (in-memory when omitted)
    #[arg(long)]
    pub store_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Entity type, e.g. RootRecord or SalesHistory
    pub entity: String,
    pub id: String,
    #[arg(long)]
    pub store_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "parcel", "ingest", "events.json", "--store-dir", "out", "--format", "json", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.events, PathBuf::from("events.json"));
                assert_eq!(args.store_dir, Some(PathBuf::from("out")));
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn resolve_metadata_flag() {
        let cli = Cli::try_parse_from(["parcel", "resolve", "bafy", "--metadata"]).unwrap();
        match cli.command {
            Command::Resolve(args) => assert!(args.metadata),
            _ => panic!("expected resolve"),
        }
    }
}
