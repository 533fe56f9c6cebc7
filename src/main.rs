use clap::{Parser, Subcommand};
use std::path::PathBuf;
use treesheet::cli;
use treesheet::error::TreesheetResult;
use treesheet::resolver::SubstitutionStrategy;

#[derive(Parser)]
#[command(name = "treesheet")]
#[command(about = "Export node trees to Excel with readable label paths")]
#[command(long_about = "Treesheet - tree export codec and path resolution

Flattens a YAML node tree into a workbook, rewrites identifier paths
(3/12/7) into label paths (Root | Child | Leaf) and packs workbooks into
compact deflate/base64 artifacts.

COMMANDS:
  export   - YAML nodes to Excel (.xlsx), optionally with an artifact
  pack     - Excel (.xlsx) to a packed artifact
  unpack   - Packed artifact back to Excel (.xlsx)
  hash     - SHA-256 of a string

EXAMPLES:
  treesheet export nodes.yaml nodes.xlsx
  treesheet export nodes.yaml nodes.xlsx --artifact nodes.bin
  treesheet pack nodes.xlsx -o nodes.txt --text
  treesheet unpack nodes.txt restored.xlsx --text

Logging goes to stderr; set RUST_LOG=treesheet=debug for pipeline detail.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Export a YAML node tree to Excel .xlsx format.

The node file holds a 'nodes' list (or a bare list) of entries:

  nodes:
    - id: 1
      label: Root
    - id: 12
      label: Child
      parent: 1

Nodes without a parent hang off a virtual root (id 0 unless --root-id is
given). Every node becomes one row; the Path column shows the labels from
the top-level ancestor down to the node. A Glossary sheet explains the
columns.

STRATEGIES:
  segment        - replace whole '/'-separated identifiers (default)
  longest-first  - substring replacement, longest identifiers first")]
    /// Export YAML nodes to Excel .xlsx
    Export {
        /// Path to the YAML node file
        input: PathBuf,

        /// Output Excel file path (.xlsx)
        output: PathBuf,

        /// Name of the node sheet
        #[arg(long, default_value = "Nodes", env = "TREESHEET_SHEET")]
        sheet: String,

        /// Identifier of the virtual root
        #[arg(long, default_value = "0", env = "TREESHEET_ROOT_ID")]
        root_id: u64,

        /// Identifier substitution strategy
        #[arg(long, default_value = "segment", env = "TREESHEET_STRATEGY")]
        strategy: SubstitutionStrategy,

        /// Skip the Glossary sheet
        #[arg(long)]
        no_glossary: bool,

        /// Also write the packed artifact to this file
        #[arg(long)]
        artifact: Option<PathBuf>,

        /// Write the artifact as base64 text instead of raw bytes
        #[arg(long)]
        text: bool,

        /// Print a JSON summary instead of status lines
        #[arg(long)]
        json: bool,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Pack an Excel .xlsx file into an artifact
    Pack {
        /// Path to the Excel file (.xlsx)
        input: PathBuf,

        /// Output file; the base64 text goes to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write base64 text instead of raw bytes
        #[arg(long)]
        text: bool,
    },

    /// Unpack an artifact into an Excel .xlsx file
    Unpack {
        /// Path to the artifact
        input: PathBuf,

        /// Output Excel file path (.xlsx)
        output: PathBuf,

        /// Artifact is base64 text
        #[arg(long)]
        text: bool,
    },

    /// Print the SHA-256 hex digest of a string
    Hash {
        /// Text to hash
        text: String,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "treesheet=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> TreesheetResult<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Export {
            input,
            output,
            sheet,
            root_id,
            strategy,
            no_glossary,
            artifact,
            text,
            json,
            verbose,
        } => cli::export(
            input,
            output,
            cli::ExportArgs {
                sheet,
                root_id,
                strategy,
                glossary: !no_glossary,
                artifact,
                text,
                json,
                verbose,
            },
        ),

        Commands::Pack {
            input,
            output,
            text,
        } => cli::pack(input, output, text),

        Commands::Unpack {
            input,
            output,
            text,
        } => cli::unpack(input, output, text),

        Commands::Hash { text } => cli::hash(&text),
    }
}
