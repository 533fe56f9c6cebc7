use crate::codec;
use crate::error::TreesheetResult;
use crate::excel::{XlsxLoader, XlsxRenderer};
use crate::export::{ExportArtifact, ExportOptions, Exporter};
use crate::parser;
use crate::resolver::SubstitutionStrategy;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Options of the export command beyond input and output paths.
#[derive(Debug, Clone)]
pub struct ExportArgs {
    pub sheet: String,
    pub root_id: u64,
    pub strategy: SubstitutionStrategy,
    pub glossary: bool,
    pub artifact: Option<PathBuf>,
    pub text: bool,
    pub json: bool,
    pub verbose: bool,
}

impl Default for ExportArgs {
    fn default() -> Self {
        let options = ExportOptions::default();
        Self {
            sheet: options.sheet_name,
            root_id: options.root_id,
            strategy: options.strategy,
            glossary: options.include_glossary,
            artifact: None,
            text: false,
            json: false,
            verbose: false,
        }
    }
}

/// Write an artifact either as raw blob bytes or as base64 text.
fn write_artifact(artifact: &ExportArtifact, path: &Path, text: bool) -> TreesheetResult<()> {
    if text {
        fs::write(path, artifact.to_text())?;
    } else {
        fs::write(path, artifact.blob())?;
    }
    Ok(())
}

fn read_artifact(path: &Path, text: bool) -> TreesheetResult<ExportArtifact> {
    let artifact = if text {
        let content = fs::read_to_string(path)?;
        ExportArtifact::from_text(content.trim())?
    } else {
        ExportArtifact::from_blob(fs::read(path)?)?
    };
    Ok(artifact)
}

/// Execute the export command
pub fn export(input: PathBuf, output: PathBuf, args: ExportArgs) -> TreesheetResult<()> {
    let quiet = args.json;
    if !quiet {
        println!("{}", "🌳 Treesheet - Excel Export".bold().green());
        println!("   Input:  {}", input.display());
        println!("   Output: {}\n", output.display());
    }

    if args.verbose && !quiet {
        println!("{}", "📖 Parsing node file...".cyan());
    }
    let nodes = parser::parse_nodes(&input)?;
    if args.verbose && !quiet {
        println!("   Found {} nodes\n", nodes.len());
        println!(
            "{}",
            format!("🔗 Resolving paths ({})...", args.strategy).cyan()
        );
    }

    let exporter = Exporter::new(ExportOptions {
        sheet_name: args.sheet,
        root_id: args.root_id,
        strategy: args.strategy,
        include_glossary: args.glossary,
    });
    let artifact = exporter.export(&nodes)?;

    XlsxRenderer::default().save(artifact.workbook(), &output)?;

    if let Some(ref path) = args.artifact {
        write_artifact(&artifact, path, args.text)?;
    }

    if quiet {
        println!("{}", serde_json::to_string_pretty(&artifact.summary())?);
        return Ok(());
    }

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}", output.display());
    if let Some(ref path) = args.artifact {
        println!("   Artifact:   {}", path.display());
    }
    println!("   Hash:       {}\n", artifact.content_hash().bright_blue());

    if args.verbose {
        let summary = artifact.summary();
        for (name, rows) in summary.sheets.iter().zip(&summary.rows) {
            println!("   📊 Sheet: {} ({} rows)", name.bright_blue().bold(), rows);
        }
        println!("   📦 Blob: {} bytes\n", summary.blob_bytes);
    }

    Ok(())
}

/// Execute the pack command
///
/// Without an output file the base64 text is the only thing printed, so it
/// can be piped.
pub fn pack(input: PathBuf, output: Option<PathBuf>, text: bool) -> TreesheetResult<()> {
    let workbook = XlsxLoader::new().load_path(&input)?;
    let artifact = ExportArtifact::encode(workbook)?;

    match output {
        None => println!("{}", artifact.to_text()),
        Some(path) => {
            write_artifact(&artifact, &path, text)?;
            println!("{}", "✅ Pack Complete!".bold().green());
            println!("   Input:    {}", input.display());
            println!("   Artifact: {}", path.display());
            println!("   Sheets:   {}", artifact.workbook().sheets.len());
            println!("   Hash:     {}\n", artifact.content_hash().bright_blue());
        }
    }
    Ok(())
}

/// Execute the unpack command
pub fn unpack(input: PathBuf, output: PathBuf, text: bool) -> TreesheetResult<()> {
    let artifact = read_artifact(&input, text)?;
    XlsxRenderer::default().save(artifact.workbook(), &output)?;

    println!("{}", "✅ Unpack Complete!".bold().green());
    println!("   Artifact:   {}", input.display());
    println!("   Excel file: {}", output.display());
    for sheet in &artifact.workbook().sheets {
        println!(
            "   📊 Sheet: {} ({} rows)",
            sheet.name.bright_blue().bold(),
            sheet.rows.len()
        );
    }
    println!();
    Ok(())
}

/// Execute the hash command
pub fn hash(text: &str) -> TreesheetResult<()> {
    println!("{}", codec::hash(text));
    Ok(())
}
