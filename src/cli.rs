use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::Table;

use postgen::BuildOutput;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a testcase spec into a collection artifact
    Build {
        /// Path to the spec document
        spec: PathBuf,

        /// Where to write the generated collection
        #[arg(short, long, default_value = "collection.json")]
        output: PathBuf,
    },

    /// Validate and compile a spec without writing anything
    Check {
        /// Path to the spec document
        spec: PathBuf,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build { spec, output } => build(&spec, &output),
        Commands::Check { spec } => check(&spec),
    }
}

fn build(spec_path: &Path, output_path: &Path) -> Result<()> {
    let out = compile(spec_path)?;

    let rendered = serde_json::to_string_pretty(&out.collection)?;
    fs::write(output_path, rendered + "\n")
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    report(&out);
    println!("{} Processed {} testcase(s)", "✓".green(), out.item_count());
    println!("Generated: {}", output_path.display());

    Ok(())
}

fn check(spec_path: &Path) -> Result<()> {
    let out = compile(spec_path)?;

    report(&out);
    println!(
        "{} Spec is valid: {} testcase(s) compile cleanly",
        "✓".green(),
        out.item_count()
    );

    Ok(())
}

/// Read, parse and compile one spec file, surfacing collected warnings.
fn compile(spec_path: &Path) -> Result<BuildOutput> {
    let raw = fs::read_to_string(spec_path)
        .with_context(|| format!("failed to read {}", spec_path.display()))?;
    let root: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", spec_path.display()))?;

    let out = postgen::build_collection(&root)?;

    for warning in out.diagnostics.warnings() {
        tracing::warn!(testcase = %warning.testcase, "{}", warning.message);
    }

    Ok(out)
}

fn report(out: &BuildOutput) {
    if out.items.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Item", "Method", "URL", "Checks"]);
    for item in &out.items {
        table.add_row(vec![
            item.name.clone(),
            item.method.clone(),
            item.url.raw.clone(),
            item.assertions.to_string(),
        ]);
    }

    println!("{table}");
}
