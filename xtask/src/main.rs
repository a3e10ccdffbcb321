//! Build automation tasks for PGD
//!
//! Currently generates the `pgd` command reference from the clap definitions.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for PGD", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the pgd command reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: PathBuf,

        /// Fail if the file on disk differs instead of rewriting it
        #[arg(long)]
        check: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir, check } => generate_cli_docs(&output_dir, check)?,
    }

    Ok(())
}

fn render_reference() -> String {
    let commands = clap_markdown::help_markdown::<pgd_ingest::Cli>();

    format!(
        r#"# pgd Command Reference

Generated from the CLI source code on {date}.

`pgd` builds the plant gene phenotype dataset: it merges reshaped per-source
tables into genes, derives sentence, word and stem variants of each description,
optionally annotates them with NOBLE Coder and writes CSV, TSV and JSON outputs
with truncated samples.

## Typical Run

```bash
# Combine the default reshaped files into final/data and final/samples
pgd combine

# Same, with concept recognition
pgd combine --noble-coder lib/NobleCoder-1.0.jar

# Resolve identities only
pgd merge --output merged.tsv reshaped/data/*.csv

# Sanity-check the result
pgd check final/data/genes_texts_annotations.csv
```

## Environment Variables

- `PGD_CONFIG` - pipeline configuration file (TOML)
- `PGD_INPUT_DIR`, `PGD_OUTPUT_DIR`, `PGD_SAMPLES_DIR` - directory overrides
- `PGD_CASE_SENSITIVE` - match identifiers case sensitively (`true`/`false`)
- `PGD_NOBLE_CODER_JAR` - enable annotation with this jar
- `PGD_LOG_LEVEL`, `PGD_LOG_OUTPUT`, `PGD_LOG_FORMAT`, `PGD_LOG_DIR`, `PGD_LOG_FILTER` - logging

## Commands

{commands}
---

*To update, run `cargo xtask generate-cli-docs`.*
"#,
        date = chrono::Utc::now().format("%Y-%m-%d"),
        commands = commands
    )
}

/// Strip the date line so `--check` only compares content
fn without_date(doc: &str) -> String {
    doc.lines()
        .filter(|line| !line.starts_with("Generated from the CLI source code"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn generate_cli_docs(output_dir: &Path, check: bool) -> anyhow::Result<()> {
    let reference = render_reference();
    let file_path = output_dir.join("cli-reference.md");

    if check {
        let current = fs::read_to_string(&file_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", file_path.display(), e))?;
        if without_date(&current) != without_date(&reference) {
            anyhow::bail!(
                "{} is out of date; run `cargo xtask generate-cli-docs`",
                file_path.display()
            );
        }
        println!("{} is up to date", file_path.display());
        return Ok(());
    }

    fs::create_dir_all(output_dir)?;
    fs::write(&file_path, reference)?;
    println!("Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
