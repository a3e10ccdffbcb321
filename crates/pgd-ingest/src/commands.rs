//! Subcommand implementations for the `pgd` binary

use crate::check::check_dataset;
use crate::config::PipelineConfig;
use crate::groupings::run_groupings;
use crate::pipeline::{merge_files, CombinePipeline};
use crate::{Cli, Commands};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

/// Execute the parsed command line
pub fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Combine {
            input_dir,
            output_dir,
            samples_dir,
            case_sensitive,
            noble_coder,
            keep_genes_without_text,
            files,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(dir) = input_dir {
                config.input_dir = dir.clone();
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir.clone();
            }
            if let Some(dir) = samples_dir {
                config.samples_dir = dir.clone();
            }
            if *case_sensitive {
                config.merge.case_sensitive = true;
            }
            if let Some(jar) = noble_coder {
                let mut noble = config.noble_coder.take().unwrap_or_default();
                noble.jar = jar.clone();
                config.noble_coder = Some(noble);
            }
            if *keep_genes_without_text {
                config.filter_has_text = false;
            }
            if !files.is_empty() {
                config.input_files = files.clone();
            }

            let stats = CombinePipeline::new(config)?.with_progress(cli.verbose).run()?;
            println!(
                "Combined {} rows into {} genes ({} rows written to {} files)",
                stats.rows_read, stats.genes_written, stats.records_written, stats.files_written
            );
            Ok(())
        },

        Commands::Merge {
            output,
            case_sensitive,
            files,
        } => {
            let mut options = load_config(cli.config.as_deref())?.merge;
            if *case_sensitive {
                options.case_sensitive = true;
            }
            let stats = merge_files(files, output, &options)?;
            println!(
                "Merged {} rows into {} groups (largest: {} rows) -> {}",
                stats.rows,
                stats.groups,
                stats.largest_group,
                output.display()
            );
            Ok(())
        },

        Commands::Groupings => {
            let config = load_config(cli.config.as_deref())?;
            let stats = run_groupings(&config.groupings)?;
            println!(
                "Wrote {} memberships across {} groups from {} sources",
                stats.memberships, stats.groups, stats.sources
            );
            Ok(())
        },

        Commands::Check { file } => {
            let report = check_dataset(file).with_context(|| format!("Failed to read {}", file.display()))?;
            for column in &report.missing_columns {
                println!("missing column: {}", column);
            }
            for violation in &report.violations {
                println!("row {}: {}", violation.row, violation.kind);
            }
            if !report.is_clean() {
                bail!(
                    "{} failed checks ({} missing columns, {} violations)",
                    file.display(),
                    report.missing_columns.len(),
                    report.violations.len()
                );
            }
            println!("{}: {} rows, no problems found", file.display(), report.rows);
            Ok(())
        },
    }
}

/// Config file if given, else defaults; `PGD_*` overrides on top
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration");
            PipelineConfig::from_file(path)?
        },
        None => PipelineConfig::default(),
    };
    Ok(config.merge_env()?)
}
