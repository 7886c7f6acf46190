//! Handler for the `export` command.

use anyhow::{Context, Result, bail};

use crate::cli::ExportArgs;
use crate::cli::config::Config;
use crate::cli::output::{Output, OutputFormat};
use crate::cli::source::open_store;
use crate::export::{
    DocumentTemplate, ExportOptions, ExportReport, Exporter, RenderOptions, fetch_batch,
};
use crate::infra::ensure_dir;

/// Handle the `export` command.
///
/// Fails when the run stops early, and also when notes were skipped under
/// `--keep-going`, after printing the report.
pub fn handle_export(args: &ExportArgs, config: &Config) -> Result<()> {
    let root = config.output_dir(args.output.as_ref());
    let render_options = RenderOptions {
        template_path: config.template(args.template.as_ref()),
        theme: config.theme(args.theme.as_deref()),
    };
    let template =
        DocumentTemplate::load(&render_options).context("failed to load export template")?;
    let lookup = config.mime_table()?;
    let store = open_store(&args.source, config)?;

    let batch = fetch_batch(store.as_ref(), config.limit(args.limit))?;
    ensure_dir(&root)
        .with_context(|| format!("failed to create export directory {}", root.display()))?;

    let options = ExportOptions {
        root: root.clone(),
        policy: config.failure_policy(args.keep_going),
    };
    let report = Exporter::new(store.as_ref(), &lookup, &template, options).run(&batch)?;

    print_report(&args.cli_format, &report, &root.display().to_string())?;

    if !report.is_success() {
        bail!("{} of {} notes failed to export", report.failed.len(), batch.len());
    }
    Ok(())
}

fn print_report(format: &OutputFormat, report: &ExportReport, root: &str) -> Result<()> {
    match format {
        OutputFormat::Human => {
            for failed in &report.failed {
                eprintln!("skipped '{}': {}", failed.title, failed.error);
            }
            println!("Exported {} notes to {}", report.exported.len(), root);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Output::new(report))?);
        }
        OutputFormat::Paths => {
            for exported in &report.exported {
                println!("{}", exported.directory.display());
            }
        }
    }
    Ok(())
}
