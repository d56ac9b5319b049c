//! Run command implementation.

use tracing::info;

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::io;
use crate::output::Formatter;

use super::build_pipeline;

/// Execute the run command.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let directory = io::load_directory(&args.directory)?;
    info!("Loaded {} recipients from {}", directory.len(), args.directory.display());

    let labels = io::load_labels(&args.input)?;
    info!("Loaded {} labels from {}", labels.len(), args.input.display());

    let pipeline = build_pipeline(config, directory, args.rules_only, args.concurrent)?;
    let (results, metrics) = pipeline.run(&labels).await;

    let results_path = args.output.unwrap_or_else(|| config.settings.results_path.clone());
    let review_path = args.review_log.unwrap_or_else(|| config.settings.review_path.clone());
    let result_rows = io::write_results(&results_path, &results)?;
    let review_rows = io::write_review(&review_path, &results)?;

    println!("{}", formatter.format_results(&results)?);
    println!("{}", formatter.format_metrics(&metrics));
    println!(
        "{}",
        formatter.success(&format!("Wrote {} result rows to {}", result_rows, results_path.display()))
    );
    if review_rows > 0 {
        println!(
            "{}",
            formatter.warning(&format!("{} rows need review: {}", review_rows, review_path.display()))
        );
    } else {
        println!("{}", formatter.info(&format!("Review queue empty: {}", review_path.display())));
    }

    Ok(())
}
