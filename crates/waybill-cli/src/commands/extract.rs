//! Extract command implementation.

use std::io::{self, Read};

use waybill_domain::RawLabel;
use waybill_extractor::normalize;

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::io as csv_io;
use crate::output::Formatter;

use super::{build_coordinator, build_pipeline};

fn label_text(args: &ExtractArgs) -> Result<String> {
    if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(text) = &args.text {
        Ok(text.clone())
    } else {
        Err(CliError::InvalidInput(
            "Must specify label text or --stdin".to_string(),
        ))
    }
}

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = label_text(&args)?;

    if let Some(path) = &args.directory {
        let directory = csv_io::load_directory(path)?;
        let pipeline = build_pipeline(config, directory, args.rules_only, false)?;
        let result = pipeline.process_label(&RawLabel::new("cli", text)).await;
        println!("{}", formatter.format_matches(&result.pairs)?);
        println!(
            "{}",
            formatter.info(&format!("{} in {}ms", result.status, result.elapsed.as_millis()))
        );
        return Ok(());
    }

    let cleaned = normalize(&text);
    if cleaned.is_empty() {
        println!("{}", formatter.warning("Label text is empty after normalization"));
        return Ok(());
    }

    let extraction = build_coordinator(config, args.rules_only)?.extract(&cleaned).await;
    if let Some(failure) = &extraction.model_failure {
        eprintln!("{}", formatter.warning(&format!("Model not used: {}", failure)));
    }
    println!("{}", formatter.format_pairs(&extraction.pairs, extraction.mode)?);
    Ok(())
}
