//! Check command implementation.

use waybill_llm::OllamaProvider;

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the check command.
///
/// Fails when the service is unreachable; a missing model is only a warning
/// since the pattern extractor still works.
pub async fn execute_check(config: &Config, formatter: &Formatter) -> Result<()> {
    let provider = OllamaProvider::new(&config.service.base_url, &config.service.model);

    if let Err(e) = provider.health_check().await {
        println!("{}", formatter.error(&format!("{} is unreachable: {}", provider.endpoint(), e)));
        return Err(e.into());
    }
    println!("{}", formatter.success(&format!("Service reachable at {}", provider.endpoint())));

    let models = provider.list_models().await?;
    if models.is_empty() {
        println!("{}", formatter.warning("No models installed"));
    } else {
        println!("{}", formatter.info(&format!("Installed models: {}", models.join(", "))));
    }

    if provider.has_model().await? {
        println!("{}", formatter.success(&format!("Model '{}' is available", config.service.model)));
    } else {
        println!(
            "{}",
            formatter.warning(&format!(
                "Model '{}' is not installed; labels will fall back to pattern extraction",
                config.service.model
            ))
        );
    }
    Ok(())
}
