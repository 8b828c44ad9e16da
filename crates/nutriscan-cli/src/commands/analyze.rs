//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::ocr::TesseractOcr;
use crate::output::Formatter;
use crate::repl;
use nutriscan_analyzer::Analyzer;
use nutriscan_domain::traits::TextRecognizer;
use nutriscan_llm::PerplexityProvider;
use std::path::Path;
use tracing::info;

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    config: &Config,
    config_path: &Path,
    api_key: String,
    formatter: &Formatter,
) -> Result<()> {
    let text = match &args.image {
        Some(image) => {
            let ocr = TesseractOcr::from_settings(&config.ocr, args.lang.as_deref());
            let text = ocr.recognize(image)?;
            if text.trim().is_empty() {
                return Err(CliError::InvalidInput("No text found in image".to_string()));
            }
            text
        }
        None => super::read_input(args.text_file.as_deref(), args.stdin)?,
    };

    let provider = PerplexityProvider::new(&config.api.endpoint, &config.api.model, api_key)?
        .with_timeout(config.api.timeout())
        .with_max_retries(config.api.max_retries);
    info!("Using model {}", provider.model());

    let analyzer = Analyzer::new(provider, config.analyzer.clone());
    let analysis = analyzer.analyze(&text).await?;
    println!("{}", formatter.format_analysis(&analysis)?);

    if args.chat {
        let mut chat = analyzer.follow_up(text, analysis);
        repl::run_chat(
            &mut chat,
            formatter,
            &Config::history_path(config_path),
            config.settings.history_size,
        )
        .await?;
    }

    Ok(())
}
