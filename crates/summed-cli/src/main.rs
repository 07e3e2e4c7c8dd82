//! SumMed: language-adaptive sentence ranking and health entity extraction.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use summed_core::SummedConfig;
use summed_nlp::{PipelineCache, RulePipelineLoader, WhatlangDetector};
use summed_runtime::{AnalyzeRequest, Analyzer};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
SumMed: language-adaptive sentence ranking

Usage: summed <command> [args]

Commands:
  analyze <file|->          Sentences, noun chunks, entities and summary as JSON
  summarize <file|-> [n]    Top n sentences (default from SUMMED_NUM_SENTENCES)
  entities <file|->         Health entities (requires AZURE_TEXT_ANALYTICS_ENDPOINT)
  help                      Show this help message

Use '-' to read from stdin. Log level is controlled by RUST_LOG.";

/// Read the input document from a path, or stdin for `-`.
fn read_input(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("Failed to read {}", source))
    }
}

fn parse_count(arg: Option<&String>) -> anyhow::Result<Option<usize>> {
    arg.map(|n| {
        n.parse::<usize>()
            .with_context(|| format!("Invalid sentence count: {}", n))
    })
    .transpose()
}

async fn run(args: &[String]) -> anyhow::Result<()> {
    let Some(command) = args.get(1) else {
        println!("{}", USAGE);
        return Ok(());
    };
    if matches!(command.as_str(), "help" | "--help" | "-h") {
        println!("{}", USAGE);
        return Ok(());
    }
    if !matches!(command.as_str(), "analyze" | "summarize" | "entities") {
        anyhow::bail!("Unknown command: {}. Use 'summed help' for usage.", command);
    }
    let source = args
        .get(2)
        .with_context(|| format!("Usage: summed {} <file|->", command))?;

    let config = SummedConfig::from_env()?;
    config.validate()?;

    let analyzer = Analyzer::new(
        config,
        Arc::new(PipelineCache::new()),
        Arc::new(RulePipelineLoader),
        Arc::new(WhatlangDetector::new()),
    );
    let text = read_input(source)?;

    let output = match command.as_str() {
        "analyze" => {
            let result = analyzer.analyze(&AnalyzeRequest::new(text)).await?;
            serde_json::to_value(&result)?
        }
        "summarize" => {
            let mut request = AnalyzeRequest::new(text);
            request.num_sentences = parse_count(args.get(3))?;
            let result = analyzer.analyze(&request).await?;
            info!(
                "Selected {} sentence(s) of {} ({} {})",
                result.top_sentences.len(),
                result.sentences.len(),
                result.language,
                result.model
            );
            serde_json::json!({
                "language": result.language,
                "model": result.model,
                "topSentences": result.top_sentences,
                "shortfall": result.shortfall,
            })
        }
        _ => {
            if !analyzer.has_entity_service() {
                anyhow::bail!("Entity extraction requires AZURE_TEXT_ANALYTICS_ENDPOINT to be set");
            }
            let request = AnalyzeRequest::new(text).num_sentences(0);
            let result = analyzer.analyze(&request).await?;
            serde_json::json!({
                "language": result.language,
                "entities": result.entities,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Fieber und Kopfschmerzen.").unwrap();
        let text = read_input(file.path().to_str().unwrap()).unwrap();
        assert_eq!(text, "Fieber und Kopfschmerzen.");
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let err = read_input(missing.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(None).unwrap(), None);
        assert_eq!(parse_count(Some(&"5".to_string())).unwrap(), Some(5));
        assert!(parse_count(Some(&"five".to_string())).is_err());
    }

    #[tokio::test]
    async fn test_unknown_command_is_an_error() {
        let args = vec!["summed".to_string(), "translate".to_string()];
        assert!(run(&args).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_source_is_an_error() {
        let args = vec!["summed".to_string(), "analyze".to_string()];
        let err = run(&args).await.unwrap_err();
        assert!(err.to_string().contains("Usage"));
    }
}
