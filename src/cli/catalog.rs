//! Patterns and models commands

use crate::catalog::CatalogClient;
use crate::cli::output::{
    format_models_json, format_models_table, format_patterns_json, format_patterns_table,
    model_views,
};
use crate::cli::{load_config, ModelsArgs, PatternsArgs};

/// Handle `fabric-desk patterns`
pub async fn handle_patterns(args: &PatternsArgs) -> anyhow::Result<String> {
    let config = load_config(&args.config, args.base_url.as_deref())?;
    let patterns = CatalogClient::new(config.server.base_url).patterns().await?;

    if args.json {
        Ok(format_patterns_json(&patterns))
    } else {
        Ok(format_patterns_table(&patterns))
    }
}

/// Handle `fabric-desk models`
pub async fn handle_models(args: &ModelsArgs) -> anyhow::Result<String> {
    let config = load_config(&args.config, args.base_url.as_deref())?;
    let models = CatalogClient::new(config.server.base_url).models().await?;
    let views = model_views(&models, args.vendor.as_deref());

    if args.json {
        Ok(format_models_json(&views))
    } else {
        Ok(format_models_table(&views))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::path::PathBuf;

    fn missing_config() -> PathBuf {
        PathBuf::from("/nonexistent/fabric-desk.toml")
    }

    #[tokio::test]
    async fn test_handle_patterns_json() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/patterns/names")
            .with_status(200)
            .with_body(r#"["summarize","extract_wisdom"]"#)
            .create_async()
            .await;

        let args = PatternsArgs {
            json: true,
            config: missing_config(),
            base_url: Some(server.url()),
        };
        let output = handle_patterns(&args).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["patterns"][0], "extract_wisdom");
    }

    #[tokio::test]
    async fn test_handle_models_table() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/models/names")
            .with_status(200)
            .with_body(r#"{"models":["llama3"],"vendors":{"Ollama":["llama3"]}}"#)
            .create_async()
            .await;

        let args = ModelsArgs {
            json: false,
            vendor: None,
            config: missing_config(),
            base_url: Some(server.url()),
        };
        let output = handle_models(&args).await.unwrap();
        assert!(output.contains("Ollama"));
        assert!(output.contains("llama3"));
    }

    #[tokio::test]
    async fn test_handle_patterns_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/patterns/names")
            .with_status(500)
            .create_async()
            .await;

        let args = PatternsArgs {
            json: false,
            config: missing_config(),
            base_url: Some(server.url()),
        };
        let err = handle_patterns(&args).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }
}
