use std::sync::Arc;

use styleflow::api::{self, AppState};
use styleflow::catalog::Catalog;
use styleflow::closet::FsCloset;
use styleflow::config::Config;
use styleflow::genai::{GeminiClient, GeminiConfig};
use styleflow::pipeline::StylistPipeline;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    let catalog = match Catalog::from_file(&config.catalog_path) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            tracing::error!(
                path = %config.catalog_path.display(),
                error = %e,
                "failed to load wardrobe catalog"
            );
            std::process::exit(1);
        }
    };
    tracing::info!(
        items = catalog.len(),
        closet_root = %config.closet_root.display(),
        "wardrobe catalog loaded"
    );

    let closet = Arc::new(FsCloset::new(config.closet_root.clone()));
    let client = Arc::new(GeminiClient::new(
        GeminiConfig::new(config.api_key.clone()).with_base_url(config.base_url.clone()),
    ));
    let pipeline = Arc::new(StylistPipeline::new(
        client,
        closet.clone(),
        catalog,
        config.pipeline.clone(),
    ));

    let state = AppState {
        pipeline,
        closet,
        person_image_path: config.person_image_path.clone(),
    };

    if let Err(e) = api::serve(state, config.bind_addr).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
