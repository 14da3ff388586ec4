//! Service configuration.
//!
//! Configuration is an explicit value object handed to the wiring code at
//! construction time; there is no process-wide mutable state. `from_env`
//! exists for the server binary, everything else constructs `Config`
//! directly.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::genai::gemini::DEFAULT_BASE_URL;
use crate::pipeline::PipelineOptions;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_PERSON_IMAGE_PATH: &str = "person/person_image.jpg";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("Invalid bind address: {0}")]
    InvalidBindAddr(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    /// Directory the garment images (and saved person photo) live under.
    pub closet_root: PathBuf,
    /// JSON document mapping item identifiers to garment attributes.
    pub catalog_path: PathBuf,
    /// Closet-relative path the person photo is saved to (overwritten on
    /// every upload).
    pub person_image_path: String,
    pub bind_addr: SocketAddr,
    pub pipeline: PipelineOptions,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            closet_root: PathBuf::from("closet"),
            catalog_path: PathBuf::from("closet/catalog.json"),
            person_image_path: DEFAULT_PERSON_IMAGE_PATH.into(),
            bind_addr: DEFAULT_BIND_ADDR.parse().expect("default bind addr parses"),
            pipeline: PipelineOptions::default(),
        }
    }

    /// Build a config from the environment. `GEMINI_API_KEY` is required;
    /// everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;
        let mut config = Config::new(api_key);

        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(root) = std::env::var("STYLEFLOW_CLOSET_ROOT") {
            config.catalog_path = PathBuf::from(&root).join("catalog.json");
            config.closet_root = PathBuf::from(root);
        }
        if let Ok(catalog) = std::env::var("STYLEFLOW_CATALOG") {
            config.catalog_path = PathBuf::from(catalog);
        }
        if let Ok(model) = std::env::var("STYLEFLOW_SELECTION_MODEL") {
            config.pipeline.selection_model = model;
        }
        if let Ok(model) = std::env::var("STYLEFLOW_IMAGE_MODEL") {
            config.pipeline.image_model = model;
        }
        if let Ok(bind) = std::env::var("STYLEFLOW_BIND") {
            config.bind_addr = bind
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr(bind))?;
        }

        Ok(config)
    }
}
