//! # Styleflow — AI Outfit Stylist
//!
//! `styleflow` recommends a clothing pairing (one top, one bottom) from a
//! fixed wardrobe inventory and renders a given person wearing it via a
//! remote generative image model. It exposes both a library pipeline and a
//! small HTTP service.
//!
//! - **Outfit selection**: schema-constrained structured completion over the
//!   full catalog; the returned JSON is validated after parsing, never
//!   trusted.
//! - **Try-on compositing**: multimodal completion over the person photo and
//!   the two garment photos; the first image part of the response is the
//!   rendered result.
//! - **Retry**: transient service failures and malformed structured output
//!   are retried with bounded exponential backoff (no jitter).
//! - **HTTP API**: `POST /style`, `POST /person-image`, `GET /health`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use styleflow::catalog::Catalog;
//! use styleflow::closet::FsCloset;
//! use styleflow::config::Config;
//! use styleflow::genai::{GeminiClient, GeminiConfig};
//! use styleflow::pipeline::StylistPipeline;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().unwrap();
//!     let catalog = Arc::new(Catalog::from_file(&config.catalog_path).unwrap());
//!     let closet = Arc::new(FsCloset::new(config.closet_root.clone()));
//!     let client = Arc::new(GeminiClient::new(
//!         GeminiConfig::new(config.api_key.clone()).with_base_url(config.base_url.clone()),
//!     ));
//!     let pipeline = StylistPipeline::new(client, closet, catalog, config.pipeline.clone());
//!
//!     let person_b64 = std::fs::read_to_string("person.b64").unwrap();
//!     let styled = pipeline
//!         .run("dark casual fall outfit", &person_b64)
//!         .await
//!         .unwrap();
//!     println!("{} + {}", styled.best_top_path, styled.best_bottom_path);
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod closet;
pub mod config;
pub mod error;
pub mod genai;
pub mod pipeline;
pub mod retry;
pub mod transport;

pub use catalog::{Catalog, GarmentAttributes};
pub use config::Config;
pub use error::{Fault, StylistError, StylistResult};
pub use pipeline::{OutfitSelection, StyledOutfit, StylistPipeline};
pub use retry::{with_retry, RetryPolicy};
