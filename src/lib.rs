pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod web;

pub use config::Config;
pub use controller::{Controller, Phase, SourceImage, UiBinding};
pub use error::{ApiError, GatewayError};
pub use gateway::{Gateway, GeminiClient, ImageModel};
