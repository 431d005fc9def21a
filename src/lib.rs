pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod keyboard;
pub mod parser;
pub mod quiz;
pub mod registry;
pub mod replies;
pub mod runner;
pub mod schema;
pub mod session;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;
