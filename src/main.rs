use std::process::ExitCode;
use std::sync::Arc;

use dotenvy::dotenv;
use quizgenbot::config::BotConfig;
use quizgenbot::generator::QuestionGenerator;
use quizgenbot::registry::SessionRegistry;
use quizgenbot::schema::schema;
use teloxide::error_handlers::IgnoringErrorHandlerSafe;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.log_level) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let generator = match QuestionGenerator::new(config.generator.clone()) {
        Ok(generator) => Arc::new(generator),
        Err(e) => {
            log::error!("Failed to build the question generator: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let bot = Bot::new(&config.telegram_token);
    log::info!("Starting bot...");

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![
            Arc::new(SessionRegistry::new()),
            generator,
            Arc::new(config.quiz.clone())
        ])
        .enable_ctrlc_handler()
        .build();

    if let Some(webhook) = config.webhook {
        let listener = match webhooks::axum(bot, Options::new(webhook.addr, webhook.url)).await {
            Ok(listener) => listener,
            Err(e) => {
                log::error!("Failed to build a webhook listener: {}", e);
                return ExitCode::FAILURE;
            }
        };
        dispatcher
            .dispatch_with_listener(listener, Arc::new(IgnoringErrorHandlerSafe))
            .await
    } else {
        dispatcher.dispatch().await
    }

    ExitCode::SUCCESS
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("error"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_line_number(true)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(())
}
