//! Console client: asks the bot every line read from stdin.

use std::error::Error;

use chatbot_core::adapters::builtin_components;
use chatbot_core::application::{Bot, RequestContext};
use chatbot_core::config::{AppConfig, LoggingConfig};
use chatbot_core::domain::foundation::UserId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CONSOLE_USER: &str = "console";
const QUIT_COMMANDS: [&str; 2] = ["quit", "exit"];

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| logging.level.clone()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    // Log to stderr so answers on stdout stay readable.
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let bot = Bot::from_config(&config, builtin_components(&config)).await?;
    let user_id = UserId::new(CONSOLE_USER)?;
    let mut ctx = RequestContext::new(user_id.clone());

    println!("{}", bot.initial_question(&mut ctx).await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if QUIT_COMMANDS.contains(&line.trim().to_lowercase().as_str()) {
            break;
        }

        match bot.ask_question(&mut ctx, &line).await {
            Ok(answer) => println!("{}", answer),
            Err(err) => {
                tracing::error!("Question failed: {}", err);
                println!("{}", bot.config().default_response);
            }
        }

        if let Err(err) = bot.save_conversation(&user_id).await {
            tracing::warn!("Failed to save conversation: {}", err);
        }
    }

    println!("{}", bot.exit_response(&mut ctx).await?);
    Ok(())
}
