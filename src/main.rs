use dotenvy::dotenv;
use repair_desk::{
    assistant::GeminiAssistant,
    bot::{self, BotData},
    config,
    core::state::ShopState,
    errors::{Error, Result},
};
use std::{env, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();

    // 3. Shop details and assistant settings
    let app_config = config::shop::load_default_config()
        .inspect_err(|e| error!("Failed to load config.toml: {e}"))?;
    info!("Loaded configuration for '{}'", app_config.shop.name);

    // 4. Database and stored collections
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ready"))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    let state = ShopState::load(&db).await;

    // 5. Collaborators and operator labels
    let assistant = Arc::new(GeminiAssistant::from_env(app_config.assistant.model.clone()));
    let nicknames = config::users::get_operator_nicknames();

    let dev_guild = match env::var("DEV_GUILD_ID") {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Ignoring invalid DEV_GUILD_ID '{raw}': {e}");
                None
            }
        },
        Err(_) => None,
    };

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(db, state, assistant, app_config, nicknames);
    bot::run_bot(token, data, dev_guild).await
}
