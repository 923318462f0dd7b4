use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warden_api::{
    config::Config,
    db::{self, PgUserStore},
    router,
    services::{
        auth::AuthService,
        bootstrap::{self, BootstrapOutcome, TerminalPrompt},
        credentials::CredentialVerifier,
        directory::AccountDirectory,
        tokens::TokenService,
    },
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let directory = AccountDirectory::new(Arc::new(PgUserStore::new(pool)));
    let verifier = CredentialVerifier::new(config.bcrypt_cost);
    let tokens = TokenService::new(&config.tokens_secret, config.tokens_lifespan());

    // Nothing is served until the admin account exists; a failure here ends the process.
    match bootstrap::ensure_admin(&directory, &verifier, TerminalPrompt).await {
        Ok(BootstrapOutcome::Created) => info!("Admin user created"),
        Ok(BootstrapOutcome::AlreadyPresent) => {}
        Err(e) => {
            tracing::error!("{e}");
            return Err(e.into());
        }
    }

    let state = AppState {
        auth: AuthService::new(directory, verifier, tokens),
    };

    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("warden API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
