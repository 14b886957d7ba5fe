use identity_admin::api::{AppState, start_webserver};
use identity_admin::client::StandardClientCatalog;
use identity_admin::config::load_config;
use identity_admin::localization::EnglishLocalizer;
use identity_admin::repository::SeaOrmApiResourceRepository;
use identity_admin::schema::ensure_schema;
use identity_admin::service::ApiResourceService;
use sea_orm::Database;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing() {
    let default_directives = "identity_admin=info,sea_orm=info,tower_http=info";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(true).with_level(true);

    registry.with(layer).init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    initialize_tracing();

    let config = Arc::new(load_config()?);

    let db = Arc::new(Database::connect(&config.database_url).await?);
    ensure_schema(db.as_ref()).await?;
    tracing::info!(
        default_page_size = config.default_page_size,
        max_page_size = config.max_page_size,
        "database ready"
    );

    let service = ApiResourceService::new(
        SeaOrmApiResourceRepository::new(db.clone()),
        Arc::new(EnglishLocalizer),
        Arc::new(StandardClientCatalog),
    );

    let state = AppState {
        service: Arc::new(service),
        config,
        db,
    };

    start_webserver(state).await
}
