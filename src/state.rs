use std::sync::Arc;

use crate::clients::edamam::EdamamClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{CredentialEngine, SeaOrmUserService, TokenService, UserService};

/// Build a shared HTTP client for outbound API calls.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("Cookbook/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Process-wide services, built once from an immutable [`Config`].
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub tokens: TokenService,

    pub user_service: Arc<dyn UserService>,

    pub recipes: Arc<EdamamClient>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let credentials = CredentialEngine::new(&config.security)?;
        let tokens = TokenService::new(&config.security);

        let http_client =
            build_shared_http_client(config.recipes.request_timeout_seconds.into())?;
        let recipes = Arc::new(EdamamClient::with_shared_client(
            http_client,
            &config.recipes,
        ));

        let user_service = Arc::new(SeaOrmUserService::new(store.clone(), credentials))
            as Arc<dyn UserService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(config),
            store,
            tokens,
            user_service,
            recipes,
        })
    }
}
