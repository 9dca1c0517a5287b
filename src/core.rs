//! Core Curio functionality
//!
//! `Curio` owns the database pool and the one cache handle of the process.
//! Everything that reads or writes entities gets both through [`Stores`].

use cache_system::CacheManager;
use config::AppConfig;
use sqlx::PgPool;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use store_object::{CachedStore, PgRepositories, RepositoryFactory};

use crate::entities::{
    ActivatedTicket, CulturalExhibit, CulturalPiece, ExhibitItinerary, ExhibitSpace, GeneralSettings, Level,
    LlmModel, Message, SurveyAnswer, SurveyQuestion, SurveyResponse, Ticket, Tour, User,
};
use crate::errors::CurioError;
use crate::identity::IdentityProvider;
use crate::services::{Authenticator, SettingsService};

/// Main coordinator holding the database pool and the shared cache
pub struct Curio {
    pool: PgPool,
    cache: CacheManager,
}

impl fmt::Debug for Curio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curio")
            .field("pool_size", &self.pool.size())
            .field("cache", &self.cache)
            .finish()
    }
}

impl Curio {
    /// Connect to PostgreSQL and set up the cache described by `config`
    ///
    /// An unusable cache configuration leaves caching disabled instead of
    /// failing; the database must be reachable.
    pub async fn connect(config: AppConfig) -> Result<Self, CurioError> {
        let database = &config.database;

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(database.max_connections)
            .min_connections(database.min_connections)
            .acquire_timeout(Duration::from_secs(database.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(database.idle_timeout_seconds));

        if database.max_lifetime_seconds > 0 {
            pool_options = pool_options.max_lifetime(Duration::from_secs(database.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&database.connection_string()).await?;
        let cache = CacheManager::new(&config.cache);

        tracing::info!(
            cache_backend = cache.backend_name(),
            max_connections = database.max_connections,
            "curio connected"
        );

        Ok(Self { pool, cache })
    }

    /// Assemble from an existing pool and cache
    pub fn from_parts(pool: PgPool, cache: CacheManager) -> Self {
        Self { pool, cache }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Cached stores for every entity over PostgreSQL
    pub fn stores(&self) -> Stores<PgRepositories> {
        Stores::new(&PgRepositories::new(self.pool.clone()), self.cache.clone())
    }

    /// Probe the database and the cache independently
    pub async fn health_check(&self) -> HealthReport {
        let database = match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => ComponentHealth::Healthy,
            Err(err) => ComponentHealth::Unhealthy(err.to_string()),
        };
        HealthReport {
            database,
            cache: cache_health(&self.cache).await,
        }
    }
}

/// State of one dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentHealth {
    Healthy,
    Disabled,
    Unhealthy(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub database: ComponentHealth,
    pub cache: ComponentHealth,
}

impl HealthReport {
    /// A degraded cache only costs latency, so only the database counts
    pub fn is_healthy(&self) -> bool {
        self.database == ComponentHealth::Healthy
    }
}

pub(crate) async fn cache_health(cache: &CacheManager) -> ComponentHealth {
    if !cache.is_enabled() {
        return ComponentHealth::Disabled;
    }
    match cache.ping().await {
        Ok(()) => ComponentHealth::Healthy,
        Err(err) => ComponentHealth::Unhealthy(err.to_string()),
    }
}

/// One cached store per entity, all sharing a cache handle
pub struct Stores<F: RepositoryFactory> {
    pub cultural_exhibits: CachedStore<CulturalExhibit, F::Repo<CulturalExhibit>>,
    pub cultural_pieces: CachedStore<CulturalPiece, F::Repo<CulturalPiece>>,
    pub exhibit_spaces: CachedStore<ExhibitSpace, F::Repo<ExhibitSpace>>,
    pub levels: CachedStore<Level, F::Repo<Level>>,
    pub exhibit_itineraries: CachedStore<ExhibitItinerary, F::Repo<ExhibitItinerary>>,
    pub tickets: CachedStore<Ticket, F::Repo<Ticket>>,
    pub activated_tickets: CachedStore<ActivatedTicket, F::Repo<ActivatedTicket>>,
    pub tours: CachedStore<Tour, F::Repo<Tour>>,
    pub messages: CachedStore<Message, F::Repo<Message>>,
    pub users: CachedStore<User, F::Repo<User>>,
    pub survey_questions: CachedStore<SurveyQuestion, F::Repo<SurveyQuestion>>,
    pub survey_responses: CachedStore<SurveyResponse, F::Repo<SurveyResponse>>,
    pub survey_answers: CachedStore<SurveyAnswer, F::Repo<SurveyAnswer>>,
    pub llm_models: CachedStore<LlmModel, F::Repo<LlmModel>>,
    pub general_settings: CachedStore<GeneralSettings, F::Repo<GeneralSettings>>,
}

impl<F: RepositoryFactory> Stores<F> {
    pub fn new(factory: &F, cache: CacheManager) -> Self {
        Self {
            cultural_exhibits: CachedStore::new(factory.repository::<CulturalExhibit>(), cache.clone()),
            cultural_pieces: CachedStore::new(factory.repository::<CulturalPiece>(), cache.clone()),
            exhibit_spaces: CachedStore::new(factory.repository::<ExhibitSpace>(), cache.clone()),
            levels: CachedStore::new(factory.repository::<Level>(), cache.clone()),
            exhibit_itineraries: CachedStore::new(factory.repository::<ExhibitItinerary>(), cache.clone()),
            tickets: CachedStore::new(factory.repository::<Ticket>(), cache.clone()),
            activated_tickets: CachedStore::new(factory.repository::<ActivatedTicket>(), cache.clone()),
            tours: CachedStore::new(factory.repository::<Tour>(), cache.clone()),
            messages: CachedStore::new(factory.repository::<Message>(), cache.clone()),
            users: CachedStore::new(factory.repository::<User>(), cache.clone()),
            survey_questions: CachedStore::new(factory.repository::<SurveyQuestion>(), cache.clone()),
            survey_responses: CachedStore::new(factory.repository::<SurveyResponse>(), cache.clone()),
            survey_answers: CachedStore::new(factory.repository::<SurveyAnswer>(), cache.clone()),
            llm_models: CachedStore::new(factory.repository::<LlmModel>(), cache.clone()),
            general_settings: CachedStore::new(factory.repository::<GeneralSettings>(), cache),
        }
    }

    pub fn cache(&self) -> &CacheManager {
        self.users.cache()
    }

    pub fn settings(&self) -> SettingsService<F::Repo<GeneralSettings>, F::Repo<LlmModel>> {
        SettingsService::new(self.general_settings.clone(), self.llm_models.clone())
    }

    pub fn authenticator(&self, provider: Arc<dyn IdentityProvider>) -> Authenticator<F::Repo<User>> {
        Authenticator::new(provider, self.users.clone())
    }
}
