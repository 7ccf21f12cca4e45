use std::time::{Duration, Instant};

use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};

use crate::{config::Config, errors::AppResult};

const APP_NAME: &str = "quizwhiz-server";

/// The collections QuizWhiz keeps its documents in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionName {
    Users,
    Quizzes,
    Submissions,
    RevokedTokens,
}

impl CollectionName {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionName::Users => "users",
            CollectionName::Quizzes => "quizzes",
            CollectionName::Submissions => "submissions",
            CollectionName::RevokedTokens => "revoked_tokens",
        }
    }
}

/// Handle on the QuizWhiz database. Cloning shares the connection pool.
#[derive(Clone)]
pub struct Database {
    inner: mongodb::Database,
}

impl Database {
    /// Connects and pings once, so a bad connection string fails at startup
    /// rather than on the first request.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let options = client_options(config).await?;
        let client = Client::with_options(options)?;

        let db = Self {
            inner: client.database(&config.mongo_db_name),
        };
        let latency = db.ping().await?;

        log::info!(
            "Connected to MongoDB database '{}' ({}ms)",
            config.mongo_db_name,
            latency.as_millis()
        );
        Ok(db)
    }

    pub fn collection<T>(&self, name: CollectionName) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.inner.collection(name.as_str())
    }

    /// Round trip to the server, used by startup and `/health/ready`.
    pub async fn ping(&self) -> AppResult<Duration> {
        let started = Instant::now();
        self.inner.run_command(doc! { "ping": 1 }).await?;
        Ok(started.elapsed())
    }
}

async fn client_options(config: &Config) -> AppResult<ClientOptions> {
    let mut options = ClientOptions::parse(&config.mongo_conn_string).await?;

    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    options.app_name = Some(APP_NAME.to_string());
    options.max_pool_size = Some(10);
    options.min_pool_size = Some(2);
    options.connect_timeout = Some(Duration::from_secs(5));
    options.server_selection_timeout = Some(Duration::from_secs(5));

    Ok(options)
}
