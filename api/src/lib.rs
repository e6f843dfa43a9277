pub mod codegen;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod executor;
pub mod utilities;

pub use codegen::Registry;
pub use config::Config;
pub use db::repository::HistoryStore;
pub use domain::{
    history::{EntryMeta, HistoryEntry, HistoryListing},
    params::{ParamEvent, QueryState},
    request::{Auth, BodyType, FormType, HttpMethod, Request, RequestBody},
    response::{Cookie, Response},
};
pub use error::{ExecuteError, HistoryError};
pub use executor::{Executor, InFlight, SendTicket, Sent};
pub use tokio_util::sync::CancellationToken;

/// Everything the GUI layer talks to: sends, history and code snippets.
pub struct MyApi {
    pub config: Config,
    pub executor: Executor,
    pub history: HistoryStore,
    pub codegen: Registry,
}

impl MyApi {
    /// Opens the history directory, creating it on first use.
    pub fn new(config: Config) -> Result<Self, HistoryError> {
        let history = HistoryStore::open(&config)?;
        let executor = Executor::new(reqwest::Client::new(), history.clone());
        log::info!("history at {}", history.dir().display());
        Ok(MyApi {
            config,
            executor,
            history,
            codegen: Registry::with_defaults(),
        })
    }

    pub fn from_user_cache() -> Result<Self, HistoryError> {
        MyApi::new(Config::from_user_cache()?)
    }

    /// A blank tab carrying the configured user agent.
    pub fn new_request(&self) -> Request {
        Request::with_user_agent(&self.config.user_agent)
    }

    pub async fn send(&self, request: Request, cancel: CancellationToken) -> Result<Sent, ExecuteError> {
        self.executor.execute(request, cancel).await
    }

    pub fn history(&self) -> Result<HistoryListing, HistoryError> {
        self.history.list()
    }

    pub fn load(&self, id: &str) -> Result<Request, HistoryError> {
        self.history.load(id)
    }

    pub fn delete(&self, id: &str) -> Result<(), HistoryError> {
        self.history.delete(id)
    }

    pub fn clone_entry(&self, id: &str) -> Result<String, HistoryError> {
        self.history.clone_entry(id)
    }

    pub fn generate_code(&self, language: &str, request: &Request) -> anyhow::Result<String> {
        self.codegen.generate(language, request)
    }
}
