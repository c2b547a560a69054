use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use std::io;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::air_quality::{check_reading, classify};
use crate::config::{Config, HistoryLocation};
use crate::constants::SERVER_NAME;
use crate::error::Error;
use crate::formatters::{format_air_quality, format_assessment, format_history, format_report};
use crate::history::{FileStore, KeyValueStore, MemoryStore, SearchHistory, SearchHistoryStore};
use crate::models::{
    AssessSafetyRequest, ClassifyAirQualityRequest, RecordSearchRequest, SearchHistoryRequest,
    WeatherReport,
};
use crate::safety::score;

pub type DynStore = Box<dyn KeyValueStore + Send + Sync>;

/// Per-client state: the history store and its in-memory copy.
pub struct Session {
    history_store: Arc<SearchHistoryStore<DynStore>>,
    history: SearchHistory,
}

impl Session {
    /// Opens a session, loading whatever history the store already holds.
    pub fn open(store: DynStore) -> Self {
        let history_store = SearchHistoryStore::new(store);
        let history = history_store.load();
        tracing::info!("Loaded {} recent searches", history.len());
        Self {
            history_store: Arc::new(history_store),
            history,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let store: DynStore = match &config.history {
            HistoryLocation::Directory(dir) => {
                tracing::info!("Persisting search history under {}", dir.display());
                Box::new(FileStore::new(dir.clone()))
            }
            HistoryLocation::Memory => {
                tracing::info!("Keeping search history in memory");
                Box::new(MemoryStore::new())
            }
        };
        Self::open(store)
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub async fn record_search(&mut self, city: &str) -> Result<(), Error> {
        let city = city.to_string();
        self.with_store(move |store, history| store.record_search(history, &city))
            .await
    }

    pub async fn clear_history(&mut self) -> Result<(), Error> {
        self.with_store(|store, history| store.clear(history)).await
    }

    /// Runs `op` on the blocking pool against a copy of the history and
    /// adopts whatever state the copy ends up in.
    async fn with_store<F>(&mut self, op: F) -> Result<(), Error>
    where
        F: FnOnce(&SearchHistoryStore<DynStore>, &mut SearchHistory) -> Result<(), Error>
            + Send
            + 'static,
    {
        let store = Arc::clone(&self.history_store);
        let mut history = self.history.clone();
        let (history, result) = tokio::task::spawn_blocking(move || {
            let result = op(&*store, &mut history);
            (history, result)
        })
        .await
        .map_err(|err| Error::PersistenceUnavailable {
            key: self.history_store.key().to_string(),
            source: io::Error::other(err),
        })?;
        self.history = history;
        result
    }
}

/// MCP service exposing air quality, safety scoring and search history
#[derive(Clone)]
pub struct WeatherSafety {
    session: Arc<Mutex<Session>>,
    tool_router: ToolRouter<Self>,
}

impl WeatherSafety {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            tool_router: Self::tool_router(),
        }
    }

    pub fn classify_air_quality_text(&self, pm2_5: f64) -> Result<String, Error> {
        check_reading(pm2_5)?;
        Ok(format!(
            "{}\nStyle: {}",
            format_air_quality(pm2_5),
            classify(pm2_5).style_tag()
        ))
    }

    pub fn assess_safety_text(&self, request: &AssessSafetyRequest) -> Result<String, Error> {
        let snapshot = request.snapshot();
        snapshot.validate()?;
        Ok(format_assessment(&score(&snapshot)))
    }

    /// Renders a full report and records the place in the history.
    ///
    /// A failed history write is logged; the report is still returned.
    pub async fn report_weather_text(&self, report: &WeatherReport) -> Result<String, Error> {
        let snapshot = report.snapshot();
        snapshot.validate()?;
        let assessment = score(&snapshot);

        let mut session = self.session.lock().await;
        if let Err(e) = session.record_search(&report.name).await {
            tracing::warn!("Could not save search for {}: {}", report.name, e);
        }
        Ok(format_report(report, &assessment))
    }

    pub async fn record_search_text(&self, city: &str) -> Result<String, Error> {
        let mut session = self.session.lock().await;
        session.record_search(city).await?;
        Ok(format_history(session.history().iter()))
    }

    pub async fn search_history_text(&self, prefix: Option<&str>) -> String {
        let session = self.session.lock().await;
        match prefix {
            Some(prefix) => format_history(session.history().suggest(prefix)),
            None => format_history(session.history().iter()),
        }
    }

    pub async fn clear_search_history_text(&self) -> Result<String, Error> {
        let mut session = self.session.lock().await;
        session.clear_history().await?;
        Ok("Search history cleared.".to_string())
    }
}

fn to_mcp_error(err: Error) -> McpError {
    match err {
        Error::InvalidInput { .. } => McpError::invalid_params(err.to_string(), None),
        _ => McpError::internal_error(format!("Failed to update search history: {}", err), None),
    }
}

#[tool_handler]
impl ServerHandler for WeatherSafety {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Classifies PM2.5 air quality, scores outdoor safety from current weather \
                and keeps a short history of searched places."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl WeatherSafety {
    /// Classifies a PM2.5 reading into a US AQI band
    #[tool(description = "Classify a PM2.5 concentration (in \u{03bc}g/m\u{00b3}) into a US AQI category such as Good, Moderate or Hazardous.")]
    async fn classify_air_quality(
        &self,
        Parameters(request): Parameters<ClassifyAirQualityRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Classifying PM2.5 reading: {}", request.pm2_5);

        let formatted = self
            .classify_air_quality_text(request.pm2_5)
            .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(formatted)]))
    }

    /// Scores outdoor safety from individual weather variables
    #[tool(description = "Compute a 0-100 outdoor safety score with advisories from PM2.5, wind speed (km/h), temperature (\u{00b0}C) and a weather description (e.g. 'light rain').")]
    async fn assess_safety(
        &self,
        Parameters(request): Parameters<AssessSafetyRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Assessing safety for conditions: {}", request.description);

        let formatted = self.assess_safety_text(&request).map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(formatted)]))
    }

    /// Reports current conditions for a place and remembers the search
    #[tool(description = "Render a weather report with air quality and safety score from a weather query result ({name, icon, description, temp, humidity, speed, pm2_5, lat, lon}). The place is added to the search history.")]
    async fn report_weather(
        &self,
        Parameters(report): Parameters<WeatherReport>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Reporting weather for: {}", report.name);

        let formatted = self
            .report_weather_text(&report)
            .await
            .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(formatted)]))
    }

    /// Adds a place to the search history
    #[tool(description = "Record a searched place name. Re-searching a place moves it to the front; only the 10 most recent places are kept.")]
    async fn record_search(
        &self,
        Parameters(request): Parameters<RecordSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Recording search: {}", request.city);

        let formatted = self
            .record_search_text(&request.city)
            .await
            .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(formatted)]))
    }

    /// Lists recent searches
    #[tool(description = "List recently searched places, most recent first. Optionally filter by a name prefix for autocompletion.")]
    async fn search_history(
        &self,
        Parameters(request): Parameters<SearchHistoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Listing search history");

        let formatted = self.search_history_text(request.prefix.as_deref()).await;

        Ok(CallToolResult::success(vec![Content::text(formatted)]))
    }

    /// Forgets all recent searches
    #[tool(description = "Clear the search history.")]
    async fn clear_search_history(&self) -> Result<CallToolResult, McpError> {
        tracing::info!("Clearing search history");

        let formatted = self
            .clear_search_history_text()
            .await
            .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(formatted)]))
    }
}
