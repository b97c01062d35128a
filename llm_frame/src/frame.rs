use crate::{
    components::{
        generation::GenerationClient,
        labels::{ExtractLabels, Labels},
        prompt::{Task, DEFAULT_MAX_WORDS, DEFAULT_SENTIMENT_OPTIONS},
    },
    error::FrameError,
    logging::LoggingConfig,
    mapper::RowMapper,
    session::{SessionConfig, SessionUpdate},
    table::Table,
};
use llm_generate::{BackendRegistry, GenerationBackend, GenerationRequest};
use std::sync::Arc;

/// A table bound to a session.
///
/// Every task call reads one column, runs the task on each row and returns a
/// new `LlmFrame` whose table has the prediction column added (or replaced).
/// The receiving frame is never modified, and the returned one shares its
/// session, backends and concurrency.
///
/// ```no_run
/// # async fn demo() -> Result<(), llm_frame::FrameError> {
/// use llm_frame::prelude::*;
///
/// let table = Table::new(vec![Column::from_values(
///     "review",
///     ["This tv is great", "Worst laptop ever"],
/// )])?;
/// let mut frame = LlmFrame::new(table);
/// frame.configure(
///     SessionUpdate::new()
///         .model("llama3.2")
///         .option("options", serde_json::json!({"seed": 100})),
/// );
/// let frame = frame.sentiment("review", None, "", None).await?;
/// println!("{}", frame.table());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct LlmFrame {
    table: Table,
    session: SessionConfig,
    registry: Arc<BackendRegistry>,
    concurrency: usize,
    logging_config: Option<LoggingConfig>,
}

impl LlmFrame {
    /// Default session and the default backends.
    pub fn new(table: Table) -> Self {
        Self {
            table,
            session: SessionConfig::default(),
            registry: Arc::new(BackendRegistry::default()),
            concurrency: 1,
            logging_config: None,
        }
    }

    pub fn configure(&mut self, update: SessionUpdate) -> &SessionConfig {
        self.session.configure(update)
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn with_registry(mut self, registry: BackendRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Adds or replaces a backend for this frame and the frames derived from
    /// it afterwards.
    pub fn register_backend<S, B>(&mut self, name: S, backend: B) -> &mut Self
    where
        S: Into<String>,
        B: GenerationBackend + 'static,
    {
        Arc::make_mut(&mut self.registry).register(name, backend);
        self
    }

    /// Number of rows generated at once. Defaults to one.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Installs `config` as the logger for the current thread. The logger
    /// stays active while this frame or one derived from it is alive.
    pub fn logging(mut self, mut config: LoggingConfig) -> Result<Self, FrameError> {
        config.load_logger().map_err(|e| {
            FrameError::configuration(format!("failed to start logger: {e:#}"))
        })?;
        self.logging_config = Some(config);
        Ok(self)
    }

    pub fn mapper(&self) -> RowMapper {
        RowMapper::new(GenerationClient::new(self.registry.clone()))
            .with_concurrency(self.concurrency)
    }

    /// `options` defaults to positive, negative and neutral.
    pub async fn sentiment(
        &self,
        column: &str,
        options: Option<Labels>,
        additional: &str,
        pred_name: Option<&str>,
    ) -> Result<LlmFrame, FrameError> {
        let options = options.unwrap_or_else(|| Labels::from(DEFAULT_SENTIMENT_OPTIONS));
        self.run(column, &Task::sentiment(options, additional), pred_name)
            .await
    }

    /// `max_words` defaults to 10.
    pub async fn summarize(
        &self,
        column: &str,
        max_words: Option<u32>,
        additional: &str,
        pred_name: Option<&str>,
    ) -> Result<LlmFrame, FrameError> {
        let task = Task::summarize(max_words.unwrap_or(DEFAULT_MAX_WORDS), additional);
        self.run(column, &task, pred_name).await
    }

    pub async fn translate(
        &self,
        column: &str,
        language: &str,
        additional: &str,
        pred_name: Option<&str>,
    ) -> Result<LlmFrame, FrameError> {
        self.run(column, &Task::translate(language, additional), pred_name)
            .await
    }

    pub async fn classify<L: Into<Labels>>(
        &self,
        column: &str,
        labels: L,
        additional: &str,
        pred_name: Option<&str>,
    ) -> Result<LlmFrame, FrameError> {
        self.run(column, &Task::classify(labels, additional), pred_name)
            .await
    }

    pub async fn extract<L: Into<ExtractLabels>>(
        &self,
        column: &str,
        labels: L,
        additional: &str,
        pred_name: Option<&str>,
    ) -> Result<LlmFrame, FrameError> {
        self.run(column, &Task::extract(labels, additional), pred_name)
            .await
    }

    /// Like [`LlmFrame::extract`], but writes each field to its own column,
    /// named after the label (or the mapped name for a mapping).
    pub async fn extract_expanded<L: Into<ExtractLabels>>(
        &self,
        column: &str,
        labels: L,
        additional: &str,
    ) -> Result<LlmFrame, FrameError> {
        let table = self
            .mapper()
            .map_column_expanded(
                &self.table,
                column,
                &labels.into(),
                additional,
                &self.session,
            )
            .await?;
        Ok(self.derive(table))
    }

    pub async fn custom(
        &self,
        column: &str,
        prompt: &str,
        valid_responses: Option<Labels>,
        pred_name: Option<&str>,
    ) -> Result<LlmFrame, FrameError> {
        self.run(column, &Task::custom(prompt, valid_responses), pred_name)
            .await
    }

    /// Runs any task. `pred_name` defaults to the task's conventional column
    /// name.
    pub async fn run(
        &self,
        column: &str,
        task: &Task,
        pred_name: Option<&str>,
    ) -> Result<LlmFrame, FrameError> {
        let pred_name = pred_name.unwrap_or(task.default_pred_name());
        let table = self
            .mapper()
            .map_column(&self.table, column, task, &self.session, pred_name)
            .await?;
        Ok(self.derive(table))
    }

    /// The request that would be sent for the first present value of
    /// `column`, without calling any backend. `None` when every value is
    /// missing.
    pub fn preview(
        &self,
        column: &str,
        task: &Task,
    ) -> Result<Option<GenerationRequest>, FrameError> {
        let prompt = task.build()?;
        let input = self.table.column(column)?;
        Ok(input
            .values()
            .iter()
            .flatten()
            .next()
            .map(|text| self.session.request(&prompt.text, text)))
    }

    fn derive(&self, table: Table) -> LlmFrame {
        LlmFrame {
            table,
            ..self.clone()
        }
    }
}
