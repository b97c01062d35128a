use crate::{
    components::{
        cache::{CacheKey, CacheStore},
        generation::GenerationClient,
        labels::ExtractLabels,
        prompt::{Prompt, Task},
        validator::validate,
    },
    error::FrameError,
    session::SessionConfig,
    table::{Column, Table},
};
use futures::stream::{self, StreamExt};
use llm_generate::GenerationRequest;
use std::collections::HashMap;

const EXTRACT_SEPARATOR: char = '|';

/// Applies a task to every value of a column.
///
/// Rows are generated at most `concurrency` at a time; results always come
/// back in input order. A row whose generation fails ends up missing, the
/// other rows carry on.
#[derive(Clone, Debug)]
pub struct RowMapper {
    client: GenerationClient,
    concurrency: usize,
}

struct Job {
    key: CacheKey,
    request: GenerationRequest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum JobOutcome {
    CacheHit,
    Generated,
    Failed,
}

impl RowMapper {
    pub fn new(client: GenerationClient) -> Self {
        Self {
            client,
            concurrency: 1,
        }
    }

    /// Values below one are treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    /// Runs `task` over `values` and returns one validated result per value.
    pub async fn map_values(
        &self,
        values: &[Option<String>],
        task: &Task,
        session: &SessionConfig,
    ) -> Result<Vec<Option<String>>, FrameError> {
        let prompt = task.build()?;
        let cache = CacheStore::open(session.cache_dir());
        let (jobs, row_jobs) = plan_jobs(values, &prompt, session, cache.is_enabled());
        crate::debug!(
            "{}: {} rows, {} jobs, concurrency {}",
            task.name(),
            values.len(),
            jobs.len(),
            self.concurrency
        );

        // Collected first; streaming straight from the map closure makes the
        // returned future non-`Send`.
        let pending: Vec<_> = jobs
            .iter()
            .map(|job| self.run_job(job, &cache, &session.backend))
            .collect();
        let results: Vec<(Option<String>, JobOutcome)> = stream::iter(pending)
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut tally: HashMap<JobOutcome, usize> = HashMap::new();
        for (_, outcome) in &results {
            *tally.entry(*outcome).or_default() += 1;
        }
        crate::info!(
            "{}: {} cached, {} generated, {} failed, {} missing inputs",
            task.name(),
            tally.get(&JobOutcome::CacheHit).copied().unwrap_or(0),
            tally.get(&JobOutcome::Generated).copied().unwrap_or(0),
            tally.get(&JobOutcome::Failed).copied().unwrap_or(0),
            row_jobs.iter().filter(|j| j.is_none()).count()
        );

        Ok(row_jobs
            .iter()
            .map(|job| {
                let raw = job.and_then(|j| results[j].0.as_deref())?;
                validate(raw, prompt.valid_responses.as_ref())
            })
            .collect())
    }

    /// Returns a copy of `table` with the task results in `pred_name`.
    pub async fn map_column(
        &self,
        table: &Table,
        column: &str,
        task: &Task,
        session: &SessionConfig,
        pred_name: &str,
    ) -> Result<Table, FrameError> {
        check_pred_name(pred_name)?;
        let input = table.column(column)?;
        let output = self.map_values(input.values(), task, session).await?;
        table.with_column(Column::new(pred_name, output))
    }

    /// Runs an extraction and splits each pipe separated result into one
    /// column per label. Rows whose part count does not match get a missing
    /// value in every one of those columns. A single label takes the whole
    /// answer, pipes included.
    pub async fn map_column_expanded(
        &self,
        table: &Table,
        column: &str,
        labels: &ExtractLabels,
        additional: &str,
        session: &SessionConfig,
    ) -> Result<Table, FrameError> {
        let names = labels.column_names();
        for (i, name) in names.iter().enumerate() {
            check_pred_name(name)?;
            if names[..i].contains(name) {
                return Err(FrameError::configuration(format!(
                    "extract column {name:?} named more than once"
                )));
            }
        }

        let input = table.column(column)?;
        let task = Task::extract(labels.clone(), additional);
        let output = self.map_values(input.values(), &task, session).await?;

        let mut expanded: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(output.len()); names.len()];
        for value in &output {
            let parts: Option<Vec<&str>> = value.as_deref().and_then(|v| match labels {
                ExtractLabels::Single(_) => Some(vec![v.trim()]),
                ExtractLabels::Many(_) => {
                    let parts: Vec<&str> = v.split(EXTRACT_SEPARATOR).map(str::trim).collect();
                    (parts.len() == names.len()).then_some(parts)
                }
            });
            for (i, cells) in expanded.iter_mut().enumerate() {
                cells.push(parts.as_ref().map(|p| p[i].to_string()));
            }
        }

        let mut table = table.clone();
        for (name, cells) in names.into_iter().zip(expanded) {
            table = table.with_column(Column::new(name, cells))?;
        }
        Ok(table)
    }

    async fn run_job(
        &self,
        job: &Job,
        cache: &CacheStore,
        backend: &str,
    ) -> (Option<String>, JobOutcome) {
        if let Some(hit) = cache.lookup(&job.key).await {
            return (Some(hit), JobOutcome::CacheHit);
        }
        match self.client.send(backend, &job.request).await {
            Ok(response) => {
                cache
                    .store(&job.key, backend, &job.request, &response)
                    .await;
                (Some(response), JobOutcome::Generated)
            }
            Err(e) => {
                crate::warn!("Generation failed for {backend}: {e}");
                (None, JobOutcome::Failed)
            }
        }
    }
}

/// One job per present value, or per distinct cache key when deduplicating.
/// The second vector maps each row to its job; `None` for missing inputs.
fn plan_jobs(
    values: &[Option<String>],
    prompt: &Prompt,
    session: &SessionConfig,
    dedupe: bool,
) -> (Vec<Job>, Vec<Option<usize>>) {
    let mut jobs: Vec<Job> = Vec::new();
    let mut by_key: HashMap<CacheKey, usize> = HashMap::new();
    let row_jobs = values
        .iter()
        .map(|value| {
            let text = value.as_deref()?;
            let request = session.request(&prompt.text, text);
            let key = CacheKey::new(&session.backend, &request);
            if dedupe {
                if let Some(&existing) = by_key.get(&key) {
                    return Some(existing);
                }
                by_key.insert(key.clone(), jobs.len());
            }
            jobs.push(Job { key, request });
            Some(jobs.len() - 1)
        })
        .collect();
    (jobs, row_jobs)
}

fn check_pred_name(pred_name: &str) -> Result<(), FrameError> {
    if pred_name.trim().is_empty() {
        return Err(FrameError::configuration(
            "prediction column name can not be empty",
        ));
    }
    Ok(())
}
