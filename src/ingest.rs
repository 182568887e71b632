use crate::batch::GameBatch;
use crate::config::StoreConfig;
use crate::document::parse_game_document;
use crate::error::IngestError;
use crate::extract::extract_game;
use crate::fetch::GameFetcher;
use crate::model::ExtractionResult;
use crate::store;

pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Run-level counters. `errors` keeps the individual failure messages for
/// the caller and the `ingest_runs` bookkeeping row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub success: usize,
    pub error: usize,
    pub total: usize,
    pub errors: Vec<String>,
}

/// Drives fetch, extraction, accumulation and flushing over a list of
/// external game ids. One database connection per run; batches are
/// committed (or rolled back) independently.
pub struct Ingestor<F> {
    config: StoreConfig,
    fetcher: F,
}

impl<F: GameFetcher> Ingestor<F> {
    pub fn new(config: StoreConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Process every id, flushing whenever the buffer reaches `batch_size`
    /// (0 falls back to the default) or the input is exhausted. Failures
    /// never escalate: a bad match costs one error, a failed flush costs
    /// its batch, and only an unusable store aborts the run up front.
    pub fn run(&self, game_ids: &[String], batch_size: usize) -> RunSummary {
        let total = game_ids.len();
        if game_ids.is_empty() {
            return RunSummary::default();
        }
        let batch_size = if batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            batch_size
        };

        let mut conn = match store::open_db(&self.config.db_path) {
            Ok(conn) => conn,
            Err(err) => {
                eprintln!("[ERROR] {err}");
                return RunSummary {
                    success: 0,
                    error: total,
                    total,
                    errors: vec![err.to_string()],
                };
            }
        };

        let mut summary = RunSummary {
            total,
            ..RunSummary::default()
        };
        let run_id = match store::begin_run(&conn, total) {
            Ok(id) => Some(id),
            Err(err) => {
                eprintln!("[WARN] run bookkeeping unavailable: {err}");
                None
            }
        };

        let mut batch = GameBatch::default();
        for (index, game_id) in game_ids.iter().enumerate() {
            match self.fetch_and_extract(game_id) {
                Ok(extracted) => batch.push(extracted),
                Err(err) => {
                    eprintln!("[WARN] {err}");
                    summary.error += 1;
                    summary.errors.push(err.to_string());
                }
            }

            let input_exhausted = index + 1 == total;
            if batch.len() >= batch_size || (input_exhausted && !batch.is_empty()) {
                let buffered = batch.len();
                match store::flush_batch(&mut conn, &batch) {
                    Ok(()) => {
                        summary.success += buffered;
                        eprintln!("[INFO] committed batch of {buffered} games");
                    }
                    Err(err) => {
                        // The transaction already rolled back; every game
                        // in the buffer counts as failed.
                        eprintln!("[ERROR] batch of {buffered} games rolled back: {err}");
                        summary.error += buffered;
                        summary.errors.push(format!("batch of {buffered} games: {err}"));
                    }
                }
                batch.clear();
            }
        }

        if let Some(run_id) = run_id {
            if let Err(err) =
                store::finish_run(&conn, run_id, summary.success, summary.error, &summary.errors)
            {
                eprintln!("[WARN] run bookkeeping update failed: {err}");
            }
        }
        summary
    }

    fn fetch_and_extract(&self, game_id: &str) -> Result<ExtractionResult, IngestError> {
        let raw = self.fetcher.fetch_raw(game_id)?;
        let doc = parse_game_document(&raw).map_err(|source| IngestError::MalformedDocument {
            game_id: game_id.to_string(),
            source,
        })?;
        extract_game(&doc, game_id)
    }
}
