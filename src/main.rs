use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use hb_ingest::config::StoreConfig;
use hb_ingest::fetch::HttpGameFetcher;
use hb_ingest::ingest::{DEFAULT_BATCH_SIZE, Ingestor};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let game_ids = resolve_game_ids()?;
    if game_ids.is_empty() {
        return Err(anyhow!("no game ids given: pass --ids or --ids-file"));
    }

    let config = match parse_db_path_arg() {
        Some(path) => StoreConfig::new(path),
        None => StoreConfig::from_env().context("unable to resolve sqlite path")?,
    };
    let batch_size = parse_batch_size_arg().unwrap_or(DEFAULT_BATCH_SIZE);

    let ingestor = Ingestor::new(config.clone(), HttpGameFetcher::new());
    let summary = ingestor.run(&game_ids, batch_size);

    println!("Ingest complete");
    println!("DB: {}", config.db_path.display());
    println!(
        "Games: {} ok, {} failed, {} total",
        summary.success, summary.error, summary.total
    );
    for err in summary.errors.iter().take(10) {
        println!(" - {err}");
    }
    if summary.errors.len() > 10 {
        println!(" - ... and {} more", summary.errors.len() - 10);
    }

    Ok(())
}

fn resolve_game_ids() -> Result<Vec<String>> {
    let mut ids = Vec::new();
    if let Some(raw) = arg_value("--ids") {
        ids.extend(parse_ids(&raw));
    }
    if let Some(path) = arg_value("--ids-file") {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading game id list from {path}"))?;
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            ids.extend(parse_ids(line));
        }
    }
    Ok(dedup_ids(ids))
}

fn parse_db_path_arg() -> Option<PathBuf> {
    let raw = arg_value("--db")?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

fn parse_batch_size_arg() -> Option<usize> {
    arg_value("--batch-size")?.trim().parse().ok()
}

fn arg_value(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            if !value.trim().is_empty() {
                return Some(value.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.clone());
        }
    }
    None
}

fn parse_ids(raw: &str) -> Vec<String> {
    raw.split([',', ';', ' '])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn dedup_ids(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for id in ids {
        if seen.insert(id.clone()) {
            out.push(id);
        }
    }
    out
}
