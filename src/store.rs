use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, Transaction, params, params_from_iter};

use crate::batch::GameBatch;
use crate::error::IngestError;
use crate::model::{EventRow, Hall, League, MatchHeader, MatchResult, Player, RosterStatEntry, Team};

/// Open (or create) the ingest database and make sure the schema exists.
/// Any failure here means the store is unusable for the whole run.
pub fn open_db(path: &Path) -> Result<Connection, IngestError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn = Connection::open(path).map_err(|err| {
        IngestError::Configuration(format!("open sqlite db {}: {err}", path.display()))
    })?;
    init_schema(&conn)
        .map_err(|err| IngestError::Configuration(format!("bootstrap schema: {err}")))?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<(), IngestError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS leagues (
            league_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            acronym TEXT,
            season TEXT NOT NULL,
            age_group TEXT,
            league_type TEXT
        );
        CREATE TABLE IF NOT EXISTS teams (
            team_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            acronym TEXT,
            logo_url TEXT
        );
        CREATE TABLE IF NOT EXISTS halls (
            hall_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            city TEXT,
            hall_number INTEGER
        );
        CREATE TABLE IF NOT EXISTS players (
            player_id TEXT PRIMARY KEY,
            first_name TEXT,
            last_name TEXT,
            is_placeholder INTEGER NOT NULL DEFAULT 0,
            is_official INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS matches (
            match_id TEXT PRIMARY KEY,
            league_id TEXT NOT NULL REFERENCES leagues(league_id) ON DELETE CASCADE,
            phase_id TEXT,
            hall_id TEXT REFERENCES halls(hall_id) ON DELETE SET NULL,
            game_number INTEGER,
            starts_at INTEGER NOT NULL,
            home_team_id TEXT NOT NULL REFERENCES teams(team_id) ON DELETE CASCADE,
            away_team_id TEXT NOT NULL REFERENCES teams(team_id) ON DELETE CASCADE,
            status TEXT,
            pdf_url TEXT,
            referee_info TEXT,
            home_goals INTEGER,
            away_goals INTEGER,
            home_goals_half INTEGER,
            away_goals_half INTEGER,
            home_points INTEGER,
            away_points INTEGER
        );
        CREATE TABLE IF NOT EXISTS roster_stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            match_id TEXT NOT NULL REFERENCES matches(match_id) ON DELETE CASCADE,
            player_id TEXT NOT NULL REFERENCES players(player_id) ON DELETE CASCADE,
            team_id TEXT NOT NULL REFERENCES teams(team_id) ON DELETE CASCADE,
            jersey_number INTEGER,
            goals INTEGER NOT NULL DEFAULT 0,
            seven_meter_goals INTEGER NOT NULL DEFAULT 0,
            seven_meter_missed INTEGER NOT NULL DEFAULT 0,
            yellow_cards INTEGER NOT NULL DEFAULT 0,
            red_cards INTEGER NOT NULL DEFAULT 0,
            blue_cards INTEGER NOT NULL DEFAULT 0,
            two_minute_penalties INTEGER NOT NULL DEFAULT 0,
            UNIQUE (match_id, player_id)
        );
        CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_event_id INTEGER NOT NULL,
            match_id TEXT NOT NULL REFERENCES matches(match_id) ON DELETE CASCADE,
            timestamp INTEGER NOT NULL,
            match_minute TEXT NOT NULL,
            event_type TEXT NOT NULL,
            score_home INTEGER,
            score_away INTEGER,
            team_side TEXT,
            message TEXT,
            ref_player_id TEXT REFERENCES players(player_id) ON DELETE SET NULL,
            UNIQUE (match_id, source_event_id)
        );
        CREATE TABLE IF NOT EXISTS ingest_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT,
            games_total INTEGER NOT NULL,
            games_succeeded INTEGER NOT NULL,
            games_failed INTEGER NOT NULL,
            errors_json TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_matches_league ON matches(league_id);
        CREATE INDEX IF NOT EXISTS idx_matches_starts_at ON matches(starts_at);
        CREATE INDEX IF NOT EXISTS idx_roster_stats_player ON roster_stats(player_id);
        CREATE INDEX IF NOT EXISTS idx_roster_stats_match ON roster_stats(match_id);
        CREATE INDEX IF NOT EXISTS idx_events_match ON events(match_id);
        CREATE INDEX IF NOT EXISTS idx_events_type ON events(event_type);
        CREATE INDEX IF NOT EXISTS idx_events_player ON events(ref_player_id);
        "#,
    )?;
    Ok(())
}

/// Commit one buffered batch as a single all-or-nothing unit. Reference
/// entities are insert-or-ignore, match headers upsert, results update in
/// place, and per-match children are replaced via a scoped delete followed
/// by re-insertion. Any error rolls the whole transaction back.
pub fn flush_batch(conn: &mut Connection, batch: &GameBatch) -> Result<(), IngestError> {
    let tx = conn.transaction()?;
    insert_leagues(&tx, &batch.leagues)?;
    insert_teams(&tx, &batch.teams)?;
    insert_halls(&tx, &batch.halls)?;
    insert_players(&tx, &batch.players)?;
    upsert_match_headers(&tx, &batch.headers)?;
    update_match_results(&tx, &batch.results)?;
    delete_match_children(&tx, &batch.game_ids)?;
    insert_roster_stats(&tx, &batch.roster_stats)?;
    insert_events(&tx, &batch.events)?;
    tx.commit()?;
    Ok(())
}

fn insert_leagues(tx: &Transaction<'_>, leagues: &HashSet<League>) -> Result<(), IngestError> {
    let mut stmt = tx.prepare(
        "INSERT INTO leagues (league_id, name, acronym, season, age_group, league_type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(league_id) DO NOTHING",
    )?;
    for league in leagues {
        stmt.execute(params![
            league.league_id,
            league.name,
            league.acronym,
            league.season,
            league.age_group,
            league.league_type,
        ])?;
    }
    Ok(())
}

fn insert_teams(tx: &Transaction<'_>, teams: &HashSet<Team>) -> Result<(), IngestError> {
    let mut stmt = tx.prepare(
        "INSERT INTO teams (team_id, name, acronym, logo_url)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(team_id) DO NOTHING",
    )?;
    for team in teams {
        stmt.execute(params![team.team_id, team.name, team.acronym, team.logo_url])?;
    }
    Ok(())
}

fn insert_halls(tx: &Transaction<'_>, halls: &HashSet<Hall>) -> Result<(), IngestError> {
    let mut stmt = tx.prepare(
        "INSERT INTO halls (hall_id, name, city, hall_number)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(hall_id) DO NOTHING",
    )?;
    for hall in halls {
        stmt.execute(params![hall.hall_id, hall.name, hall.city, hall.hall_number])?;
    }
    Ok(())
}

fn insert_players(tx: &Transaction<'_>, players: &HashSet<Player>) -> Result<(), IngestError> {
    let mut stmt = tx.prepare(
        "INSERT INTO players (player_id, first_name, last_name, is_placeholder, is_official)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(player_id) DO NOTHING",
    )?;
    for player in players {
        stmt.execute(params![
            player.player_id,
            player.first_name,
            player.last_name,
            player.is_placeholder as i64,
            player.is_official as i64,
        ])?;
    }
    Ok(())
}

fn upsert_match_headers(tx: &Transaction<'_>, headers: &[MatchHeader]) -> Result<(), IngestError> {
    let mut stmt = tx.prepare(
        "INSERT INTO matches (
            match_id, league_id, phase_id, hall_id, game_number, starts_at,
            home_team_id, away_team_id, status, pdf_url, referee_info
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT(match_id) DO UPDATE SET
            league_id = excluded.league_id,
            phase_id = excluded.phase_id,
            hall_id = excluded.hall_id,
            game_number = excluded.game_number,
            starts_at = excluded.starts_at,
            home_team_id = excluded.home_team_id,
            away_team_id = excluded.away_team_id,
            status = excluded.status,
            pdf_url = excluded.pdf_url,
            referee_info = excluded.referee_info",
    )?;
    for header in headers {
        stmt.execute(params![
            header.match_id,
            header.league_id,
            header.phase_id,
            header.hall_id,
            header.game_number,
            header.starts_at,
            header.home_team_id,
            header.away_team_id,
            header.status,
            header.pdf_url,
            header.referee_info,
        ])?;
    }
    Ok(())
}

/// Result data always follows header data for the same match within a
/// batch, so this is strictly an update pass; a result for an unknown
/// match id simply updates nothing.
fn update_match_results(tx: &Transaction<'_>, results: &[MatchResult]) -> Result<(), IngestError> {
    let mut stmt = tx.prepare(
        "UPDATE matches SET
            home_goals = ?1,
            away_goals = ?2,
            home_goals_half = ?3,
            away_goals_half = ?4,
            home_points = ?5,
            away_points = ?6
        WHERE match_id = ?7",
    )?;
    for result in results {
        stmt.execute(params![
            result.home_goals,
            result.away_goals,
            result.home_goals_half,
            result.away_goals_half,
            result.home_points,
            result.away_points,
            result.match_id,
        ])?;
    }
    Ok(())
}

fn delete_match_children(tx: &Transaction<'_>, match_ids: &[String]) -> Result<(), IngestError> {
    if match_ids.is_empty() {
        return Ok(());
    }
    let placeholders = vec!["?"; match_ids.len()].join(", ");
    tx.execute(
        &format!("DELETE FROM roster_stats WHERE match_id IN ({placeholders})"),
        params_from_iter(match_ids),
    )?;
    tx.execute(
        &format!("DELETE FROM events WHERE match_id IN ({placeholders})"),
        params_from_iter(match_ids),
    )?;
    Ok(())
}

fn insert_roster_stats(
    tx: &Transaction<'_>,
    roster_stats: &[RosterStatEntry],
) -> Result<(), IngestError> {
    let mut stmt = tx.prepare(
        "INSERT INTO roster_stats (
            match_id, player_id, team_id, jersey_number, goals,
            seven_meter_goals, seven_meter_missed, yellow_cards, red_cards,
            blue_cards, two_minute_penalties
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    for entry in roster_stats {
        stmt.execute(params![
            entry.match_id,
            entry.player_id,
            entry.team_id,
            entry.jersey_number,
            entry.goals,
            entry.seven_meter_goals,
            entry.seven_meter_missed,
            entry.yellow_cards,
            entry.red_cards,
            entry.blue_cards,
            entry.two_minute_penalties,
        ])?;
    }
    Ok(())
}

/// Insert tolerates a duplicated source event id within one pass by
/// updating in place, keyed on (match_id, source_event_id).
fn insert_events(tx: &Transaction<'_>, events: &[EventRow]) -> Result<(), IngestError> {
    let mut stmt = tx.prepare(
        "INSERT INTO events (
            source_event_id, match_id, timestamp, match_minute, event_type,
            score_home, score_away, team_side, message, ref_player_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ON CONFLICT(match_id, source_event_id) DO UPDATE SET
            timestamp = excluded.timestamp,
            match_minute = excluded.match_minute,
            event_type = excluded.event_type,
            score_home = excluded.score_home,
            score_away = excluded.score_away,
            team_side = excluded.team_side,
            message = excluded.message,
            ref_player_id = excluded.ref_player_id",
    )?;
    for event in events {
        stmt.execute(params![
            event.source_event_id,
            event.match_id,
            event.timestamp,
            event.match_minute,
            event.event_type,
            event.score_home,
            event.score_away,
            event.team_side,
            event.message,
            event.ref_player_id,
        ])?;
    }
    Ok(())
}

pub fn begin_run(conn: &Connection, games_total: usize) -> Result<i64, IngestError> {
    conn.execute(
        "INSERT INTO ingest_runs (started_at, finished_at, games_total, games_succeeded, games_failed, errors_json)
         VALUES (?1, NULL, ?2, 0, 0, '[]')",
        params![Utc::now().to_rfc3339(), games_total as i64],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn finish_run(
    conn: &Connection,
    run_id: i64,
    succeeded: usize,
    failed: usize,
    errors: &[String],
) -> Result<(), IngestError> {
    let errors_json = serde_json::to_string(errors).unwrap_or_else(|_| "[]".to_string());
    conn.execute(
        "UPDATE ingest_runs
         SET finished_at = ?1, games_succeeded = ?2, games_failed = ?3, errors_json = ?4
         WHERE run_id = ?5",
        params![
            Utc::now().to_rfc3339(),
            succeeded as i64,
            failed as i64,
            errors_json,
            run_id
        ],
    )?;
    Ok(())
}
