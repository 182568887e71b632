use std::collections::HashMap;

/// Side of a match, spelled the way the feed spells it in event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn from_feed(raw: &str) -> Option<Self> {
        match raw {
            "Home" => Some(TeamSide::Home),
            "Away" => Some(TeamSide::Away),
            _ => None,
        }
    }
}

/// Per-match lookup from (side, jersey number) to player id, built during
/// roster processing and consulted when resolving free-text event messages.
pub type JerseyMap = HashMap<(TeamSide, i64), String>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct League {
    pub league_id: String,
    pub name: String,
    pub acronym: Option<String>,
    pub season: String,
    pub age_group: Option<String>,
    pub league_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Team {
    pub team_id: String,
    pub name: String,
    pub acronym: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hall {
    pub hall_id: String,
    pub name: String,
    pub city: Option<String>,
    pub hall_number: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Player {
    pub player_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_placeholder: bool,
    pub is_official: bool,
}

/// Match attributes known before the game concludes. Upserted as a whole;
/// result columns live in [`MatchResult`] and are written separately.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchHeader {
    pub match_id: String,
    pub league_id: Option<String>,
    pub phase_id: Option<String>,
    pub hall_id: Option<String>,
    pub game_number: Option<i64>,
    pub starts_at: i64,
    pub home_team_id: String,
    pub away_team_id: String,
    pub status: Option<String>,
    pub pdf_url: Option<String>,
    pub referee_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub match_id: String,
    pub home_goals: i64,
    pub away_goals: i64,
    pub home_goals_half: Option<i64>,
    pub away_goals_half: Option<i64>,
    pub home_points: Option<i64>,
    pub away_points: Option<i64>,
}

/// Per-match, per-player aggregate counters. Replaced wholesale whenever
/// the match is re-ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterStatEntry {
    pub match_id: String,
    pub player_id: String,
    pub team_id: String,
    pub jersey_number: Option<i64>,
    pub goals: i64,
    pub seven_meter_goals: i64,
    pub seven_meter_missed: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
    pub blue_cards: i64,
    pub two_minute_penalties: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub source_event_id: i64,
    pub match_id: String,
    pub timestamp: i64,
    pub match_minute: String,
    pub event_type: String,
    pub score_home: Option<i64>,
    pub score_away: Option<i64>,
    pub team_side: Option<String>,
    pub message: String,
    pub ref_player_id: Option<String>,
}

/// Everything one game document normalizes into.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub match_id: String,
    pub league: Option<League>,
    pub teams: Vec<Team>,
    pub hall: Option<Hall>,
    pub players: Vec<Player>,
    pub header: MatchHeader,
    pub result: MatchResult,
    pub roster_stats: Vec<RosterStatEntry>,
    pub events: Vec<EventRow>,
}
