use serde::Deserialize;

/// Typed shape of one combined game document as published by the feed.
/// Validation happens once, here; everything downstream works on typed
/// values. Leaf fields are optional unless a missing value makes the
/// containing object meaningless.
#[derive(Debug, Clone, Deserialize)]
pub struct GameDocument {
    #[serde(default)]
    pub data: Option<GameData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameData {
    #[serde(default)]
    pub summary: Option<GameSummary>,
    #[serde(default)]
    pub lineup: Option<Lineup>,
    #[serde(default)]
    pub events: Option<Vec<RawEvent>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub tournament: Option<TournamentInfo>,
    #[serde(default)]
    pub round: Option<RoundInfo>,
    #[serde(default)]
    pub phase: Option<PhaseInfo>,
    #[serde(default, rename = "homeTeam")]
    pub home_team: Option<TeamInfo>,
    #[serde(default, rename = "awayTeam")]
    pub away_team: Option<TeamInfo>,
    #[serde(default)]
    pub field: Option<FieldInfo>,
    #[serde(default, rename = "gameNumber")]
    pub game_number: Option<i64>,
    #[serde(default, rename = "startsAt")]
    pub starts_at: Option<i64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, rename = "pdfUrl")]
    pub pdf_url: Option<String>,
    #[serde(default, rename = "refereeInfo")]
    pub referee_info: Option<String>,
    #[serde(default, rename = "homeGoals")]
    pub home_goals: Option<i64>,
    #[serde(default, rename = "awayGoals")]
    pub away_goals: Option<i64>,
    #[serde(default, rename = "extraStates")]
    pub extra_states: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TournamentInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub acronym: Option<String>,
    #[serde(default, rename = "ageGroup")]
    pub age_group: Option<String>,
    #[serde(default, rename = "tournamentType")]
    pub tournament_type: Option<String>,
    #[serde(default, rename = "startsAt")]
    pub starts_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoundInfo {
    #[serde(default, rename = "startsAt")]
    pub starts_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhaseInfo {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub acronym: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, rename = "fieldNumber")]
    pub field_number: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Lineup {
    #[serde(default)]
    pub home: Option<Vec<RosterPlayer>>,
    #[serde(default)]
    pub away: Option<Vec<RosterPlayer>>,
    #[serde(default, rename = "homeOfficials")]
    pub home_officials: Option<Vec<RosterOfficial>>,
    #[serde(default, rename = "awayOfficials")]
    pub away_officials: Option<Vec<RosterOfficial>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterPlayer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub number: Option<i64>,
    #[serde(default)]
    pub goals: Option<i64>,
    #[serde(default, rename = "penaltyGoals")]
    pub penalty_goals: Option<i64>,
    #[serde(default, rename = "penaltyMissed")]
    pub penalty_missed: Option<i64>,
    #[serde(default, rename = "yellowCards")]
    pub yellow_cards: Option<i64>,
    #[serde(default, rename = "redCards")]
    pub red_cards: Option<i64>,
    #[serde(default, rename = "blueCards")]
    pub blue_cards: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterOfficial {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

pub fn parse_game_document(raw: &str) -> Result<GameDocument, serde_json::Error> {
    serde_json::from_str(raw.trim())
}
