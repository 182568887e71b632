use std::collections::HashMap;

use chrono::{DateTime, Datelike};

use crate::document::{GameDocument, RosterOfficial, RosterPlayer};
use crate::error::IngestError;
use crate::model::{
    EventRow, ExtractionResult, Hall, JerseyMap, League, MatchHeader, Player, RosterStatEntry,
    Team, TeamSide,
};
use crate::player_ref::resolve_player_ref;
use crate::score::{derive_result, parse_score};

/// First name the feed uses for unnamed roster entries.
pub const PLACEHOLDER_FIRST_NAME: &str = "N.N.";
/// Season token when no usable start timestamp exists; the upstream data
/// uses the German word, and the reporting layer expects it.
pub const UNKNOWN_SEASON: &str = "Unbekannt";
pub const TWO_MINUTE_PENALTY_TYPE: &str = "TwoMinutePenalty";

const DEFAULT_MATCH_MINUTE: &str = "00:00";
const DEFAULT_EVENT_TYPE: &str = "Unknown";

/// Normalize one parsed game document into the entity bundle the batch
/// buffers collect. `game_id` is the external id the document was fetched
/// under and only feeds diagnostics; identities come from the document.
pub fn extract_game(doc: &GameDocument, game_id: &str) -> Result<ExtractionResult, IngestError> {
    let data = doc
        .data
        .as_ref()
        .ok_or_else(|| IngestError::missing_data(game_id, "data section"))?;
    let summary = data
        .summary
        .as_ref()
        .ok_or_else(|| IngestError::missing_data(game_id, "summary section"))?;
    let match_id = summary
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| IngestError::missing_data(game_id, "summary id"))?;

    let mut league = None;
    let mut league_id_for_match = None;
    if let Some(tournament) = &summary.tournament {
        // The round start wins over the tournament start when a round is
        // present, even if its timestamp is absent.
        let season_ts = match &summary.round {
            Some(round) => round.starts_at,
            None => tournament.starts_at,
        };
        let season = season_from_timestamp_ms(season_ts);
        let league_id = format!("{}_{}", tournament.id, season.replace('/', "_"));
        let mut display_name = tournament.name.clone();
        if season != UNKNOWN_SEASON
            && !display_name.contains(&season)
            && !contains_standalone_year(&display_name)
        {
            display_name = format!("{} ({season})", tournament.name);
        }
        league = Some(League {
            league_id: league_id.clone(),
            name: display_name,
            acronym: tournament.acronym.clone(),
            season,
            age_group: tournament.age_group.clone(),
            league_type: tournament.tournament_type.clone(),
        });
        league_id_for_match = Some(league_id);
    }

    let home_team_id = summary
        .home_team
        .as_ref()
        .and_then(|t| t.id.as_deref())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| IngestError::missing_data(game_id, "home team id"))?
        .to_string();
    let away_team_id = summary
        .away_team
        .as_ref()
        .and_then(|t| t.id.as_deref())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| IngestError::missing_data(game_id, "away team id"))?
        .to_string();

    let mut teams = Vec::new();
    for team_info in [&summary.home_team, &summary.away_team].into_iter().flatten() {
        if let Some(id) = &team_info.id {
            teams.push(Team {
                team_id: id.clone(),
                name: team_info.name.clone().unwrap_or_default(),
                acronym: team_info.acronym.clone(),
                logo_url: team_info.logo.clone(),
            });
        }
    }

    let hall = summary.field.as_ref().and_then(|field| {
        field.id.as_ref().map(|id| Hall {
            hall_id: id.clone(),
            name: field.name.clone().unwrap_or_default(),
            city: field.city.clone(),
            hall_number: field.field_number,
        })
    });

    let header = MatchHeader {
        match_id: match_id.to_string(),
        league_id: league_id_for_match,
        phase_id: summary.phase.as_ref().and_then(|p| p.id.clone()),
        hall_id: summary.field.as_ref().and_then(|f| f.id.clone()),
        game_number: summary.game_number,
        starts_at: summary.starts_at.unwrap_or(0) / 1000,
        home_team_id: home_team_id.clone(),
        away_team_id: away_team_id.clone(),
        status: summary.state.clone(),
        pdf_url: summary.pdf_url.clone(),
        referee_info: summary.referee_info.clone(),
    };

    let mut players = Vec::new();
    let mut roster_stats = Vec::new();
    let mut jersey_map = JerseyMap::new();
    if let Some(lineup) = &data.lineup {
        process_lineup_side(
            match_id,
            TeamSide::Home,
            &home_team_id,
            lineup.home.as_deref().unwrap_or_default(),
            lineup.home_officials.as_deref().unwrap_or_default(),
            &mut players,
            &mut roster_stats,
            &mut jersey_map,
        );
        process_lineup_side(
            match_id,
            TeamSide::Away,
            &away_team_id,
            lineup.away.as_deref().unwrap_or_default(),
            lineup.away_officials.as_deref().unwrap_or_default(),
            &mut players,
            &mut roster_stats,
            &mut jersey_map,
        );
    }

    let mut events = Vec::new();
    let mut two_minute_counts: HashMap<String, i64> = HashMap::new();
    for raw in data.events.as_deref().unwrap_or_default() {
        // Events without a source id cannot be keyed and are dropped.
        let Some(source_event_id) = raw.id else {
            continue;
        };
        let message = raw.message.clone().unwrap_or_default();
        let (score_home, score_away) = parse_score(raw.score.as_deref());
        let ref_player_id = resolve_player_ref(&message, raw.team.as_deref(), &jersey_map);
        let event_type = raw
            .kind
            .clone()
            .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string());

        if event_type == TWO_MINUTE_PENALTY_TYPE {
            if let Some(player_id) = &ref_player_id {
                *two_minute_counts.entry(player_id.clone()).or_insert(0) += 1;
            }
        }

        events.push(EventRow {
            source_event_id,
            match_id: match_id.to_string(),
            timestamp: raw.timestamp.unwrap_or(0) / 1000,
            match_minute: raw
                .time
                .clone()
                .unwrap_or_else(|| DEFAULT_MATCH_MINUTE.to_string()),
            event_type,
            score_home,
            score_away,
            team_side: raw.team.clone(),
            message,
            ref_player_id,
        });
    }

    // The roster section never reports two-minute penalties; they only
    // exist as events.
    for entry in &mut roster_stats {
        entry.two_minute_penalties = two_minute_counts
            .get(&entry.player_id)
            .copied()
            .unwrap_or(0);
    }

    let extra_states = summary.extra_states.as_deref().unwrap_or_default();
    let result = derive_result(
        match_id,
        &events,
        summary.home_goals,
        summary.away_goals,
        extra_states,
    );

    Ok(ExtractionResult {
        match_id: match_id.to_string(),
        league,
        teams,
        hall,
        players,
        header,
        result,
        roster_stats,
        events,
    })
}

#[allow(clippy::too_many_arguments)]
fn process_lineup_side(
    match_id: &str,
    side: TeamSide,
    team_id: &str,
    players_raw: &[RosterPlayer],
    officials_raw: &[RosterOfficial],
    players: &mut Vec<Player>,
    roster_stats: &mut Vec<RosterStatEntry>,
    jersey_map: &mut JerseyMap,
) {
    for player in players_raw {
        let Some(id) = player.id.as_deref() else {
            continue;
        };
        let is_placeholder = player
            .firstname
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case(PLACEHOLDER_FIRST_NAME));
        players.push(Player {
            player_id: id.to_string(),
            first_name: player.firstname.clone(),
            last_name: player.lastname.clone(),
            is_placeholder,
            is_official: false,
        });
        roster_stats.push(RosterStatEntry {
            match_id: match_id.to_string(),
            player_id: id.to_string(),
            team_id: team_id.to_string(),
            jersey_number: player.number,
            goals: player.goals.unwrap_or(0),
            seven_meter_goals: player.penalty_goals.unwrap_or(0),
            seven_meter_missed: player.penalty_missed.unwrap_or(0),
            yellow_cards: player.yellow_cards.unwrap_or(0),
            red_cards: player.red_cards.unwrap_or(0),
            blue_cards: player.blue_cards.unwrap_or(0),
            // Filled in after the event walk.
            two_minute_penalties: 0,
        });
        if let Some(number) = player.number {
            jersey_map.insert((side, number), id.to_string());
        }
    }

    // Officials are registered as players but carry no roster stats.
    for official in officials_raw {
        let Some(id) = official.id.as_deref() else {
            continue;
        };
        players.push(Player {
            player_id: id.to_string(),
            first_name: official.firstname.clone(),
            last_name: official.lastname.clone(),
            is_placeholder: false,
            is_official: true,
        });
    }
}

/// Season string for an epoch-millisecond timestamp; July starts the new
/// season year.
pub fn season_from_timestamp_ms(timestamp_ms: Option<i64>) -> String {
    let Some(ms) = timestamp_ms else {
        return UNKNOWN_SEASON.to_string();
    };
    let Some(dt) = DateTime::from_timestamp_millis(ms) else {
        return UNKNOWN_SEASON.to_string();
    };
    let year = dt.year();
    if dt.month() >= 7 {
        format!("{year}/{}", year + 1)
    } else {
        format!("{}/{year}", year - 1)
    }
}

/// True when the name carries a standalone 4-digit year, in which case the
/// display name is left unannotated.
fn contains_standalone_year(name: &str) -> bool {
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let boundary_before = start == 0 || !is_word_byte(bytes[start - 1]);
            let boundary_after = i == bytes.len() || !is_word_byte(bytes[i]);
            if i - start == 4 && boundary_before && boundary_after {
                return true;
            }
        } else {
            i += 1;
        }
    }
    false
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::{contains_standalone_year, season_from_timestamp_ms, UNKNOWN_SEASON};

    #[test]
    fn season_rolls_over_in_july() {
        // 2024-09-14T10:00:00Z
        assert_eq!(season_from_timestamp_ms(Some(1726308000000)), "2024/2025");
        // 2025-02-01T18:00:00Z belongs to the season opened in 2024.
        assert_eq!(season_from_timestamp_ms(Some(1738432800000)), "2024/2025");
        assert_eq!(season_from_timestamp_ms(None), UNKNOWN_SEASON);
    }

    #[test]
    fn standalone_year_detection() {
        assert!(contains_standalone_year("Kreisliga 2024"));
        assert!(contains_standalone_year("Kreisliga 2024/2025"));
        assert!(!contains_standalone_year("Kreisliga 20245"));
        assert!(!contains_standalone_year("Staffel A2024"));
        assert!(!contains_standalone_year("Kreisliga"));
    }
}
