use std::collections::HashSet;

use crate::model::{
    EventRow, ExtractionResult, Hall, League, MatchHeader, MatchResult, Player, RosterStatEntry,
    Team,
};

/// Buffers for one open batch of extracted games. Reference entities are
/// deduplicated structurally; per-match children keep their order. This is
/// a passive container: the orchestrator decides when to flush and always
/// clears it afterwards, committed or not.
#[derive(Debug, Default)]
pub struct GameBatch {
    pub leagues: HashSet<League>,
    pub teams: HashSet<Team>,
    pub halls: HashSet<Hall>,
    pub players: HashSet<Player>,
    pub headers: Vec<MatchHeader>,
    pub results: Vec<MatchResult>,
    pub roster_stats: Vec<RosterStatEntry>,
    pub events: Vec<EventRow>,
    pub game_ids: Vec<String>,
}

impl GameBatch {
    pub fn push(&mut self, extracted: ExtractionResult) {
        if let Some(league) = extracted.league {
            self.leagues.insert(league);
        }
        self.teams.extend(extracted.teams);
        if let Some(hall) = extracted.hall {
            self.halls.insert(hall);
        }
        self.players.extend(extracted.players);
        self.headers.push(extracted.header);
        self.results.push(extracted.result);
        self.roster_stats.extend(extracted.roster_stats);
        self.events.extend(extracted.events);
        self.game_ids.push(extracted.match_id);
    }

    /// Number of games currently buffered.
    pub fn len(&self) -> usize {
        self.game_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.game_ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.leagues.clear();
        self.teams.clear();
        self.halls.clear();
        self.players.clear();
        self.headers.clear();
        self.results.clear();
        self.roster_stats.clear();
        self.events.clear();
        self.game_ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::GameBatch;
    use crate::model::Team;

    #[test]
    fn identical_teams_collapse_differing_ones_do_not() {
        let mut batch = GameBatch::default();
        let team = Team {
            team_id: "t1".to_string(),
            name: "TV Musterstadt".to_string(),
            acronym: None,
            logo_url: None,
        };
        batch.teams.extend([team.clone(), team.clone()]);
        assert_eq!(batch.teams.len(), 1);

        let renamed = Team {
            name: "TV Musterstadt II".to_string(),
            ..team
        };
        batch.teams.insert(renamed);
        assert_eq!(batch.teams.len(), 2);
    }
}
