use crate::model::{EventRow, MatchResult};

// Sentinel messages the feed emits verbatim for running-score milestones.
pub const HALF_TIME_MESSAGE: &str = "Spielstand 1. Halbzeit";
pub const FULL_TIME_MESSAGE: &str = "Spielstand 2. Halbzeit";
pub const GAME_CLOSED_MESSAGE: &str = "Spielabschluss mit Pins Heim/Gast/SRA/SRB";

// Extra-state flags marking an administrative forfeit.
pub const WALKOVER_HOME_STATE: &str = "WoHome";
pub const WALKOVER_AWAY_STATE: &str = "WoAway";

/// Parse a running score of the form `"<home>:<away>"`. Anything else
/// yields (None, None).
pub fn parse_score(raw: Option<&str>) -> (Option<i64>, Option<i64>) {
    let Some(raw) = raw else {
        return (None, None);
    };
    let Some((home, away)) = raw.split_once(':') else {
        return (None, None);
    };
    match (home.trim().parse(), away.trim().parse()) {
        (Ok(h), Ok(a)) => (Some(h), Some(a)),
        _ => (None, None),
    }
}

/// Recover half-time/final scores from the chronological event list and
/// derive official points. Walkover flags override everything the events
/// say; otherwise the final score falls back to the summary goal totals
/// and, last, to zero. Half-time has no fallback beyond null.
pub fn derive_result(
    match_id: &str,
    events: &[EventRow],
    summary_home_goals: Option<i64>,
    summary_away_goals: Option<i64>,
    extra_states: &[String],
) -> MatchResult {
    let mut final_score = (None, None);
    let mut half_time_score = (None, None);

    for event in events {
        match event.message.as_str() {
            HALF_TIME_MESSAGE => {
                if let (Some(h), Some(a)) = (event.score_home, event.score_away) {
                    half_time_score = (Some(h), Some(a));
                }
            }
            FULL_TIME_MESSAGE | GAME_CLOSED_MESSAGE => {
                if let (Some(h), Some(a)) = (event.score_home, event.score_away) {
                    final_score = (Some(h), Some(a));
                }
            }
            _ => {}
        }
    }

    let event_home = final_score.0.or(summary_home_goals);
    let event_away = final_score.1.or(summary_away_goals);

    let walkover_home = extra_states.iter().any(|s| s == WALKOVER_HOME_STATE);
    let walkover_away = extra_states.iter().any(|s| s == WALKOVER_AWAY_STATE);

    let (home_goals, away_goals, half, home_points, away_points) = if walkover_home {
        (Some(0), Some(0), (None, None), Some(0), Some(2))
    } else if walkover_away {
        (Some(0), Some(0), (None, None), Some(2), Some(0))
    } else {
        let (home_points, away_points) = match (event_home, event_away) {
            (Some(h), Some(a)) if h > a => (Some(2), Some(0)),
            (Some(h), Some(a)) if h < a => (Some(0), Some(2)),
            (Some(_), Some(_)) => (Some(1), Some(1)),
            _ => (None, None),
        };
        (event_home, event_away, half_time_score, home_points, away_points)
    };

    MatchResult {
        match_id: match_id.to_string(),
        home_goals: home_goals.unwrap_or(0),
        away_goals: away_goals.unwrap_or(0),
        home_goals_half: half.0,
        away_goals_half: half.1,
        home_points,
        away_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_event(message: &str, score: Option<&str>) -> EventRow {
        let (score_home, score_away) = parse_score(score);
        EventRow {
            source_event_id: 1,
            match_id: "m1".to_string(),
            timestamp: 0,
            match_minute: "30:00".to_string(),
            event_type: "Info".to_string(),
            score_home,
            score_away,
            team_side: None,
            message: message.to_string(),
            ref_player_id: None,
        }
    }

    #[test]
    fn parse_score_works() {
        assert_eq!(parse_score(Some("12:10")), (Some(12), Some(10)));
        assert_eq!(parse_score(Some("0:0")), (Some(0), Some(0)));
        assert_eq!(parse_score(Some("ab")), (None, None));
        assert_eq!(parse_score(Some("1:2:3")), (None, None));
        assert_eq!(parse_score(None), (None, None));
    }

    #[test]
    fn final_score_comes_from_closing_sentinel() {
        let events = vec![
            score_event(HALF_TIME_MESSAGE, Some("13:11")),
            score_event(FULL_TIME_MESSAGE, Some("24:22")),
        ];
        let result = derive_result("m1", &events, Some(20), Some(20), &[]);
        assert_eq!((result.home_goals, result.away_goals), (24, 22));
        assert_eq!(
            (result.home_goals_half, result.away_goals_half),
            (Some(13), Some(11))
        );
        assert_eq!((result.home_points, result.away_points), (Some(2), Some(0)));
    }

    #[test]
    fn summary_totals_fill_in_when_events_are_silent() {
        let result = derive_result("m1", &[], Some(25), Some(20), &[]);
        assert_eq!((result.home_goals, result.away_goals), (25, 20));
        assert_eq!((result.home_goals_half, result.away_goals_half), (None, None));
        assert_eq!((result.home_points, result.away_points), (Some(2), Some(0)));
    }

    #[test]
    fn equal_scores_split_the_points() {
        let result = derive_result("m1", &[], Some(21), Some(21), &[]);
        assert_eq!((result.home_points, result.away_points), (Some(1), Some(1)));
    }

    #[test]
    fn walkover_overrides_any_played_score() {
        let events = vec![score_event(FULL_TIME_MESSAGE, Some("24:22"))];
        let walkover = vec![WALKOVER_HOME_STATE.to_string()];
        let result = derive_result("m1", &events, Some(24), Some(22), &walkover);
        assert_eq!((result.home_goals, result.away_goals), (0, 0));
        assert_eq!((result.home_goals_half, result.away_goals_half), (None, None));
        assert_eq!((result.home_points, result.away_points), (Some(0), Some(2)));

        let walkover = vec![WALKOVER_AWAY_STATE.to_string()];
        let result = derive_result("m1", &events, Some(24), Some(22), &walkover);
        assert_eq!((result.home_points, result.away_points), (Some(2), Some(0)));
    }

    #[test]
    fn missing_totals_default_goals_to_zero_and_leave_points_unset() {
        let result = derive_result("m1", &[], None, None, &[]);
        assert_eq!((result.home_goals, result.away_goals), (0, 0));
        assert_eq!((result.home_points, result.away_points), (None, None));
    }
}
