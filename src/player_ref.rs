use crate::model::{JerseyMap, TeamSide};

/// Trigger word preceding a jersey number in goal messages. Matching on
/// the bare word also covers the longer "Tor durch" form.
const REFERENCE_TRIGGER: &str = "durch";

/// Resolve the player a free-text event message refers to. Messages carry
/// jersey numbers, not player ids, so resolution goes through the
/// per-match jersey map. No extractable number or no mapping entry means
/// "no reference", never an error.
pub fn resolve_player_ref(
    message: &str,
    team_side: Option<&str>,
    jersey_map: &JerseyMap,
) -> Option<String> {
    let number = jersey_number_from_message(message)?;
    let side = TeamSide::from_feed(team_side?)?;
    jersey_map.get(&(side, number)).cloned()
}

/// Extract a jersey number from a message. Two recognized shapes, in
/// priority order: a parenthesized `(<number>.)`, then `durch <number>.`.
pub fn jersey_number_from_message(message: &str) -> Option<i64> {
    parenthesized_number(message).or_else(|| number_after_trigger(message))
}

fn parenthesized_number(message: &str) -> Option<i64> {
    let mut rest = message;
    while let Some(open) = rest.find('(') {
        let tail = &rest[open + 1..];
        let digits = leading_digits(tail);
        if !digits.is_empty() && tail[digits.len()..].starts_with(".)") {
            return digits.parse().ok();
        }
        rest = tail;
    }
    None
}

fn number_after_trigger(message: &str) -> Option<i64> {
    let mut rest = message;
    while let Some(pos) = rest.find(REFERENCE_TRIGGER) {
        let tail = &rest[pos + REFERENCE_TRIGGER.len()..];
        let after_ws = tail.trim_start();
        // The trigger must be followed by at least one whitespace char.
        if after_ws.len() < tail.len() {
            let digits = leading_digits(after_ws);
            if !digits.is_empty() && after_ws[digits.len()..].starts_with('.') {
                return digits.parse().ok();
            }
        }
        rest = tail;
    }
    None
}

fn leading_digits(s: &str) -> &str {
    let end = s
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(s.len());
    &s[..end]
}
