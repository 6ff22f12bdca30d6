//! Move history normalization.
//!
//! The service has been seen to emit history entries in two shapes:
//!
//! ```text
//! (a) { "left": "<player>", "right": { "row": 2, "column": 3, "card": {…} } }
//!     { "key":  "<player>", "value": { … } }
//! (b) { "<player>": { "row": 2, "column": 3, "card": {…} } }
//! ```
//!
//! An entry with exactly one key outside the reserved shape-(a) names is read
//! as shape (b); anything else falls back to the shape-(a) fields. Both
//! shapes stay supported so a backend fix cannot silently break either.

use serde_json::{Map, Value};

use crate::protocol::{MoveAction, PlayerUuid};

/// Field names used by shape (a).
const RESERVED_KEYS: [&str; 4] = ["left", "right", "key", "value"];

/// One history entry after shape detection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedMove {
    pub player_uuid: Option<PlayerUuid>,
    pub action: Option<MoveAction>,
}

impl NormalizedMove {
    /// Neither a player nor a move could be recovered.
    pub fn is_empty(&self) -> bool {
        self.player_uuid.is_none() && self.action.is_none()
    }
}

/// A history entry ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    /// 1-based, with the most recent move numbered highest.
    pub number: usize,
    pub player_uuid: Option<PlayerUuid>,
    pub action: Option<MoveAction>,
}

/// Normalize a single raw entry. Non-objects normalize to an empty move.
pub fn normalize_entry(entry: &Value) -> NormalizedMove {
    let Some(fields) = entry.as_object() else {
        return NormalizedMove::default();
    };

    if let Some((player, payload)) = single_dynamic_entry(fields) {
        return NormalizedMove {
            player_uuid: Some(player.clone()),
            action: parse_action(payload),
        };
    }

    let player_uuid = ["left", "key"]
        .iter()
        .find_map(|name| fields.get(*name).and_then(Value::as_str))
        .map(str::to_string);
    let action = ["right", "value"]
        .iter()
        .find_map(|name| fields.get(*name).and_then(parse_action));
    NormalizedMove {
        player_uuid,
        action,
    }
}

/// Normalize and number a raw history, most recent first.
///
/// Entries yielding neither a player nor a move are dropped before
/// numbering.
pub fn normalize_history(entries: &[Value]) -> Vec<HistoryItem> {
    let moves: Vec<NormalizedMove> = entries
        .iter()
        .map(normalize_entry)
        .filter(|normalized| !normalized.is_empty())
        .collect();
    let total = moves.len();
    moves
        .into_iter()
        .rev()
        .enumerate()
        .map(|(offset, normalized)| HistoryItem {
            number: total - offset,
            player_uuid: normalized.player_uuid,
            action: normalized.action,
        })
        .collect()
}

fn single_dynamic_entry(fields: &Map<String, Value>) -> Option<(&String, &Value)> {
    let mut dynamic = fields
        .iter()
        .filter(|(name, _)| !RESERVED_KEYS.contains(&name.as_str()));
    let first = dynamic.next()?;
    if dynamic.next().is_some() {
        tracing::debug!(
            keys = fields.len(),
            "history entry has several unreserved keys, reading named fields"
        );
        return None;
    }
    Some(first)
}

fn parse_action(payload: &Value) -> Option<MoveAction> {
    if payload.is_null() {
        return None;
    }
    match serde_json::from_value::<MoveAction>(payload.clone()) {
        Ok(action) => Some(action),
        Err(e) => {
            tracing::debug!("unreadable move payload in history: {e}");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::card::{Card, Suit};
    use serde_json::json;

    fn expected() -> NormalizedMove {
        NormalizedMove {
            player_uuid: Some("p1".into()),
            action: Some(MoveAction {
                row: 2,
                column: 3,
                card: Some(Card::new(Suit::Hearts, 5)),
            }),
        }
    }

    #[test]
    fn single_key_shape() {
        let entry = json!({"p1": {"row": 2, "column": 3, "card": {"suit": "HEARTS", "value": 5}}});
        assert_eq!(normalize_entry(&entry), expected());
    }

    #[test]
    fn left_right_shape() {
        let entry = json!({"left": "p1", "right": {"row": 2, "column": 3, "card": {"suit": "HEARTS", "value": 5}}});
        assert_eq!(normalize_entry(&entry), expected());
    }

    #[test]
    fn key_value_shape() {
        let entry = json!({"key": "p1", "value": {"row": 2, "column": 3, "card": {"suit": "HEARTS", "value": 5}}});
        assert_eq!(normalize_entry(&entry), expected());
    }

    #[test]
    fn single_key_shape_wins_over_named_fields() {
        let entry = json!({"left": "other", "p1": {"row": 2, "column": 3, "card": {"suit": "HEARTS", "value": 5}}});
        assert_eq!(normalize_entry(&entry), expected());
    }

    #[test]
    fn several_unreserved_keys_fall_back_to_named_fields() {
        let entry = json!({"left": "p1", "right": {"row": 1, "column": 1}, "a": 1, "b": 2});
        let normalized = normalize_entry(&entry);
        assert_eq!(normalized.player_uuid.as_deref(), Some("p1"));
        assert_eq!(normalized.action.unwrap().row, 1);
    }

    #[test]
    fn unreadable_payload_keeps_player() {
        let entry = json!({"p9": "garbage"});
        let normalized = normalize_entry(&entry);
        assert_eq!(normalized.player_uuid.as_deref(), Some("p9"));
        assert!(normalized.action.is_none());
    }

    #[test]
    fn history_is_reversed_and_numbered() {
        let entries = vec![
            json!({"p1": {"row": 0, "column": 0}}),
            json!({}),
            json!(null),
            json!({"left": "p2", "right": {"row": 1, "column": 1}}),
            json!({"p1": {"row": 2, "column": 2}}),
        ];
        let items = normalize_history(&entries);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].number, 3);
        assert_eq!(items[0].action.as_ref().unwrap().row, 2);
        assert_eq!(items[1].player_uuid.as_deref(), Some("p2"));
        assert_eq!(items[2].number, 1);
        assert_eq!(items[2].action.as_ref().unwrap().row, 0);
    }

    #[test]
    fn empty_history() {
        assert!(normalize_history(&[]).is_empty());
    }
}
