//! Plain-text rendering of the store's derived views.

use holdem_sync::{Card, GameStore};
use std::fmt::Write;

const WIDTH: usize = 72;

/// Format cards separated by spaces, `--` when there are none.
pub fn format_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "--".to_string();
    }
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the active table.
pub fn render_table(store: &GameStore) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", "═".repeat(WIDTH));
    match store.session_id() {
        Some(id) => {
            let _ = writeln!(out, "GAME {}  [{}]", id, store.phase());
        }
        None => {
            let _ = writeln!(out, "NO ACTIVE GAME  [{}]", store.phase());
        }
    }
    let _ = writeln!(
        out,
        "Connection: {}",
        if store.is_connected() {
            "online"
        } else {
            "offline"
        }
    );
    let _ = writeln!(out, "{}", "═".repeat(WIDTH));

    let _ = writeln!(out, "Board: {}", format_cards(store.community_cards()));
    let _ = writeln!(out, "Pot: ${}", store.pot());
    let _ = writeln!(out, "{}", "─".repeat(WIDTH));

    if store.players().is_empty() {
        let _ = writeln!(out, "No players at table");
    } else {
        let _ = writeln!(out, "Players:");
        for player in store.players() {
            let mut markers = Vec::new();
            if player.is_active == Some(false) {
                markers.push("folded");
            }
            if player.is_all_in == Some(true) {
                markers.push("all-in");
            }
            let marker_str = if markers.is_empty() {
                String::new()
            } else {
                format!(" ({})", markers.join("/"))
            };

            // Service-revealed cards win over the locally dealt ones
            let cards = player
                .hole_cards
                .as_deref()
                .or_else(|| store.player_cards(player.player_id))
                .map(format_cards)
                .unwrap_or_else(|| "??".to_string());

            let _ = writeln!(
                out,
                "  #{}{} - ${} - bet ${} - {}",
                player.player_id,
                marker_str,
                player.chips.unwrap_or(0.0),
                player.current_bet.unwrap_or(0.0),
                cards
            );
        }
    }

    let _ = write!(out, "{}", "═".repeat(WIDTH));
    out
}

/// Render the event log, newest first.
pub fn render_log(store: &GameStore) -> String {
    if store.logs().is_empty() {
        return "(log is empty)".to_string();
    }
    store.logs().iter().collect::<Vec<_>>().join("\n")
}
