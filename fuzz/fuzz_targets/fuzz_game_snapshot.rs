#![no_main]

use libfuzzer_sys::fuzz_target;
use sequence_client::highlight::{is_dead_card, BoardView};
use sequence_client::history::normalize_history;
use sequence_client::protocol::GameResponse;
use sequence_client::snapshot::PlayerIdentity;
use sequence_client::TurnState;

fuzz_target!(|data: &[u8]| {
    // Raw history entries may take any JSON shape.
    if let Ok(entries) = serde_json::from_slice::<Vec<serde_json::Value>>(data) {
        let _ = normalize_history(&entries);
    }

    let Ok(game) = serde_json::from_slice::<GameResponse>(data) else {
        return;
    };
    let identity = PlayerIdentity::resolve(game.host.as_deref(), Some(&game));
    let turn = TurnState::classify(Some(&game), &identity);
    let board = BoardView::new(&game.board);
    for card in game.visible_hand(&identity) {
        let _ = board.decorate(Some(card), turn.player_colour);
        let _ = is_dead_card(card, &game.board);
    }
    let _ = normalize_history(&game.move_history);
    let _ = game.roster();
});
