use serde_json::Value;

use crate::domain::cheat::{park_pending, CheatAttempt, CheatEffect, CheatJudgment, CheatLogEntry};
use crate::domain::player_view::game_view;
use crate::domain::state::{GameRole, SocialClass};
use crate::domain::test_state_helpers::{cards, night_state, pid, player};
use crate::domain::GameState;

fn table() -> GameState {
    let mut state = night_state(vec![
        player("a", SocialClass::Lower, &["3C", "4C"]),
        player("b", SocialClass::Upper, &["9H", "TH"]),
        player("c", SocialClass::Middle, &["5D", "6D"]),
    ]);
    state.players[2].role = GameRole::Detective;
    state
}

fn logged(judgment: CheatJudgment) -> CheatLogEntry {
    CheatLogEntry {
        attacker: pid("a"),
        target: pid("b"),
        method: "swap".into(),
        defense: String::new(),
        judgment,
        effect: CheatEffect::NoEffect,
        defender_penalty: None,
        narrative: "shadows".into(),
        day: 1,
    }
}

#[test]
fn viewer_sees_only_their_own_secrets() {
    let state = table();
    let view = game_view(&state, Some(&pid("a")), false);

    let me = &view.players[0];
    assert_eq!(me.hand, Some(cards(&["3C", "4C"])));
    assert_eq!(me.class, Some(SocialClass::Lower));
    assert!(me.win_condition.is_some());

    let other = &view.players[2];
    assert_eq!(other.hand, None);
    assert_eq!(other.class, None);
    assert_eq!(other.role, None);
    assert_eq!(other.hand_count, 2);
}

#[test]
fn hidden_fields_serialize_as_null() {
    let state = table();
    let json = serde_json::to_value(game_view(&state, Some(&pid("a")), false)).unwrap();
    let other = &json["players"][1];
    for field in ["hand", "class", "role", "win_condition", "hidden_condition", "backstory"] {
        assert_eq!(other.get(field), Some(&Value::Null), "{field} must be present");
    }
}

#[test]
fn eliminated_players_are_open_books() {
    let mut state = table();
    state.players[1].eliminated = true;
    let view = game_view(&state, Some(&pid("a")), false);
    assert_eq!(view.players[1].hand, Some(cards(&["9H", "TH"])));
    assert_eq!(view.players[1].class, Some(SocialClass::Upper));
    assert_eq!(view.players[1].role, None);
}

#[test]
fn forced_reveal_shows_the_hand_only() {
    let mut state = table();
    state.players[1].hand_revealed = true;
    let view = game_view(&state, Some(&pid("a")), false);
    assert_eq!(view.players[1].hand, Some(cards(&["9H", "TH"])));
    assert_eq!(view.players[1].class, None);
}

#[test]
fn reveal_all_opens_everything() {
    let state = table();
    let view = game_view(&state, None, true);
    assert!(view.players.iter().all(|p| p.hand.is_some() && p.role.is_some()));
    assert_eq!(view.players[2].role, Some(GameRole::Detective));
}

#[test]
fn cheat_attacker_is_hidden_until_exposed() {
    let mut state = table();
    state.cheat_log.push(logged(CheatJudgment::Draw));
    state.cheat_log.push(logged(CheatJudgment::BigFail));

    let victim = game_view(&state, Some(&pid("b")), false);
    assert_eq!(victim.cheat_log[0].attacker, None);
    assert_eq!(victim.cheat_log[1].attacker, Some(pid("a")));

    let culprit = game_view(&state, Some(&pid("a")), false);
    assert_eq!(culprit.cheat_log[0].attacker, Some(pid("a")));
}

#[test]
fn pending_warning_goes_to_the_defender_only() {
    let mut state = table();
    let attempt = CheatAttempt {
        attacker: pid("a"),
        target: pid("b"),
        method: "marked cards".into(),
    };
    park_pending(&mut state, attempt, "A chill runs down your spine.").unwrap();

    let defender = game_view(&state, Some(&pid("b")), false);
    assert_eq!(
        defender.pending_cheat.map(|p| p.warning),
        Some("A chill runs down your spine.".to_owned())
    );
    assert!(game_view(&state, Some(&pid("c")), false).pending_cheat.is_none());
}

#[test]
fn legal_plays_only_on_the_viewers_turn() {
    let state = table();
    let mine = game_view(&state, Some(&pid("a")), false);
    assert_eq!(
        mine.legal_plays,
        Some(vec![cards(&["3C"]), cards(&["4C"])])
    );
    assert!(game_view(&state, Some(&pid("b")), false).legal_plays.is_none());
    assert!(game_view(&state, None, false).legal_plays.is_none());
}
