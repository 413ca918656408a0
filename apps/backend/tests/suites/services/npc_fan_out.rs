//! Concurrent oracle fan-out, serial application, per-game locking.

use std::sync::atomic::Ordering;
use std::time::Duration;

use daifugo_backend::domain::facts::Claim;
use daifugo_backend::domain::state::{GameRole, SocialClass};
use daifugo_backend::AppError;

use crate::support::game_setup::{build_service, load, pid, rigged_game, seats, test_settings};
use crate::support::scripted_oracle::ScriptedOracle;

use SocialClass::{Lower, Middle, Upper};

#[tokio::test]
async fn test_speech_requests_overlap_but_lines_keep_seat_order() -> Result<(), AppError> {
    let oracle = ScriptedOracle {
        delay: Some(Duration::from_millis(50)),
        ..ScriptedOracle::default()
    };
    let (service, oracle) = build_service(oracle, test_settings());
    let id = rigged_game(
        &service,
        &seats(6, None),
        &[Upper, Lower, Lower, Middle, Middle, Middle],
    )
    .await;

    let result = service.run_discussion(id).await?;
    assert_eq!(result.outcome, 6);
    assert!(oracle.max_in_flight.load(Ordering::SeqCst) > 1);

    let speakers: Vec<_> = result
        .state
        .chat
        .iter()
        .filter_map(|line| line.speaker.clone())
        .collect();
    let expected: Vec<_> = (0..6).map(|i| pid(&format!("p{i}"))).collect();
    assert_eq!(speakers, expected);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_calls_on_one_game_do_not_lose_writes() -> Result<(), AppError> {
    let oracle = ScriptedOracle {
        delay: Some(Duration::from_millis(30)),
        ..ScriptedOracle::default()
    };
    let (service, _) = build_service(oracle, test_settings());
    let id = rigged_game(&service, &seats(4, Some(0)), &[Middle, Upper, Lower, Middle]).await;

    let (p0, p1) = (pid("p0"), pid("p1"));
    let (chat, claim) = tokio::join!(
        service.post_chat(id, &p0, "first"),
        service.declare_claim(id, &p1, Claim::Role(GameRole::Detective)),
    );
    chat?;
    claim?;

    let state = load(&service, id).await;
    assert!(state.chat.iter().any(|line| line.text == "first"));
    assert_eq!(state.chat.len(), 4);
    assert_eq!(
        service.logic_state(id).await?.detective_claimants,
        vec![pid("p1")]
    );
    Ok(())
}

#[tokio::test]
async fn test_separate_games_progress_independently() -> Result<(), AppError> {
    let (service, _) = build_service(ScriptedOracle::default(), test_settings());
    let a = rigged_game(&service, &seats(3, None), &[Upper, Lower, Middle]).await;
    let b = rigged_game(&service, &seats(3, None), &[Upper, Lower, Middle]).await;
    assert_ne!(a, b);

    let (first, second) = tokio::join!(service.end_day(a), service.end_day(b));
    assert_eq!(first?.state.game_id, a);
    assert_eq!(second?.state.game_id, b);
    assert_eq!(service.game_ids().await?.len(), 2);
    Ok(())
}
