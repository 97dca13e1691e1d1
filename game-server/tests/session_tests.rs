
use test_helpers::{TestServer, SECRET, TEST_WORDS, VALID_MISS};

use game_server::broadcast::Subscriber;
use game_server::rotation;
use game_types::MAX_TRIALS;

#[tokio::test]
async fn test_register_login_play_and_win() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(
        client.request("REGISTER ann pw1").await,
        "OK user registered successfully!"
    );
    assert_eq!(
        client.request("LOGIN ann pw1").await,
        "OK login successful, welcome!"
    );

    let response = client.request("PLAYWORDLE").await;
    assert!(response.starts_with("OK"), "{}", response);
    assert!(response.contains("12"), "{}", response);

    let response = client.request(&format!("SENDWORD {}", SECRET)).await;
    assert!(response.starts_with("OK ++++++++++"), "{}", response);

    let ann = server.state.store.get("ann").unwrap();
    assert_eq!(ann.matches_won, 1);
    assert_eq!(ann.matches_played, 1);
    assert_eq!(ann.remaining_trials, 11);
    assert!(ann.has_won_today);
}

#[tokio::test]
async fn test_register_twice_is_rejected() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert!(client.request("REGISTER ann pw1").await.starts_with("OK"));
    let response = client.request("REGISTER ann other").await;
    assert!(response.starts_with("NOTOK"), "{}", response);
    assert_eq!(server.state.store.get("ann").unwrap().password, "pw1");
}

#[tokio::test]
async fn test_login_failures_do_not_bind_a_player() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let response = client.request("LOGIN ghost pw").await;
    assert!(response.starts_with("NOTOK"), "{}", response);

    client.request("REGISTER ann pw1").await;
    let response = client.request("LOGIN ann wrong").await;
    assert!(response.starts_with("NOTOK"), "{}", response);

    // No player is bound, so playing is still refused.
    let response = client.request("PLAYWORDLE").await;
    assert!(response.starts_with("NOTOK"), "{}", response);
}

#[tokio::test]
async fn test_second_concurrent_login_is_rejected() {
    let server = TestServer::start().await;
    let mut first = server.connect().await;
    let mut second = server.connect().await;

    first.register_and_login("ann", "pw1").await;

    let response = second.request("LOGIN ann pw1").await;
    assert!(response.starts_with("NOTOK"), "{}", response);

    // After the first session logs out, the account is free again.
    assert!(first.request("LOGOUT").await.starts_with("OK"));
    assert!(second.request("LOGIN ann pw1").await.starts_with("OK"));
}

#[tokio::test]
async fn test_unknown_word_changes_nothing() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client.register_and_login("ann", "pw1").await;
    client.request("PLAYWORDLE").await;

    let response = client.request("SENDWORD zzzzzzzzzz").await;
    assert!(response.starts_with("NOTOK"), "{}", response);

    let ann = server.state.store.get("ann").unwrap();
    assert_eq!(ann.remaining_trials, MAX_TRIALS);
    assert_eq!(ann.matches_played, 0);
    assert!(ann.feedback.is_empty());
}

#[tokio::test]
async fn test_sendword_requires_being_in_game() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client.register_and_login("ann", "pw1").await;

    let response = client.request(&format!("SENDWORD {}", VALID_MISS)).await;
    assert!(response.starts_with("NOTOK"), "{}", response);
}

#[tokio::test]
async fn test_exhausting_trials_ends_the_round() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client.register_and_login("ann", "pw1").await;
    client.request("PLAYWORDLE").await;

    let mut last = String::new();
    for _ in 0..MAX_TRIALS {
        last = client.request(&format!("SENDWORD {}", VALID_MISS)).await;
        assert!(last.starts_with("OK"), "{}", last);
    }
    assert!(last.contains("no trials left"), "{}", last);

    let ann = server.state.store.get("ann").unwrap();
    assert_eq!(ann.remaining_trials, 0);
    assert_eq!(ann.last_streak, 0);
    assert!(!ann.last_match_won);

    // Back to LOGGED: a further guess is refused, and so is a new round.
    let response = client.request(&format!("SENDWORD {}", VALID_MISS)).await;
    assert!(response.starts_with("NOTOK"), "{}", response);
    let response = client.request("PLAYWORDLE").await;
    assert!(response.contains("no trials left"), "{}", response);
}

#[tokio::test]
async fn test_playwordle_refused_after_winning() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client.register_and_login("ann", "pw1").await;
    client.request("PLAYWORDLE").await;
    client.request(&format!("SENDWORD {}", SECRET)).await;

    let response = client.request("PLAYWORDLE").await;
    assert!(response.contains("already won"), "{}", response);
}

#[tokio::test]
async fn test_stats_payload_after_first_win() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client.register_and_login("ann", "pw1").await;
    client.request("PLAYWORDLE").await;
    client.request(&format!("SENDWORD {}", SECRET)).await;

    let response = client.request("SENDSTATS").await;
    // matchesPlayed winRate lastStreak streakRecord d1..d12
    assert_eq!(response, "OK 1 1 1 1 1 0 0 0 0 0 0 0 0 0 0 0");
}

#[tokio::test]
async fn test_stats_require_login() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    let response = client.request("SENDSTATS").await;
    assert!(response.starts_with("NOTOK"), "{}", response);
}

#[tokio::test]
async fn test_share_requires_a_guess_first() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client.register_and_login("ann", "pw1").await;

    let response = client.request("SHARE").await;
    assert!(response.contains("nothing to share"), "{}", response);
}

#[tokio::test]
async fn test_share_reaches_a_subscriber() {
    let subscriber = Subscriber::join("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let target = format!("127.0.0.1:{}", subscriber.local_addr().unwrap().port());

    let server = TestServer::start_with(target.parse().unwrap(), SECRET).await;
    let (sink, mut received) = tokio::sync::mpsc::unbounded_channel();
    let listener = tokio::spawn(subscriber.run(sink));

    let mut client = server.connect().await;
    client.register_and_login("ann", "pw1").await;
    client.request("PLAYWORDLE").await;
    client.request(&format!("SENDWORD {}", VALID_MISS)).await;

    assert!(client.request("SHARE").await.starts_with("OK"));
    let payload = received.recv().await.unwrap();
    assert!(payload.starts_with("ann "), "{}", payload);
    assert_eq!(payload.split_whitespace().count(), 2);

    // EXIT broadcasts the stop sentinel, which terminates the subscriber.
    assert!(client.request("EXIT").await.starts_with("OK"));
    listener.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_exit_terminates_the_session() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.request("EXIT").await, "OK goodbye!");
    assert!(client.try_request("SENDSTATS").await.is_none());
    client.session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_malformed_line_answers_notok_and_closes() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let response = client.request("FROBNICATE now").await;
    assert!(response.starts_with("NOTOK"), "{}", response);
    assert!(client.try_request("SENDSTATS").await.is_none());
}

#[tokio::test]
async fn test_missing_argument_answers_notok_and_closes() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let response = client.request("LOGIN ann").await;
    assert!(response.starts_with("NOTOK"), "{}", response);
    assert!(client.try_request("SENDSTATS").await.is_none());
}

#[tokio::test]
async fn test_logout_unbinds_the_player() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client.register_and_login("ann", "pw1").await;

    assert!(client.request("LOGOUT").await.starts_with("OK"));
    let response = client.request("PLAYWORDLE").await;
    assert!(response.starts_with("NOTOK"), "{}", response);
    // A second logout has nothing to undo.
    assert!(client.request("LOGOUT").await.starts_with("NOTOK"));
}

#[tokio::test]
async fn test_disconnect_releases_the_account() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client.register_and_login("ann", "pw1").await;

    assert!(client.request("EXIT").await.starts_with("OK"));
    client.session.await.unwrap().unwrap();

    let mut second = server.connect().await;
    assert!(second.request("LOGIN ann pw1").await.starts_with("OK"));
}

#[tokio::test]
async fn test_rotation_resets_players_and_installs_a_word() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client.register_and_login("ann", "pw1").await;
    client.request("PLAYWORDLE").await;
    client.request(&format!("SENDWORD {}", SECRET)).await;

    rotation::rotate(&server.state).await.unwrap();

    let ann = server.state.store.get("ann").unwrap();
    assert_eq!(ann.remaining_trials, MAX_TRIALS);
    assert!(!ann.has_won_today);
    assert!(ann.feedback.is_empty());
    // Lifetime stats survive rotation.
    assert_eq!(ann.matches_won, 1);

    let secret = server.state.secret.read().await.clone();
    assert!(TEST_WORDS.contains(&secret.as_str()), "{}", secret);
}
