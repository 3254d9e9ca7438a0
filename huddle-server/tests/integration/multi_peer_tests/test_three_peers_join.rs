use huddle_core::ServerMessage;
use huddle_server::Envelope;

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::{connect, expect_quiet, join, members_of, next_envelope, stats};

#[tokio::test]
async fn test_three_peers_join() {
    init_tracing();

    let (hub_tx, mut signal_rx, _output) = create_test_hub();

    let a = connect(&hub_tx, &mut signal_rx).await.expect("Connect A");
    let b = connect(&hub_tx, &mut signal_rx).await.expect("Connect B");
    let c = connect(&hub_tx, &mut signal_rx).await.expect("Connect C");

    join(&hub_tx, a, "mesh").await.unwrap();
    join(&hub_tx, b, "mesh").await.unwrap();
    next_envelope(&mut signal_rx).await.unwrap();
    next_envelope(&mut signal_rx).await.unwrap();

    join(&hub_tx, c, "mesh").await.unwrap();

    assert_eq!(
        next_envelope(&mut signal_rx).await.unwrap(),
        Envelope::new(c, ServerMessage::OtherUsers { users: vec![a, b] })
    );
    assert_eq!(
        next_envelope(&mut signal_rx).await.unwrap(),
        Envelope::new(a, ServerMessage::UserJoined { id: c })
    );
    assert_eq!(
        next_envelope(&mut signal_rx).await.unwrap(),
        Envelope::new(b, ServerMessage::UserJoined { id: c })
    );
    expect_quiet(&hub_tx, &mut signal_rx).await.unwrap();

    assert_eq!(members_of(&hub_tx, "mesh").await.unwrap(), vec![a, b, c]);
    let stats = stats(&hub_tx).await.unwrap();
    assert_eq!(stats.joined, 3);
    assert_eq!(stats.rooms, 1);
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    init_tracing();

    let (hub_tx, mut signal_rx, _output) = create_test_hub();

    let a = connect(&hub_tx, &mut signal_rx).await.unwrap();
    let b = connect(&hub_tx, &mut signal_rx).await.unwrap();

    join(&hub_tx, a, "left").await.unwrap();
    join(&hub_tx, b, "right").await.unwrap();
    expect_quiet(&hub_tx, &mut signal_rx)
        .await
        .expect("Different rooms never see each other");

    // a connection may sit in several rooms at once
    join(&hub_tx, a, "right").await.unwrap();
    assert_eq!(
        next_envelope(&mut signal_rx).await.unwrap(),
        Envelope::new(a, ServerMessage::OtherUsers { users: vec![b] })
    );
    assert_eq!(
        next_envelope(&mut signal_rx).await.unwrap(),
        Envelope::new(b, ServerMessage::UserJoined { id: a })
    );
    assert_eq!(members_of(&hub_tx, "left").await.unwrap(), vec![a]);
    assert_eq!(members_of(&hub_tx, "right").await.unwrap(), vec![b, a]);
}
