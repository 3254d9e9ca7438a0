use huddle_core::{ClientMessage, ServerMessage};
use huddle_server::Envelope;
use serde_json::json;

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::{
    connect, disconnect, expect_quiet, join, members_of, next_envelope, send_message, stats,
};

/// A and B meet in room1, A offers, B hangs up.
#[tokio::test]
async fn test_two_party_call_lifecycle() {
    init_tracing();

    let (hub_tx, mut signal_rx, output) = create_test_hub();

    let a = connect(&hub_tx, &mut signal_rx).await.expect("Connect A");
    let b = connect(&hub_tx, &mut signal_rx).await.expect("Connect B");

    join(&hub_tx, a, "room1").await.expect("Join A");
    expect_quiet(&hub_tx, &mut signal_rx)
        .await
        .expect("First joiner gets no other-users");

    join(&hub_tx, b, "room1").await.expect("Join B");
    assert_eq!(
        next_envelope(&mut signal_rx).await.unwrap(),
        Envelope::new(b, ServerMessage::OtherUsers { users: vec![a] })
    );
    assert_eq!(
        next_envelope(&mut signal_rx).await.unwrap(),
        Envelope::new(a, ServerMessage::UserJoined { id: b })
    );

    send_message(
        &hub_tx,
        a,
        ClientMessage::Offer {
            target: b,
            sdp: json!("x"),
        },
    )
    .await
    .expect("Offer");
    assert_eq!(
        next_envelope(&mut signal_rx).await.unwrap(),
        Envelope::new(
            b,
            ServerMessage::Offer {
                sdp: json!("x"),
                caller: a
            }
        )
    );

    disconnect(&hub_tx, b).await.expect("Disconnect B");
    assert_eq!(
        next_envelope(&mut signal_rx).await.unwrap(),
        Envelope::new(a, ServerMessage::UserDisconnected { id: b })
    );

    assert_eq!(members_of(&hub_tx, "room1").await.unwrap(), vec![a]);
    assert!(
        output
            .delivered_to(&b)
            .await
            .iter()
            .all(|m| !matches!(m, ServerMessage::UserDisconnected { .. })),
        "the leaver is not told about itself"
    );
}

#[tokio::test]
async fn test_last_member_leaving_removes_room() {
    init_tracing();

    let (hub_tx, mut signal_rx, _output) = create_test_hub();

    let a = connect(&hub_tx, &mut signal_rx).await.expect("Connect A");
    join(&hub_tx, a, "room1").await.expect("Join A");
    join(&hub_tx, a, "room2").await.expect("Join A again");
    assert_eq!(stats(&hub_tx).await.unwrap().rooms, 2);

    disconnect(&hub_tx, a).await.expect("Disconnect A");
    expect_quiet(&hub_tx, &mut signal_rx)
        .await
        .expect("Nobody is left to notify");

    let stats = stats(&hub_tx).await.unwrap();
    assert_eq!(stats.rooms, 0);
    assert_eq!(stats.connections, 0);
    assert!(members_of(&hub_tx, "room1").await.unwrap().is_empty());
}
