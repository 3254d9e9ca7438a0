use huddle_core::{ConnectionId, IceServerConfig, ServerMessage};
use huddle_server::{Envelope, SignalingEvent};

use crate::integration::{create_test_hub, create_test_hub_with, init_tracing};
use crate::utils::{connect, expect_quiet, next_envelope, send_event, stats};

#[tokio::test]
async fn test_connect_receives_welcome() {
    init_tracing();

    let (hub_tx, mut signal_rx, _output) = create_test_hub();

    let id = connect(&hub_tx, &mut signal_rx)
        .await
        .expect("Connect failed");
    expect_quiet(&hub_tx, &mut signal_rx)
        .await
        .expect("No ICE config should be sent when none is configured");

    let stats = stats(&hub_tx).await.expect("Stats failed");
    assert_eq!(stats.connections, 1);
    assert_eq!(stats.joined, 0);
    assert_eq!(stats.rooms, 0);

    // a second Connected for the same id is ignored
    send_event(&hub_tx, id, SignalingEvent::Connected)
        .await
        .expect("Send failed");
    expect_quiet(&hub_tx, &mut signal_rx)
        .await
        .expect("Duplicate registration must stay silent");
}

#[tokio::test]
async fn test_connect_receives_ice_config() {
    init_tracing();

    let servers = vec![IceServerConfig::new("stun:stun.l.google.com:19302")];
    let (hub_tx, mut signal_rx, _output) = create_test_hub_with(servers.clone());

    let id = ConnectionId::new();
    send_event(&hub_tx, id, SignalingEvent::Connected)
        .await
        .expect("Send failed");

    let welcome = next_envelope(&mut signal_rx).await.expect("No welcome");
    assert_eq!(welcome, Envelope::new(id, ServerMessage::Welcome { id }));

    let config = next_envelope(&mut signal_rx).await.expect("No ICE config");
    assert_eq!(
        config,
        Envelope::new(
            id,
            ServerMessage::IceConfig {
                ice_servers: servers
            }
        )
    );
}
