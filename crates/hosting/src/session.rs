use super::lobby::Lobby;
use rack_core::*;
use rack_engine::*;
use rack_gameroom::*;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;

/// One client's bidirectional channel into a room.
///
/// The session is bound to `(room_id, player_id)` for its whole life: it
/// forwards frames only on that player's behalf, answers heartbeats
/// inline, and relays snapshots and events back out. Closing the socket
/// detaches the session but keeps the seat; the same device id
/// reattaches on reconnect.
pub async fn serve(
    lobby: Arc<Lobby>,
    room_id: ID<Room>,
    player_id: ID<Player>,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    let handle = match lobby.lookup(&room_id).await {
        Some(handle) => handle,
        None => {
            let _ = session.close(Some(invalid("room is gone"))).await;
            return;
        }
    };
    if !handle.snapshot().players.contains_key(&player_id) {
        let _ = session.close(Some(invalid("unknown player"))).await;
        return;
    }
    let session_id: ID<Session> = ID::default();
    let (tx, mut rx) = unbounded_channel::<ServerMessage>();
    if !handle.send(RoomCommand::Subscribe {
        session: session_id.clone(),
        player_id: player_id.clone(),
        sender: tx,
    }) {
        let _ = session.close(Some(invalid("room is gone"))).await;
        return;
    }
    log::debug!("[session {}] attached {} to {}", session_id, player_id, room_id);
    let mut snapshots = handle.snapshots.clone();
    // The subscribe command already delivered the current snapshot; only
    // genuinely newer ones should flow from the watch channel.
    snapshots.borrow_and_update();
    actix_web::rt::spawn(async move {
        use futures::StreamExt;
        'sesh: loop {
            tokio::select! {
                biased;
                frame = rx.recv() => match frame {
                    Some(frame) => if session.text(frame.to_json()).await.is_err() { break 'sesh },
                    None => break 'sesh,
                },
                changed = snapshots.changed() => match changed {
                    Ok(()) => {
                        let frame = ServerMessage::room_state(snapshots.borrow_and_update().clone());
                        if session.text(frame.to_json()).await.is_err() { break 'sesh }
                    }
                    Err(_) => break 'sesh,
                },
                msg = stream.next() => match msg {
                    Some(Ok(actix_ws::Message::Text(text))) => match Protocol::decode(&text) {
                        Ok(ClientMessage::Ping { timestamp }) => {
                            let _ = handle.send(RoomCommand::Heartbeat { player_id: player_id.clone() });
                            if session.text(ServerMessage::pong(timestamp).to_json()).await.is_err() { break 'sesh }
                        }
                        Ok(frame) => {
                            if let Some(command) = Protocol::command(frame) {
                                if !handle.send(RoomCommand::Engine {
                                    player_id: player_id.clone(),
                                    command,
                                    reply: None,
                                }) { break 'sesh }
                            }
                        }
                        Err(error) => {
                            if session.text(ServerMessage::error(&error).to_json()).await.is_err() { break 'sesh }
                        }
                    },
                    Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                    Some(Ok(_)) => continue 'sesh,
                    Some(Err(_)) => break 'sesh,
                    None => break 'sesh,
                },
            }
        }
        let _ = handle.send(RoomCommand::Unsubscribe {
            session: session_id.clone(),
            player_id,
        });
        log::debug!("[session {}] detached", session_id);
    });
}

/// Close telling the client to go back through admission.
fn invalid(description: &str) -> actix_ws::CloseReason {
    actix_ws::CloseReason {
        code: actix_ws::CloseCode::Other(CLOSE_INVALID),
        description: Some(description.to_string()),
    }
}
