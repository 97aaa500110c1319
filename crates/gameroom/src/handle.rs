use super::*;
use rack_core::ID;
use rack_engine::Room;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;

/// Handle to a running room actor.
///
/// `commands` feeds the actor's serial inbox. `snapshots` is a watch
/// channel: readers always see the latest snapshot and slow readers
/// coalesce intermediate ones, which is exactly the broadcast contract.
#[derive(Clone)]
pub struct RoomHandle {
    pub id: ID<Room>,
    pub commands: UnboundedSender<RoomCommand>,
    pub snapshots: watch::Receiver<Room>,
}

impl RoomHandle {
    /// The latest snapshot without waiting for a change.
    pub fn snapshot(&self) -> Room {
        self.snapshots.borrow().clone()
    }
    /// Sends a command to the actor; false if the actor is gone.
    pub fn send(&self, command: RoomCommand) -> bool {
        self.commands.send(command).is_ok()
    }
}
