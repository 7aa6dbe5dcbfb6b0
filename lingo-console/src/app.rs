//! The live console loop: room events out, typed messages in.

use lingo_transport::{BoxedRoomSession, RoomEvent};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use crate::error::Result;

/// Drives a connected console session.
///
/// Prints joined/left notices and transcript lines as the room reports
/// them, and forwards typed input to the room as text messages. Exits
/// when the room ends the session or the user interrupts input.
pub struct ConsoleApp {
    session: BoxedRoomSession,
}

impl ConsoleApp {
    pub fn new(session: BoxedRoomSession) -> Self {
        Self { session }
    }

    /// Runs until the session closes or input ends.
    pub async fn run(self) -> Result<()> {
        println!("ConvoLingo Console");
        println!("Type a message and press Enter. Ctrl+C to leave.\n");

        let mut input = spawn_input_reader();
        let mut input_error: Option<ReadlineError> = None;

        loop {
            tokio::select! {
                event = self.session.next_event() => {
                    match event {
                        Some(Ok(event)) => {
                            if !self.print_event(event) {
                                break;
                            }
                        }
                        Some(Err(e)) => eprintln!("Error: {e}"),
                        None => break,
                    }
                }
                line = input.recv() => {
                    match line {
                        Some(Ok(line)) => self.session.send_text(&line).await?,
                        Some(Err(e)) => {
                            input_error = Some(e);
                            break;
                        }
                        // Input thread ended: Ctrl+C or EOF.
                        None => break,
                    }
                }
            }
        }

        // The room may already have dropped the socket; leaving is
        // best-effort.
        if let Err(e) = self.session.close().await {
            tracing::debug!("Close after session end failed: {e}");
        }
        if let Some(e) = input_error {
            return Err(e.into());
        }
        println!("Left the room.");
        Ok(())
    }

    /// Prints one event; returns `false` when the session is over.
    fn print_event(&self, event: RoomEvent) -> bool {
        match event {
            RoomEvent::Joined { room_id, .. } => {
                println!("Joined room {room_id}");
            }
            RoomEvent::ParticipantJoined { participant_id, name } => {
                println!("{} joined", name.unwrap_or(participant_id));
            }
            RoomEvent::ParticipantLeft { participant_id } => {
                println!("{participant_id} left");
            }
            RoomEvent::Transcription { text, is_final: true, .. } => {
                println!("You -> {text}");
            }
            RoomEvent::Error { message, .. } => {
                eprintln!("Room error: {message}");
            }
            RoomEvent::Left { reason } => {
                match reason {
                    Some(reason) => println!("Session ended: {reason}"),
                    None => println!("Session ended"),
                }
                return false;
            }
            _ => {}
        }
        true
    }
}

/// Runs rustyline on its own thread, feeding lines into a channel.
///
/// The channel closes when the user interrupts or input hits EOF;
/// other readline failures are sent through so the caller can surface
/// them.
fn spawn_input_reader() -> mpsc::Receiver<std::result::Result<String, ReadlineError>> {
    let (tx, rx) = mpsc::channel(8);
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                return;
            }
        };
        loop {
            match rl.readline("You -> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(&line);
                    if tx.blocking_send(Ok(line)).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    let _ = tx.blocking_send(Err(e));
                    break;
                }
            }
        }
    });
    rx
}
