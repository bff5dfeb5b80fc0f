//! Client SDK for the ChatterBox meeting-bot service.
//!
//! Dispatch an automated bot into a meeting, mint short-lived tokens, and
//! subscribe to real-time session lifecycle and transcript events.
//!
//! ```rust,no_run
//! use chatterbox_bot::{ChatterBox, ChatterBoxConfig, SendBotOptions, SessionCallbacks};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatterBox::new(ChatterBoxConfig::new("your-api-token"))?;
//!
//!     let session = client
//!         .send_bot(SendBotOptions::new("zoom", 123456789))
//!         .await?;
//!
//!     let callbacks = SessionCallbacks::new()
//!         .on_meeting_started(|data| async move {
//!             println!("meeting started: {data}");
//!         })
//!         .on_transcript_received(|data| async move {
//!             println!("transcript: {data}");
//!         });
//!
//!     let mut socket = client.connect_socket(&session.id, callbacks).await?;
//!     tokio::signal::ctrl_c().await?;
//!     socket.close().await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod messages;
pub mod socket;

// Re-export commonly used items for convenience
pub use client::ChatterBox;
pub use config::{ChatterBoxConfig, MeetingId, SendBotOptions};
pub use error::{ClientError, ClientResult};
pub use messages::{BotSession, TemporaryToken};
pub use socket::{SessionCallbacks, SessionEventKind, SessionSocket, SocketState};
