//! WebSocket consumer for the backend push channel.
//!
//! Frames are JSON `{"event": "...", "data": ...}`. Winner events are re-broadcast on
//! a hub that every bridge subscribes to; everything else is ignored.

use crate::notify::WinnerEvent;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Event names that carry a declared winner.
pub const WINNER_EVENTS: [&str; 2] = ["winnerUpdated", "matchWinner"];

#[derive(Debug, Deserialize)]
struct PushFrame {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Extract a winner from one push frame, if it is a winner event.
pub fn parse_frame(text: &str) -> Option<WinnerEvent> {
    let frame: PushFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            log::warn!("Unreadable push frame: {}", e);
            return None;
        }
    };
    if !WINNER_EVENTS.contains(&frame.event.as_str()) {
        log::trace!("Ignoring push event {}", frame.event);
        return None;
    }
    match serde_json::from_value::<WinnerEvent>(frame.data) {
        Ok(event) if !event.winner_name.trim().is_empty() => Some(event),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Malformed {} payload: {}", frame.event, e);
            None
        }
    }
}

/// Connects to the push channel and forwards winner events to `hub`, reconnecting
/// after `retry` whenever the connection drops.
#[derive(Debug)]
pub struct PushListener {
    url: String,
    hub: broadcast::Sender<WinnerEvent>,
    retry: Duration,
}

impl PushListener {
    pub fn new(url: impl Into<String>, hub: broadcast::Sender<WinnerEvent>) -> Self {
        Self {
            url: url.into(),
            hub,
            retry: Duration::from_secs(2),
        }
    }

    pub fn with_retry(mut self, retry: Duration) -> Self {
        self.retry = retry;
        self
    }

    pub async fn run(self) {
        loop {
            match connect_async(self.url.as_str()).await {
                Ok((stream, _)) => {
                    log::info!("Connected to push channel {}", self.url);
                    let (_write, mut read) = stream.split();
                    while let Some(inbound) = read.next().await {
                        match inbound {
                            Ok(Message::Text(text)) => {
                                if let Some(event) = parse_frame(&text) {
                                    log::debug!("Push: winner {}", event.winner_name);
                                    if self.hub.send(event).is_err() {
                                        log::debug!("No bracket is listening for winners");
                                    }
                                }
                            }
                            Ok(Message::Close(_)) => break,
                            Ok(_) => {}
                            Err(e) => {
                                log::warn!("Push channel read failed: {}", e);
                                break;
                            }
                        }
                    }
                    log::warn!("Push channel {} disconnected", self.url);
                }
                Err(e) => log::warn!("Push channel connect to {} failed: {}", self.url, e),
            }
            tokio::time::sleep(self.retry).await;
        }
    }
}
