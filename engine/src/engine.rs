use tokio::sync::{mpsc, oneshot};

use crate::history::History;
use lcars_shared::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    EventLog,
    Clock,
}

impl DisplayMode {
    pub fn from_name(name: &str) -> Option<DisplayMode> {
        match name.trim().to_ascii_lowercase().as_str() {
            "log" | "event_log" | "events" => Some(DisplayMode::EventLog),
            "clock" => Some(DisplayMode::Clock),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugFlags {
    pub layout: bool,
    pub touch: bool,
}

/// Commands accepted by the panel state actor. Debug switches take
/// `None` to toggle the current value.
pub enum PanelCmdData {
    Message(Message),
    SetMode(DisplayMode),
    DebugLayout(Option<bool>),
    DebugTouch(Option<bool>),
    ToggleRelative,
    ClearHistory,
    GetSnapshot(oneshot::Sender<PanelSnapshot>),
}

impl std::fmt::Debug for PanelCmdData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PanelCmdData")
    }
}

/// A consistent copy of everything the renderer needs for one frame.
/// `rev` changes whenever any of it does, so callers can skip redraws.
#[derive(Debug, Clone)]
pub struct PanelSnapshot {
    pub rev: u64,
    pub mode: DisplayMode,
    pub debug: DebugFlags,
    pub relative_time: bool,
    pub messages: Vec<Message>,
}

#[derive(Clone)]
pub struct PanelHandle {
    sender: mpsc::Sender<PanelCmdData>,
}

impl PanelHandle {
    pub fn new(history_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(32);

        let engine = PanelEngine::new(rx, history_capacity);
        tokio::spawn(run_engine(engine));

        Self { sender: tx }
    }

    pub async fn send(&self, cmd: PanelCmdData) {
        let _ = self.sender.send(cmd).await;
    }

    /// Non-blocking send for callers outside the panel loop. A full
    /// queue drops the command rather than stalling the network side.
    pub fn try_send(&self, cmd: PanelCmdData) {
        if self.sender.try_send(cmd).is_err() {
            log::warn!("Panel command queue full, dropping command");
        }
    }

    pub async fn snapshot(&self) -> PanelSnapshot {
        let (sender, receiver) = oneshot::channel();
        let _ = self.sender.send(PanelCmdData::GetSnapshot(sender)).await;
        receiver.await.unwrap()
    }
}

struct PanelEngine {
    msg_rx: mpsc::Receiver<PanelCmdData>,
    rev: u64,
    mode: DisplayMode,
    debug: DebugFlags,
    relative_time: bool,
    messages: History<Message>,
}

impl PanelEngine {
    fn new(msg_rx: mpsc::Receiver<PanelCmdData>, history_capacity: usize) -> Self {
        Self {
            msg_rx,
            rev: 0,
            mode: DisplayMode::EventLog,
            debug: DebugFlags::default(),
            relative_time: false,
            messages: History::new(history_capacity),
        }
    }

    fn handle_message(&mut self, msg: PanelCmdData) {
        match msg {
            PanelCmdData::Message(m) => {
                log::debug!("New message from {}: {}", m.source, m.text);
                self.messages.push(m);
                self.rev += 1;
            }
            PanelCmdData::SetMode(mode) => {
                if self.mode != mode {
                    self.mode = mode;
                    self.rev += 1;
                }
            }
            PanelCmdData::DebugLayout(v) => {
                self.debug.layout = v.unwrap_or(!self.debug.layout);
                self.rev += 1;
            }
            PanelCmdData::DebugTouch(v) => {
                self.debug.touch = v.unwrap_or(!self.debug.touch);
                self.rev += 1;
            }
            PanelCmdData::ToggleRelative => {
                self.relative_time = !self.relative_time;
                self.rev += 1;
            }
            PanelCmdData::ClearHistory => {
                self.messages.clear();
                self.rev += 1;
            }
            PanelCmdData::GetSnapshot(sender) => {
                let _ = sender.send(PanelSnapshot {
                    rev: self.rev,
                    mode: self.mode,
                    debug: self.debug,
                    relative_time: self.relative_time,
                    messages: self.messages.iter().cloned().collect(),
                });
            }
        }
    }
}

async fn run_engine(mut engine: PanelEngine) {
    while let Some(msg) = engine.msg_rx.recv().await {
        engine.handle_message(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcars_shared::Severity;

    fn msg(text: &str) -> Message {
        Message {
            text: text.to_owned(),
            source: "test".to_owned(),
            severity: Severity::Info,
            timestamp: chrono::Local::now(),
            topic: "home/test".to_owned(),
        }
    }

    #[tokio::test]
    async fn snapshot_reflects_pushed_messages_in_order() {
        let handle = PanelHandle::new(3);
        for t in &["a", "b", "c", "d"] {
            handle.send(PanelCmdData::Message(msg(t))).await;
        }

        let snap = handle.snapshot().await;
        let texts: Vec<_> = snap.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c", "d"]);
        assert_eq!(snap.mode, DisplayMode::EventLog);
    }

    #[tokio::test]
    async fn revision_changes_only_with_state() {
        let handle = PanelHandle::new(10);
        let first = handle.snapshot().await;
        let second = handle.snapshot().await;
        assert_eq!(first.rev, second.rev);

        handle.send(PanelCmdData::Message(msg("x"))).await;
        let third = handle.snapshot().await;
        assert_ne!(second.rev, third.rev);
    }

    #[tokio::test]
    async fn clear_and_toggles() {
        let handle = PanelHandle::new(10);
        handle.send(PanelCmdData::Message(msg("x"))).await;
        handle.send(PanelCmdData::ClearHistory).await;
        handle.send(PanelCmdData::DebugLayout(None)).await;
        handle.send(PanelCmdData::DebugTouch(Some(true))).await;
        handle.send(PanelCmdData::ToggleRelative).await;
        handle.send(PanelCmdData::SetMode(DisplayMode::Clock)).await;

        let snap = handle.snapshot().await;
        assert!(snap.messages.is_empty());
        assert!(snap.debug.layout);
        assert!(snap.debug.touch);
        assert!(snap.relative_time);
        assert_eq!(snap.mode, DisplayMode::Clock);
    }

    #[test]
    fn mode_names_parse() {
        assert_eq!(DisplayMode::from_name("clock"), Some(DisplayMode::Clock));
        assert_eq!(DisplayMode::from_name(" LOG "), Some(DisplayMode::EventLog));
        assert_eq!(DisplayMode::from_name("bogus"), None);
    }
}
