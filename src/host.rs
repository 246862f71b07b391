//! Lifecycle glue for the frame container the game runs inside.

use log::{debug, error, info};
use serde::Serialize;
use thiserror::Error;

/// What the host tells us about where we are running. Only the pinned flag
/// matters to the game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameContext {
    pub added: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Added,
    AddRejected { reason: String },
    Removed,
}

impl HostEvent {
    /// Short label shown to the player as the last host event.
    pub fn label(&self) -> String {
        match self {
            HostEvent::Added => "frameAdded".to_string(),
            HostEvent::AddRejected { reason } => format!("frameAddRejected: {}", reason),
            HostEvent::Removed => "frameRemoved".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum HostError {
    #[error("host context unavailable: {0}")]
    Context(String),

    #[error("could not add frame: {0}")]
    AddFrame(String),
}

pub trait FrameHost {
    fn context(&mut self) -> Result<FrameContext, HostError>;
    /// Tells the host the first frame has been drawn.
    fn ready(&mut self);
    fn poll_event(&mut self) -> Option<HostEvent>;
    fn add_frame(&mut self) -> Result<(), HostError>;
}

/// No container at all: a plain terminal run.
#[derive(Debug, Default, Clone, Copy)]
pub struct Standalone;

impl FrameHost for Standalone {
    fn context(&mut self) -> Result<FrameContext, HostError> {
        Ok(FrameContext::default())
    }

    fn ready(&mut self) {
        debug!("Standalone host ready");
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        None
    }

    fn add_frame(&mut self) -> Result<(), HostError> {
        Err(HostError::AddFrame("no frame host attached".to_string()))
    }
}

/// Tracks host state for the UI and keeps host failures away from the game.
pub struct HostBridge<H> {
    host: H,
    loaded: bool,
    context: Option<FrameContext>,
    pinned: bool,
    last_event: Option<String>,
}

impl<H: FrameHost> HostBridge<H> {
    pub fn new(host: H) -> Self {
        HostBridge { host, loaded: false, context: None, pinned: false, last_event: None }
    }

    /// Loads the context and signals ready. A failing host is logged and
    /// the bridge still counts as loaded so the game never waits on it.
    pub fn initialize(&mut self) {
        if self.loaded {
            return;
        }

        match self.host.context() {
            Ok(context) => {
                self.pinned = context.added;
                self.context = Some(context);
                self.host.ready();
                info!("Frame host ready (pinned: {})", self.pinned);
            }
            Err(err) => error!("Error initializing frame host: {}", err),
        }

        self.loaded = true;
    }

    /// Drains pending host events.
    pub fn pump_events(&mut self) {
        while let Some(event) = self.host.poll_event() {
            match &event {
                HostEvent::Added => self.pinned = true,
                HostEvent::Removed => self.pinned = false,
                HostEvent::AddRejected { .. } => {}
            }

            let label = event.label();
            info!("Host event: {}", label);
            self.last_event = Some(label);
        }
    }

    /// Asks the host to pin the app. Failures are logged, not returned.
    pub fn pin(&mut self) -> bool {
        match self.host.add_frame() {
            Ok(()) => {
                info!("Pin request accepted");
                true
            }
            Err(err) => {
                error!("Error pinning frame: {}", err);
                false
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn context(&self) -> Option<&FrameContext> {
        self.context.as_ref()
    }

    pub fn last_event(&self) -> Option<&str> {
        self.last_event.as_deref()
    }

    /// One-line JSON dump of the host context for the context panel.
    pub fn context_summary(&self) -> String {
        match &self.context {
            Some(context) => serde_json::to_string(context).unwrap_or_else(|err| format!("<{}>", err)),
            None => "unavailable".to_string(),
        }
    }
}
