//! Render effects and the renderers that consume them.
//!
//! The core never draws anything itself; it hands `Effect` values to a
//! `Renderer`, which owns the display surface (a DOM, a terminal, a test log).

use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;

/// Where an effect should be painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "panel", content = "index")]
pub enum Panel {
    /// The single-selection panel and general messages.
    Main,
    /// One of the comparison slots.
    Slot(usize),
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Panel::Main => write!(f, "main"),
            Panel::Slot(i) => write!(f, "slot{}", i),
        }
    }
}

/// A UI instruction produced by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Effect {
    /// Nothing selected yet.
    ShowPlaceholder,
    /// Analysis of `name` has started.
    ShowPending { name: String },
    /// Analysis finished and is still current: show the suggestion and draw the agent.
    ShowResult {
        name: String,
        role: String,
        suggestion: String,
        color: String,
    },
    /// A request was refused, e.g. a third agent in compare mode.
    ShowWarning { message: String },
    /// Something failed and the user should know.
    ShowError { message: String },
}

impl Effect {
    pub fn pending(name: impl Into<String>) -> Self {
        Effect::ShowPending { name: name.into() }
    }

    pub fn is_result(&self) -> bool {
        matches!(self, Effect::ShowResult { .. })
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::ShowPlaceholder => write!(f, "Select an agent to visualize"),
            Effect::ShowPending { name } => write!(f, "Analyzing {}...", name),
            Effect::ShowResult {
                name,
                role,
                suggestion,
                color,
            } => write!(f, "{} ({}) [{}]: {}", name, role, color, suggestion),
            Effect::ShowWarning { message } => write!(f, "warning: {}", message),
            Effect::ShowError { message } => write!(f, "error: {}", message),
        }
    }
}

/// Consumer of render effects.
///
/// Called while the arbiter holds its state lock, so implementations must
/// return quickly and must not call back into the arbiter.
pub trait Renderer: Send + Sync {
    fn render(&self, panel: Panel, effect: Effect);
}

/// Keeps every effect in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    log: Mutex<Vec<(Panel, Effect)>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything rendered so far.
    pub fn effects(&self) -> Vec<(Panel, Effect)> {
        self.log.lock().clone()
    }

    /// Effects painted on one panel.
    pub fn effects_for(&self, panel: Panel) -> Vec<Effect> {
        self.log
            .lock()
            .iter()
            .filter(|(p, _)| *p == panel)
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// The most recent effect on a panel, i.e. what the panel currently shows.
    pub fn showing(&self, panel: Panel) -> Option<Effect> {
        self.log
            .lock()
            .iter()
            .rev()
            .find(|(p, _)| *p == panel)
            .map(|(_, e)| e.clone())
    }

    /// Names of agents whose results were rendered, in order.
    pub fn results(&self) -> Vec<String> {
        self.log
            .lock()
            .iter()
            .filter_map(|(_, e)| match e {
                Effect::ShowResult { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, panel: Panel, effect: Effect) {
        self.log.lock().push((panel, effect));
    }
}

/// Forwards effects to an async consumer over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelRenderer {
    tx: mpsc::UnboundedSender<(Panel, Effect)>,
}

impl ChannelRenderer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(Panel, Effect)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Renderer for ChannelRenderer {
    fn render(&self, panel: Panel, effect: Effect) {
        // A closed receiver means nobody is watching anymore.
        if self.tx.send((panel, effect)).is_err() {
            tracing::trace!("render channel closed, effect dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_renderer_tracks_panels() {
        let r = RecordingRenderer::new();
        r.render(Panel::Main, Effect::ShowPlaceholder);
        r.render(Panel::Slot(0), Effect::pending("Planner"));
        r.render(Panel::Main, Effect::pending("Critic"));

        assert_eq!(r.effects().len(), 3);
        assert_eq!(r.effects_for(Panel::Slot(0)), vec![Effect::pending("Planner")]);
        assert_eq!(r.showing(Panel::Main), Some(Effect::pending("Critic")));
        assert_eq!(r.showing(Panel::Slot(1)), None);

        r.clear();
        assert!(r.effects().is_empty());
    }

    #[test]
    fn test_effect_display() {
        assert_eq!(Effect::pending("Planner").to_string(), "Analyzing Planner...");
        let result = Effect::ShowResult {
            name: "Planner".to_string(),
            role: "Strategy".to_string(),
            suggestion: "Ship it.".to_string(),
            color: "#4f7cff".to_string(),
        };
        assert!(result.is_result());
        assert_eq!(result.to_string(), "Planner (Strategy) [#4f7cff]: Ship it.");
    }

    #[test]
    fn test_effect_serialization() {
        let json = serde_json::to_value(Effect::pending("Critic")).unwrap();
        assert_eq!(json["kind"], "show_pending");
        assert_eq!(json["name"], "Critic");

        let panel = serde_json::to_value(Panel::Slot(1)).unwrap();
        assert_eq!(panel["panel"], "slot");
        assert_eq!(panel["index"], 1);
    }

    #[tokio::test]
    async fn test_channel_renderer_forwards() {
        let (renderer, mut rx) = ChannelRenderer::new();
        renderer.render(Panel::Main, Effect::ShowPlaceholder);
        assert_eq!(rx.recv().await, Some((Panel::Main, Effect::ShowPlaceholder)));

        drop(rx);
        // Must not panic once the receiver is gone.
        renderer.render(Panel::Main, Effect::ShowPlaceholder);
    }
}
