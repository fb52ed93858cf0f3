//! Transient status message shown after an enroll or unenroll attempt.
//!
//! Each `show` arms its own hide timer and nothing ever cancels one. An older
//! timer that is still pending therefore hides whatever message is current
//! when it fires, even one shown after it was armed.

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tracing::debug;

use crate::ui::view::{Element, Node};

pub const SIGNUP_FEEDBACK: Duration = Duration::from_millis(5000);
pub const UNREGISTER_SUCCESS_FEEDBACK: Duration = Duration::from_millis(4000);
pub const UNREGISTER_ERROR_FEEDBACK: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

impl FeedbackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackKind::Success => "success",
            FeedbackKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub text: String,
    pub kind: FeedbackKind,
    pub visible: bool,
}

impl FeedbackMessage {
    /// The `#message` element as it currently stands.
    pub fn to_node(&self) -> Node {
        let mut class = format!("message {}", self.kind.as_str());
        if !self.visible {
            class.push_str(" hidden");
        }
        Element::new("div")
            .attr("id", "message")
            .class(&class)
            .text(self.text.as_str())
            .into()
    }
}

#[derive(Clone, Default)]
pub struct FeedbackController {
    current: Arc<Mutex<Option<FeedbackMessage>>>,
}

impl FeedbackController {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn show(&self, text: impl Into<String>, kind: FeedbackKind, duration: Duration) {
        self.display(text, kind).await;
        self.hide_after(duration);
    }

    /// Puts a message on screen without arming a hide timer.
    pub async fn display(&self, text: impl Into<String>, kind: FeedbackKind) {
        let text = text.into();
        debug!(kind = kind.as_str(), %text, "showing feedback");
        *self.current.lock().await = Some(FeedbackMessage {
            text,
            kind,
            visible: true,
        });
    }

    /// Hides whatever message is current once `duration` has passed.
    pub fn hide_after(&self, duration: Duration) {
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            controller.hide().await;
        });
    }

    pub async fn hide(&self) {
        if let Some(message) = self.current.lock().await.as_mut() {
            message.visible = false;
        }
    }

    pub async fn current(&self) -> Option<FeedbackMessage> {
        self.current.lock().await.clone()
    }

    /// The message, but only while it is on screen.
    pub async fn visible(&self) -> Option<FeedbackMessage> {
        self.current().await.filter(|message| message.visible)
    }
}
