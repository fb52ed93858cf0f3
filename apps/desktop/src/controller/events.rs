//! Events the view raises and the confirmation seam the controller awaits.

use async_trait::async_trait;

use crate::ui::render::RemovalTarget;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    PageLoaded,
    FormChanged { email: String, activity: String },
    SubmitPressed,
    RemovalClicked(RemovalTarget),
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::PageLoaded => "page_loaded",
            UiEvent::FormChanged { .. } => "form_changed",
            UiEvent::SubmitPressed => "submit_pressed",
            UiEvent::RemovalClicked(_) => "removal_clicked",
        }
    }
}

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything; for non-interactive runs.
pub struct AlwaysConfirm;

#[async_trait]
impl Confirm for AlwaysConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
