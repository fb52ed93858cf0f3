//! The app controller: owns the view document and drives the fetch→render
//! cycle plus the signup and unregister flows.
//!
//! The document lock is only held for synchronous swaps, never across a
//! request, so a slow request never blocks other events. Refreshes are not
//! sequenced: whichever fetch completes last decides what is on screen.

use std::sync::Arc;

use client_core::RosterApi;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    controller::{
        events::{Confirm, UiEvent},
        feedback::{
            FeedbackController, FeedbackKind, FeedbackMessage, SIGNUP_FEEDBACK,
            UNREGISTER_ERROR_FEEDBACK, UNREGISTER_SUCCESS_FEEDBACK,
        },
    },
    ui::{
        render::{
            find_removal_control_mut, is_removal_control, load_failed_view, loading_view,
            placeholder_options, removal_controls, render, RemovalTarget,
        },
        view::{Element, Node},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub activity: String,
}

impl SignupForm {
    pub fn reset(&mut self) {
        self.email.clear();
        self.activity.clear();
    }
}

/// Everything on the page the controller reads or replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub roster: Vec<Node>,
    pub activity_options: Vec<Node>,
    pub form: SignupForm,
    pub submit_state: SubmitState,
    pub load_state: LoadState,
    /// Bumped whenever the roster container is rebuilt, so a control
    /// captured before a rebuild is never confused with its replacement.
    pub generation: u64,
    inflight_fetches: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            roster: loading_view(),
            activity_options: placeholder_options(),
            form: SignupForm::default(),
            submit_state: SubmitState::Idle,
            load_state: LoadState::Idle,
            generation: 0,
            inflight_fetches: 0,
        }
    }
}

impl Document {
    pub fn submit_disabled(&self) -> bool {
        self.submit_state == SubmitState::Submitting
    }

    pub fn removal_controls(&self) -> Vec<&Element> {
        removal_controls(&self.roster)
    }

    /// The removal control in row `row` of card `card`, both zero-based.
    pub fn removal_target_at(&self, card: usize, row: usize) -> Option<RemovalTarget> {
        let card = self.roster.get(card)?;
        let controls = card.find_all(&is_removal_control);
        RemovalTarget::from_control(controls.get(row)?)
    }

    fn replace_roster(&mut self, roster: Vec<Node>, options: Option<Vec<Node>>) {
        self.roster = roster;
        if let Some(options) = options {
            self.activity_options = options;
        }
        self.generation += 1;
    }

    fn set_control_disabled(&mut self, target: &RemovalTarget, disabled: bool) -> bool {
        match find_removal_control_mut(&mut self.roster, target) {
            Some(control) => {
                control.set_disabled(disabled);
                true
            }
            None => false,
        }
    }
}

pub struct AppController {
    api: Arc<dyn RosterApi>,
    confirm: Arc<dyn Confirm>,
    document: Mutex<Document>,
    feedback: FeedbackController,
    initialized: Mutex<bool>,
}

impl AppController {
    pub fn new(api: Arc<dyn RosterApi>, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            api,
            confirm,
            document: Mutex::new(Document::default()),
            feedback: FeedbackController::new(),
            initialized: Mutex::new(false),
        }
    }

    pub async fn handle_event(&self, event: UiEvent) {
        debug!(event = event.name(), "handling ui event");
        match event {
            UiEvent::PageLoaded => self.load().await,
            UiEvent::FormChanged { email, activity } => self.fill_form(email, activity).await,
            UiEvent::SubmitPressed => self.submit().await,
            UiEvent::RemovalClicked(target) => self.remove_participant(target).await,
        }
    }

    pub async fn snapshot(&self) -> Document {
        self.document.lock().await.clone()
    }

    pub async fn feedback(&self) -> Option<FeedbackMessage> {
        self.feedback.visible().await
    }

    /// Initial load. Runs once; a failure stays on screen until the page is
    /// reloaded.
    pub async fn load(&self) {
        {
            let mut initialized = self.initialized.lock().await;
            if *initialized {
                debug!("initial load already triggered");
                return;
            }
            *initialized = true;
        }
        self.refresh().await;
    }

    /// One fetch→render cycle. The roster container is replaced wholesale
    /// with either the new cards or the static failure message.
    pub async fn refresh(&self) {
        {
            let mut doc = self.document.lock().await;
            doc.inflight_fetches += 1;
            doc.load_state = LoadState::Loading;
        }

        let fetched = self.api.fetch_roster().await;

        let mut doc = self.document.lock().await;
        match fetched {
            Ok(roster) => {
                let view = render(&roster);
                doc.replace_roster(view.cards, Some(view.options));
                if roster.is_empty() {
                    warn!("server returned no activities");
                }
                info!(activities = roster.len(), "roster refreshed");
            }
            Err(error) => {
                error!(%error, "failed to fetch activities");
                doc.replace_roster(load_failed_view(), None);
            }
        }
        doc.inflight_fetches = doc.inflight_fetches.saturating_sub(1);
        if doc.inflight_fetches == 0 {
            doc.load_state = LoadState::Idle;
        }
    }

    pub async fn fill_form(&self, email: impl Into<String>, activity: impl Into<String>) {
        let mut doc = self.document.lock().await;
        doc.form.email = email.into();
        doc.form.activity = activity.into();
    }

    /// Signup flow. The submit control stays disabled for exactly the
    /// duration of the enroll request and its follow-up refresh.
    pub async fn submit(&self) {
        let form = {
            let mut doc = self.document.lock().await;
            if doc.submit_disabled() {
                debug!("submit ignored while a signup is in flight");
                return;
            }
            doc.submit_state = SubmitState::Submitting;
            doc.form.clone()
        };

        match self.api.enroll(&form.activity, &form.email).await {
            Ok(outcome) => {
                info!(activity = %form.activity, email = %form.email, "signed up");
                self.document.lock().await.form.reset();
                self.refresh().await;
                self.feedback
                    .show(outcome.message, FeedbackKind::Success, SIGNUP_FEEDBACK)
                    .await;
            }
            Err(failure) => {
                warn!(
                    activity = %form.activity,
                    email = %form.email,
                    cause = %failure.cause,
                    "signup failed"
                );
                self.feedback
                    .show(failure.message, FeedbackKind::Error, SIGNUP_FEEDBACK)
                    .await;
            }
        }

        self.document.lock().await.submit_state = SubmitState::Idle;
    }

    /// Unregister flow for one participant row.
    pub async fn remove_participant(&self, target: RemovalTarget) {
        {
            let doc = self.document.lock().await;
            match doc
                .removal_controls()
                .into_iter()
                .find(|control| target.matches(control))
            {
                None => {
                    warn!(
                        activity = %target.activity,
                        email = %target.email,
                        "no such removal control"
                    );
                    return;
                }
                Some(control) if control.is_disabled() => {
                    debug!(
                        activity = %target.activity,
                        email = %target.email,
                        "removal already in flight"
                    );
                    return;
                }
                Some(_) => {}
            }
        }

        if !self.confirm.confirm(&target.confirmation_prompt()).await {
            debug!(activity = %target.activity, email = %target.email, "unregister declined");
            return;
        }

        let generation = {
            let mut doc = self.document.lock().await;
            if !doc.set_control_disabled(&target, true) {
                warn!(
                    activity = %target.activity,
                    email = %target.email,
                    "removal control vanished before request"
                );
                return;
            }
            doc.generation
        };

        match self.api.unenroll(&target.activity, &target.email).await {
            Ok(outcome) => {
                info!(activity = %target.activity, email = %target.email, "unregistered");
                // On screen during the refresh; the hide timer starts once it is done.
                self.feedback
                    .display(outcome.message, FeedbackKind::Success)
                    .await;
                // The refresh rebuilds every control, this one included.
                self.refresh().await;
                self.feedback.hide_after(UNREGISTER_SUCCESS_FEEDBACK);
            }
            Err(failure) => {
                error!(
                    activity = %target.activity,
                    email = %target.email,
                    cause = %failure.cause,
                    "error unregistering participant"
                );
                {
                    let mut doc = self.document.lock().await;
                    if doc.generation == generation {
                        doc.set_control_disabled(&target, false);
                    }
                }
                self.feedback
                    .show(failure.message, FeedbackKind::Error, UNREGISTER_ERROR_FEEDBACK)
                    .await;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
