//! Per-panel state: the editable text, the edit toggle, and the
//! Idle/Busy state of every action invocation.

use crate::gateway::{ContentRequest, InboundMessage, RemoteActionGateway};
use crate::panels::{ActionKind, ActionSpec, EDIT_STATUS_ID, EDITING_TEXT, PanelSpec, SAVED_TEXT};
use crate::status::{StatusFeed, StatusKind};
use crate::tabs::TabTracker;
use crate::{Error, GatewayError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPhase {
    Idle,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditMode {
    ReadOnly,
    Editing,
}

/// An action invocation that has not resolved yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub serial: u64,
    pub action: &'static str,
}

/// How one invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded { message: String },
    Failed { error: GatewayError, message: String },
    /// The panel was unmounted before the invocation resolved
    Discarded,
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded { .. })
    }
}

#[derive(Default)]
struct PanelState {
    /// Last received or committed value
    data: String,
    /// Working copy while editing
    draft: Option<String>,
    in_flight: BTreeMap<u64, &'static str>,
    next_serial: u64,
}

/// Controller of one mounted panel
///
/// Clones share state, so several invocations can be awaited at once.
/// Triggering the same action again while it is busy starts another
/// independent invocation; whichever resolves last sets the panel text.
#[derive(Clone)]
pub struct PanelController {
    spec: &'static PanelSpec,
    gateway: RemoteActionGateway,
    tracker: TabTracker,
    feed: StatusFeed,
    state: Arc<Mutex<PanelState>>,
    mounted: Arc<AtomicBool>,
}

impl PanelController {
    pub fn new(
        spec: &'static PanelSpec,
        gateway: RemoteActionGateway,
        tracker: TabTracker,
        feed: StatusFeed,
    ) -> Self {
        Self {
            spec,
            gateway,
            tracker,
            feed,
            state: Arc::new(Mutex::new(PanelState::default())),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn spec(&self) -> &'static PanelSpec {
        self.spec
    }

    pub fn feed(&self) -> &StatusFeed {
        &self.feed
    }

    /// Text currently shown: the draft while editing, the data otherwise
    pub fn text(&self) -> String {
        let state = self.state();
        state.draft.clone().unwrap_or_else(|| state.data.clone())
    }

    /// Last received or committed value
    pub fn data(&self) -> String {
        self.state().data.clone()
    }

    pub fn edit_mode(&self) -> EditMode {
        if self.state().draft.is_some() {
            EditMode::Editing
        } else {
            EditMode::ReadOnly
        }
    }

    pub fn phase(&self, action_id: &str) -> ActionPhase {
        if self.state().in_flight.values().any(|id| *id == action_id) {
            ActionPhase::Busy
        } else {
            ActionPhase::Idle
        }
    }

    pub fn in_flight(&self) -> Vec<Invocation> {
        self.state()
            .in_flight
            .iter()
            .map(|(serial, action)| Invocation {
                serial: *serial,
                action: *action,
            })
            .collect()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Detach from the UI; results still in flight are dropped when they land
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        tracing::debug!("Unmounted panel {}", self.spec.id);
    }

    /// Run an action to completion
    ///
    /// Failures are reported through the status feed, never returned as
    /// errors; `Err` only means the action id is unknown to this panel.
    pub async fn trigger(&self, action_id: &str) -> Result<ActionOutcome> {
        let action = self
            .spec
            .action(action_id)
            .ok_or_else(|| Error::UnknownAction {
                panel: self.spec.id.to_string(),
                action: action_id.to_string(),
            })?;

        let serial = self.begin(action);
        let busy = BusyGuard {
            state: &self.state,
            serial,
        };
        let result = self.run(action).await;
        drop(busy);

        Ok(self.settle(action, serial, result))
    }

    /// Flip between read-only and editing
    ///
    /// Leaving edit mode commits the draft as the panel's value.
    pub fn toggle_edit(&self) -> EditMode {
        let (mode, text) = {
            let mut state = self.state();
            match state.draft.take() {
                Some(draft) => {
                    state.data = draft;
                    (EditMode::ReadOnly, SAVED_TEXT)
                }
                None => {
                    state.draft = Some(state.data.clone());
                    (EditMode::Editing, EDITING_TEXT)
                }
            }
        };

        self.feed.post(text, StatusKind::Success, EDIT_STATUS_ID);
        mode
    }

    /// Replace the draft
    pub fn edit(&self, text: impl Into<String>) -> Result<()> {
        let mut state = self.state();
        match state.draft.as_mut() {
            Some(draft) => {
                *draft = text.into();
                Ok(())
            }
            None => Err(Error::ReadOnly),
        }
    }

    /// Merge a pushed message whose type belongs to this panel
    pub fn receive(&self, message: &InboundMessage) -> bool {
        if !self.is_mounted() || message.kind != self.spec.inbound {
            return false;
        }

        tracing::debug!("Panel {} received {}", self.spec.id, message.kind);
        self.set_data(message.data.clone());
        true
    }

    fn state(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, action: &'static ActionSpec) -> u64 {
        let mut state = self.state();
        let serial = state.next_serial;
        state.next_serial += 1;
        state.in_flight.insert(serial, action.id);
        tracing::debug!("{}#{} busy", action.id, serial);
        serial
    }

    fn set_data(&self, data: String) {
        let mut state = self.state();
        if let Some(draft) = state.draft.as_mut() {
            draft.clone_from(&data);
        }
        state.data = data;
    }

    /// Returns the new panel text, if the action produced one
    async fn run(&self, action: &'static ActionSpec) -> std::result::Result<Option<String>, GatewayError> {
        match action.kind {
            ActionKind::Content { action: name } => {
                let tab = self.tracker.current();
                let request = ContentRequest::new(name);
                let response = self
                    .gateway
                    .invoke_content_action(tab.as_ref(), self.spec.site, &request)
                    .await?;
                Ok(response.data)
            }
            ActionKind::ContentWithData { action: name, field } => {
                let text = self.text();
                if text.is_empty() {
                    return Err(GatewayError::EmptyData);
                }
                let tab = self.tracker.current();
                let request = ContentRequest::new(name).with(field, text);
                let response = self
                    .gateway
                    .invoke_content_action(tab.as_ref(), self.spec.site, &request)
                    .await?;
                Ok(response.data)
            }
            ActionKind::Webhook { field } => {
                self.gateway.send_to_webhook(field, &self.text()).await?;
                Ok(None)
            }
            ActionKind::Copy => {
                self.gateway.copy_to_clipboard(&self.text()).await?;
                Ok(None)
            }
            ActionKind::OpenDerived { suffix } => {
                let tab = self.tracker.current();
                self.gateway
                    .open_derived_url(tab.as_ref(), self.spec.site, suffix)
                    .await?;
                Ok(None)
            }
        }
    }

    fn settle(
        &self,
        action: &'static ActionSpec,
        serial: u64,
        result: std::result::Result<Option<String>, GatewayError>,
    ) -> ActionOutcome {
        if !self.is_mounted() {
            tracing::debug!("Discarding {}#{}: panel unmounted", action.id, serial);
            return ActionOutcome::Discarded;
        }

        match result {
            Ok(data) => {
                if let Some(data) = data {
                    self.set_data(data);
                }
                tracing::info!("{}#{} succeeded", action.id, serial);
                self.feed.post(action.success, StatusKind::Success, action.id);
                ActionOutcome::Succeeded {
                    message: action.success.to_string(),
                }
            }
            Err(error) => {
                let message = describe(action, &error);
                tracing::info!("{}#{} failed: {}", action.id, serial, message);
                self.feed.post(message.clone(), StatusKind::Error, action.id);
                ActionOutcome::Failed { error, message }
            }
        }
    }
}

/// Clears an invocation's busy entry, also when its future is dropped early
struct BusyGuard<'a> {
    state: &'a Mutex<PanelState>,
    serial: u64,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .remove(&self.serial);
    }
}

/// Human-readable status text for a failed action
fn describe(action: &ActionSpec, error: &GatewayError) -> String {
    match error {
        GatewayError::NoActiveTab => format!("Error: {}", error),
        GatewayError::WrongContext => action.wrong_context.to_string(),
        GatewayError::TransportError(message) => format!("Error: {}", message),
        GatewayError::RemoteFailure(message) | GatewayError::NetworkError(message) => {
            format!("{}: {}", action.failure, message)
        }
        GatewayError::MissingConfig => error.to_string(),
        GatewayError::EmptyData => action.empty.to_string(),
        GatewayError::ClipboardError(_) => action.failure.to_string(),
    }
}
