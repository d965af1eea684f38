//! Panel registry and the shell that keeps exactly one panel mounted.

use crate::controller::{ActionPhase, EditMode, PanelController};
use crate::gateway::{InboundMessage, RemoteActionGateway};
use crate::panels::{PanelId, PanelSpec};
use crate::status::{StatusFeed, StatusFeedConfig, StatusMessage};
use crate::tabs::{TabContext, TabTracker};
use crate::{Error, Result};
use serde::Serialize;

/// Ordered set of the panels the shell can show
#[derive(Debug, Clone)]
pub struct PanelRegistry {
    panels: Vec<&'static PanelSpec>,
}

impl PanelRegistry {
    /// All six panels in navigation order
    pub fn builtin() -> Self {
        Self {
            panels: PanelId::ALL.iter().map(PanelId::spec).collect(),
        }
    }

    /// A subset of panels; duplicates are ignored, order is kept
    pub fn with_panels(ids: &[PanelId]) -> Result<Self> {
        let mut panels: Vec<&'static PanelSpec> = Vec::new();
        for id in ids {
            if !panels.iter().any(|spec| spec.id == *id) {
                panels.push(id.spec());
            }
        }

        if panels.is_empty() {
            return Err(Error::EmptyRegistry);
        }
        Ok(Self { panels })
    }

    pub fn first(&self) -> &'static PanelSpec {
        self.panels[0]
    }

    pub fn get(&self, id: PanelId) -> Option<&'static PanelSpec> {
        self.panels.iter().copied().find(|spec| spec.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = PanelId> + '_ {
        self.panels.iter().map(|spec| spec.id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub id: PanelId,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionView {
    pub id: &'static str,
    pub label: &'static str,
    pub key: char,
    pub phase: ActionPhase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub id: PanelId,
    pub title: &'static str,
    pub placeholder: &'static str,
    pub actions: Vec<ActionView>,
    pub edit_mode: EditMode,
    pub text: String,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellView {
    pub nav: Vec<NavItem>,
    pub panel: PanelView,
    pub statuses: Vec<StatusMessage>,
    pub tab: Option<TabContext>,
}

/// Hosts the registered panels and mounts exactly one at a time
///
/// Switching panels throws away the previous panel's text, edit mode and
/// status messages.
pub struct PanelShell {
    registry: PanelRegistry,
    gateway: RemoteActionGateway,
    tracker: TabTracker,
    feed_config: StatusFeedConfig,
    active: PanelId,
    mounted: PanelController,
}

impl PanelShell {
    pub fn new(
        registry: PanelRegistry,
        gateway: RemoteActionGateway,
        tracker: TabTracker,
        feed_config: StatusFeedConfig,
    ) -> Self {
        let first = registry.first();
        let mounted = PanelController::new(
            first,
            gateway.clone(),
            tracker.clone(),
            StatusFeed::new(feed_config),
        );

        Self {
            registry,
            gateway,
            tracker,
            feed_config,
            active: first.id,
            mounted,
        }
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &TabTracker {
        &self.tracker
    }

    pub fn active(&self) -> PanelId {
        self.active
    }

    /// The single mounted panel
    pub fn active_view(&self) -> &PanelController {
        &self.mounted
    }

    /// Make `id` the active panel
    ///
    /// Returns `false` when `id` was already active.
    pub fn select(&mut self, id: PanelId) -> Result<bool> {
        if id == self.active {
            return Ok(false);
        }

        let spec = self
            .registry
            .get(id)
            .ok_or_else(|| Error::UnknownPanel(id.to_string()))?;

        self.mounted.unmount();
        self.mounted = PanelController::new(
            spec,
            self.gateway.clone(),
            self.tracker.clone(),
            StatusFeed::new(self.feed_config),
        );
        tracing::info!("Switched panel: {} -> {}", self.active, id);
        self.active = id;
        Ok(true)
    }

    pub fn navigation(&self) -> Vec<NavItem> {
        self.registry
            .ids()
            .map(|id| NavItem {
                id,
                label: id.label(),
                active: id == self.active,
            })
            .collect()
    }

    /// Route a pushed message to the mounted panel
    pub fn dispatch(&self, message: &InboundMessage) -> bool {
        let merged = self.mounted.receive(message);
        if !merged {
            tracing::debug!("Ignoring '{}' message on panel {}", message.kind, self.active);
        }
        merged
    }

    pub fn snapshot(&self) -> ShellView {
        let controller = &self.mounted;
        let spec = controller.spec();

        ShellView {
            nav: self.navigation(),
            panel: PanelView {
                id: spec.id,
                title: spec.title,
                placeholder: spec.placeholder,
                actions: spec
                    .actions
                    .iter()
                    .map(|action| ActionView {
                        id: action.id,
                        label: action.label,
                        key: action.key,
                        phase: controller.phase(action.id),
                    })
                    .collect(),
                edit_mode: controller.edit_mode(),
                text: controller.text(),
            },
            statuses: controller.feed().entries(),
            tab: self.tracker.current(),
        }
    }
}
