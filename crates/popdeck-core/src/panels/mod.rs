//! Panel identifiers and the declarative description of each panel.

mod catalog;

pub use catalog::{
    AUTO_SCROLL, LINK_NAVIGATOR, OPEN_RESPONSE_GENERATOR, PROFILE_SAVER, SKOOL_SIDEKICK,
    SMART_LINK_SAVER,
};

use crate::Error;
use crate::site::SiteRule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status id used by the edit toggle
pub const EDIT_STATUS_ID: &str = "edit";
/// Key bound to the edit toggle in every panel
pub const EDIT_KEY: char = 'e';
pub const EDITING_TEXT: &str = "Editing mode. Click Save when done.";
pub const SAVED_TEXT: &str = "Changes saved!";

/// The closed set of panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelId {
    ProfileSaver,
    AutoScroll,
    LinkNavigator,
    SkoolSidekick,
    OpenResponseGenerator,
    SmartLinkSaver,
}

impl PanelId {
    pub const ALL: [PanelId; 6] = [
        PanelId::ProfileSaver,
        PanelId::AutoScroll,
        PanelId::LinkNavigator,
        PanelId::SkoolSidekick,
        PanelId::OpenResponseGenerator,
        PanelId::SmartLinkSaver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::ProfileSaver => "profile-saver",
            PanelId::AutoScroll => "auto-scroll",
            PanelId::LinkNavigator => "link-navigator",
            PanelId::SkoolSidekick => "skool-sidekick",
            PanelId::OpenResponseGenerator => "open-response-generator",
            PanelId::SmartLinkSaver => "smart-link-saver",
        }
    }

    /// Navigation label
    pub fn label(&self) -> &'static str {
        match self {
            PanelId::ProfileSaver => "Profile Saver",
            PanelId::AutoScroll => "AutoScroll",
            PanelId::LinkNavigator => "Link Navigator",
            PanelId::SkoolSidekick => "Skool Sidekick",
            PanelId::OpenResponseGenerator => "Open Response Generator",
            PanelId::SmartLinkSaver => "Smart Link Saver",
        }
    }

    pub fn spec(&self) -> &'static PanelSpec {
        match self {
            PanelId::ProfileSaver => &PROFILE_SAVER,
            PanelId::AutoScroll => &AUTO_SCROLL,
            PanelId::LinkNavigator => &LINK_NAVIGATOR,
            PanelId::SkoolSidekick => &SKOOL_SIDEKICK,
            PanelId::OpenResponseGenerator => &OPEN_RESPONSE_GENERATOR,
            PanelId::SmartLinkSaver => &SMART_LINK_SAVER,
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelId {
    type Err = Error;

    /// Accepts `profile-saver`, `profile_saver`, `ProfileSaver` and the like
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        PanelId::ALL
            .into_iter()
            .find(|id| id.as_str().replace('-', "") == wanted)
            .ok_or_else(|| Error::UnknownPanel(s.to_string()))
    }
}

/// What an action does when triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Send `{ action }` to the content script; a `data` reply becomes the panel text
    Content { action: &'static str },
    /// Same, with the panel text attached under `field`; refuses empty text
    ContentWithData {
        action: &'static str,
        field: &'static str,
    },
    /// POST `{ field: text }` to the configured webhook
    Webhook { field: &'static str },
    /// Copy the panel text to the clipboard
    Copy,
    /// Open the tab URL without its query string plus `suffix` in a new tab
    OpenDerived { suffix: &'static str },
}

/// One user-triggerable action and the wording of its outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    /// Also the status id its outcomes are posted under
    pub id: &'static str,
    pub label: &'static str,
    pub key: char,
    pub kind: ActionKind,
    pub success: &'static str,
    /// Prefix for remote and network failures
    pub failure: &'static str,
    pub wrong_context: &'static str,
    pub empty: &'static str,
}

impl ActionSpec {
    pub const fn new(id: &'static str, label: &'static str, key: char, kind: ActionKind) -> Self {
        Self {
            id,
            label,
            key,
            kind,
            success: "Done!",
            failure: "Error",
            wrong_context: "Error: This page is not supported",
            empty: "No data",
        }
    }

    pub const fn success(mut self, text: &'static str) -> Self {
        self.success = text;
        self
    }

    pub const fn failure(mut self, text: &'static str) -> Self {
        self.failure = text;
        self
    }

    pub const fn wrong_context(mut self, text: &'static str) -> Self {
        self.wrong_context = text;
        self
    }

    pub const fn empty(mut self, text: &'static str) -> Self {
        self.empty = text;
        self
    }
}

/// Static description of a panel
#[derive(Debug, PartialEq, Eq)]
pub struct PanelSpec {
    pub id: PanelId,
    pub title: &'static str,
    /// Pages the panel's tab actions may target
    pub site: SiteRule,
    /// `type` of pushed messages merged into the panel text
    pub inbound: &'static str,
    pub placeholder: &'static str,
    pub actions: &'static [ActionSpec],
}

impl PanelSpec {
    pub fn action(&self, id: &str) -> Option<&'static ActionSpec> {
        self.actions.iter().find(|action| action.id == id)
    }

    pub fn action_for_key(&self, key: char) -> Option<&'static ActionSpec> {
        self.actions.iter().find(|action| action.key == key)
    }
}
