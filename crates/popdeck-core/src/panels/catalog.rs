use super::{ActionKind, ActionSpec, PanelId, PanelSpec};
use crate::site::SiteRule;

const COPY: ActionSpec = ActionSpec::new("copy", "Copy", 'c', ActionKind::Copy)
    .success("Copied to clipboard!")
    .failure("Failed to copy")
    .empty("No data to copy");

pub static PROFILE_SAVER: PanelSpec = PanelSpec {
    id: PanelId::ProfileSaver,
    title: "LinkedIn Profile Saver",
    site: SiteRule::Domain("linkedin.com"),
    inbound: "profileData",
    placeholder: "Profile data will appear here...",
    actions: &[
        ActionSpec::new(
            "scrape",
            "Save Profile",
            's',
            ActionKind::Content { action: "pullInfo" },
        )
        .success("Profile scraped successfully!")
        .failure("Error scraping profile")
        .wrong_context("Error: Please navigate to a LinkedIn profile page"),
        COPY,
        ActionSpec::new(
            "crm",
            "Send to CRM",
            'm',
            ActionKind::Webhook { field: "profileData" },
        )
        .success("Sent to CRM successfully!")
        .failure("Failed to send to CRM")
        .empty("No data to send"),
        ActionSpec::new(
            "posts",
            "View Posts",
            'v',
            ActionKind::OpenDerived { suffix: "recent-activity/all/" },
        )
        .success("Opened recent activity in a new tab")
        .wrong_context("Error: Please navigate to a LinkedIn profile first"),
    ],
};

pub static AUTO_SCROLL: PanelSpec = PanelSpec {
    id: PanelId::AutoScroll,
    title: "Auto Scroll",
    site: SiteRule::AnyPage,
    inbound: "scrollStatus",
    placeholder: "Scroll progress will appear here...",
    actions: &[
        ActionSpec::new(
            "start",
            "Start Scrolling",
            's',
            ActionKind::Content { action: "startScroll" },
        )
        .success("Auto-scroll started")
        .failure("Error starting auto-scroll")
        .wrong_context("Error: Please open a web page to scroll"),
        ActionSpec::new(
            "stop",
            "Stop Scrolling",
            't',
            ActionKind::Content { action: "stopScroll" },
        )
        .success("Auto-scroll stopped")
        .failure("Error stopping auto-scroll")
        .wrong_context("Error: Please open a web page to scroll"),
    ],
};

pub static LINK_NAVIGATOR: PanelSpec = PanelSpec {
    id: PanelId::LinkNavigator,
    title: "Link Navigator",
    site: SiteRule::AnyPage,
    inbound: "linkData",
    placeholder: "Collected links will appear here, one per line...",
    actions: &[
        ActionSpec::new(
            "collect",
            "Collect Links",
            'l',
            ActionKind::Content { action: "collectLinks" },
        )
        .success("Links collected!")
        .failure("Error collecting links")
        .wrong_context("Error: Please open a web page first"),
        ActionSpec::new(
            "next",
            "Open Next Link",
            'n',
            ActionKind::ContentWithData {
                action: "openNextLink",
                field: "links",
            },
        )
        .success("Opened next link")
        .failure("Error opening link")
        .wrong_context("Error: Please open a web page first")
        .empty("No links collected yet"),
        COPY,
    ],
};

pub static SKOOL_SIDEKICK: PanelSpec = PanelSpec {
    id: PanelId::SkoolSidekick,
    title: "Skool Sidekick",
    site: SiteRule::Hosts(&["skool.com", "*.skool.com"]),
    inbound: "sidekickData",
    placeholder: "Post content and sidekick replies will appear here...",
    actions: &[
        ActionSpec::new(
            "pull",
            "Pull Post",
            'p',
            ActionKind::Content { action: "pullPost" },
        )
        .success("Post pulled successfully!")
        .failure("Error pulling post")
        .wrong_context("Error: Please navigate to a Skool post"),
        ActionSpec::new(
            "ask",
            "Ask Sidekick",
            'a',
            ActionKind::ContentWithData {
                action: "askSidekick",
                field: "prompt",
            },
        )
        .success("Sidekick replied!")
        .failure("Error asking sidekick")
        .wrong_context("Error: Please navigate to a Skool post")
        .empty("Write a question first"),
        COPY,
    ],
};

pub static OPEN_RESPONSE_GENERATOR: PanelSpec = PanelSpec {
    id: PanelId::OpenResponseGenerator,
    title: "Open Response Generator",
    site: SiteRule::AnyPage,
    inbound: "responseData",
    placeholder: "Generated response will appear here...",
    actions: &[
        ActionSpec::new(
            "generate",
            "Generate Response",
            'g',
            ActionKind::Content { action: "generateResponse" },
        )
        .success("Response generated!")
        .failure("Error generating response")
        .wrong_context("Error: Please open the page you want to answer"),
        ActionSpec::new(
            "insert",
            "Insert Response",
            'i',
            ActionKind::ContentWithData {
                action: "insertResponse",
                field: "responseText",
            },
        )
        .success("Response inserted!")
        .failure("Error inserting response")
        .wrong_context("Error: Please open the page you want to answer")
        .empty("No response to insert"),
        COPY,
    ],
};

pub static SMART_LINK_SAVER: PanelSpec = PanelSpec {
    id: PanelId::SmartLinkSaver,
    title: "Smart Link Saver",
    site: SiteRule::AnyPage,
    inbound: "linkSaved",
    placeholder: "Saved links will appear here...",
    actions: &[
        ActionSpec::new(
            "save",
            "Save Link",
            's',
            ActionKind::Content { action: "saveLink" },
        )
        .success("Link saved!")
        .failure("Error saving link")
        .wrong_context("Error: Please open the page you want to save"),
        COPY,
        ActionSpec::new(
            "send",
            "Send Links",
            'm',
            ActionKind::Webhook { field: "links" },
        )
        .success("Links sent successfully!")
        .failure("Failed to send links")
        .empty("No links to send"),
    ],
};
