//! Text rendering of a shell snapshot.

use console::style;
use popdeck_core::panels::EDIT_KEY;
use popdeck_core::{ActionPhase, EditMode, ShellView, StatusKind};

/// Lines of one deck frame, styled for the terminal
pub fn frame(view: &ShellView) -> Vec<String> {
    let mut lines = Vec::new();

    let nav = view
        .nav
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let label = format!("[{}] {}", i + 1, item.label);
            if item.active {
                style(label).bold().reverse().to_string()
            } else {
                style(label).dim().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(nav);
    lines.push(String::new());

    let panel = &view.panel;
    lines.push(style(panel.title).bold().underlined().to_string());
    let tab = view
        .tab
        .as_ref()
        .and_then(|tab| tab.url.as_deref())
        .unwrap_or("no active tab");
    lines.push(style(format!("Tab: {}", tab)).dim().to_string());
    lines.push(String::new());

    if panel.text.is_empty() {
        lines.push(style(panel.placeholder).dim().italic().to_string());
    } else {
        lines.extend(panel.text.lines().map(str::to_string));
    }
    if panel.edit_mode == EditMode::Editing {
        lines.push(style("(editing)").yellow().to_string());
    }
    lines.push(String::new());

    let actions = panel
        .actions
        .iter()
        .map(|action| match action.phase {
            ActionPhase::Idle => format!("[{}] {}", action.key, action.label),
            ActionPhase::Busy => style(format!("[{}] {}...", action.key, action.label))
                .cyan()
                .to_string(),
        })
        .collect::<Vec<_>>()
        .join("   ");
    lines.push(actions);

    let edit = match panel.edit_mode {
        EditMode::ReadOnly => "Edit",
        EditMode::Editing => "Save",
    };
    lines.push(
        style(format!(
            "[{}] {}   [w] Write draft   [x] Dismiss   [q] Quit",
            EDIT_KEY, edit
        ))
        .dim()
        .to_string(),
    );

    if !view.statuses.is_empty() {
        lines.push(String::new());
    }
    for status in &view.statuses {
        let line = match status.kind {
            StatusKind::Success => style(format!("✔ {}", status.text)).green(),
            StatusKind::Error => style(format!("✖ {}", status.text)).red(),
        };
        lines.push(line.to_string());
    }

    lines
}

/// One status line without styling, for non-interactive output
pub fn status_line(kind: StatusKind, text: &str) -> String {
    match kind {
        StatusKind::Success => format!("✔ {}", text),
        StatusKind::Error => format!("✖ {}", text),
    }
}
