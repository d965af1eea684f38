use crate::render::status_line;
use crate::session::Session;
use anyhow::{Result, anyhow, bail};
use popdeck_core::{ActionOutcome, PanelController, PanelId, StatusFeed, StatusKind};
use std::path::Path;

/// Run one action of `panel` against the active tab of the Chrome on `port`
///
/// The panel starts empty, so actions that send or copy text have nothing to
/// work with here; they report their "no data" status.
pub fn execute(panel: PanelId, action: &str, port: u16, store: &Path) -> Result<()> {
    let spec = panel.spec();
    if spec.action(action).is_none() {
        let known = spec
            .actions
            .iter()
            .map(|a| a.id)
            .collect::<Vec<_>>()
            .join(", ");
        bail!("Unknown action '{}' for panel {} (expected one of: {})", action, panel, known);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let session = Session::attach(port, store).await?;
        let controller = PanelController::new(
            spec,
            session.gateway.clone(),
            session.tracker.clone(),
            StatusFeed::default(),
        );

        let outcome = controller.trigger(action).await?;

        let text = controller.text();
        if !text.is_empty() {
            println!("{}", text);
        }

        match outcome {
            ActionOutcome::Succeeded { message } => {
                println!("{}", status_line(StatusKind::Success, &message));
                Ok(())
            }
            ActionOutcome::Failed { message, .. } => Err(anyhow!(message)),
            ActionOutcome::Discarded => bail!("Action was discarded"),
        }
    })
}
