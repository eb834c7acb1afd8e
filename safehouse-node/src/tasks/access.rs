//! Identity-scan callback

use safehouse_connectors::payload;
use safehouse_core::access::{Identity, ScanOutcome};

use crate::context::NodeContext;
use crate::errors::NodeResult;

/// Handle one identity observed by the scanner
///
/// The scan and the status message are applied under the store lock;
/// notifications go out after it is released. Only an escalation sounds
/// the buzzer, and the callback returns once that alarm has finished.
pub async fn on_identity_scanned(ctx: &NodeContext, raw: &str) -> NodeResult<ScanOutcome> {
    let identity = Identity::parse(raw).map_err(|e| {
        log::warn!("Ignored malformed identity {:?}: {}", raw, e);
        e
    })?;

    let now = ctx.now();
    let outcome = ctx
        .store
        .with_lock(ctx.config.timing.lock_timeout(), |state| {
            let outcome = state.access.scan(&identity);
            let (message, temporary) = outcome.status_message();
            state.board.post(message, temporary, now);
            outcome
        })
        .await
        .map_err(|e| {
            log::error!("Scan of {} skipped: {}", identity, e);
            e
        })?;

    match outcome {
        ScanOutcome::Entry { occupancy } => log::info!("Entry: {} (inside {})", identity, occupancy),
        ScanOutcome::Exit { occupancy } => log::info!("Exit: {} (inside {})", identity, occupancy),
        ScanOutcome::Denied { attempts } => {
            log::warn!("Unauthorized: {} (attempt {})", identity, attempts)
        }
        ScanOutcome::Escalated { attempts } => {
            log::error!("Repeated unauthorized access: {} ({} attempts)", identity, attempts)
        }
    }

    ctx.publish_all(&payload::scan_messages(&outcome, &identity, &ctx.topics)).await;

    if let ScanOutcome::Escalated { .. } = outcome {
        ctx.annunciator.alarm(ctx.config.actuation.escalation(), false).await;
    }
    Ok(outcome)
}
