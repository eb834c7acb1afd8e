//! Periodic alert task
//!
//! Each cycle copies the reading and the inside count out of the store,
//! runs the edge-triggered evaluator on the copy and, for every newly
//! raised condition, posts the status message and publishes the alert.
//! The strongest actuation class among the fired alerts is then sounded
//! inline, so the task does not evaluate again until the alarm ends.

use tokio::time::MissedTickBehavior;

use safehouse_connectors::payload;
use safehouse_core::alerts::{strongest_actuation, ActuationClass, AlertEvaluator, FiredAlerts};

use crate::context::NodeContext;
use crate::errors::NodeResult;

/// One evaluation cycle
///
/// A lock timeout on the initial copy skips the cycle without touching the
/// latches.
pub async fn run_alert_cycle(ctx: &NodeContext, evaluator: &mut AlertEvaluator) -> NodeResult<FiredAlerts> {
    let timing = &ctx.config.timing;

    let (reading, occupancy) = ctx
        .store
        .with_lock(timing.lock_timeout(), |state| (state.reading, state.access.occupancy()))
        .await
        .map_err(|e| {
            log::error!("Alert cycle skipped: {}", e);
            e
        })?;

    let fired = evaluator.evaluate(&reading, occupancy);
    if fired.is_empty() {
        return Ok(fired);
    }

    let messages: Vec<&'static str> = fired.iter().filter_map(|kind| kind.status_message()).collect();
    if !messages.is_empty() {
        let now = ctx.now();
        let posted = ctx
            .store
            .with_lock(timing.lock_timeout(), |state| {
                for message in &messages {
                    state.board.post(message, false, now);
                }
            })
            .await;
        if let Err(e) = posted {
            log::warn!("Alert status not shown: {}", e);
        }
    }

    for kind in &fired {
        ctx.publish(&ctx.topics.alert, &payload::sensor_alert(*kind)).await;
    }

    let actuation = &ctx.config.actuation;
    match strongest_actuation(&fired) {
        Some(ActuationClass::Pulse) => {
            ctx.annunciator.alarm(actuation.threshold_pulse(), false).await;
        }
        Some(ActuationClass::Extended) => {
            ctx.annunciator.alarm(actuation.unoccupied_motion(), true).await;
            clear_motion(ctx).await;
        }
        None => {}
    }

    Ok(fired)
}

/// Reset the stored motion flag once its alarm has run
async fn clear_motion(ctx: &NodeContext) {
    let cleared = ctx
        .store
        .with_lock(ctx.config.timing.receive_lock_timeout(), |state| state.reading.motion = false)
        .await;
    match cleared {
        Ok(()) => log::info!("Motion flag reset after alert"),
        Err(e) => log::error!("Motion flag not reset: {}", e),
    }
}

/// Poll forever at the configured alert period
pub async fn run(ctx: NodeContext) {
    let mut evaluator = AlertEvaluator::new(ctx.config.alerts);
    let mut ticker = tokio::time::interval(ctx.config.timing.alert_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        // Failures are logged inside the cycle
        let _ = run_alert_cycle(&ctx, &mut evaluator).await;
    }
}
