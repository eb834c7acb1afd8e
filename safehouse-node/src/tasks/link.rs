//! Broker link announcements
//!
//! On every (re)connect the node announces itself online, republishes the
//! inside count and shows a short "MQTT OK". A lost link leaves
//! "MQTT Lost" on the display until the next connect.

use serde_json::Value;
use tokio::sync::watch;

use safehouse_connectors::payload;

use crate::context::NodeContext;
use crate::errors::NodeResult;

pub const LINK_UP_MESSAGE: &str = "MQTT OK";
pub const LINK_DOWN_MESSAGE: &str = "MQTT Lost";

/// Publish the online status and the current inside count
pub async fn announce_online(ctx: &NodeContext) -> NodeResult<()> {
    let now = ctx.now();
    let occupancy = ctx
        .store
        .with_lock(ctx.config.timing.lock_timeout(), |state| {
            state.board.post(LINK_UP_MESSAGE, true, now);
            state.access.occupancy()
        })
        .await?;

    ctx.publish(&ctx.topics.status, &payload::online()).await;
    ctx.publish(&ctx.topics.inside_count, &payload::value(Value::from(occupancy))).await;
    Ok(())
}

/// Show a persistent link-lost status
pub async fn announce_offline(ctx: &NodeContext) -> NodeResult<()> {
    let now = ctx.now();
    ctx.store
        .with_lock(ctx.config.timing.lock_timeout(), |state| {
            state.board.post(LINK_DOWN_MESSAGE, false, now)
        })
        .await?;
    Ok(())
}

async fn apply(ctx: &NodeContext, up: bool) {
    let result = if up {
        log::info!("Broker link up");
        announce_online(ctx).await
    } else {
        log::warn!("Broker link down");
        announce_offline(ctx).await
    };
    if let Err(e) = result {
        log::error!("Link status not applied: {}", e);
    }
}

/// Follow the link state until the sender goes away
///
/// A link that starts down is not reported; only transitions and an
/// already-up link are.
pub async fn watch_link(ctx: NodeContext, mut link: watch::Receiver<bool>) {
    if *link.borrow_and_update() {
        apply(&ctx, true).await;
    }
    while link.changed().await.is_ok() {
        let up = *link.borrow_and_update();
        apply(&ctx, up).await;
    }
}
