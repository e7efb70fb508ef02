//! marketplace-realtime - connects to the marketplace event endpoint and
//! logs every event until Ctrl-C.

use std::sync::Arc;

use marketplace_realtime::adapters::TungsteniteTransport;
use marketplace_realtime::application::{EventChannel, LocationTracker, NotificationInbox};
use marketplace_realtime::config::AppConfig;
use marketplace_realtime::domain::realtime::{ConnectionStateChanged, OrderUpdate};
use marketplace_realtime::ports::handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    config.logging.init_tracing()?;

    tracing::info!(
        environment = ?config.environment,
        url = %config.realtime.url,
        "starting marketplace realtime client"
    );

    let channel = EventChannel::new(config.realtime.clone(), Arc::new(TungsteniteTransport::new()));

    let locations = LocationTracker::new();
    let inbox = NotificationInbox::new();
    locations.attach(&channel);
    inbox.attach(&channel);

    channel.subscribe(handler(|update: &OrderUpdate| {
        tracing::info!(
            order_id = %update.order_id,
            status = %update.status,
            "order status changed"
        );
        Ok(())
    }));
    channel.subscribe(handler(|change: &ConnectionStateChanged| {
        tracing::info!(from = %change.previous, to = %change.current, "connection state");
        Ok(())
    }));

    channel.connect();

    tokio::signal::ctrl_c().await?;

    tracing::info!(
        tracked_entities = locations.tracked(),
        unread_notifications = inbox.unread_count(),
        "shutting down"
    );
    channel.disconnect();
    Ok(())
}
