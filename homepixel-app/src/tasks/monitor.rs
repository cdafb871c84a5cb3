// Monitor Task - hält den Gerätestatus aktuell
use log::info;

use homepixel_core::{DeviceTransport, PixelClient, ShutdownSignal};

/// Monitor Task - läuft bis `shutdown` signalisiert wird
///
/// Probt sofort und danach periodisch. Wird das Gerät erreichbar, holt
/// der Client direkt den aktuellen Zustand (siehe `PixelClient::run`).
pub async fn monitor_task<T: DeviceTransport>(client: &PixelClient<'_, T>, shutdown: &ShutdownSignal) {
    info!("MONITOR: Task started");
    client.run(shutdown).await;
    info!("MONITOR: Task finished");
}
