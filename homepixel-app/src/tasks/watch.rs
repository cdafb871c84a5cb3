// Watch Task - gibt jede Zustandsänderung des Stores aus
use log::{debug, info};

use homepixel_core::{StateSubscriber, SyncState};

use crate::render::{render_frame, status_label};

/// Watch Task - läuft bis der Aufrufer das Future verwirft
///
/// Gibt zuerst den Start-Zustand aus, danach nur noch die Felder, die sich
/// geändert haben. Event-basiert: wartet blockierend auf den nächsten
/// Broadcast des Stores.
///
/// # Parameter
/// - `initial`: Snapshot zum Zeitpunkt des Abonnierens
/// - `subscriber`: Subscriber auf die State-Broadcasts des Stores
pub async fn watch_task(initial: SyncState, mut subscriber: StateSubscriber<'_>) {
    info!("WATCH: Task started");
    println!("{}", crate::render::render_state(&initial));

    let mut last = initial;
    loop {
        let state = subscriber.next_message_pure().await;
        let changes = describe_change(&last, &state);
        if changes.is_empty() {
            debug!("WATCH: Broadcast without visible change");
        }
        for line in changes {
            println!("{line}");
        }
        last = state;
    }
}

/// Eine Zeile pro geändertem Feld, leer wenn nichts Sichtbares passiert ist
pub fn describe_change(previous: &SyncState, current: &SyncState) -> Vec<String> {
    let mut lines = Vec::new();

    if previous.status != current.status {
        lines.push(format!(
            "status: {} -> {}",
            status_label(previous.status),
            status_label(current.status)
        ));
    }

    if previous.active_preset != current.active_preset {
        if current.active_preset.is_empty() {
            lines.push("preset: none".to_string());
        } else {
            lines.push(format!("preset: {}", current.active_preset));
        }
    }

    if previous.current_frame != current.current_frame {
        lines.push(format!("leds:   {}", render_frame(&current.current_frame)));
    }

    if previous.pending != current.pending {
        lines.push(if current.pending {
            "command: sent".to_string()
        } else {
            "command: done".to_string()
        });
    }

    lines
}
