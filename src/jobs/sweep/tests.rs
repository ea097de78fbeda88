use tokio::time::{Duration, sleep, timeout};

use crate::{
    app_context::AppContext,
    config::Config,
    fleet::model::{HostIdentity, Thresholds},
    inventory::Inventory,
    jobs::render_frame,
    layout::{DragEvent, ScrollPhase},
};

use super::start_sweep_job;

const CONFIG: &str = r#"
inventory_path = "inventory.json"

[layout]
rows = 3
sweep_speed_px_per_sec = 0.0
sweep_tick_ms = 10

[alerts]
remote = "none"
flag_path = ""
audible = false
"#;

fn inventory(hosts: usize) -> Inventory {
    Inventory {
        hosts: (0..hosts)
            .map(|n| HostIdentity {
                id: format!("h{}", n),
                display_name: format!("host {}", n),
                group_label: "ops".to_string(),
                query_target: format!("10.0.0.{}:9100", n),
            })
            .collect(),
        thresholds: Thresholds::default(),
    }
}

fn app() -> AppContext {
    let config: Config = toml::from_str(CONFIG).expect("config should parse");
    AppContext::new(config, inventory(40), "unused.toml", None).expect("app context should build")
}

#[tokio::test]
async fn drag_events_reach_the_track_through_the_sweep_job() {
    let app = app();
    let frame = render_frame(&app).await;
    assert!(frame.max_scroll > 100);
    assert_eq!(frame.scroll.phase, ScrollPhase::Sweeping);

    let mut offsets = app.scroll_offset.subscribe();
    start_sweep_job(app.clone());

    app.drag_events
        .send(DragEvent::Start { pointer_x: 500.0 })
        .expect("sweep job should be listening");
    app.drag_events
        .send(DragEvent::Move { pointer_x: 440.0 })
        .expect("sweep job should be listening");

    timeout(Duration::from_secs(2), offsets.wait_for(|offset| *offset == 60.0))
        .await
        .expect("dragged offset should be published")
        .expect("offset channel should stay open");

    let held = render_frame(&app).await;
    assert_eq!(held.scroll.phase, ScrollPhase::Dragging);
    assert_eq!(held.scroll.offset, 60.0);

    app.drag_events
        .send(DragEvent::Release)
        .expect("sweep job should be listening");
    timeout(Duration::from_secs(2), async {
        while app.scroll.lock().await.is_dragging() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("release should be applied");

    let released = app.scroll.lock().await.snapshot();
    assert_eq!(released.phase, ScrollPhase::Sweeping);
    assert_eq!(released.offset, 60.0);
}

#[tokio::test]
async fn second_sweep_job_leaves_the_inbox_to_the_first() {
    let app = app();
    start_sweep_job(app.clone());
    start_sweep_job(app.clone());
    sleep(Duration::from_millis(20)).await;

    assert!(app.drag_inbox.lock().await.is_none());
    app.drag_events
        .send(DragEvent::Start { pointer_x: 0.0 })
        .expect("first job still owns the receiver");
}
