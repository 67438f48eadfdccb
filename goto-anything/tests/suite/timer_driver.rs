use goto_anything::GotoConfig;
use goto_anything::Navigation;
use goto_anything::Panel;
use goto_anything::Project;
use goto_anything::ProjectFile;
use goto_anything::TickStatus;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

fn large_project(lines: usize) -> Arc<Project> {
    let text = (0..lines)
        .map(|i| format!("line {i} of the long chapter"))
        .collect::<Vec<_>>()
        .join("\n");
    let mut project = Project::new();
    project.add_file(ProjectFile::ink("long.ink", text));
    Arc::new(project)
}

fn config() -> GotoConfig {
    GotoConfig {
        lines_per_group: 50,
        tick_period_ms: 1,
        ..Default::default()
    }
}

#[tokio::test]
async fn interval_driver_renders_up_to_the_cap() {
    let mut panel = Panel::new(config(), |_: Navigation| {});
    panel.show(large_project(5000));
    let active = panel.set_query("chapter").unwrap().unwrap();

    let mut interval = time::interval(active.period);
    let mut ticks = 0;
    loop {
        tokio::select! {
            _ = active.token.cancelled() => break,
            _ = interval.tick() => {
                ticks += 1;
                if panel.tick(active.id) != TickStatus::More {
                    break;
                }
            }
        }
    }

    assert_eq!(panel.rendered().len(), 1000);
    assert_eq!(ticks, 99);
}

#[tokio::test]
async fn replacing_the_query_stops_the_old_timer() {
    let mut panel = Panel::new(config(), |_: Navigation| {});
    panel.show(large_project(500));
    let old = panel.set_query("line").unwrap().unwrap();
    let new = panel.set_query("long").unwrap();

    let stopped = time::timeout(Duration::from_secs(1), old.token.cancelled()).await;
    assert!(stopped.is_ok());
    assert_eq!(panel.tick(old.id), TickStatus::Stale);
    assert!(new.is_some());
}
