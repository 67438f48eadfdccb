use goto_anything::GotoConfig;
use goto_anything::Navigation;
use goto_anything::Panel;
use goto_anything::PanelKey;
use goto_anything::ProjectConfig;
use goto_anything::ResultKind;
use goto_anything::TickStatus;
use goto_anything::load_project;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

fn write_story(root: &Path) {
    fs::create_dir_all(root.join("chapters")).unwrap();
    fs::write(
        root.join("main.ink"),
        "INCLUDE chapters/cellar.ink\n\
         === intro ===\n\
         You stand in the lantern hall.\n\
         = lantern\n\
         * (grab) Grab the lantern\n\
         -> cellar\n",
    )
    .unwrap();
    fs::write(
        root.join("chapters/cellar.ink"),
        "=== cellar ===\n\
         = stairs\n\
         It is dark without a lantern.\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "lantern notes").unwrap();
}

fn drain(panel: &mut Panel<mpsc::UnboundedSender<Navigation>>, query: &str) {
    if let Some(active) = panel.set_query(query).unwrap() {
        while panel.tick(active.id) == TickStatus::More {}
    }
}

#[test]
fn active_file_symbols_nest_and_others_stay_top_level() {
    let dir = TempDir::new().unwrap();
    write_story(dir.path());
    let mut project = load_project(dir.path(), &ProjectConfig::default()).unwrap();
    assert!(project.set_active_path("main.ink").is_some());

    let (tx, _rx) = mpsc::unbounded_channel();
    let mut panel = Panel::new(GotoConfig::default(), tx);
    panel.show(Arc::new(project));

    drain(&mut panel, "lantern");
    let symbols: Vec<(String, Option<String>)> = panel
        .rendered()
        .iter()
        .filter(|r| r.kind() == ResultKind::Symbol)
        .map(|r| (r.label.text.clone(), r.breadcrumb.clone()))
        .collect();
    assert_eq!(
        symbols,
        vec![("lantern".to_string(), Some("intro.".to_string()))]
    );

    drain(&mut panel, "stairs");
    assert!(
        panel
            .rendered()
            .iter()
            .all(|r| r.kind() == ResultKind::Content)
    );
}

#[test]
fn content_matches_follow_name_matches_in_file_order() {
    let dir = TempDir::new().unwrap();
    write_story(dir.path());
    let project = load_project(dir.path(), &ProjectConfig::default()).unwrap();

    let (tx, _rx) = mpsc::unbounded_channel();
    let mut panel = Panel::new(GotoConfig::default(), tx);
    panel.show(Arc::new(project));
    drain(&mut panel, "lantern");

    let content: Vec<(String, usize)> = panel
        .rendered()
        .iter()
        .filter(|r| r.kind() == ResultKind::Content)
        .map(|r| (r.location.clone().unwrap(), r.result.row().unwrap()))
        .collect();
    assert_eq!(
        content,
        vec![
            ("chapters/cellar.ink".to_string(), 2),
            ("main.ink".to_string(), 2),
            ("main.ink".to_string(), 3),
            ("main.ink".to_string(), 4),
        ]
    );
    let first_content = panel
        .rendered()
        .iter()
        .position(|r| r.kind() == ResultKind::Content)
        .unwrap();
    assert!(
        panel.rendered()[..first_content]
            .iter()
            .all(|r| r.kind() != ResultKind::Content)
    );
}

#[test]
fn keyboard_choice_reaches_the_sink() {
    let dir = TempDir::new().unwrap();
    write_story(dir.path());
    let mut project = load_project(dir.path(), &ProjectConfig::default()).unwrap();
    project.set_active_path("main.ink");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut panel = Panel::new(GotoConfig::default(), tx);
    panel.show(Arc::new(project));
    panel.focus_input();
    drain(&mut panel, "grab");

    assert_eq!(panel.rendered()[0].kind(), ResultKind::Symbol);
    panel.handle_key(PanelKey::Enter).unwrap();
    let navigation = rx.try_recv().unwrap();
    assert_eq!(navigation.path, "main.ink");
    assert_eq!(navigation.row, Some(4));
    assert!(!panel.is_visible());
}
