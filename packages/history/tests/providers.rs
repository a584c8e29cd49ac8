use std::{cell::RefCell, rc::Rc};

use pretty_assertions::assert_eq;
use waypoint_history::{CallbackHistory, History, HistoryError, MemoryHistory};

fn record(history: &dyn History) -> Rc<RefCell<Vec<String>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    history.add_change_listener(Rc::new(move |source: &str, target: &str| {
        sink.borrow_mut().push(format!("{source} -> {target}"));
    }));
    events
}

#[test]
fn providers_are_interchangeable() {
    let providers: Vec<Rc<dyn History>> = vec![
        Rc::new(MemoryHistory::with_initial_path("/")),
        Rc::new(CallbackHistory::new(|| "/".to_string())),
    ];
    for provider in providers {
        assert_eq!(provider.current_uri(), "/");
        provider.go(0).unwrap();
    }
}

#[test]
fn shared_memory_history_reports_every_transition() {
    let history = Rc::new(MemoryHistory::default());
    let events = record(&history);

    history.navigate_to("/a").unwrap();
    history.navigate_to("/b").unwrap();
    history.go(-1).unwrap();
    history.go(-10).unwrap();
    history.go(1).unwrap();
    history.replace("/c").unwrap();

    assert_eq!(
        *events.borrow(),
        vec!["/ -> /a", "/a -> /b", "/b -> /a", "/a -> /", "/ -> /a", "/a -> /c"]
    );
    assert_eq!(history.entries(), vec!["/", "/c", "/b"]);
    assert_eq!(history.position(), 1);
}

#[test]
fn rejected_uris_leave_no_trace() {
    let history = MemoryHistory::default();
    let events = record(&history);

    let err = history.navigate_to("//evil.example").unwrap_err();
    assert!(matches!(err, HistoryError::Rejected { .. }));
    assert!(history.replace("//evil.example").is_err());
    assert_eq!(history.current_uri(), "/");
    assert!(events.borrow().is_empty());
}
