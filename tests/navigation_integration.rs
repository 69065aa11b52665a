//! Navigation Integration Tests
//!
//! End-to-end flows through the public router API with a recording host.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use navigator_core::{
    ContainerKind, DataModel, DataReceiver, Mode, Payload, SceneBlueprint, SceneContent,
    SceneRef, SceneRegistry,
};
use navigator_router::testing::{Call, RecordingPresenter};
use navigator_router::{Router, RouterConfig};
use tracing_subscriber::EnvFilter;

type Events = Rc<RefCell<Vec<String>>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Screen that records the data it receives
struct Screen {
    name: String,
    events: Events,
}

impl DataReceiver for Screen {
    fn before_show(&self, data: &DataModel, from: Option<&SceneRef>) {
        let from = from.map(|scene| scene.identifier()).unwrap_or("-");
        self.events
            .borrow_mut()
            .push(format!("{} shown from {} as {}", self.name, from, data.mode()));
    }

    fn before_back(&self, data: &Payload, _from: Option<&SceneRef>) {
        if let Some(draft) = data.downcast_ref::<String>() {
            self.events
                .borrow_mut()
                .push(format!("{} will receive {}", self.name, draft));
        }
    }

    fn after_back(&self, data: &Payload) {
        if let Some(draft) = data.downcast_ref::<String>() {
            self.events
                .borrow_mut()
                .push(format!("{} received {}", self.name, draft));
        }
    }
}

impl SceneContent for Screen {
    fn data_receiver(&self) -> Option<&dyn DataReceiver> {
        Some(self)
    }
}

struct App {
    router: Router,
    presenter: Rc<RecordingPresenter>,
    events: Events,
}

impl App {
    fn new(presenter: RecordingPresenter, config: RouterConfig) -> Self {
        init_tracing();
        let events: Events = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SceneRegistry::new();
        for name in ["Inbox", "Thread", "Compose", "Contacts", "Profile", "Missing Page"] {
            let events = Rc::clone(&events);
            registry.register(name, move || Screen {
                name: name.to_string(),
                events: Rc::clone(&events),
            });
        }
        registry
            .register_container("Navigation", ContainerKind::Navigation)
            .register_container("Tabs", ContainerKind::Tab)
            .register_container("Split", ContainerKind::Split);

        let presenter = Rc::new(presenter);
        let router = Router::new(config, registry, presenter.clone());
        Self {
            router,
            presenter,
            events,
        }
    }

    fn events(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

fn root(identifier: &str) -> DataModel {
    DataModel::new(identifier)
        .with_mode(Mode::Reset)
        .with_container("Navigation")
}

/// Push, present, then walk back with data
#[test]
fn test_mail_flow_round_trip() {
    let app = App::new(RecordingPresenter::new(), RouterConfig::default());
    let navigator = app.router.root();

    assert!(navigator.show(&root("Inbox"), false, None));
    assert!(navigator.show(&DataModel::new("Thread"), true, None));
    assert!(navigator.show(&DataModel::new("Compose").with_mode(Mode::Present), true, None));
    assert_eq!(navigator.stack_identifiers(), vec!["Inbox", "Thread", "Compose"]);
    assert_eq!(
        app.events(),
        vec![
            "Inbox shown from - as reset",
            "Thread shown from Inbox as push",
            "Compose shown from Thread as present",
        ]
    );

    let draft = Payload::new("Re: lunch".to_string());
    assert!(navigator.dismiss(Some(draft), 0, true, None));
    assert_eq!(navigator.stack_identifiers(), vec!["Inbox", "Thread"]);
    assert_eq!(
        app.events(),
        vec!["Thread will receive Re: lunch", "Thread received Re: lunch"]
    );

    assert!(navigator.dismiss(None, -1, true, None));
    assert_eq!(navigator.stack_identifiers(), vec!["Inbox"]);
    assert!(!navigator.dismiss(None, 3, true, None));
}

/// Completion of a multi-primitive dismiss waits for every primitive
#[test]
fn test_dismiss_under_modal_completes_once() {
    let app = App::new(RecordingPresenter::deferred(), RouterConfig::default());
    let navigator = app.router.root();

    navigator.show(&root("Inbox"), false, None);
    navigator.show(&DataModel::new("Thread"), false, None);
    navigator.show(&DataModel::new("Compose").with_mode(Mode::Present), false, None);
    app.presenter.flush();
    app.presenter.take_calls();

    let finished = Rc::new(Cell::new(0));
    let sink = Rc::clone(&finished);
    navigator.dismiss(
        None,
        1,
        true,
        Some(Box::new(move || sink.set(sink.get() + 1))),
    );
    assert_eq!(navigator.stack_identifiers(), vec!["Inbox"]);
    assert_eq!(finished.get(), 0);

    assert_eq!(app.presenter.flush(), 2);
    assert_eq!(finished.get(), 1);
    assert_eq!(
        app.presenter.take_calls(),
        vec![
            Call::Dismiss {
                presenter: "Navigation".into(),
                animated: false,
            },
            Call::PopTo {
                container: "Navigation".into(),
                scene: "Inbox".into(),
                animated: true,
            },
        ]
    );
}

/// Tabs keep independent stacks and goto moves between them
#[test]
fn test_tab_stacks_are_independent() {
    let app = App::new(RecordingPresenter::new(), RouterConfig::default());
    let tabs = DataModel::new("Tabs").with_mode(Mode::Reset).with_children(
        ["Inbox", "Contacts", "Profile"]
            .into_iter()
            .map(|name| DataModel::new(name).with_container("Navigation"))
            .collect(),
    );
    assert!(app.router.root().show(&tabs, false, None));
    assert_eq!(app.router.navigators().len(), 4);

    let inbox = app.router.current();
    inbox.show(&DataModel::new("Thread"), true, None);
    assert_eq!(inbox.stack_identifiers(), vec!["Inbox", "Thread"]);

    assert!(app.router.goto("Contacts"));
    let contacts = app.router.current();
    assert_eq!(contacts.stack_identifiers(), vec!["Contacts"]);
    contacts.show(&DataModel::new("Profile"), true, None);

    assert!(app.router.goto("Thread"));
    assert_eq!(app.router.current().id(), inbox.id());
    assert_eq!(inbox.stack_identifiers(), vec!["Inbox", "Thread"]);
    assert_eq!(contacts.stack_identifiers(), vec!["Contacts", "Profile"]);

    let window = app.router.window().unwrap();
    assert_eq!(window.selected_index(), Some(0));
}

/// A reset inside a split replaces the detail pane
#[test]
fn test_split_reset_replaces_detail() {
    let app = App::new(RecordingPresenter::new(), RouterConfig::default());
    let split = DataModel::new("Split").with_mode(Mode::Reset).with_children(vec![
        DataModel::new("Inbox").with_container("Navigation"),
        DataModel::new("Thread").with_container("Navigation"),
    ]);
    app.router.root().show(&split, false, None);
    app.presenter.take_calls();

    let detail = app.router.current();
    assert_eq!(detail.stack_identifiers(), vec!["Thread"]);

    assert!(detail.show(&root("Compose"), false, None));
    assert_eq!(detail.stack_identifiers(), vec!["Compose"]);
    assert!(!detail.owns_window());
    assert_eq!(
        app.presenter.take_calls(),
        vec![Call::ShowDetail {
            split: "Split".into(),
            scene: "Navigation".into(),
        }]
    );

    let window = app.router.window().unwrap();
    assert_eq!(window.identifier(), "Split");
    assert_eq!(window.child_count(), 2);
}

/// Unknown identifiers resolve to the configured fallback
#[test]
fn test_config_fallback_from_json() {
    let config = RouterConfig::from_json(r#"{ "fallback_scene": "Missing Page", "animated": false }"#)
        .unwrap();
    let app = App::new(RecordingPresenter::new(), config);
    let navigator = app.router.root();

    navigator.show(&root("Inbox"), false, None);
    assert!(navigator.show(&DataModel::new("Calendar"), true, None));
    assert_eq!(navigator.stack_identifiers(), vec!["Inbox", "Missing Page"]);
}

/// Scenes built by a request's own creator skip the registry
#[test]
fn test_creator_builds_unregistered_scene() {
    let app = App::new(RecordingPresenter::new(), RouterConfig::default());
    let navigator = app.router.root();
    navigator.show(&root("Inbox"), false, None);

    let events = Rc::clone(&app.events);
    let data = DataModel::with_creator("Attachment", move || {
        SceneBlueprint::content(Screen {
            name: "Attachment".to_string(),
            events: Rc::clone(&events),
        })
    })
    .with_title("invoice.pdf");
    app.events();

    assert!(navigator.show(&data, true, None));
    let top = navigator.top_scene().unwrap();
    assert_eq!(top.identifier(), "Attachment");
    assert_eq!(top.title().as_deref(), Some("invoice.pdf"));
    assert_eq!(app.events(), vec!["Attachment shown from Inbox as push"]);
}

/// Overlays are anchored to the bottom of the presenting bounds
#[test]
fn test_overlay_is_bottom_anchored() {
    let app = App::new(RecordingPresenter::new(), RouterConfig::default());
    let navigator = app.router.root();
    navigator.show(&root("Inbox"), false, None);
    navigator.show(&DataModel::new("Compose").with_mode(Mode::Overlay), true, None);

    let overlay = navigator.top_scene().unwrap();
    let transition = app.router.transition_for(&overlay).unwrap();
    let frame = transition.source_rect();
    assert_eq!(frame.origin.x, 0.0);
    assert_eq!(frame.width(), app.router.config().screen_size.width);
    assert_eq!(
        frame.origin.y + frame.height(),
        app.router.config().screen_size.height
    );

    assert!(navigator.dismiss(None, 0, false, None));
    assert_eq!(navigator.stack_count(), 1);
}
