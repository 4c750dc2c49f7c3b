//! End-to-end behavior of the application root: routing, provider
//! lifecycle and the shared query client.

use resume_portal::{
    AnimationHook, AppConfig, AppError, AppRoot, Location, MemoryHistory, Page, QueryKey,
    RouteConfigError, RouteTable, NOT_FOUND_MESSAGE,
};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct CountingAnimations {
    inits: Rc<Cell<u32>>,
    teardowns: Rc<Cell<u32>>,
}

impl AnimationHook for CountingAnimations {
    fn init(&mut self) {
        self.inits.set(self.inits.get() + 1);
    }

    fn teardown(&mut self) {
        self.teardowns.set(self.teardowns.get() + 1);
    }
}

fn root() -> AppRoot {
    AppRoot::new(AppConfig::default()).unwrap()
}

#[test]
fn declared_paths_render_exactly_their_page() {
    let root = root();
    let mut app = root.mount(Box::new(CountingAnimations::default()));

    let expected = [
        ("/", Page::Home),
        ("/resume", Page::Resume),
        ("/upload", Page::UploadResumeDashboard),
        ("/sign-in", Page::ResumeUploadSignIn),
    ];
    for (path, page) in expected {
        let tree = app.render(&Location::parse(path));
        assert_eq!(tree.page, page, "path {}", path);
        assert_eq!(tree.fallback_text(), None);
    }
}

#[test]
fn undeclared_paths_render_not_found() {
    let root = root();
    let mut app = root.mount(Box::new(CountingAnimations::default()));

    for path in ["/nonexistent", "/resume/", "/made-up-path", "/sign-in/extra"] {
        let tree = app.render(&Location::parse(path));
        assert_eq!(tree.page, Page::NotFound, "path {}", path);
        assert_eq!(tree.fallback_text(), Some(NOT_FOUND_MESSAGE));
    }
    assert_eq!(NOT_FOUND_MESSAGE, "404: Page not found");
}

#[test]
fn navigation_scenario() {
    let root = root();
    let mut app = root.mount(Box::new(CountingAnimations::default()));
    let mut history = MemoryHistory::default();

    assert_eq!(app.render(history.current()).page, Page::Home);

    history.push("/upload");
    assert_eq!(app.render(history.current()).page, Page::UploadResumeDashboard);

    history.push("/made-up-path");
    assert_eq!(
        app.render(history.current()).fallback_text(),
        Some("404: Page not found")
    );

    history.back();
    assert_eq!(app.render(history.current()).page, Page::UploadResumeDashboard);
}

#[test]
fn fallback_declared_first_never_shadows_real_routes() {
    let mut table = RouteTable::new().fallback(Page::NotFound);
    for page in Page::ROUTED {
        table = table.route(page.path().unwrap(), page).unwrap();
    }

    let root = AppRoot::with_routes(AppConfig::default(), table).unwrap();
    let mut app = root.mount(Box::new(CountingAnimations::default()));

    for page in Page::ROUTED {
        assert_eq!(app.render(&Location::parse(page.path().unwrap())).page, page);
    }
    assert!(app.render(&Location::parse("/elsewhere")).is_not_found());
}

#[test]
fn missing_fallback_is_a_configuration_error() {
    let mut table = RouteTable::new();
    for page in Page::ROUTED {
        table = table.route(page.path().unwrap(), page).unwrap();
    }

    // Resolution without a fallback is a safe "no match"
    assert!(table.resolve("/nowhere").is_none());

    let err = AppRoot::with_routes(AppConfig::default(), table).unwrap_err();
    assert_eq!(err, AppError::Routes(RouteConfigError::MissingFallback));
}

#[test]
fn duplicate_routes_are_a_configuration_error() {
    let table = RouteTable::new()
        .route("/upload", Page::UploadResumeDashboard)
        .unwrap()
        .route("/upload", Page::Resume)
        .unwrap()
        .fallback(Page::NotFound);

    assert!(matches!(
        AppRoot::with_routes(AppConfig::default(), table),
        Err(AppError::Routes(RouteConfigError::AmbiguousRoute { .. }))
    ));
}

#[test]
fn animation_hook_runs_once_per_mount() {
    let root = root();
    let counts = CountingAnimations::default();

    let mut app = root.mount(Box::new(counts.clone()));
    for path in ["/", "/resume", "/", "/upload"] {
        app.render(&Location::parse(path));
    }
    assert_eq!(counts.inits.get(), 1);
    assert!(app.animations_active());
    app.unmount();
    assert_eq!(counts.teardowns.get(), 1);

    // Remount: fires again, once
    let mut app = root.mount(Box::new(counts.clone()));
    app.render(&Location::root());
    app.render(&Location::root());
    assert_eq!(counts.inits.get(), 2);
    drop(app);
    assert_eq!(counts.teardowns.get(), 2);
}

#[test]
fn mount_without_render_does_not_init_animations() {
    let root = root();
    let counts = CountingAnimations::default();
    let app = root.mount(Box::new(counts.clone()));
    assert_eq!(counts.inits.get(), 0);
    drop(app);
    assert_eq!(counts.teardowns.get(), 0);
}

#[test]
fn query_client_is_shared_across_renders_and_mounts() {
    let root = root();

    let mut first = root.mount(Box::new(CountingAnimations::default()));
    first.render(&Location::parse("/resume"));
    let client = first.context().query_client.clone();
    first.render(&Location::parse("/upload"));
    assert!(client.ptr_eq(&first.context().query_client));
    assert!(client.ptr_eq(root.query_client()));

    client.set_query_data(QueryKey::from("/api/resume"), json!({"title": "CV"}));
    first.unmount();

    let second = root.mount(Box::new(CountingAnimations::default()));
    assert!(client.ptr_eq(&second.context().query_client));
    assert_eq!(
        second.context().query_client.get_query_data("/api/resume"),
        Some(json!({"title": "CV"}))
    );
}

#[test]
fn providers_are_torn_down_on_unmount() {
    let root = root();
    let app = root.mount(Box::new(CountingAnimations::default()));
    let tooltip = app.context().tooltip.clone();
    let toasts = app.context().toasts.clone();
    let toaster = app.toaster().clone();

    assert!(tooltip.register().is_ok());
    app.unmount();

    assert!(!tooltip.is_mounted());
    assert!(!toaster.is_mounted());
    assert_eq!(
        toasts.toast(resume_portal::ToastContent::new("late")),
        None
    );
}

#[test]
fn redirect_urls_in_the_query_do_not_change_the_page() {
    let root = root();
    let mut app = root.mount(Box::new(CountingAnimations::default()));

    let tree = app.render(&Location::parse("/sign-in?next=https://example.com/upload"));
    assert_eq!(tree.page, Page::ResumeUploadSignIn);

    let tree = app.render(&Location::parse("/resume#from=https://example.com/upload"));
    assert_eq!(tree.page, Page::Resume);
}

#[test]
fn ambiguous_optional_route_is_a_configuration_error() {
    let table = RouteTable::new()
        .route("/resume", Page::Resume)
        .unwrap()
        .route("/resume/:id?", Page::UploadResumeDashboard)
        .unwrap()
        .fallback(Page::NotFound);

    assert_eq!(
        AppRoot::with_routes(AppConfig::default(), table).unwrap_err(),
        AppError::Routes(RouteConfigError::AmbiguousRoute {
            first: "/resume".to_string(),
            second: "/resume/:id?".to_string(),
        })
    );
}

#[test]
fn links_built_from_the_base_path_stay_inside_the_app() {
    let mut config = AppConfig::default();
    config.router.base = "/portal".to_string();
    let links: Vec<(String, Page)> = Page::ROUTED
        .iter()
        .map(|page| (config.router.href(page.path().unwrap()), *page))
        .collect();

    let root = AppRoot::new(config).unwrap();
    let mut app = root.mount(Box::new(CountingAnimations::default()));
    for (href, page) in links {
        assert_eq!(app.render(&Location::parse(&href)).page, page, "href {}", href);
    }
    assert!(app.render(&Location::parse("/upload")).is_not_found());
}

#[test]
fn oversized_delays_are_rejected_at_startup() {
    let mut config = AppConfig::default();
    config.tooltip.delay_duration_ms = 100_000_000_000_000_000;
    assert!(matches!(AppRoot::new(config), Err(AppError::Config(_))));

    let mut config = AppConfig::default();
    config.toast.remove_delay_ms = 100_000_000_000_000_000;
    assert!(matches!(AppRoot::new(config), Err(AppError::Config(_))));
}
