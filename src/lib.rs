//! # Resume Portal
//!
//! Application root for the resume upload web app: the route table that maps
//! paths to pages, and the shared contexts every page runs inside.
//!
//! ## Modules
//!
//! - [`routing`]: route patterns, the ordered route table and the router
//! - [`cache`]: session-wide query cache shared by all pages
//! - [`providers`]: tooltip context, toast notifications, animation lifecycle
//! - [`app`]: page views, the application root and its render output
//! - [`config`]: TOML configuration with environment overrides
//!
//! The Leptos frontend in `resume-portal-ui` renders these in the browser.
//!
//! ## Quick Start
//!
//! ```rust
//! use resume_portal::{AppConfig, AppRoot, Location, NoopAnimations, Page};
//!
//! let root = AppRoot::new(AppConfig::default())?;
//! let mut app = root.mount(Box::new(NoopAnimations));
//!
//! let tree = app.render(&Location::parse("/upload"));
//! assert_eq!(tree.page, Page::UploadResumeDashboard);
//!
//! let tree = app.render(&Location::parse("/made-up-path"));
//! assert_eq!(tree.fallback_text(), Some("404: Page not found"));
//! # Ok::<(), resume_portal::AppError>(())
//! ```

pub mod app;
pub mod cache;
pub mod config;
pub mod providers;
pub mod routing;

// Re-export top-level types for convenience
pub use app::{
    app_routes, AppContext, AppError, AppResult, AppRoot, MountedApp, Page, RenderTree,
    NOT_FOUND_MESSAGE,
};

pub use cache::{
    QueryClient, QueryError, QueryKey, QueryOptions, QueryResult, QueryState, QueryStatus,
    UnauthorizedBehavior,
};

pub use providers::{
    AnimationHook, AnimationLifecycle, NoopAnimations, ProviderError, ProviderKind, Toast,
    ToastAction, ToastContent, ToastHandle, ToastId, ToastSettings, ToastVariant, Toaster,
    TooltipId, TooltipPhase, TooltipProvider, TooltipSettings,
};

pub use routing::{
    Location, MemoryHistory, PatternError, RouteConfigError, RouteMatch, RouteParams,
    RoutePattern, RouteTable, Router,
};

pub use config::{
    generate_default_config, AnimationConfig, AppConfig, ConfigError, LoggingConfig, RouterConfig,
    MAX_DELAY_MS,
};
