//! Application Root
//!
//! Builds the shared context once and composes the providers in a fixed
//! order around the routed page:
//!
//! ```text
//! QueryClient provider
//! └── Tooltip provider
//!     ├── Toaster
//!     └── Router output
//! ```
//!
//! [`AppRoot`] lives for the whole session and owns the query client.
//! Each [`AppRoot::mount`] produces a [`MountedApp`] with fresh tooltip,
//! toaster and animation state; dropping it unmounts.

use std::fmt;
use std::rc::Rc;

use super::error::{AppError, AppResult};
use super::pages::{app_routes, Page, NOT_FOUND_MESSAGE};
use crate::cache::QueryClient;
use crate::config::AppConfig;
use crate::providers::{
    AnimationHook, AnimationLifecycle, ProviderKind, ToastHandle, Toaster, TooltipProvider,
};
use crate::routing::{Location, RouteParams, RouteTable, Router};

/// Context handed to every view
#[derive(Clone, Debug)]
pub struct AppContext {
    pub config: Rc<AppConfig>,
    pub query_client: QueryClient,
    pub tooltip: TooltipProvider,
    pub toasts: ToastHandle,
}

/// Session-scoped application root
pub struct AppRoot {
    config: Rc<AppConfig>,
    query_client: QueryClient,
    router: Rc<Router<Page>>,
}

impl AppRoot {
    /// Build the root with the application's route table
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let routes = app_routes()?;
        Self::with_routes(config, routes)
    }

    /// Build the root with a custom route table.
    ///
    /// The query client is constructed first; any failure aborts before
    /// anything else exists.
    pub fn with_routes(config: AppConfig, routes: RouteTable<Page>) -> AppResult<Self> {
        let query_client =
            QueryClient::new(config.query_options()).map_err(AppError::QueryClient)?;

        config.validate()?;
        let router = Router::new(routes)?.with_base(config.router.base.clone());

        tracing::info!(
            routes = router.table().len(),
            base = %router.base(),
            "application root initialized"
        );

        Ok(Self {
            config: Rc::new(config),
            query_client,
            router: Rc::new(router),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn query_client(&self) -> &QueryClient {
        &self.query_client
    }

    pub fn router(&self) -> &Router<Page> {
        &self.router
    }

    /// Establish the providers and return the mounted application
    pub fn mount(&self, animations: Box<dyn AnimationHook>) -> MountedApp {
        let tooltip = TooltipProvider::new(self.config.tooltip_settings());

        let toaster = Toaster::new(self.config.toast_settings());
        toaster.mount();

        let context = AppContext {
            config: Rc::clone(&self.config),
            query_client: self.query_client.clone(),
            tooltip,
            toasts: toaster.handle(),
        };

        tracing::info!("application mounted");

        MountedApp {
            context,
            toaster,
            router: Rc::clone(&self.router),
            animations: AnimationLifecycle::new(animations),
            renders: 0,
        }
    }
}

impl fmt::Debug for AppRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRoot")
            .field("query_client", &self.query_client)
            .field("routes", &self.router.table().len())
            .finish()
    }
}

/// A mounted application instance
#[derive(Debug)]
pub struct MountedApp {
    context: AppContext,
    toaster: Toaster,
    router: Rc<Router<Page>>,
    animations: AnimationLifecycle,
    renders: u64,
}

impl MountedApp {
    /// Render the tree for a location.
    ///
    /// The animation hook runs on the first render of the mount only.
    pub fn render(&mut self, location: &Location) -> RenderTree {
        self.animations.on_render();
        self.renders += 1;

        let selected = self.router.select(location);
        RenderTree {
            providers: ProviderKind::ORDER.to_vec(),
            page: *selected.view,
            params: selected.params,
            pattern: selected.pattern.map(str::to_string),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn animations_active(&self) -> bool {
        self.animations.is_active()
    }

    /// Tear everything down
    pub fn unmount(self) {}
}

impl Drop for MountedApp {
    fn drop(&mut self) {
        self.animations.unmount();
        self.toaster.unmount();
        self.context.tooltip.unmount();
        tracing::info!(renders = self.renders, "application unmounted");
    }
}

/// Output of one render: the provider stack and the selected page
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTree {
    /// Providers outermost first; the toaster sits beside the router output
    pub providers: Vec<ProviderKind>,
    pub page: Page,
    pub params: RouteParams,
    /// Matched pattern, `None` when the fallback rendered
    pub pattern: Option<String>,
}

impl RenderTree {
    pub fn is_not_found(&self) -> bool {
        self.page == Page::NotFound
    }

    /// Literal text of the fallback view
    pub fn fallback_text(&self) -> Option<&'static str> {
        self.is_not_found().then_some(NOT_FOUND_MESSAGE)
    }
}

impl fmt::Display for RenderTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for provider in &self.providers {
            write!(f, "{} > ", provider)?;
        }
        match &self.pattern {
            Some(pattern) => write!(f, "{} ({})", self.page, pattern),
            None => write!(f, "{} [{}]", self.page, NOT_FOUND_MESSAGE),
        }
    }
}
