//! Page views and the application route table

use serde::Serialize;
use std::fmt;

use crate::routing::{PatternResult, RouteTable};

/// Text rendered by the fallback view
pub const NOT_FOUND_MESSAGE: &str = "404: Page not found";

/// Page-level views the router can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Page {
    Home,
    Resume,
    UploadResumeDashboard,
    ResumeUploadSignIn,
    NotFound,
}

impl Page {
    /// Pages reachable through a declared path, in declaration order
    pub const ROUTED: [Page; 4] = [
        Page::Home,
        Page::Resume,
        Page::UploadResumeDashboard,
        Page::ResumeUploadSignIn,
    ];

    /// Declared path, `None` for the fallback
    pub fn path(self) -> Option<&'static str> {
        match self {
            Page::Home => Some("/"),
            Page::Resume => Some("/resume"),
            Page::UploadResumeDashboard => Some("/upload"),
            Page::ResumeUploadSignIn => Some("/sign-in"),
            Page::NotFound => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Resume => "Resume",
            Page::UploadResumeDashboard => "UploadResumeDashboard",
            Page::ResumeUploadSignIn => "ResumeUploadSignIn",
            Page::NotFound => "NotFound",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The application's route table
pub fn app_routes() -> PatternResult<RouteTable<Page>> {
    let mut table = RouteTable::new();
    for page in Page::ROUTED {
        if let Some(path) = page.path() {
            table = table.route(path, page)?;
        }
    }
    Ok(table.fallback(Page::NotFound))
}
