//! State Management
//!
//! Context providers for the session query client, tooltips and toasts.

pub mod providers;

pub use providers::{
    load_config, provide_app_config, provide_toasts, use_app_config, use_query_client,
    use_toasts, use_tooltip, QueryClientProvider, TooltipProvider,
};
