//! Pages
//!
//! Top-level page components, one per routed view.

pub mod home;
pub mod not_found;
pub mod resume;
pub mod sign_in;
pub mod upload;

pub use home::Home;
pub use not_found::NotFound;
pub use resume::Resume;
pub use sign_in::ResumeUploadSignIn;
pub use upload::UploadResumeDashboard;
