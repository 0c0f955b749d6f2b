// Authentication module
// Bearer-token verification, the shared Principal extractor and the
// organization-scoped authorization guard

pub mod guard;
pub mod middleware;
pub mod models;
pub mod password;
pub mod token;

// Re-export commonly used types
pub use guard::{authorize, authorize_global, authorize_organization, require_role};
pub use models::{AuthorizationDecision, DenyReason, Principal, Role};
pub use password::PasswordService;
pub use token::TokenService;
