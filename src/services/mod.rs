pub mod credentials;
pub use credentials::{CredentialEngine, CredentialError};

pub mod policy;
pub use policy::{AuthError, require_admin, require_field_access, require_self_or_admin};

pub mod tokens;
pub use tokens::{Claims, TokenService};

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserService};
pub use user_service_impl::SeaOrmUserService;
