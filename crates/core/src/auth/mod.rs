mod error;
mod functions;
mod traits;
mod types;

pub use error::AuthError;
pub use functions::{bearer_header, calculate_expiry, email_to_name, is_token_expired};
pub use traits::{Result, TokenStore};
pub use types::{AuthResponse, AuthResponseDto, LoginRequest, RegisterRequest, TokenPair};
