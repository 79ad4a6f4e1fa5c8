pub mod endpoints;
mod error;
mod status;
mod traits;
mod types;

pub use error::{RemoteError, Result};
pub use status::status_to_remote_error;
pub use traits::RemoteClient;
pub use types::{Endpoint, Method};
