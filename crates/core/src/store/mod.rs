mod error;
mod serialization;
mod traits;
mod types;

pub use error::{Result, StoreError};
pub use serialization::{decode_record, encode_record};
pub use traits::{LocalStore, Record};
pub use types::{Query, StoredRecord};
