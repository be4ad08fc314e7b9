//! JSON document protocol spoken across the native boundary.
//!
//! Requests are typed `Serialize` structs; responses carry an `ok`
//! discriminant that is translated into `Result` before any payload is
//! decoded.

pub mod request;
pub mod response;

pub use request::{ExportRelationsRequest, ImportFromBackupRequest};
pub use response::{RelationHeader, RelationRow};

pub(crate) use response::{decode_data, decode_rows, decode_unit};
