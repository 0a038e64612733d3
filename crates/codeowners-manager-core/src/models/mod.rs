//! Data model for hosts, ownership rules and cached ownership records.

mod candidate;
mod host;
mod owner;

pub use candidate::CandidateFile;
pub use host::{AuthenticationType, Host, HostType};
pub use owner::{RepositoryOwner, RepositoryOwnerRecord, RepositoryRef, derive_record_id};
