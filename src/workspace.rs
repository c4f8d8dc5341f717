//! Workspace domain: resolved directory layout and link topology status.

mod layout;
mod status;

pub use layout::{resolve_against, WorkspaceLayout};
pub use status::{FolderState, SubdomainStatus, TopologyStatus};
