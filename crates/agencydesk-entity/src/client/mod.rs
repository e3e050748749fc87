//! Client brand profiles.

pub mod model;
pub mod patch;

pub use model::{Client, ClientFilter, NewClient, dedup_ids};
pub use patch::ClientPatch;
