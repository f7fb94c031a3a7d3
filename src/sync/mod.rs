mod controller;

pub use controller::{SyncController, SyncError, SyncOutcome};
