pub mod args;

pub mod config;
use config::Config;

pub mod database;

mod directories;
pub use directories::Directories;

mod error;
pub use error::Error;

mod http;
pub use http::Client;

mod reconcile;
pub use reconcile::{reconcile, renumber};

mod roster;
pub use roster::{Confirm, Roster};

mod store;
pub use store::{KeyValueStore, SnapshotStore};

mod user;
pub use user::{Address, Company, Draft, User};
