//! # launchpad-platform
//!
//! Remote collaborators of an installation run: the hosting platform API
//! ([`PlatformApi`], implemented by [`HerokuClient`]) and object storage
//! ([`ObjectStore`], implemented by [`S3Store`]).

pub mod api;
pub mod error;
pub mod heroku;
pub mod storage;

pub use api::{AppInfo, PlatformApi};
pub use error::PlatformError;
pub use heroku::HerokuClient;
pub use storage::{ObjectStore, ObjectStoreFactory, S3Factory, S3Store};
