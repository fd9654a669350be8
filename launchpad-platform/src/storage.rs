//! Object storage: bucket creation only.

use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::BucketCannedAcl;

use launchpad_core::StorageCredentials;

use crate::error::PlatformError;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Bucket-creating object store.
pub trait ObjectStore {
    fn create_bucket(&self, name: &str, public: bool) -> Result<(), PlatformError>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn create_bucket(&self, name: &str, public: bool) -> Result<(), PlatformError> {
        (**self).create_bucket(name, public)
    }
}

/// Builds a store from credentials. The installer only constructs one when
/// storage is enabled.
pub trait ObjectStoreFactory {
    type Store: ObjectStore;

    fn connect(&self, credentials: &StorageCredentials) -> Result<Self::Store, PlatformError>;
}

/// S3 store driven from a private single-threaded runtime so callers stay
/// synchronous.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    runtime: tokio::runtime::Runtime,
}

impl S3Store {
    pub fn new(credentials: &StorageCredentials, region: &str) -> Result<Self, PlatformError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| PlatformError::Storage(format!("cannot start runtime: {e}")))?;
        let credentials = Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            None,
            None,
            "launchpad",
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version_latest()
            .region(Region::new(region.to_owned()))
            .credentials_provider(credentials)
            .build();
        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(config),
            runtime,
        })
    }
}

impl ObjectStore for S3Store {
    fn create_bucket(&self, name: &str, public: bool) -> Result<(), PlatformError> {
        let acl = if public {
            BucketCannedAcl::PublicRead
        } else {
            BucketCannedAcl::Private
        };
        tracing::debug!(bucket = name, public, "creating bucket");
        self.runtime
            .block_on(self.client.create_bucket().bucket(name).acl(acl).send())
            .map_err(|e| PlatformError::Storage(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

/// Connects [`S3Store`]s in a fixed region.
#[derive(Debug, Clone)]
pub struct S3Factory {
    pub region: String,
}

impl Default for S3Factory {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_owned(),
        }
    }
}

impl ObjectStoreFactory for S3Factory {
    type Store = S3Store;

    fn connect(&self, credentials: &StorageCredentials) -> Result<S3Store, PlatformError> {
        S3Store::new(credentials, &self.region)
    }
}
