//! Asset bucket preparation.

use launchpad_core::{InstallError, InstallationConfig};
use launchpad_platform::{ObjectStore, ObjectStoreFactory};

/// Create the private `{app}-assets` bucket when storage credentials are
/// configured. Returns the bucket name, or `None` when storage is disabled.
///
/// Not idempotent: a second call against the same account fails because the
/// bucket already exists.
pub fn prepare_storage<F: ObjectStoreFactory>(
    config: &InstallationConfig,
    factory: &F,
) -> Result<Option<String>, InstallError> {
    let Some(credentials) = config.storage() else {
        tracing::debug!("storage disabled; no bucket created");
        return Ok(None);
    };

    let bucket = config.bucket_name();
    let provision_err = |reason: String| InstallError::StorageProvision {
        bucket: bucket.clone(),
        reason,
    };

    let store = factory
        .connect(credentials)
        .map_err(|e| provision_err(e.to_string()))?;
    store
        .create_bucket(&bucket, false)
        .map_err(|e| provision_err(e.to_string()))?;

    tracing::info!(bucket = %bucket, "created asset bucket");
    Ok(Some(bucket))
}
