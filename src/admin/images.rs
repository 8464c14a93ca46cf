//! Image steps of the add and delete flows, with their compensations

use crate::error::Result;
use crate::models::ImageFile;
use crate::remote::Remote;
use crate::storage::{object_name_from_url, DownloadedObject, ObjectKeys};

/// An object this flow uploaded
#[derive(Debug, Clone)]
pub(crate) struct StoredImage {
    pub bucket: String,
    pub name: String,
    pub public_url: String,
}

/// Upload `file` under a fresh name and resolve its public URL
pub(crate) async fn upload<R: Remote + ?Sized>(
    remote: &R,
    keys: &ObjectKeys,
    bucket: &str,
    file: &ImageFile,
) -> Result<StoredImage> {
    let name = keys.next_name(&file.name);
    remote
        .upload(
            bucket,
            &name,
            file.bytes.clone(),
            file.content_type.as_deref(),
            false,
        )
        .await?;
    let public_url = remote.public_url(bucket, &name);
    tracing::debug!(bucket, name = %name, "image uploaded");

    Ok(StoredImage {
        bucket: bucket.to_string(),
        name,
        public_url,
    })
}

/// Undo [`upload`] after the row insert failed
pub(crate) async fn discard<R: Remote + ?Sized>(remote: &R, image: &StoredImage) {
    match remote.remove(&image.bucket, &[image.name.clone()]).await {
        Ok(()) => tracing::info!(bucket = %image.bucket, name = %image.name, "orphaned upload removed"),
        Err(err) => tracing::warn!(
            bucket = %image.bucket,
            name = %image.name,
            error = %err,
            "could not remove orphaned upload"
        ),
    }
}

/// An object this flow removed, with the bytes to put back if needed
#[derive(Debug, Clone)]
pub(crate) struct RemovedImage {
    pub bucket: String,
    pub name: String,
    pub backup: Option<DownloadedObject>,
}

/// Best-effort removal of the object behind `url`.
///
/// The object is downloaded first so it can be restored. A failed backup does
/// not stop the removal; a failed removal yields `None`, as nothing changed.
pub(crate) async fn remove<R: Remote + ?Sized>(
    remote: &R,
    bucket: &str,
    url: &str,
) -> Option<RemovedImage> {
    let name = object_name_from_url(url).to_string();

    let backup = match remote.download(bucket, &name).await {
        Ok(object) => Some(object),
        Err(err) => {
            tracing::warn!(bucket, name = %name, error = %err, "could not back up image");
            None
        }
    };

    match remote.remove(bucket, &[name.clone()]).await {
        Ok(()) => Some(RemovedImage {
            bucket: bucket.to_string(),
            name,
            backup,
        }),
        Err(err) => {
            tracing::warn!(bucket, name = %name, error = %err, "could not remove image");
            None
        }
    }
}

/// Undo [`remove`] after the row delete failed
pub(crate) async fn restore<R: Remote + ?Sized>(remote: &R, removed: RemovedImage) {
    let Some(backup) = removed.backup else {
        tracing::warn!(
            bucket = %removed.bucket,
            name = %removed.name,
            "image removed without a backup; row now references a missing file"
        );
        return;
    };

    match remote
        .upload(
            &removed.bucket,
            &removed.name,
            backup.bytes,
            backup.content_type.as_deref(),
            true,
        )
        .await
    {
        Ok(()) => tracing::info!(bucket = %removed.bucket, name = %removed.name, "image restored"),
        Err(err) => tracing::warn!(
            bucket = %removed.bucket,
            name = %removed.name,
            error = %err,
            "could not restore image"
        ),
    }
}
