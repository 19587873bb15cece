use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;

/// Creates the bucket when it does not exist yet. Any other `head_bucket`
/// failure (credentials, network) is returned as is.
pub async fn ensure_bucket(s3: &S3Client, bucket: &str) -> Result<(), AppError> {
    match s3.head_bucket().bucket(bucket).send().await {
        Ok(_) => return Ok(()),
        Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => {
            info!("Bucket {bucket} not found, creating it");
        }
        Err(e) => {
            let cause = DisplayErrorContext(&e);
            warn!("Checking bucket {bucket} failed: {cause}");
            return Err(AppError::S3(format!("head bucket {bucket} failed: {cause}")));
        }
    }

    s3.create_bucket()
        .bucket(bucket)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("create bucket {bucket} failed: {e}")))?;

    info!("Bucket {bucket} created successfully");
    Ok(())
}

pub async fn put_object(
    s3: &S3Client,
    bucket: &str,
    key: &str,
    body: Bytes,
    content_type: &str,
) -> Result<(), AppError> {
    let size = body.len();
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload {key} failed: {e}")))?;

    info!("Uploaded {size} bytes to s3://{bucket}/{key}");
    Ok(())
}

pub async fn delete_object(s3: &S3Client, bucket: &str, key: &str) -> Result<(), AppError> {
    s3.delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("delete {key} failed: {e}")))?;

    info!("Deleted s3://{bucket}/{key}");
    Ok(())
}

pub async fn get_object(s3: &S3Client, bucket: &str, key: &str) -> Result<Bytes, AppError> {
    let object = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("download {key} failed: {e}")))?;

    let data = object
        .body
        .collect()
        .await
        .map_err(|e| AppError::S3(format!("reading {key} failed: {e}")))?;
    Ok(data.into_bytes())
}
