//! Fetching preview media through the remote accessor.

use std::path::Path;

use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use esbox_client::RemoteApi;
use esbox_core::error::{AppError, ErrorKind};
use esbox_core::result::AppResult;
use esbox_core::types::FileId;

/// Read the whole stream for `id` into memory.
///
/// Any failure is reported as a preview error so viewers can mark
/// themselves failed.
pub async fn fetch(api: &dyn RemoteApi, id: FileId) -> AppResult<Bytes> {
    let stream = api.stream_file(id).await.map_err(as_preview)?;
    let media = stream
        .try_fold(BytesMut::new(), |mut acc, chunk| async move {
            acc.extend_from_slice(&chunk);
            Ok(acc)
        })
        .await
        .map_err(as_preview)?;
    debug!(%id, bytes = media.len(), "Preview media loaded");
    Ok(media.freeze())
}

/// Stream the contents of `id` into a local file.
pub async fn download(api: &dyn RemoteApi, id: FileId, dest: &Path) -> AppResult<u64> {
    let mut stream = api.stream_file(id).await?;
    let mut out = tokio::fs::File::create(dest).await?;
    let mut written = 0u64;
    while let Some(chunk) = stream.try_next().await? {
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    out.flush().await?;
    debug!(%id, bytes = written, dest = %dest.display(), "Download complete");
    Ok(written)
}

fn as_preview(err: AppError) -> AppError {
    AppError::new(ErrorKind::Preview, err.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    #[tokio::test]
    async fn test_fetch_collects_chunks() {
        let api = FakeApi::new();
        assert_eq!(&fetch(&*api, FileId(1)).await.unwrap()[..], b"hello world");

        api.fail_next(AppError::not_found("File not found"));
        let err = fetch(&*api, FileId(1)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Preview);
        assert_eq!(err.message, "File not found");
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let api = FakeApi::new();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        assert_eq!(download(&*api, FileId(1), &dest).await.unwrap(), 11);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"hello world");
    }
}
