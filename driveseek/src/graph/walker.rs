//! Depth-first enumeration of every file under a folder path.
//!
//! The drive is a tree by construction, so there is no cycle guard and no
//! depth limit. Only the first page returned per folder is consulted; folders
//! whose listing spans multiple pages under-enumerate. That coverage gap is
//! deliberate and documented rather than papered over.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::Result;
use crate::graph::models::DriveItem;

/// Seam over "list the immediate children of a path" so traversal can be
/// exercised without a live drive.
#[async_trait]
pub trait ChildLister: Send + Sync {
    async fn child_items(&self, path: &str) -> Result<Vec<DriveItem>>;
}

/// All files under `path_prefix`, in depth-first visitation order (children
/// in whatever order the drive returns them).
pub async fn list_all_files(
    lister: &dyn ChildLister,
    path_prefix: &str,
) -> Result<Vec<DriveItem>> {
    let mut files = Vec::new();
    walk(lister, path_prefix.trim_matches('/').to_string(), &mut files).await?;
    Ok(files)
}

fn walk<'a>(
    lister: &'a dyn ChildLister,
    path: String,
    files: &'a mut Vec<DriveItem>,
) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        for child in lister.child_items(&path).await? {
            if child.is_folder() {
                let next = if path.is_empty() {
                    child.name.clone()
                } else {
                    format!("{path}/{}", child.name)
                };
                walk(lister, next, files).await?;
            } else if child.is_file() {
                files.push(child);
            }
        }
        Ok(())
    })
}
