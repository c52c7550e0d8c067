use serde::{Deserialize, Serialize};

/// A file or folder reference returned by the drive API. Immutable once
/// fetched; lives only for the duration of one request's candidate list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_reference: Option<ParentReference>,
    /// Present iff the item is a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileFacet>,
    /// Present iff the item is a folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderFacet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_count: Option<i64>,
}

/// One page of listing or search results. Only the `value` array is
/// consulted; continuation links are ignored (see the walker).
#[derive(Debug, Deserialize)]
pub struct DriveItemPage {
    #[serde(default, rename = "value")]
    pub items: Vec<DriveItem>,
}

impl DriveItem {
    pub fn is_file(&self) -> bool {
        self.file.is_some()
    }

    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    /// Lowercase dotted suffix of the name, if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Human-readable drive-relative path, derived from the parent reference
    /// (`"/drives/<id>/root:/HR/Policies"` becomes `"HR/Policies/<name>"`).
    pub fn display_path(&self) -> String {
        let parent = self
            .parent_reference
            .as_ref()
            .and_then(|p| p.path.as_deref())
            .and_then(|p| p.split_once("root:"))
            .map(|(_, rest)| rest.trim_start_matches('/'))
            .unwrap_or("");

        if parent.is_empty() {
            self.name.clone()
        } else {
            format!("{parent}/{}", self.name)
        }
    }
}
