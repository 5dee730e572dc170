//! Project data models

use serde::{Deserialize, Serialize};

/// Entry of `GET /api/projects/{p}/data`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectData {
    pub data: DataItem,
}

/// A file or folder in a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataItem {
    pub id: String,
    pub details: DataDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDetails {
    pub name: String,
    pub path: String,
    /// `FILE` or `FOLDER`
    pub data_type: String,
}

impl DataItem {
    pub fn is_folder(&self) -> bool {
        self.details.data_type.eq_ignore_ascii_case("folder")
    }
}

/// Body of `POST /api/projects/{p}/data` when creating a folder
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
    pub folder_path: String,
    pub data_type: String,
}

impl CreateFolderRequest {
    /// Request for the folder at `path` (`/a/b/`)
    pub fn for_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_matches('/');
        let (parent, name) = match trimmed.rsplit_once('/') {
            Some((parent, name)) => (format!("/{parent}/"), name),
            None => ("/".to_string(), trimmed),
        };
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            folder_path: parent,
            data_type: "FOLDER".to_string(),
        })
    }
}

/// Response of `:createTemporaryCredentials`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryCredentials {
    pub aws_temp_credentials: AwsTempCredentials,
}

/// Scoped S3 credentials for one folder
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsTempCredentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: String,
    pub region: String,
    pub bucket: String,
    pub object_prefix: String,
}

impl AwsTempCredentials {
    /// `s3://bucket/prefix/` of the folder these credentials grant
    pub fn s3_uri(&self) -> String {
        format!(
            "s3://{}/{}/",
            self.bucket,
            self.object_prefix.trim_matches('/')
        )
    }
}

impl std::fmt::Debug for AwsTempCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsTempCredentials")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("object_prefix", &self.object_prefix)
            .finish_non_exhaustive()
    }
}

/// Response of `:createDownloadUrl`
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadUrl {
    pub url: String,
}

/// Normalize a remote folder path to `/a/b/`
pub fn folder_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Normalize a remote file path to `/a/b.txt`
pub fn file_path(path: &str) -> String {
    format!("/{}", path.trim().trim_matches('/'))
}
