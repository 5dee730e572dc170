//! Analysis data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Analysis as returned by `GET /api/projects/{p}/analyses`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: String,
    #[serde(default)]
    pub user_reference: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub pipeline: Option<AnalysisPipeline>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// Pipeline summary embedded in an analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPipeline {
    pub id: String,
    pub code: String,
}
