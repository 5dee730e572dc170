//! Pipeline data models

use serde::{Deserialize, Serialize};

/// Pipeline as returned by the project pipeline endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    /// ID of the user who created the pipeline
    #[serde(default)]
    pub owner_id: Option<String>,
    /// `DRAFT` or `RELEASED`
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl Pipeline {
    pub fn is_released(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("released"))
    }
}

/// Entry of `GET /api/projects/{p}/pipelines`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPipeline {
    pub pipeline: Pipeline,
}

/// One declared pipeline input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputParameter {
    pub code: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multi_value: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_pipeline_deserialization() {
        let json = r#"{
            "pipeline": {
                "id": "pl-1",
                "code": "bwa-mem",
                "ownerId": "u-1",
                "status": "DRAFT",
                "language": "CWL"
            }
        }"#;

        let entry: ProjectPipeline = serde_json::from_str(json).unwrap();
        assert_eq!(entry.pipeline.code, "bwa-mem");
        assert_eq!(entry.pipeline.owner_id.as_deref(), Some("u-1"));
        assert!(!entry.pipeline.is_released());
    }

    #[test]
    fn test_input_parameter_deserialization() {
        let json = r#"{"code": "reads", "type": "FILE", "required": true, "multiValue": true}"#;
        let input: InputParameter = serde_json::from_str(json).unwrap();
        assert_eq!(input.kind.as_deref(), Some("FILE"));
        assert!(input.required);
        assert!(input.multi_value);
    }
}
