//! Job DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::Job;

/// Request to convert an HCL job file into its JSON form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobParseRequest {
    #[serde(rename = "JobHCL")]
    pub job_hcl: String,
    #[serde(rename = "Canonicalize")]
    pub canonicalize: bool,
}

/// Request to register (create or update) a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRegisterRequest {
    #[serde(rename = "Job")]
    pub job: Job,
}

/// Acknowledgement of a job registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRegisterResponse {
    #[serde(rename = "EvalID", default)]
    pub eval_id: String,
    #[serde(rename = "EvalCreateIndex", default)]
    pub eval_create_index: u64,
    #[serde(rename = "JobModifyIndex", default)]
    pub job_modify_index: u64,
    #[serde(rename = "Warnings", default)]
    pub warnings: String,
}

/// Acknowledgement of a job deregistration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDeregisterResponse {
    #[serde(rename = "EvalID", default)]
    pub eval_id: String,
    #[serde(rename = "EvalCreateIndex", default)]
    pub eval_create_index: u64,
    #[serde(rename = "JobModifyIndex", default)]
    pub job_modify_index: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_request_field_names() {
        let req = JobParseRequest {
            job_hcl: "job \"x\" {}".to_string(),
            canonicalize: true,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({ "JobHCL": "job \"x\" {}", "Canonicalize": true }));
    }

    #[test]
    fn test_register_response_tolerates_missing_warnings() {
        let resp: JobRegisterResponse = serde_json::from_value(json!({
            "EvalID": "e1",
            "EvalCreateIndex": 10,
            "JobModifyIndex": 9
        }))
        .unwrap();
        assert_eq!(resp.eval_id, "e1");
        assert!(resp.warnings.is_empty());
    }

    #[test]
    fn test_register_body_carries_job_namespace() {
        let parsed: Job = serde_json::from_value(json!({
            "ID": "lifecycle",
            "Namespace": "default",
            "Type": "batch",
            "TaskGroups": [{ "Name": "test" }]
        }))
        .unwrap();

        let req = JobRegisterRequest {
            job: parsed.with_id("lifecycle-1234abcd").with_namespace("e2e"),
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["Job"]["ID"], "lifecycle-1234abcd");
        assert_eq!(body["Job"]["Namespace"], "e2e");
        assert_eq!(body["Job"]["TaskGroups"][0]["Name"], "test");
    }
}
