//! Image-transfer job requests and the configuration handed to a run.

use std::num::NonZeroUsize;

use serde::{Deserialize, Deserializer};

use crate::credentials::{merge_security, SecurityMap};
use crate::error::CoreError;
use crate::types::ImageMapping;

/// Body of `POST /image-transfer`.
///
/// Absent or `null` maps are treated as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: SecurityMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: SecurityMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: ImageMapping,
}

impl JobRequest {
    /// Parse a request body. Any parse failure is a validation error.
    pub fn from_json(body: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(body)
            .map_err(|e| CoreError::Validation(format!("error parsing request: {e}")))
    }

    /// Merge credentials (target wins) and build the run configuration.
    pub fn into_transfer_config(self, routine_nums: usize) -> TransferConfig {
        TransferConfig {
            images: self.images,
            security: merge_security(self.source, self.target),
            routine_nums,
        }
    }
}

/// Everything the external transfer component needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConfig {
    pub images: ImageMapping,
    pub security: SecurityMap,
    /// Number of concurrent copy routines.
    pub routine_nums: usize,
}

/// Concurrency degree for a run: the override when set to a positive
/// value, otherwise the number of available processing units.
pub fn concurrency_degree(configured: Option<usize>) -> usize {
    configured.filter(|n| *n > 0).unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_request() {
        let body = br#"{
            "source": {"src.example.com": {"username": "a", "password": "pa"}},
            "target": {"dst.example.com": {"username": "b", "password": "pb", "insecure": true}},
            "images": {"src.example.com/app:v1": "dst.example.com/app:v1"}
        }"#;

        let request = JobRequest::from_json(body).unwrap();

        assert_eq!(request.source["src.example.com"].username, "a");
        assert!(request.target["dst.example.com"].insecure);
        assert_eq!(
            request.images["src.example.com/app:v1"],
            "dst.example.com/app:v1"
        );
    }

    #[test]
    fn missing_and_null_maps_are_empty() {
        let request = JobRequest::from_json(br#"{"source": null, "images": {}}"#).unwrap();
        assert!(request.source.is_empty());
        assert!(request.target.is_empty());
        assert!(request.images.is_empty());
    }

    #[test]
    fn malformed_body_is_validation_error() {
        let err = JobRequest::from_json(b"{not json").unwrap_err();
        match err {
            CoreError::Validation(msg) => assert!(msg.starts_with("error parsing request:")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn wrong_shape_is_validation_error() {
        let err = JobRequest::from_json(br#"{"images": ["a", "b"]}"#).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn transfer_config_merges_with_target_precedence() {
        let body = br#"{
            "source": {"reg1": {"username": "credA"}},
            "target": {"reg1": {"username": "credB"}, "reg2": {"username": "credC"}},
            "images": {"reg1/x:1": "reg2/x:1"}
        }"#;

        let config = JobRequest::from_json(body).unwrap().into_transfer_config(4);

        assert_eq!(config.routine_nums, 4);
        assert_eq!(config.security.len(), 2);
        assert_eq!(config.security["reg1"].username, "credB");
        assert_eq!(config.security["reg2"].username, "credC");
        assert_eq!(config.images.len(), 1);
    }

    #[test]
    fn concurrency_degree_prefers_positive_override() {
        assert_eq!(concurrency_degree(Some(3)), 3);
        assert!(concurrency_degree(Some(0)) >= 1);
        assert!(concurrency_degree(None) >= 1);
    }
}
