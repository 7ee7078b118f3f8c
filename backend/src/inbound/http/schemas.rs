//! Shared wire envelopes for successful responses.

use pagination::{PageRequest, Paged};
use serde::Serialize;
use utoipa::ToSchema;

/// Single-resource envelope: `{"data": <entity>}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DataEnvelope<T> {
    /// The wrapped resource.
    pub data: T,
}

impl<T> DataEnvelope<T> {
    /// Wrap a resource for the wire.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Wire-format pagination block returned alongside listing data.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Rows matching the filter across all pages.
    pub total: u64,
    /// Window size that produced this page.
    pub limit: i64,
    /// Window start that produced this page.
    pub offset: i64,
}

/// Listing envelope: `{"data": [...], "pagination": {...}}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListEnvelope<T> {
    /// Items within the served window.
    pub data: Vec<T>,
    /// Window and total bookkeeping.
    pub pagination: PageMeta,
}

impl<T> ListEnvelope<T> {
    /// Assemble the wire envelope from a repository page and the window that
    /// produced it.
    pub fn new(page: Paged<T>, request: PageRequest) -> Self {
        Self {
            data: page.items,
            pagination: PageMeta {
                total: page.total,
                limit: request.limit(),
                offset: request.offset(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn list_envelope_serialises_expected_shape() {
        let envelope = ListEnvelope::new(Paged::new(vec!["a", "b"], 7), PageRequest::default());
        let value = serde_json::to_value(&envelope).expect("envelope serialises");
        assert_eq!(value["data"], serde_json::json!(["a", "b"]));
        assert_eq!(value["pagination"]["total"], 7);
        assert_eq!(value["pagination"]["limit"], 20);
        assert_eq!(value["pagination"]["offset"], 0);
    }

    #[test]
    fn data_envelope_wraps_resource() {
        let value =
            serde_json::to_value(DataEnvelope::new(serde_json::json!({"id": 1}))).expect("wraps");
        assert_eq!(value["data"]["id"], 1);
    }
}
