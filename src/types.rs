//! Wire types for the Scholar API.
//!
//! Success responses under `/api/v1/**` arrive wrapped in an [`Envelope`];
//! the two health endpoints return their payload bare. Unknown fields are
//! ignored on decode, and optional request fields are omitted from the JSON
//! rather than sent as `null`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::request::ApiRequest;

/// The `{data, request_id, timestamp, success}` wrapper the service puts
/// around every `/api/v1/**` success payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    /// Server-assigned id for tracing this request.
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Health

/// Service health report. Returned bare, not enveloped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    #[serde(default)]
    pub components: HashMap<String, ComponentHealth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    pub last_check: DateTime<Utc>,
    pub details: Option<String>,
}

// ---------------------------------------------------------------------------
// Research

/// Body of a research submission.
///
/// ```
/// use scholar_client::ResearchRequest;
///
/// let request = ResearchRequest::new("How do async traits work in Rust?")
///     .with_context("targeting stable Rust")
///     .with_priority("high");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ResearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Scheduling priority: `low`, `medium`, or `high`.
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_context: Option<AudienceContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_context: Option<DomainContext>,
}

impl ResearchRequest {
    /// A request for the given query with `medium` priority and no context.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context: None,
            priority: "medium".to_string(),
            audience_context: None,
            domain_context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn with_audience_context(mut self, audience: AudienceContext) -> Self {
        self.audience_context = Some(audience);
        self
    }

    pub fn with_domain_context(mut self, domain: DomainContext) -> Self {
        self.domain_context = Some(domain);
        self
    }
}

/// Who the answer is for; shapes the level of detail in responses.
#[derive(Debug, Clone, Serialize)]
pub struct AudienceContext {
    pub level: String,
    pub domain: String,
    pub format: String,
}

/// The technical setting the query lives in.
#[derive(Debug, Clone, Serialize)]
pub struct DomainContext {
    pub technology: String,
    pub architecture: String,
}

/// A completed research result with its layered answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResult {
    pub id: String,
    pub query: String,
    pub research_type: String,
    /// First layer of the answer, suitable for direct display.
    pub immediate_answer: String,
    #[serde(default)]
    pub supporting_evidence: Vec<Evidence>,
    #[serde(default)]
    pub implementation_details: Vec<Detail>,
    pub metadata: ResearchMetadata,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub source: String,
    pub content: String,
    /// Relevance score, 0.0 to 1.0.
    pub relevance: f64,
    pub evidence_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detail {
    pub category: String,
    pub content: String,
    pub priority: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchMetadata {
    pub completed_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    #[serde(default)]
    pub sources_consulted: Vec<String>,
    /// Quality score, 0.0 to 1.0.
    pub quality_score: f64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// One page of research results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchList {
    pub results: Vec<ResearchSummary>,
    pub total_count: usize,
    pub pagination: Pagination,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSummary {
    pub id: String,
    pub query: String,
    pub research_type: String,
    pub summary: String,
    pub quality_score: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

/// Paging and filtering for the research listing.
///
/// `..Default::default()` fills the service defaults: twenty results from
/// offset zero, unfiltered.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub limit: usize,
    pub offset: usize,
    /// Free-text filter over stored queries.
    pub query: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            query: None,
        }
    }
}

impl ListParams {
    pub(crate) fn apply(&self, mut request: ApiRequest) -> ApiRequest {
        request = request
            .with_query("limit", self.limit.to_string())
            .with_query("offset", self.offset.to_string());
        if let Some(query) = &self.query {
            request = request.with_query("query", query);
        }
        request
    }
}

// ---------------------------------------------------------------------------
// Classification

/// Body of a classification submission.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_preferences: Option<ContextPreferences>,
}

impl ClassifyRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            categories: None,
            context_preferences: None,
        }
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn with_context_preferences(mut self, preferences: ContextPreferences) -> Self {
        self.context_preferences = Some(preferences);
        self
    }
}

/// Which context dimensions the classifier should detect.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContextPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_urgency: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_audience: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_domain: Option<bool>,
}

/// A classification outcome for one piece of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub id: String,
    pub content: String,
    pub research_type: ClassificationResult,
    pub context: Option<ContextDetection>,
    pub metadata: ClassificationMetadata,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub research_type: String,
    /// Confidence, 0.0 to 1.0.
    pub confidence: f64,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    pub rule_priority: u32,
    #[serde(default)]
    pub candidates: Vec<ClassificationCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationCandidate {
    pub research_type: String,
    pub confidence: f64,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    pub rule_priority: u32,
}

/// Detected audience, domain, and urgency for classified content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextDetection {
    pub audience_level: String,
    pub technical_domain: String,
    pub urgency_level: String,
    pub overall_confidence: f64,
    pub fallback_used: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationMetadata {
    pub completed_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub advanced_classification_used: bool,
    pub context_detection_used: bool,
    pub algorithm_version: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// One page of classification results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationList {
    pub results: Vec<ClassificationSummary>,
    pub total_count: usize,
    pub pagination: Pagination,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub id: String,
    pub content_preview: String,
    pub research_type: String,
    pub context_summary: Option<String>,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Paging and filtering for the classification listing.
#[derive(Debug, Clone)]
pub struct ClassificationListParams {
    pub limit: usize,
    pub offset: usize,
    /// Restrict results to one category.
    pub category: Option<String>,
}

impl Default for ClassificationListParams {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            category: None,
        }
    }
}

impl ClassificationListParams {
    pub(crate) fn apply(&self, mut request: ApiRequest) -> ApiRequest {
        request = request
            .with_query("limit", self.limit.to_string())
            .with_query("offset", self.offset.to_string());
        if let Some(category) = &self.category {
            request = request.with_query("category", category);
        }
        request
    }
}

/// The classifier's vocabulary: research types plus the context dimensions
/// it can detect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationTypes {
    #[serde(default)]
    pub research_types: Vec<ResearchTypeInfo>,
    #[serde(default)]
    pub audience_levels: Vec<TypeDescriptor>,
    #[serde(default)]
    pub technical_domains: Vec<TypeDescriptor>,
    #[serde(default)]
    pub urgency_levels: Vec<TypeDescriptor>,
    pub system_info: ClassificationSystemInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchTypeInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    #[serde(default)]
    pub example_keywords: Vec<String>,
}

/// Name/description triple shared by the audience, domain, and urgency
/// vocabularies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    pub display_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSystemInfo {
    pub version: String,
    pub default_confidence_threshold: f64,
    pub advanced_classification_available: bool,
    pub context_detection_available: bool,
}

// ---------------------------------------------------------------------------
// Server-side cache

/// Statistics for the service's own result cache (not this client's).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub total_size_bytes: u64,
    /// Hit rate, 0.0 to 1.0.
    pub hit_rate: f64,
    pub hits: u64,
    pub misses: u64,
    pub average_age_seconds: f64,
    #[serde(default)]
    pub by_research_type: HashMap<String, CacheTypeStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTypeStats {
    pub entries: usize,
    pub size_bytes: u64,
    pub hit_rate: f64,
    pub hits: u64,
    pub misses: u64,
    pub average_quality: f64,
}

/// One page of matching server-side cache entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSearch {
    pub results: Vec<CacheItem>,
    pub total_count: usize,
    pub pagination: Pagination,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheItem {
    pub key: String,
    pub research_type: String,
    pub original_query: String,
    pub content_summary: String,
    pub quality_score: f64,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_expired: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Filters for searching the server-side cache.
///
/// Defaults match the service: twenty results from offset zero, newest
/// first, no filters.
#[derive(Debug, Clone)]
pub struct CacheSearchParams {
    pub query: Option<String>,
    pub limit: usize,
    pub offset: usize,
    /// Sort order: `newest`, `oldest`, `quality`, or `size`.
    pub sort: String,
    pub research_type: Option<String>,
    /// Minimum quality score, 0.0 to 1.0.
    pub min_quality: Option<f64>,
}

impl Default for CacheSearchParams {
    fn default() -> Self {
        Self {
            query: None,
            limit: 20,
            offset: 0,
            sort: "newest".to_string(),
            research_type: None,
            min_quality: None,
        }
    }
}

impl CacheSearchParams {
    pub(crate) fn apply(&self, mut request: ApiRequest) -> ApiRequest {
        request = request
            .with_query("limit", self.limit.to_string())
            .with_query("offset", self.offset.to_string())
            .with_query("sort", &self.sort);
        if let Some(query) = &self.query {
            request = request.with_query("query", query);
        }
        if let Some(research_type) = &self.research_type {
            request = request.with_query("research_type", research_type);
        }
        if let Some(min_quality) = self.min_quality {
            request = request.with_query("min_quality", min_quality.to_string());
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_request_omits_unset_optionals() {
        let request = ResearchRequest::new("what is ownership?");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["query"], "what is ownership?");
        assert_eq!(json["priority"], "medium");
        assert!(json.get("context").is_none());
        assert!(json.get("audience_context").is_none());
        assert!(json.get("domain_context").is_none());
    }

    #[test]
    fn test_research_request_serializes_contexts() {
        let request = ResearchRequest::new("async cancellation")
            .with_priority("high")
            .with_audience_context(AudienceContext {
                level: "advanced".to_string(),
                domain: "rust".to_string(),
                format: "markdown".to_string(),
            })
            .with_domain_context(DomainContext {
                technology: "tokio".to_string(),
                architecture: "event-driven".to_string(),
            });
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["priority"], "high");
        assert_eq!(json["audience_context"]["level"], "advanced");
        assert_eq!(json["domain_context"]["technology"], "tokio");
    }

    #[test]
    fn test_classify_request_omits_unset_optionals() {
        let request = ClassifyRequest::new("How do I fix this borrow error?");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["content"], "How do I fix this borrow error?");
        assert!(json.get("categories").is_none());
        assert!(json.get("context_preferences").is_none());
    }

    #[test]
    fn test_context_preferences_serialize_only_chosen_dimensions() {
        let request = ClassifyRequest::new("urgent outage in prod").with_context_preferences(
            ContextPreferences {
                detect_urgency: Some(true),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["context_preferences"]["detect_urgency"], true);
        assert!(json["context_preferences"].get("detect_audience").is_none());
    }

    #[test]
    fn test_envelope_decodes_wrapped_payload() {
        let body = r#"{
            "data": {"status": "healthy", "version": "0.1.0", "uptime_seconds": 12},
            "request_id": "req-123",
            "timestamp": "2024-01-15T10:30:00Z",
            "success": true
        }"#;

        let envelope: Envelope<HealthStatus> = serde_json::from_str(body).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.request_id, "req-123");
        assert_eq!(envelope.data.status, "healthy");
        assert!(envelope.data.components.is_empty());
    }

    #[test]
    fn test_unknown_response_fields_are_ignored() {
        let body = r#"{
            "offset": 0,
            "limit": 20,
            "total_pages": 3,
            "has_more": true,
            "cursor": "opaque-token"
        }"#;

        let pagination: Pagination = serde_json::from_str(body).unwrap();
        assert_eq!(pagination.total_pages, 3);
        assert!(pagination.has_more);
    }

    #[test]
    fn test_list_params_apply_paging_and_filter() {
        let params = ListParams {
            query: Some("tokio".to_string()),
            ..Default::default()
        };
        let request = params.apply(ApiRequest::get("/api/v1/research"));

        assert_eq!(
            request.query,
            vec![
                ("limit".to_string(), "20".to_string()),
                ("offset".to_string(), "0".to_string()),
                ("query".to_string(), "tokio".to_string()),
            ]
        );
    }

    #[test]
    fn test_cache_search_params_default_to_newest_first() {
        let request = CacheSearchParams::default().apply(ApiRequest::get("/api/v1/cache/search"));

        assert_eq!(
            request.query,
            vec![
                ("limit".to_string(), "20".to_string()),
                ("offset".to_string(), "0".to_string()),
                ("sort".to_string(), "newest".to_string()),
            ]
        );
    }

    #[test]
    fn test_cache_search_params_carry_quality_filter() {
        let params = CacheSearchParams {
            research_type: Some("learning".to_string()),
            min_quality: Some(0.7),
            ..Default::default()
        };
        let request = params.apply(ApiRequest::get("/api/v1/cache/search"));

        assert!(request
            .query
            .contains(&("research_type".to_string(), "learning".to_string())));
        assert!(request
            .query
            .contains(&("min_quality".to_string(), "0.7".to_string())));
    }
}
