//! AI-assisted product recommendations.
//!
//! Assembles a prompt from the recorded interaction history and the
//! product catalog, sends it to an external OpenAI-compatible
//! chat-completion endpoint, and maps the product ids named in the
//! completion back to catalog entries. The history summary is a pure
//! function that cannot fail; absence of data degrades to an empty
//! string, never an error.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::RecommenderConfig;
use crate::domain::{InteractionEvent, Product};
use crate::error::GatewayError;
use crate::persistence::{InteractionStore, ProductStore};

/// Canned reply for queries the moderation pre-check rejects.
const REFUSAL_TEXT: &str = "Oops! It looks like your query contains inappropriate or unrelated \
     content. Please try searching for something else.";

/// How many recent interactions the prompt history includes.
const HISTORY_LIMIT: usize = 10;

/// A recommendation result: free text plus the resolved products.
#[derive(Debug, Clone)]
pub struct Recommendation {
    /// Human-readable recommendation text.
    pub recommendation_text: String,
    /// Catalog products named by the completion, in completion order.
    pub recommended_products: Vec<Product>,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    model: &'a str,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

/// Minimal client for an OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    config: RecommenderConfig,
}

impl CompletionClient {
    /// Creates a client from injected configuration.
    #[must_use]
    pub fn new(config: RecommenderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Sends one prompt and returns the trimmed completion text.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RecommendationUnavailable`] when the API
    /// is not configured, the request fails, the endpoint answers with
    /// a non-success status, or the response carries no choices.
    pub async fn complete(
        &self,
        prompt: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, GatewayError> {
        if self.config.api_key.is_empty() {
            return Err(GatewayError::RecommendationUnavailable(
                "recommendation API is not configured".to_string(),
            ));
        }

        let request = CompletionRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            model: &self.config.model,
            temperature,
            max_tokens,
            top_p: 1.0,
            stream: false,
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::RecommendationUnavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let parsed = response
                    .json::<CompletionResponse>()
                    .await
                    .map_err(|e| GatewayError::RecommendationUnavailable(e.to_string()))?;
                parsed
                    .choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content.trim().to_string())
                    .ok_or_else(|| {
                        GatewayError::RecommendationUnavailable(
                            "completion contained no choices".to_string(),
                        )
                    })
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(GatewayError::RecommendationUnavailable(format!(
                    "completion API returned {status}: {body}"
                )))
            }
        }
    }
}

/// Renders the most recent interactions as a comma-joined history
/// string for prompt context.
///
/// Most recent first, capped at ten entries. Never fails: an empty
/// event set yields an empty string.
#[must_use]
pub fn interaction_history(events: &[InteractionEvent]) -> String {
    let mut sorted: Vec<&InteractionEvent> = events.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    sorted
        .into_iter()
        .take(HISTORY_LIMIT)
        .map(|event| {
            if let Some(query) = event.kind.search_query() {
                format!("Searched for \"{query}\"")
            } else if let Some(product_id) = event.kind.product_id() {
                format!("Interacted with product ID {product_id}")
            } else {
                format!("Interaction of type \"{}\"", event.kind.type_str())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders one description line per catalog product for the prompt.
fn product_descriptions(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| {
            format!(
                "{} by {}, {}, Price: {}, Rating: {}, Stock: {}, ID: {}",
                p.title, p.brand, p.category, p.price, p.rating, p.stock, p.id
            )
        })
        .collect::<Vec<_>>()
        .join(". ")
}

fn build_prompt(query: &str, history: &str, descriptions: &str) -> String {
    format!(
        "Based on the user's query \"{query}\" and their recent interaction history which \
         includes {history}, recommend the most relevant products strictly from the following \
         options: {descriptions}. Provide a concise list of product recommendations using \
         product IDs for accurate identification: 1. Product ID: [productID1] 2. Product ID: \
         [productID2], etc. Ensure that only the products listed above are recommended and \
         provide brief contextual assistance related to each product."
    )
}

fn moderation_prompt(query: &str) -> String {
    format!(
        "Evaluate the following user query to determine if it contains sensitive, \
         inappropriate, or irrelevant content. Sensitive content includes, but is not limited \
         to, explicit, violent, illegal, or otherwise harmful material. If the query is deemed \
         sensitive or irrelevant to our product catalog, respond with \"No\". If the query is \
         appropriate and relevant, respond with \"Yes\". Please provide a clear and direct \
         answer. The query is: \"{query}\""
    )
}

/// Extracts product ids from completion lines of the form
/// `... Product ID: <id> ...`.
#[must_use]
pub fn extract_product_ids(completion: &str) -> Vec<String> {
    const MARKER: &str = "Product ID: ";
    completion
        .lines()
        .filter_map(|line| {
            let start = line.find(MARKER)? + MARKER.len();
            let id: String = line
                .get(start..)?
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect();
            (!id.is_empty()).then_some(id)
        })
        .collect()
}

fn recommendation_text(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| format!("{} by {}, Price: {}", p.title, p.brand, p.price))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Produces natural-language product recommendations conditioned on
/// the recorded interaction history.
#[derive(Debug, Clone)]
pub struct RecommendationService {
    interactions: Arc<dyn InteractionStore>,
    products: Arc<dyn ProductStore>,
    client: CompletionClient,
    config: RecommenderConfig,
}

impl RecommendationService {
    /// Creates a new service over the given stores and injected
    /// completion configuration.
    #[must_use]
    pub fn new(
        interactions: Arc<dyn InteractionStore>,
        products: Arc<dyn ProductStore>,
        config: RecommenderConfig,
    ) -> Self {
        Self {
            interactions,
            products,
            client: CompletionClient::new(config.clone()),
            config,
        }
    }

    /// Asks the completion API whether the query is appropriate for
    /// the catalog. Deterministic settings: temperature 0, short
    /// answer.
    async fn is_query_appropriate(&self, query: &str) -> Result<bool, GatewayError> {
        let answer = self.client.complete(&moderation_prompt(query), 0.0, 10).await?;
        Ok(answer.to_lowercase().starts_with("yes"))
    }

    /// Returns recommendations for the given query.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on an empty query,
    /// [`GatewayError::PersistenceError`] when a store query fails, and
    /// [`GatewayError::RecommendationUnavailable`] when the completion
    /// API fails or is not configured.
    pub async fn recommendations(&self, query: &str) -> Result<Recommendation, GatewayError> {
        if query.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "query is required".to_string(),
            ));
        }

        if !self.is_query_appropriate(query).await? {
            tracing::warn!("recommendation query rejected by moderation");
            return Ok(Recommendation {
                recommendation_text: REFUSAL_TEXT.to_string(),
                recommended_products: Vec::new(),
            });
        }

        let (events, products) =
            tokio::try_join!(self.interactions.all_events(), self.products.all())?;

        let history = interaction_history(&events);
        let descriptions = product_descriptions(&products);
        let prompt = build_prompt(query, &history, &descriptions);

        let completion = self
            .client
            .complete(&prompt, self.config.temperature, self.config.max_tokens)
            .await?;

        let by_id: HashMap<String, &Product> =
            products.iter().map(|p| (p.id.to_string(), p)).collect();
        let recommended: Vec<Product> = extract_product_ids(&completion)
            .iter()
            .filter_map(|id| by_id.get(id).map(|p| (*p).clone()))
            .collect();

        let text = if recommended.is_empty() {
            "No products found that match your query.".to_string()
        } else {
            recommendation_text(&recommended)
        };

        tracing::debug!(
            recommended = recommended.len(),
            "recommendations assembled"
        );
        Ok(Recommendation {
            recommendation_text: text,
            recommended_products: recommended,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{InteractionKind, ProductDraft};
    use crate::persistence::memory::{MemoryInteractionStore, MemoryProductStore};
    use chrono::{Duration, Utc};
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn event_at(kind: InteractionKind, minutes_ago: i64) -> InteractionEvent {
        let mut event = InteractionEvent::new("s1".to_string(), kind);
        event.timestamp = Utc::now() - Duration::minutes(minutes_ago);
        event
    }

    fn sample_product(title: &str) -> Product {
        ProductDraft {
            title: title.to_string(),
            description: "test".to_string(),
            price: 9.99,
            discount_percentage: 0.0,
            rating: 4.0,
            stock: 2,
            brand: "Acme".to_string(),
            category: "misc".to_string(),
            thumbnail: None,
            images: vec![],
        }
        .into_product()
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
    }

    #[test]
    fn history_of_no_events_is_empty() {
        assert_eq!(interaction_history(&[]), "");
    }

    #[test]
    fn history_renders_each_kind() {
        let events = vec![
            event_at(
                InteractionKind::Search {
                    query: Some("red shoes".to_string()),
                },
                1,
            ),
            event_at(
                InteractionKind::Click {
                    product_id: "p1".to_string(),
                },
                2,
            ),
            event_at(InteractionKind::Search { query: None }, 3),
        ];
        let history = interaction_history(&events);
        assert_eq!(
            history,
            "Searched for \"red shoes\", Interacted with product ID p1, \
             Interaction of type \"search\""
        );
    }

    #[test]
    fn history_is_most_recent_first_and_capped_at_ten() {
        let events: Vec<InteractionEvent> = (0..15)
            .map(|i| {
                event_at(
                    InteractionKind::Search {
                        query: Some(format!("query {i}")),
                    },
                    i,
                )
            })
            .collect();
        let history = interaction_history(&events);
        assert!(history.starts_with("Searched for \"query 0\""));
        assert_eq!(history.matches("Searched for").count(), 10);
        assert!(!history.contains("query 10"));
    }

    #[test]
    fn extract_ids_reads_marked_lines_only() {
        let completion = "Here are my picks:\n\
             1. Product ID: abc-123 because it fits\n\
             2. Product ID: def456\n\
             Some unrelated closing remark";
        assert_eq!(extract_product_ids(completion), vec!["abc-123", "def456"]);
    }

    #[test]
    fn extract_ids_of_plain_text_is_empty() {
        assert!(extract_product_ids("no identifiers here").is_empty());
    }

    fn service_with(
        api_url: String,
        api_key: &str,
        interactions: Arc<MemoryInteractionStore>,
        products: Arc<MemoryProductStore>,
    ) -> RecommendationService {
        RecommendationService::new(
            interactions as Arc<dyn InteractionStore>,
            products as Arc<dyn ProductStore>,
            RecommenderConfig {
                api_url,
                model: "test-model".to_string(),
                api_key: api_key.to_string(),
                temperature: 0.5,
                max_tokens: 128,
            },
        )
    }

    #[tokio::test]
    async fn unconfigured_api_key_reports_unavailable() {
        let service = service_with(
            "http://localhost:1/v1".to_string(),
            "",
            Arc::new(MemoryInteractionStore::new()),
            Arc::new(MemoryProductStore::new()),
        );
        let result = service.recommendations("lamps").await;
        assert!(matches!(
            result,
            Err(GatewayError::RecommendationUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn moderation_refusal_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Evaluate the following user query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("No")))
            .mount(&server)
            .await;

        let service = service_with(
            server.uri(),
            "test-key",
            Arc::new(MemoryInteractionStore::new()),
            Arc::new(MemoryProductStore::new()),
        );
        let Ok(result) = service.recommendations("something dubious").await else {
            panic!("refusal should not be an error");
        };
        assert!(result.recommended_products.is_empty());
        assert!(result.recommendation_text.starts_with("Oops!"));
    }

    #[tokio::test]
    async fn recommendations_map_completion_ids_to_products() {
        let products = Arc::new(MemoryProductStore::new());
        let product = sample_product("Desk Lamp");
        let id = product.id.to_string();
        let _ = products.insert(product).await;

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Evaluate the following user query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Yes")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("recommend the most relevant products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&format!(
                "1. Product ID: {id} is a great fit\n2. Product ID: {}",
                uuid::Uuid::new_v4()
            ))))
            .mount(&server)
            .await;

        let service = service_with(
            server.uri(),
            "test-key",
            Arc::new(MemoryInteractionStore::new()),
            products,
        );
        let Ok(result) = service.recommendations("lamps").await else {
            panic!("recommendations failed");
        };
        assert_eq!(result.recommended_products.len(), 1);
        let Some(recommended) = result.recommended_products.first() else {
            panic!("expected one product");
        };
        assert_eq!(recommended.title, "Desk Lamp");
        assert!(result.recommendation_text.contains("Desk Lamp"));
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let service = service_with(
            server.uri(),
            "test-key",
            Arc::new(MemoryInteractionStore::new()),
            Arc::new(MemoryProductStore::new()),
        );
        let result = service.recommendations("lamps").await;
        assert!(matches!(
            result,
            Err(GatewayError::RecommendationUnavailable(_))
        ));
    }
}
