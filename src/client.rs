use crate::config::AnalyzerConfig;
use crate::model::{Ingredient, RecipeRequest, ServiceHealth};
use crate::AnalyzerError;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const ANALYZE_PATH: &str = "/analyze-recipes";
const HEALTH_PATH: &str = "/health";

/// The external recipe analysis service
#[async_trait]
pub trait RecipeService: Send + Sync {
    /// Send one analyze request and return the parsed body untouched
    async fn analyze(&self, request: &RecipeRequest) -> Result<Value, AnalyzerError>;

    /// Ask the service whether it is up
    async fn health(&self) -> Result<ServiceHealth, AnalyzerError>;
}

/// [`RecipeService`] over HTTP + JSON
pub struct HttpRecipeService {
    client: Client,
    endpoint: String,
}

impl HttpRecipeService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AnalyzerError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("smart-recipe-analyzer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpRecipeService {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, AnalyzerError> {
        Self::new(&config.endpoint, Duration::from_secs(config.timeout))
    }

    pub fn builder() -> HttpRecipeServiceBuilder {
        HttpRecipeServiceBuilder::default()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Failure text for a non-2xx answer, preferring the service's own `detail`
fn failure_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json["detail"].as_str().map(String::from))
        .filter(|detail| !detail.is_empty())
        .unwrap_or_else(|| format!("Recipe service responded with {}", status))
}

#[async_trait]
impl RecipeService for HttpRecipeService {
    async fn analyze(&self, request: &RecipeRequest) -> Result<Value, AnalyzerError> {
        let response = self
            .client
            .post(format!("{}{}", self.endpoint, ANALYZE_PATH))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Analyze response ({}): {}", status, body);

        if !status.is_success() {
            return Err(AnalyzerError::Network(failure_message(status, &body)));
        }

        serde_json::from_str(&body)
            .map_err(|e| AnalyzerError::Network(format!("Malformed response body: {}", e)))
    }

    async fn health(&self) -> Result<ServiceHealth, AnalyzerError> {
        let response = self
            .client
            .get(format!("{}{}", self.endpoint, HEALTH_PATH))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(AnalyzerError::Network(failure_message(status, &body)));
        }

        Ok(response.json().await?)
    }
}

/// Builder for [`HttpRecipeService`]
#[derive(Debug, Default)]
pub struct HttpRecipeServiceBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpRecipeServiceBuilder {
    /// Base URL of the service, e.g. `http://localhost:8000`
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub fn build(self) -> Result<HttpRecipeService, AnalyzerError> {
        let defaults = AnalyzerConfig::default();
        HttpRecipeService::new(
            self.endpoint.unwrap_or(defaults.endpoint),
            self.timeout.unwrap_or(Duration::from_secs(defaults.timeout)),
        )
    }
}

/// Resets the in-flight flag however the request ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Builds analyze requests from the ingredient collection and sends them,
/// one at a time.
///
/// A `submit` issued while another is outstanding is rejected with
/// [`AnalyzerError::RequestInFlight`]; nothing is queued.
pub struct RecipeQueryClient<S> {
    service: S,
    in_flight: AtomicBool,
    dietary_restrictions: Vec<String>,
    cuisine_preference: Option<String>,
}

impl<S: RecipeService> RecipeQueryClient<S> {
    pub fn new(service: S) -> Self {
        RecipeQueryClient {
            service,
            in_flight: AtomicBool::new(false),
            dietary_restrictions: Vec::new(),
            cuisine_preference: None,
        }
    }

    /// Forward dietary restrictions and cuisine preference with every request
    pub fn with_preferences(
        mut self,
        dietary_restrictions: Vec<String>,
        cuisine_preference: Option<String>,
    ) -> Self {
        self.dietary_restrictions = dietary_restrictions;
        self.cuisine_preference = cuisine_preference;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Build the payload for `ingredients`
    pub fn build_request(&self, ingredients: &[Ingredient]) -> RecipeRequest {
        RecipeRequest {
            dietary_restrictions: self.dietary_restrictions.clone(),
            cuisine_preference: self.cuisine_preference.clone(),
            ..RecipeRequest::new(ingredients)
        }
    }

    /// Exchange the ingredients with the service.
    ///
    /// The parsed body comes back as-is; shape checks belong to the normalizer.
    pub async fn submit(&self, ingredients: &[Ingredient]) -> Result<Value, AnalyzerError> {
        if ingredients.is_empty() {
            return Err(AnalyzerError::Validation(
                "Please add at least one ingredient".to_string(),
            ));
        }

        if self.in_flight.swap(true, Ordering::AcqRel) {
            warn!("Rejecting submit: a recipe request is already in flight");
            return Err(AnalyzerError::RequestInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let request = self.build_request(ingredients);
        info!(
            "Requesting recipes for {} ingredients",
            request.ingredients.len()
        );

        self.service.analyze(&request).await
    }

    pub async fn health(&self) -> Result<ServiceHealth, AnalyzerError> {
        self.service.health().await
    }
}
