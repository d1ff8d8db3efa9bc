use crate::client::{RecipeQueryClient, RecipeService};
use crate::ingredients::IngredientStore;
use crate::model::{Ingredient, QueryState, Recipe, ServiceHealth};
use crate::normalize::ResponseNormalizer;
use crate::render::{Fragment, RenderPipeline};
use crate::AnalyzerError;
use log::{info, warn};
use std::fmt;

/// What the status line shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status<'a> {
    Analyzing,
    Error(&'a str),
    Ready { ingredients: usize, recipes: usize },
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

impl fmt::Display for Status<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Analyzing => write!(f, "Analyzing ingredients..."),
            Status::Error(message) => write!(f, "Error: {}", message),
            Status::Ready {
                ingredients,
                recipes,
            } => write!(
                f,
                "{} ready • {} found",
                plural(*ingredients, "ingredient"),
                plural(*recipes, "recipe")
            ),
        }
    }
}

/// Holds the view in the in-flight state; dropping it leaves that state
struct PendingQuery<'a>(&'a mut QueryState);

impl<'a> PendingQuery<'a> {
    fn begin(state: &'a mut QueryState) -> Self {
        state.begin();
        PendingQuery(state)
    }
}

impl Drop for PendingQuery<'_> {
    fn drop(&mut self) {
        if self.0.in_flight() {
            self.0.finish(None);
        }
    }
}

/// Owns the whole view state and maps user actions onto it.
///
/// One controller lives as long as the view it drives. Actions take `&mut self`,
/// so a second submit can never overlap the first one.
pub struct ViewController<S> {
    client: RecipeQueryClient<S>,
    input: String,
    store: IngredientStore,
    state: QueryState,
    recipes: Vec<Recipe>,
    service_message: Option<String>,
}

impl<S: RecipeService> ViewController<S> {
    pub fn new(client: RecipeQueryClient<S>) -> Self {
        ViewController {
            client,
            input: String::new(),
            store: IngredientStore::new(),
            state: QueryState::default(),
            recipes: Vec::new(),
            service_message: None,
        }
    }

    /// Replace the pending ingredient text
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn can_add(&self) -> bool {
        !self.input.trim().is_empty()
    }

    /// Move the pending text into the ingredient list.
    ///
    /// The pending text is only cleared when the ingredient was accepted.
    pub fn add(&mut self) -> bool {
        if !self.can_add() {
            return false;
        }
        let added = self.store.add(&self.input);
        if added {
            self.input.clear();
        }
        added
    }

    pub fn remove(&mut self, index: usize) -> Option<Ingredient> {
        self.store.remove_at(index)
    }

    pub fn can_submit(&self) -> bool {
        !self.state.in_flight() && !self.store.is_empty()
    }

    /// Ask the service for recipes using the current ingredients.
    ///
    /// On success the recipe batch is replaced. Any failure keeps the previous
    /// batch and is recorded for the status line before being returned. If the
    /// returned future is dropped mid-request the controller leaves the
    /// in-flight state with no error recorded.
    pub async fn submit(&mut self) -> Result<usize, AnalyzerError> {
        if self.state.in_flight() {
            warn!("Ignoring submit while a request is in flight");
            return Err(AnalyzerError::RequestInFlight);
        }

        let outcome = {
            let _pending = PendingQuery::begin(&mut self.state);
            match self.client.submit(self.store.as_slice()).await {
                Ok(raw) => ResponseNormalizer.normalize(&raw),
                Err(e) => Err(e),
            }
        };

        match outcome {
            Ok(batch) => {
                info!("Received {} recipes", batch.recipes.len());
                self.recipes = batch.recipes;
                self.service_message = batch.message;
                self.state.finish(None);
                Ok(self.recipes.len())
            }
            Err(e) => {
                warn!("Recipe request failed: {}", e);
                self.state.finish(Some(e.user_message()));
                Err(e)
            }
        }
    }

    /// Empty ingredients, recipes, pending text and error
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.recipes.clear();
        self.input.clear();
        self.service_message = None;
        self.state.clear_error();
    }

    pub async fn health(&self) -> Result<ServiceHealth, AnalyzerError> {
        self.client.health().await
    }

    pub fn status(&self) -> Status<'_> {
        if self.state.in_flight() {
            Status::Analyzing
        } else if let Some(message) = self.state.last_error() {
            Status::Error(message)
        } else {
            Status::Ready {
                ingredients: self.store.len(),
                recipes: self.recipes.len(),
            }
        }
    }

    /// Header above the result list, e.g. `Using: rice, egg`
    pub fn using_line(&self) -> String {
        format!("Using: {}", self.store.names().collect::<Vec<_>>().join(", "))
    }

    /// One fragment per recipe of the current batch, in order
    pub fn fragments(&self) -> Vec<Fragment> {
        RenderPipeline.render_all(&self.recipes)
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        self.store.as_slice()
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.state.last_error()
    }

    /// Summary sentence from the last successful response
    pub fn service_message(&self) -> Option<&str> {
        self.service_message.as_deref()
    }
}
