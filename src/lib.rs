pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod ingredients;
pub mod model;
pub mod normalize;
pub mod render;

use log::debug;

pub use crate::client::{
    HttpRecipeService, HttpRecipeServiceBuilder, RecipeQueryClient, RecipeService,
};
pub use crate::config::AnalyzerConfig;
pub use crate::controller::{Status, ViewController};
pub use crate::error::AnalyzerError;
pub use crate::ingredients::IngredientStore;
pub use crate::model::{
    Difficulty, Ingredient, Nutrition, QueryState, Recipe, RecipeBatch, RecipeRequest,
    ServiceHealth,
};
pub use crate::normalize::ResponseNormalizer;
pub use crate::render::{Badge, Fragment, RecipeCard, RenderPipeline};

/// Build a query client from configuration (file + environment)
pub fn client_from_config(
    config: &AnalyzerConfig,
) -> Result<RecipeQueryClient<HttpRecipeService>, AnalyzerError> {
    let service = HttpRecipeService::from_config(config)?;
    Ok(RecipeQueryClient::new(service).with_preferences(
        config.dietary_restrictions.clone(),
        config.cuisine_preference.clone(),
    ))
}

/// One-shot lookup: deduplicate `ingredients`, ask the configured service and
/// normalize its answer.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), smart_recipe_analyzer::AnalyzerError> {
/// let batch = smart_recipe_analyzer::find_recipes(&["rice", "egg", "scallion"]).await?;
/// for recipe in &batch.recipes {
///     println!("{}", recipe.name);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn find_recipes(ingredients: &[&str]) -> Result<RecipeBatch, AnalyzerError> {
    let config = AnalyzerConfig::load()?;
    find_recipes_with_config(ingredients, &config).await
}

/// Same as [`find_recipes`] with explicit configuration
pub async fn find_recipes_with_config(
    ingredients: &[&str],
    config: &AnalyzerConfig,
) -> Result<RecipeBatch, AnalyzerError> {
    let mut store = IngredientStore::new();
    for name in ingredients {
        store.add(name);
    }
    debug!("Looking up recipes for {:?}", store.names().collect::<Vec<_>>());

    let client = client_from_config(config)?;
    let raw = client.submit(store.as_slice()).await?;
    ResponseNormalizer.normalize(&raw)
}
