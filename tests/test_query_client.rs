use mockito::Matcher;
use serde_json::json;
use smart_recipe_analyzer::{
    AnalyzerError, HttpRecipeService, Ingredient, RecipeQueryClient, ResponseNormalizer,
};

fn client_for(server: &mockito::Server) -> RecipeQueryClient<HttpRecipeService> {
    let service = HttpRecipeService::builder()
        .endpoint(server.url())
        .build()
        .unwrap();
    RecipeQueryClient::new(service)
}

fn ingredients(names: &[&str]) -> Vec<Ingredient> {
    names.iter().map(|name| Ingredient::new(*name)).collect()
}

#[tokio::test]
async fn test_submit_sends_expected_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze-recipes")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "ingredients": [{"name": "chicken"}, {"name": "rice"}],
            "dietary_restrictions": [],
            "cuisine_preference": null
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"recipes": [], "message": "Generated 0 recipes"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let body = client
        .submit(&ingredients(&["chicken", "rice"]))
        .await
        .unwrap();

    assert_eq!(body["message"], "Generated 0 recipes");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_submit_returns_body_unmodified() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/analyze-recipes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"recipes": [{"servings": "many", "extra": true}], "unexpected": 1}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let body = client.submit(&ingredients(&["egg"])).await.unwrap();

    assert_eq!(
        body,
        json!({"recipes": [{"servings": "many", "extra": true}], "unexpected": 1})
    );
}

#[tokio::test]
async fn test_preferences_are_forwarded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze-recipes")
        .match_body(Matcher::PartialJson(json!({
            "dietary_restrictions": ["vegan"],
            "cuisine_preference": "Thai"
        })))
        .with_status(200)
        .with_body(r#"{"recipes": []}"#)
        .create_async()
        .await;

    let client = client_for(&server)
        .with_preferences(vec!["vegan".to_string()], Some("Thai".to_string()));
    client.submit(&ingredients(&["tofu"])).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_surfaces_detail() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/analyze-recipes")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "AI service error: rate limited"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client.submit(&ingredients(&["egg"])).await;

    match result {
        Err(AnalyzerError::Network(message)) => {
            assert_eq!(message, "AI service error: rate limited")
        }
        other => panic!("expected network error, got {:?}", other),
    }
    assert!(!client.is_in_flight());
}

#[tokio::test]
async fn test_error_without_detail_mentions_status() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/analyze-recipes")
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.submit(&ingredients(&["egg"])).await.unwrap_err();

    assert!(matches!(err, AnalyzerError::Network(_)));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_malformed_json_is_network_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/analyze-recipes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"recipes": [{"name": "Half a recipe""#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.submit(&ingredients(&["egg"])).await.unwrap_err();

    assert!(matches!(err, AnalyzerError::Network(_)));
    assert!(err.to_string().contains("Malformed response body"));
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let service = HttpRecipeService::builder()
        .endpoint("http://127.0.0.1:1")
        .build()
        .unwrap();
    let client = RecipeQueryClient::new(service);

    let err = client.submit(&ingredients(&["egg"])).await.unwrap_err();
    assert!(matches!(err, AnalyzerError::Network(_)));
}

#[tokio::test]
async fn test_empty_ingredients_never_reach_the_service() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze-recipes")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.submit(&[]).await.unwrap_err();

    assert!(matches!(err, AnalyzerError::Validation(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_concurrent_submit_issues_one_exchange() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze-recipes")
        .with_status(200)
        .with_body(r#"{"recipes": [{}]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let list = ingredients(&["rice"]);
    let (first, second) = tokio::join!(client.submit(&list), client.submit(&list));

    let results = [first, second];
    let accepted = results.iter().filter(|result| result.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|result| matches!(result, Err(AnalyzerError::RequestInFlight)))
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(rejected, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_health_check() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "healthy", "service": "Smart Recipe Analyzer API", "ai_enabled": true}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let health = client.health().await.unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.service, "Smart Recipe Analyzer API");
    assert!(health.ai_enabled);
}

#[tokio::test]
async fn test_fallback_recipe_shape_normalizes() {
    // what the service sends when its AI backend is not configured
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/analyze-recipes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "recipes": [{
                    "name": "Simple chicken & rice Dish",
                    "ingredients": ["chicken", "rice"],
                    "instructions": [
                        "Prepare and clean all ingredients",
                        "Heat oil in a large pan over medium heat",
                        "Serve hot and enjoy!"
                    ],
                    "cookingTime": "25 minutes",
                    "difficulty": "Easy",
                    "servings": 4,
                    "nutrition": {"calories": 320, "protein": "12g", "carbs": "35g", "fat": "8g", "fiber": "5g"}
                }],
                "message": "Generated 1 recipe using your ingredients: chicken, rice!"
            }"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let raw = client
        .submit(&ingredients(&["chicken", "rice"]))
        .await
        .unwrap();
    let batch = ResponseNormalizer.normalize(&raw).unwrap();

    assert_eq!(batch.recipes.len(), 1);
    let recipe = &batch.recipes[0];
    assert_eq!(recipe.name, "Simple chicken & rice Dish");
    assert_eq!(recipe.instructions.len(), 3);
    assert_eq!(recipe.nutrition.recognized().count(), 5);
    assert_eq!(
        batch.message.as_deref(),
        Some("Generated 1 recipe using your ingredients: chicken, rice!")
    );
}
