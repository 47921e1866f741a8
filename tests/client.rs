//! Integration tests for the recipe API client
//!
//! Each test runs against a local mockito server standing in for the upstream API.

use std::time::Duration;

use mockito::Matcher;
use serde_json::json;

use recipebook::data::{RecipeApiClient, UserProfile};
use recipebook::error::ApiError;

const API_KEY: &str = "test-key";

fn client_for(server: &mockito::Server) -> RecipeApiClient {
    RecipeApiClient::with_base_url(server.url(), API_KEY)
}

fn api_key() -> Matcher {
    Matcher::UrlEncoded("apiKey".into(), API_KEY.into())
}

#[tokio::test]
async fn test_random_recipes_sends_key_and_normalizes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/random")
        .match_query(Matcher::AllOf(vec![
            api_key(),
            Matcher::UrlEncoded("number".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "recipes": [
                    {
                        "id": 12345,
                        "title": "Garlic Pasta",
                        "image": "https://spoonacular.com/recipeImages/12345-312x231.png",
                        "imageType": "png",
                        "summary": "A <b>quick</b> dinner",
                        "readyInMinutes": 20,
                        "servings": 2,
                        "sourceUrl": "https://example.com/pasta"
                    },
                    { "id": 777 }
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let recipes = client_for(&server).random_recipes(2, &[]).await.unwrap();

    mock.assert_async().await;
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].id, 12345);
    assert_eq!(
        recipes[0].image,
        "https://img.spoonacular.com/recipes/12345-556x370.png"
    );
    assert_eq!(recipes[0].ready_in_minutes, Some(20));
    assert_eq!(recipes[1].title, "Untitled recipe");
    assert_eq!(recipes[1].image, "/placeholder-recipe.jpg");
    assert_eq!(recipes[1].ready_in_minutes, None);
}

#[tokio::test]
async fn test_random_recipes_sends_tags() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/random")
        .match_query(Matcher::AllOf(vec![
            api_key(),
            Matcher::UrlEncoded("include-tags".into(), "vegetarian,dessert".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"recipes":[{"id":1,"title":"Pie"}]}"#)
        .create_async()
        .await;

    let tags = vec!["vegetarian".to_string(), "dessert".to_string()];
    let recipes = client_for(&server).random_recipes(1, &tags).await.unwrap();

    mock.assert_async().await;
    assert_eq!(recipes[0].title, "Pie");
}

#[tokio::test]
async fn test_random_recipes_empty_is_empty_result() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/random")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"recipes":[]}"#)
        .create_async()
        .await;

    let err = client_for(&server).random_recipes(8, &[]).await.unwrap_err();
    assert!(err.is_empty_result());
    assert_eq!(err.to_string(), "No recipes returned from API");
}

#[tokio::test]
async fn test_upstream_error_carries_api_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/random")
        .match_query(Matcher::Any)
        .with_status(402)
        .with_body(r#"{"status":"failure","code":402,"message":"Daily points limit reached"}"#)
        .create_async()
        .await;

    let err = client_for(&server).random_recipes(8, &[]).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::UpstreamError {
            status: Some(402),
            message: "Daily points limit reached".to_string(),
        }
    );
}

#[tokio::test]
async fn test_upstream_error_without_message_names_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/42/information")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("<html>Service Unavailable</html>")
        .create_async()
        .await;

    let err = client_for(&server).recipe_information(42).await.unwrap_err();
    assert_eq!(err.to_string(), "Upstream returned status 503");
}

#[tokio::test]
async fn test_non_json_success_body_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/random")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client_for(&server).random_recipes(8, &[]).await.unwrap_err();
    match err {
        ApiError::Unknown(message) => assert!(message.starts_with("Malformed response from API")),
        other => panic!("Expected Unknown, got {:?}", other),
    }
}

#[tokio::test]
async fn test_recipe_information_parses_detail() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/42/information")
        .match_query(Matcher::AllOf(vec![
            api_key(),
            Matcher::UrlEncoded("includeNutrition".into(), "false".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "id": 42,
                "title": "Lentil Soup",
                "imageType": "jpg",
                "readyInMinutes": 45,
                "servings": 6,
                "instructions": "<ol><li>Simmer.</li></ol>",
                "extendedIngredients": [
                    { "id": 1, "name": "lentils", "amount": 1.5, "unit": "cups", "original": "1 1/2 cups lentils" },
                    { "id": 2, "name": "salt" }
                ],
                "analyzedInstructions": [
                    { "name": "", "steps": [ { "number": 1, "step": "Simmer." }, { "step": "Serve." } ] }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let detail = client_for(&server).recipe_information(42).await.unwrap();

    mock.assert_async().await;
    assert_eq!(detail.id, 42);
    assert_eq!(detail.servings, 6);
    assert_eq!(detail.ingredients.len(), 2);
    assert_eq!(detail.ingredients[0].original, "1 1/2 cups lentils");
    assert_eq!(detail.ingredients[1].original, "salt");
    assert_eq!(detail.instruction_groups[0].steps[1].number, 2);
}

#[tokio::test]
async fn test_similar_recipes_parses_array() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/42/similar")
        .match_query(Matcher::AllOf(vec![
            api_key(),
            Matcher::UrlEncoded("number".into(), "4".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"id":1,"title":"Bean Soup","imageType":"jpg","readyInMinutes":30,"servings":4}]"#)
        .create_async()
        .await;

    let similar = client_for(&server).similar_recipes(42, 4).await.unwrap();

    mock.assert_async().await;
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].title, "Bean Soup");
    assert_eq!(similar[0].image, "https://img.spoonacular.com/recipes/1-556x370.jpg");
}

#[tokio::test]
async fn test_popular_recipes_sorts_by_popularity() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            api_key(),
            Matcher::UrlEncoded("sort".into(), "popularity".into()),
            Matcher::UrlEncoded("addRecipeInformation".into(), "true".into()),
            Matcher::UrlEncoded("number".into(), "8".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"results":[{"id":5,"title":"Pancakes"}],"totalResults":1}"#)
        .create_async()
        .await;

    let recipes = client_for(&server).popular_recipes(8).await.unwrap();

    mock.assert_async().await;
    assert_eq!(recipes[0].title, "Pancakes");
}

#[tokio::test]
async fn test_search_with_no_results_is_ok() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            api_key(),
            Matcher::UrlEncoded("query".into(), "unobtainium".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"results":[],"totalResults":0}"#)
        .create_async()
        .await;

    let recipes = client_for(&server)
        .search_recipes("unobtainium", 20)
        .await
        .unwrap();
    assert!(recipes.is_empty());
}

#[tokio::test]
async fn test_connect_user_posts_profile() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/users/connect")
        .match_query(api_key())
        .match_body(Matcher::PartialJson(json!({
            "username": "cook",
            "firstName": "Sam",
            "email": "sam@example.com"
        })))
        .with_status(200)
        .with_body(r#"{"username":"cook-123","hash":"abc"}"#)
        .create_async()
        .await;

    let profile = UserProfile {
        username: "cook".to_string(),
        first_name: "Sam".to_string(),
        last_name: "Baker".to_string(),
        email: "sam@example.com".to_string(),
    };
    let ack = client_for(&server).connect_user(&profile).await.unwrap();

    mock.assert_async().await;
    assert_eq!(ack["username"], "cook-123");
}

#[tokio::test]
async fn test_probe_reports_reachability() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("GET", "/recipes/random")
        .match_query(Matcher::UrlEncoded("number".into(), "1".into()))
        .with_status(200)
        .with_body(r#"{"recipes":[]}"#)
        .expect(1)
        .create_async()
        .await;

    assert!(client_for(&server).probe().await, "Empty body still means reachable");
    ok.assert_async().await;

    let unreachable = RecipeApiClient::with_base_url("http://127.0.0.1:9", API_KEY)
        .with_timeouts(Duration::from_secs(1), Duration::from_secs(1));
    assert!(!unreachable.probe().await);
}

#[tokio::test]
async fn test_slow_upstream_is_network_timeout() {
    // Accepts connections but never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = RecipeApiClient::with_base_url(format!("http://{}", addr), API_KEY)
        .with_timeouts(Duration::from_millis(200), Duration::from_millis(200));

    let err = client.random_recipes(8, &[]).await.unwrap_err();
    assert_eq!(err, ApiError::NetworkTimeout);
    assert!(!client.probe().await);
}
