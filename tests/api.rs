//! HTTP tests for the planet API, driven through the router in-process.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use base64::Engine;
use planetary::store::Store;
use planetary::types::PlanetFilter;
use serde_json::{Value, json};

use common::{FakeSource, TestApp, unreachable_url};

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("list response")
        .iter()
        .map(|p| p["name"].as_str().expect("name").to_string())
        .collect()
}

#[tokio::test]
async fn health_is_open() {
    let app = TestApp::new();
    let response = app
        .raw(Request::get("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn planet_routes_require_auth() {
    let app = TestApp::new();

    let response = app
        .raw(Request::get("/api/AllPlanets/").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

    let (status, _) = app
        .request(
            Method::GET,
            "/api/AllPlanets/",
            Some("Token planetary_12345678_123456789012345678901234"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::GET, "/api/AllPlanets/", Some("Digest abc"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_and_obtain_token() {
    let app = TestApp::new();
    let auth = app.login("luke").await;

    let (status, body) = app
        .request(Method::GET, "/api/AllPlanets/", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let bearer = auth.replacen("Token ", "Bearer ", 1);
    let (status, _) = app
        .request(Method::GET, "/api/AllPlanets/", Some(&bearer), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/register/",
            None,
            Some(json!({"username": "luke", "password": "other"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["username"][0],
        "A user with that username already exists."
    );

    let (status, body) = app
        .request(Method::POST, "/api/register/", None, Some(json!({"username": "ben"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["password"][0], "This field is required.");

    let (status, _) = app
        .request(
            Method::POST,
            "/api/api-token-auth/",
            None,
            Some(json!({"username": "luke", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/register/",
            None,
            Some(json!({"username": "han solo", "password": "falcon"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn basic_auth_is_accepted() {
    let app = TestApp::new();
    app.login("leia").await;

    let encoded = base64::engine::general_purpose::STANDARD.encode("leia:use-the-force");
    let (status, _) = app
        .request(
            Method::GET,
            "/api/AllPlanets/",
            Some(&format!("Basic {encoded}")),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let encoded = base64::engine::general_purpose::STANDARD.encode("leia:wrong");
    let (status, _) = app
        .request(
            Method::GET,
            "/api/AllPlanets/",
            Some(&format!("Basic {encoded}")),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_and_retrieve_planet() {
    let app = TestApp::new();
    let auth = app.login("obiwan").await;

    let (status, body) = app
        .create_planet(
            &auth,
            json!({"name": "Tatooine", "population": 200000, "terrains": "desert", "climates": "arid"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Tatooine");
    assert_eq!(body["data"]["population"], 200000);

    let (status, body) = app
        .request(Method::GET, "/api/planetview/Tatooine/", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["terrains"], "desert");
    assert_eq!(body["data"]["climates"], "arid");

    let (status, body) = app
        .create_planet(&auth, json!({"name": "tatooine", "terrains": "", "climates": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A planet named 'tatooine' already exists.");
}

#[tokio::test]
async fn create_reports_field_errors() {
    let app = TestApp::new();
    let auth = app.login("yoda").await;

    let (status, body) = app
        .create_planet(
            &auth,
            json!({"name": "  ", "population": -1, "terrains": null, "climates": ["cold"]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["name"][0], "Planet name cannot be empty.");
    assert_eq!(body["fields"]["population"][0], "Population cannot be negative.");
    assert_eq!(body["fields"]["terrains"][0], "Terrains field cannot be null.");
    assert_eq!(
        body["fields"]["climates"][0],
        "Climates must be a comma-separated string."
    );

    assert!(app.store.list_planets(&PlanetFilter::default()).unwrap().is_empty());
}

#[tokio::test]
async fn non_object_bodies_are_rejected() {
    let app = TestApp::new();
    let auth = app.login("jyn").await;

    let (status, body) = app.create_planet(&auth, json!(["Scarif"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["non_field_errors"][0],
        "Invalid data. Expected an object, but got array."
    );
    assert!(app.store.list_planets(&PlanetFilter::default()).unwrap().is_empty());

    let (status, body) = app
        .request(Method::POST, "/api/register/", None, Some(json!("cassian")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["non_field_errors"].is_array());
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let app = TestApp::new();
    let auth = app.login("bodhi").await;

    let request = Request::post("/api/planets/create/")
        .header(header::AUTHORIZATION, &auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.raw(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["data"].is_null());
    assert!(body["error"].is_string());

    let request = Request::post("/api/planets/create/")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::from(r#"{"name": "Jedha"}"#))
        .unwrap();
    let response = app.raw(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn retrieve_missing_planet_is_not_found() {
    let app = TestApp::new();
    let auth = app.login("chewie").await;

    let (status, body) = app
        .request(Method::GET, "/api/planetview/Alderaan/", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Planet not found");
}

#[tokio::test]
async fn partial_update_merges_tags() {
    let app = TestApp::new();
    let auth = app.login("rey").await;
    app.create_planet(
        &auth,
        json!({"name": "Jakku", "population": 84, "terrains": "desert, arid", "climates": "hot"}),
    )
    .await;

    let (status, body) = app
        .request(
            Method::PATCH,
            "/api/planets/update-partial/Jakku/",
            Some(&auth),
            Some(json!({
                "add_terrains": ["icy"],
                "remove_terrains": ["arid"],
                "add_climates": ["dry", "windy"],
                "remove_climates": ["windy"],
                "population": 90
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["terrains"], "desert, icy");
    assert_eq!(body["data"]["climates"], "dry, hot");
    assert_eq!(body["data"]["population"], 90);

    let stored = app.store.get_planet_by_name("Jakku").unwrap().unwrap();
    assert_eq!(stored.terrains, "desert, icy");

    let (status, body) = app
        .request(
            Method::PATCH,
            "/api/planets/update-partial/Jakku/",
            Some(&auth),
            Some(json!({"add_terrains": "icy", "remove_climates": null})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["add_terrains"][0], "Expected a list of strings.");
    assert_eq!(body["fields"]["remove_climates"][0], "This field may not be null.");

    let (status, _) = app
        .request(
            Method::PATCH,
            "/api/planets/update-partial/Nowhere/",
            Some(&auth),
            Some(json!({"add_terrains": ["icy"]})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_update_replaces_fields() {
    let app = TestApp::new();
    let auth = app.login("lando").await;
    app.create_planet(
        &auth,
        json!({"name": "Bespin", "population": 6000000, "terrains": "gas giant", "climates": "temperate"}),
    )
    .await;
    app.create_planet(&auth, json!({"name": "Hoth"})).await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/planets/update/Bespin/",
            Some(&auth),
            Some(json!({"population": 7000000, "climates": "temperate, windy"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["population"], 7000000);
    assert_eq!(body["data"]["terrains"], "gas giant");
    assert_eq!(body["data"]["climates"], "temperate, windy");

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/planets/update/Bespin/",
            Some(&auth),
            Some(json!({"population": -3})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["population"].is_array());

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/planets/update/Bespin/",
            Some(&auth),
            Some(json!({"name": "HOTH"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/planets/update/Nowhere/",
            Some(&auth),
            Some(json!({"population": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_planet() {
    let app = TestApp::new();
    let auth = app.login("ahsoka").await;
    app.create_planet(&auth, json!({"name": "Alderaan"})).await;

    let (status, _) = app
        .request(Method::DELETE, "/api/planets/delete/Alderaan/", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .request(Method::DELETE, "/api/planets/delete/Alderaan/", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters() {
    let app = TestApp::new();
    let auth = app.login("mace").await;
    for (name, population, terrains) in [
        ("Small", 999, "rock"),
        ("Low", 1000, "grassy hills, swamp"),
        ("Mid", 2500, "ocean"),
        ("High", 5000, "swamp, jungle"),
        ("Big", 5001, "cityscape"),
    ] {
        let (status, _) = app
            .create_planet(
                &auth,
                json!({"name": name, "population": population, "terrains": terrains, "climates": "temperate"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .request(
            Method::GET,
            "/api/planets/?population__gte=1000&population__lte=5000",
            Some(&auth),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Low", "Mid", "High"]);

    let (_, body) = app
        .request(
            Method::GET,
            "/api/planets/?terrains__icontains=SWAMP",
            Some(&auth),
            None,
        )
        .await;
    assert_eq!(names(&body), vec!["Low", "High"]);

    let (_, body) = app
        .request(Method::GET, "/api/planets/?name=Mid", Some(&auth), None)
        .await;
    assert_eq!(names(&body), vec!["Mid"]);

    let (_, body) = app
        .request(Method::GET, "/api/planets/?name__icontains=i", Some(&auth), None)
        .await;
    assert_eq!(names(&body), vec!["Mid", "High", "Big"]);

    let (_, body) = app
        .request(Method::GET, "/api/planets/?population=999", Some(&auth), None)
        .await;
    assert_eq!(names(&body), vec!["Small"]);

    let (_, body) = app
        .request(Method::GET, "/api/AllPlanets/", Some(&auth), None)
        .await;
    assert_eq!(names(&body).len(), 5);
}

#[tokio::test]
async fn fetch_ingests_without_duplicates() {
    let source = FakeSource::start(
        StatusCode::OK,
        FakeSource::planets(json!([
            {"name": "Tatooine", "population": 200000, "terrains": ["desert"], "climates": ["arid"]},
            {"name": "Hoth", "population": null, "terrains": ["tundra", "ice caves"], "climates": ["frozen"]},
            {"name": "hoth", "population": 5, "terrains": [], "climates": []},
            {"name": "Broken", "population": -1, "terrains": [], "climates": []}
        ])),
    )
    .await;
    let app = TestApp::with_source(&source.url);
    let auth = app.login("anakin").await;

    app.create_planet(
        &auth,
        json!({"name": "TATOOINE", "population": 1, "terrains": "sand", "climates": "hot"}),
    )
    .await;

    let (status, body) = app
        .request(Method::GET, "/api/Fetchplanets/", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let saved: Vec<&str> = body["data"]["saved_planets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(saved, vec!["Hoth"]);
    assert_eq!(body["data"]["saved_planets"][0]["population"], 0);
    assert_eq!(body["data"]["saved_planets"][0]["terrains"], "tundra-ice caves");
    assert_eq!(body["data"]["skipped_planets"], json!(["Tatooine", "hoth"]));

    let existing = app.store.get_planet_by_name("TATOOINE").unwrap().unwrap();
    assert_eq!(existing.population, Some(1));
    assert_eq!(existing.terrains, "sand");

    let (status, body) = app
        .request(Method::GET, "/api/Fetchplanets/", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["saved_planets"], json!([]));
    assert_eq!(
        body["data"]["skipped_planets"],
        json!(["Tatooine", "Hoth", "hoth"])
    );
    assert_eq!(app.store.list_planets(&PlanetFilter::default()).unwrap().len(), 2);
}

#[tokio::test]
async fn fetch_skips_malformed_records() {
    let source = FakeSource::start(
        StatusCode::OK,
        FakeSource::planets(json!([
            {"name": "Hoth", "population": null, "terrains": ["tundra"], "climates": ["frozen"]},
            null,
            42,
            "Dantooine"
        ])),
    )
    .await;
    let app = TestApp::with_source(&source.url);
    let auth = app.login("cal").await;

    let (status, body) = app
        .request(Method::GET, "/api/Fetchplanets/", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["saved_planets"][0]["name"], "Hoth");
    assert_eq!(body["data"]["saved_planets"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["skipped_planets"], json!([]));
    assert!(app.store.get_planet_by_name("Hoth").unwrap().is_some());
}

#[tokio::test]
async fn fetch_upstream_error_aborts() {
    let source = FakeSource::start(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"errors": [{"message": "boom"}]}),
    )
    .await;
    let app = TestApp::with_source(&source.url);
    let auth = app.login("palpatine").await;

    let (status, body) = app
        .request(Method::GET, "/api/Fetchplanets/", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Failed to fetch data from SWAPI");
    assert!(app.store.list_planets(&PlanetFilter::default()).unwrap().is_empty());
}

#[tokio::test]
async fn fetch_unreachable_upstream_aborts() {
    let app = TestApp::with_source(&unreachable_url());
    let auth = app.login("vader").await;

    let (status, body) = app
        .request(Method::GET, "/api/Fetchplanets/", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Failed to fetch data from SWAPI");
}

#[tokio::test]
async fn fetch_with_missing_keys_ingests_nothing() {
    let source = FakeSource::start(StatusCode::OK, json!({"data": null})).await;
    let app = TestApp::with_source(&source.url);
    let auth = app.login("grogu").await;

    let (status, body) = app
        .request(Method::GET, "/api/Fetchplanets/", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["saved_planets"], json!([]));
    assert_eq!(body["data"]["skipped_planets"], json!([]));
}
