use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use fyyur_db::AppState;
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::pages::home))
        .route("/healthz", get(api::pages::healthz))
        // Venues
        .route("/venues", get(api::venues::list_venues))
        .route("/venues/search", post(api::venues::search_venues))
        .route(
            "/venues/create",
            get(api::venues::create_venue_form).post(api::venues::create_venue),
        )
        .route(
            "/venues/{id}",
            get(api::venues::get_venue).post(api::venues::delete_venue),
        )
        .route(
            "/venues/{id}/edit",
            get(api::venues::edit_venue_form).post(api::venues::edit_venue),
        )
        // Artists
        .route("/artists", get(api::artists::list_artists))
        .route("/artists/search", post(api::artists::search_artists))
        .route(
            "/artists/create",
            get(api::artists::create_artist_form).post(api::artists::create_artist),
        )
        .route(
            "/artists/{id}",
            get(api::artists::get_artist).post(api::artists::delete_artist),
        )
        .route(
            "/artists/{id}/edit",
            get(api::artists::edit_artist_form).post(api::artists::edit_artist),
        )
        // Shows
        .route("/shows", get(api::shows::list_shows))
        .route(
            "/shows/create",
            get(api::shows::create_show_form).post(api::shows::create_show),
        )
        .fallback(api::pages::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn app() -> Router {
        router(test_support::test_state(test_support::test_db().await))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let location = resp
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, location, json)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const HOP: &str = "name=The+Musical+Hop&city=San+Francisco&state=CA\
        &address=1015+Folsom+Street&phone=123-123-1234\
        &facebook_link=https%3A%2F%2Fwww.facebook.com%2FTheMusicalHop\
        &genres=Jazz&genres=Unknown-Genre";

    #[tokio::test]
    async fn test_home_and_unknown_route() {
        let app = app().await;
        let (status, _, json) = send(&app, get_req("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["page"], "home");

        let (status, _, json) = send(&app, get_req("/nowhere")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["status"], 404);
    }

    #[tokio::test]
    async fn test_create_venue_then_view_detail() {
        let app = app().await;
        let (status, _, json) = send(&app, form("/venues/create", HOP)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["page"], "home");
        assert_eq!(json["notice"]["kind"], "success");
        assert_eq!(
            json["notice"]["message"],
            "Venue The Musical Hop was successfully listed!"
        );

        let (status, _, json) = send(&app, get_req("/venues/1")).await;
        assert_eq!(status, StatusCode::OK);
        let venue = &json["data"];
        assert_eq!(venue["name"], "The Musical Hop");
        assert_eq!(venue["genres"], serde_json::json!(["Jazz"]));
        assert_eq!(venue["website"], "https://www.facebook.com/TheMusicalHop");
        assert_eq!(venue["seeking_talent"], true);
        assert_eq!(venue["upcoming_shows_count"], 0);
        assert_eq!(venue["past_shows_count"], 0);
    }

    #[tokio::test]
    async fn test_missing_venue_is_404() {
        let app = app().await;
        let (status, _, _) = send(&app, get_req("/venues/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _, _) = send(&app, get_req("/venues/999/edit")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_venue_with_missing_field_reports_failure() {
        let app = app().await;
        let (status, _, json) = send(
            &app,
            form("/venues/create", "name=Park+Square&city=Paris&state=IDF"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["notice"]["kind"], "error");
        assert_eq!(
            json["notice"]["message"],
            "An error occurred. Venue Park Square could not be listed."
        );
        let (_, _, json) = send(&app, get_req("/venues")).await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_venue_redirects_to_detail() {
        let app = app().await;
        send(&app, form("/venues/create", HOP)).await;

        let edited = "name=The+Jazz+Hop&city=Oakland&state=CA&address=1+Broadway&genres=Blues";
        let (status, location, json) = send(&app, form("/venues/1/edit", edited)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/venues/1"));
        assert_eq!(
            json["notice"]["message"],
            "Venue The Jazz Hop was successfully updated!"
        );

        let (_, _, json) = send(&app, get_req("/venues/1")).await;
        assert_eq!(json["data"]["city"], "Oakland");
        assert_eq!(json["data"]["genres"], serde_json::json!(["Blues"]));
        assert!(json["data"]["phone"].is_null());
    }

    #[tokio::test]
    async fn test_edit_missing_venue_still_redirects() {
        let app = app().await;
        let edited = "name=Ghost&city=Oakland&state=CA&address=1+Broadway";
        let (status, location, json) = send(&app, form("/venues/7/edit", edited)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/venues/7"));
        assert_eq!(json["notice"]["kind"], "error");
        assert_eq!(
            json["notice"]["message"],
            "An error occurred. Venue Ghost could not be updated."
        );
    }

    #[tokio::test]
    async fn test_delete_venue() {
        let app = app().await;
        send(&app, form("/venues/create", HOP)).await;

        let (_, _, json) = send(&app, form("/venues/1", "")).await;
        assert_eq!(json["notice"]["message"], "The venue was successfully deleted!");
        let (status, _, _) = send(&app, get_req("/venues/1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, _, json) = send(&app, form("/venues/1", "")).await;
        assert_eq!(
            json["notice"]["message"],
            "An error occurred. The venue could not be deleted."
        );
    }

    #[tokio::test]
    async fn test_venues_grouped_by_city() {
        let app = app().await;
        for (name, city) in [("A", "Paris"), ("B", "Paris"), ("C", "Lyon")] {
            let body = format!("name={name}&city={city}&state=FR&address=1+Rue");
            send(&app, form("/venues/create", &body)).await;
        }

        let (_, _, json) = send(&app, get_req("/venues")).await;
        let areas = json["data"].as_array().unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0]["city"], "Paris");
        assert_eq!(areas[1]["city"], "Lyon");
        let paris: Vec<_> = areas[0]["venues"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["name"].as_str().unwrap())
            .collect();
        assert_eq!(paris, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_search_venues() {
        let app = app().await;
        for name in ["The+Blue+Room", "Park+Square+Live"] {
            let body = format!("name={name}&city=Paris&state=IDF&address=1+Rue");
            send(&app, form("/venues/create", &body)).await;
        }

        let (_, _, json) = send(&app, form("/venues/search", "search_term=ROOM")).await;
        assert_eq!(json["data"]["search_term"], "ROOM");
        assert_eq!(json["data"]["results"]["count"], 1);
        assert_eq!(json["data"]["results"]["data"][0]["name"], "The Blue Room");

        let (_, _, json) = send(&app, form("/venues/search", "search_term=")).await;
        assert_eq!(json["data"]["results"]["count"], 2);

        let (_, _, json) = send(&app, form("/venues/search", "")).await;
        assert_eq!(json["data"]["results"]["count"], 2);
        assert_eq!(json["data"]["search_term"], "");
    }

    #[tokio::test]
    async fn test_artist_lifecycle() {
        let app = app().await;
        let body = "name=Guns+N+Petals&city=San+Francisco&state=CA&genres=Jazz";
        let (_, _, json) = send(&app, form("/artists/create", body)).await;
        assert_eq!(
            json["notice"]["message"],
            "Artist Guns N Petals was successfully listed!"
        );

        let (_, _, json) = send(&app, get_req("/artists")).await;
        assert_eq!(json["data"][0]["name"], "Guns N Petals");

        let (_, _, json) = send(&app, get_req("/artists/1/edit")).await;
        assert_eq!(json["data"]["genres"], serde_json::json!(["Jazz"]));
        assert!(json["data"]["genre_choices"].as_array().unwrap().len() > 1);

        let edited = "name=Guns+N+Petals&city=Austin&state=TX&genres=Blues&genres=Soul";
        let (status, location, _) = send(&app, form("/artists/1/edit", edited)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/artists/1"));

        let (_, _, json) = send(&app, get_req("/artists/1")).await;
        assert_eq!(json["data"]["city"], "Austin");
        assert_eq!(json["data"]["genres"], serde_json::json!(["Blues", "Soul"]));
        assert_eq!(json["data"]["seeking_venue"], true);

        let (_, _, json) = send(&app, form("/artists/search", "search_term=petal")).await;
        assert_eq!(json["data"]["results"]["count"], 1);

        let (_, _, json) = send(&app, form("/artists/1", "")).await;
        assert_eq!(json["notice"]["message"], "The artist was successfully deleted!");
        let (status, _, _) = send(&app, get_req("/artists/1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_shows_create_and_list() {
        let app = app().await;
        send(&app, form("/venues/create", HOP)).await;
        send(
            &app,
            form("/artists/create", "name=Matt+Quevedo&city=New+York&state=NY"),
        )
        .await;

        let (_, _, json) = send(
            &app,
            form(
                "/shows/create",
                "venue_id=1&artist_id=1&start_time=2035-06-15+23%3A00%3A00",
            ),
        )
        .await;
        assert_eq!(json["notice"]["message"], "Show was successfully listed!");

        let (_, _, json) = send(&app, get_req("/shows")).await;
        let shows = json["data"].as_array().unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0]["venue_name"], "The Musical Hop");
        assert_eq!(shows[0]["artist_name"], "Matt Quevedo");
        assert_eq!(shows[0]["start_time"], "2035-06-15 23:00:00");

        let (_, _, json) = send(&app, get_req("/venues")).await;
        assert_eq!(json["data"][0]["venues"][0]["num_upcoming_shows"], 1);

        let (_, _, json) = send(&app, get_req("/artists/1")).await;
        assert_eq!(json["data"]["upcoming_shows_count"], 1);
        assert_eq!(json["data"]["upcoming_shows"][0]["venue_name"], "The Musical Hop");
    }

    #[tokio::test]
    async fn test_show_with_unknown_artist_fails() {
        let app = app().await;
        send(&app, form("/venues/create", HOP)).await;

        let (status, _, json) = send(
            &app,
            form(
                "/shows/create",
                "venue_id=1&artist_id=77&start_time=2035-06-15+23%3A00%3A00",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["notice"]["message"],
            "An error occurred. Show could not be listed."
        );
        let (_, _, json) = send(&app, get_req("/shows")).await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_forms_list_fields() {
        let app = app().await;
        let (_, _, json) = send(&app, get_req("/venues/create")).await;
        assert_eq!(json["page"], "new_venue");
        assert!(json["data"]["fields"]
            .as_array()
            .unwrap()
            .contains(&Value::from("address")));
        assert_eq!(json["data"]["genre_choices"][0], "Alternative");

        let (_, _, json) = send(&app, get_req("/shows/create")).await;
        assert_eq!(json["page"], "new_show");
        assert!(json["data"].get("genre_choices").is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_renders_empty_pages() {
        let app = router(test_support::test_state(test_support::unmigrated_db().await));

        for uri in ["/venues", "/artists", "/shows"] {
            let (status, _, json) = send(&app, get_req(uri)).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(json["data"], serde_json::json!([]), "{uri}");
        }

        for uri in ["/venues/search", "/artists/search"] {
            let (status, _, json) = send(&app, form(uri, "search_term=hop")).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(json["data"]["results"]["count"], 0, "{uri}");
        }

        for (uri, page) in [
            ("/venues/1", "show_venue"),
            ("/artists/1", "show_artist"),
            ("/venues/1/edit", "edit_venue"),
            ("/artists/1/edit", "edit_artist"),
        ] {
            let (status, _, json) = send(&app, get_req(uri)).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(json["page"], page);
            assert_eq!(json["data"], serde_json::json!({}), "{uri}");
            assert_eq!(json["notice"]["kind"], "error", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_security_headers() {
        let app = app().await;
        let resp = app.clone().oneshot(get_req("/healthz")).await.unwrap();
        assert_eq!(resp.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(resp.headers()[header::X_FRAME_OPTIONS], "DENY");
    }
}
