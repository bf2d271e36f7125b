use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use gm_directory::config::Config;
use gm_directory::controller::*;
use gm_directory::network::*;
use gm_directory::view::*;

/// Serves canned responses, like the real API would.
struct StubApi {
    responses: HashMap<String, (u16, String)>,
}

#[async_trait]
impl HttpFetch for StubApi {
    async fn get(&self, path: &str) -> Result<HttpResponse, FetchError> {
        match self.responses.get(path) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Err(FetchError::network(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no route to {}", path),
            ))),
        }
    }
}

fn stub_api(routes: &[(&str, u16, &str)]) -> Arc<dyn HttpFetch> {
    // Enable logging output
    let _ = env_logger::builder().is_test(true).try_init();

    let responses = routes
        .iter()
        .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
        .collect();
    Arc::new(StubApi { responses })
}

fn directory_body(n: usize) -> String {
    let players: Vec<String> = (0..n).map(|i| format!("\"gm{}\"", i)).collect();
    format!(r#"{{"players":[{}]}}"#, players.join(","))
}

fn test_config() -> Result<Config> {
    Config::from_toml(
        r#"
        api_base = "http://localhost"
        page_size = 20
        reveal_delay_millis = 300
        "#,
    )
}

#[tokio::test(start_paused = true)]
async fn test_directory_reveals_in_pages() -> Result<()> {
    let config = test_config()?;
    let body = directory_body(45);
    let api = stub_api(&[("/titled/GM", 200, &body)]);

    let view = PlayerListView::new(
        DirectoryLoader::new(api),
        RevealController::from_config(&config),
    );
    view.load().await;

    let render = view.render().await;
    assert_eq!(20, render.items.len());
    assert!(!view.reveal().lock().await.exhausted());

    assert_eq!(RevealOutcome::Revealed(20), view.load_more().await);
    assert_eq!(40, view.render().await.items.len());
    assert!(!view.reveal().lock().await.exhausted());

    assert_eq!(RevealOutcome::Revealed(5), view.load_more().await);
    let render = view.render().await;
    assert_eq!(45, render.items.len());
    assert_eq!("gm44", render.items[44]);
    assert!(view.reveal().lock().await.exhausted());
    assert_eq!(Some(END_OF_LIST), render.footer);

    assert_eq!(RevealOutcome::Skipped, view.load_more().await);
    assert_eq!(45, view.render().await.items.len());
    Ok(())
}

#[tokio::test]
async fn test_small_directory_is_exhausted() -> Result<()> {
    let api = stub_api(&[("/titled/GM", 200, r#"{"players":["a","b"]}"#)]);
    let players = DirectoryLoader::new(api).fetch_all().await?;

    let reveal = RevealController::new(20, Duration::from_millis(0));
    reveal.initialize(players).await;

    let state = reveal.snapshot().await;
    assert_eq!(vec!["a", "b"], state.visible());
    assert_eq!(2, state.revealed_count());
    assert!(state.exhausted());
    Ok(())
}

#[tokio::test]
async fn test_directory_status_error() -> Result<()> {
    let api = stub_api(&[("/titled/GM", 404, "")]);
    let err = DirectoryLoader::new(api)
        .fetch_all()
        .await
        .expect_err("directory should fail");

    assert!(matches!(err, FetchError::HttpStatus { status: 404 }));
    assert!(!err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn test_profile_not_found_and_server_error() -> Result<()> {
    let api = stub_api(&[("/player/nouser", 404, ""), ("/player/down", 500, "")]);
    let loader = ProfileLoader::new(api);

    let not_found = loader.fetch_one("nouser").await.expect_err("should be missing");
    let server_error = loader.fetch_one("down").await.expect_err("should fail");

    assert!(not_found.is_not_found());
    assert!(matches!(server_error, FetchError::HttpStatus { status: 500 }));
    Ok(())
}

#[tokio::test]
async fn test_profile_view_with_clock() -> Result<()> {
    let last_online = chrono::Utc::now().timestamp() - 3661;
    let body = format!(
        r#"{{"username":"magnus","name":"","player_id":1,"last_online":{},"joined":1609459200}}"#,
        last_online
    );
    let api = stub_api(&[("/player/magnus", 200, &body)]);

    let view = PlayerProfileView::new(ProfileLoader::new(api));
    view.load("magnus").await;

    let player = match view.phase().await {
        ProfilePhase::Ready(player) => player,
        other => anyhow::bail!("unexpected phase: {:?}", other),
    };
    let card = ProfileCard::new(&player);
    assert_eq!("magnus", card.title);
    assert_eq!("1/1/2021", card.joined);

    let clock = card.last_online_clock(Duration::from_secs(1));
    let display = clock.display();
    assert!(display == "01:01:01" || display == "01:01:02", "{}", display);
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_is_a_message() -> Result<()> {
    let api = stub_api(&[]);

    let list = PlayerListView::new(
        DirectoryLoader::new(api.clone()),
        RevealController::new(20, Duration::from_millis(0)),
    );
    list.load().await;
    assert_eq!(Some(FAILED_TO_LOAD_PLAYERS), list.render().await.message());

    let profile = PlayerProfileView::new(ProfileLoader::new(api));
    profile.load("anyone").await;
    assert_eq!(Some(FAILED_TO_LOAD_PROFILE), profile.phase().await.message());
    Ok(())
}
