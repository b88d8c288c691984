mod common;

use std::sync::Arc;

use common::{FakeRecommender, FakeSpotify, ids};
use musicai::{
    error::{ToolError, ToolErrorKind},
    tools::{Tool, ToolOutput, Toolbox},
    types::PlaylistRef,
};
use serde_json::json;

fn toolbox(spotify: Arc<FakeSpotify>) -> Toolbox {
    Toolbox::new(spotify, Arc::new(FakeRecommender::default()))
}

#[test]
fn test_tool_names_round_trip() {
    for tool in Tool::ALL {
        assert_eq!(Tool::from_name(tool.name()), Some(tool));
        assert_eq!(tool.parameters()["type"], "object");
    }
    assert_eq!(Tool::from_name("play_song"), None);
}

#[tokio::test]
async fn test_top_tracks_returns_ids() {
    let spotify = Arc::new(FakeSpotify::with_top(&["a", "b", "c"]));
    let tools = toolbox(spotify);

    let output = tools.top_tracks(2, "medium_term").await.unwrap();
    assert_eq!(output, ToolOutput::TopTracks(ids(&["a", "b"])));
    assert_eq!(output.to_string(), r#"Top tracks: ["a", "b"]"#);
}

#[tokio::test]
async fn test_top_tracks_rejects_bad_arguments_without_remote_call() {
    let spotify = Arc::new(FakeSpotify::with_top(&["a"]));
    let tools = toolbox(spotify.clone());

    let err = tools.top_tracks(0, "short_term").await.unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::InvalidArgument);

    let err = tools.top_tracks(51, "short_term").await.unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::InvalidArgument);

    let err = tools.top_tracks(10, "forever").await.unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::InvalidArgument);

    assert_eq!(spotify.call_count(), 0);
}

#[tokio::test]
async fn test_create_playlist_twice_gives_distinct_playlists() {
    let spotify = Arc::new(FakeSpotify::default());
    let tools = toolbox(spotify.clone());

    let first = tools.create_playlist("Road trip", "songs for the car").await.unwrap();
    let second = tools.create_playlist("Road trip", "songs for the car").await.unwrap();
    assert_ne!(first, second);

    match first {
        ToolOutput::PlaylistCreated(PlaylistRef { ref id, ref url }) => {
            assert!(url.ends_with(id.as_str()));
            assert_eq!(
                first.to_string(),
                format!("Playlist created successfully: {url} (id: {id})")
            );
        }
        other => panic!("unexpected output: {other:?}"),
    }
    assert_eq!(spotify.playlists.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_playlist_requires_name() {
    let spotify = Arc::new(FakeSpotify::default());
    let tools = toolbox(spotify.clone());

    let err = tools.create_playlist("   ", "").await.unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::InvalidArgument);
    assert_eq!(spotify.call_count(), 0);
}

#[tokio::test]
async fn test_add_tracks_prefixes_ids_and_inserts_at_top() {
    let spotify = Arc::new(FakeSpotify::default());
    let tools = toolbox(spotify.clone());

    let output = tools
        .add_tracks(
            "https://open.spotify.com/playlist/pl1",
            &ids(&["t1", "spotify:track:t2"]),
        )
        .await
        .unwrap();
    assert_eq!(output.to_string(), "Successfully added 2 tracks to the playlist.");

    let added = spotify.added.lock().unwrap();
    assert_eq!(added.len(), 1);
    let (playlist, uris, position) = &added[0];
    assert_eq!(playlist, "pl1");
    assert_eq!(uris, &ids(&["spotify:track:t1", "spotify:track:t2"]));
    assert_eq!(*position, 0);
}

#[tokio::test]
async fn test_add_empty_list_succeeds_without_remote_call() {
    let spotify = Arc::new(FakeSpotify::default());
    let tools = toolbox(spotify.clone());

    let output = tools.add_tracks("pl1", &[]).await.unwrap();
    assert_eq!(output, ToolOutput::TracksAdded(0));
    assert_eq!(output.to_string(), "Successfully added 0 tracks to the playlist.");
    assert_eq!(spotify.call_count(), 0);
}

#[tokio::test]
async fn test_invoke_decodes_model_arguments() {
    let spotify = Arc::new(FakeSpotify::with_top(&["x", "y", "z"]));
    let tools = toolbox(spotify);

    let text = tools
        .invoke(
            "get_user_top_tracks",
            json!({"limit": "2", "time_range": "long_term"}),
        )
        .await;
    assert_eq!(text, r#"Top tracks: ["x", "y"]"#);

    let text = tools
        .invoke("get_recommendation", json!({"size": 2, "seeds": ["a", "b"]}))
        .await;
    assert_eq!(text, r#"Your recommended track IDs: ["rec-b", "rec-a"]"#);
}

#[tokio::test]
async fn test_invoke_renders_failures_as_text() {
    let spotify = Arc::new(FakeSpotify::failing(ToolError::new(
        ToolErrorKind::Auth,
        "token expired",
    )));
    let tools = toolbox(spotify);

    let text = tools
        .invoke("create_spotify_playlist", json!({"name": "Chill", "description": ""}))
        .await;
    assert_eq!(
        text,
        "Error creating new playlist: authentication failed: token expired"
    );

    let text = tools
        .invoke("add_tracks_to_playlist", json!({"playlist_id": "pl", "track_uris": ["t"]}))
        .await;
    assert!(text.starts_with("Error adding tracks: "));

    let text = tools.invoke("get_user_top_tracks", json!({"limit": 5})).await;
    assert!(text.starts_with("Error getting top tracks: invalid argument"));
}

#[tokio::test]
async fn test_recommendation_remote_failure_reports_status() {
    let tools = Toolbox::new(
        Arc::new(FakeSpotify::default()),
        Arc::new(FakeRecommender {
            fail_with: Some(ToolError::new(ToolErrorKind::Remote { status: 500 }, "")),
        }),
    );

    let text = tools
        .invoke("get_recommendation", json!({"size": 10, "seeds": ["a"]}))
        .await;
    assert_eq!(text, "Request failed: HTTP 500");
}

#[tokio::test]
async fn test_unknown_tool() {
    let tools = toolbox(Arc::new(FakeSpotify::default()));

    let err = tools.call("play_song", json!({})).await.unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::UnknownTool);

    let text = tools.invoke("play_song", json!({})).await;
    assert!(text.starts_with("Error: unknown tool"));
}
