mod common;

use std::sync::Arc;

use common::{FakeRecommender, FakeSpotify, ScriptedModel};
use futures::{SinkExt, StreamExt};
use musicai::{
    agent::{Agent, types::Message},
    error::AgentError,
    server::{AppState, chat_router},
    tools::Toolbox,
};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

fn agent_with(model: Arc<ScriptedModel>) -> Arc<Agent> {
    let toolbox = Toolbox::new(
        Arc::new(FakeSpotify::with_top(&["t1"])),
        Arc::new(FakeRecommender::default()),
    );
    Arc::new(Agent::new(model, toolbox))
}

/// Serves the chat router on an ephemeral port and returns the `/chat` URL.
async fn serve(agent: Arc<Agent>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, chat_router(AppState::new(agent)))
            .await
            .unwrap();
    });
    format!("ws://{addr}/chat")
}

async fn connect(url: &str) -> Client {
    let (ws, _) = connect_async(url).await.unwrap();
    ws
}

async fn send_text(ws: &mut Client, text: &str) {
    ws.send(tungstenite::Message::Text(text.into())).await.unwrap();
}

/// Next JSON frame from the server.
async fn next_frame(ws: &mut Client) -> Value {
    loop {
        match ws.next().await {
            Some(Ok(tungstenite::Message::Text(text))) => {
                return serde_json::from_str(text.as_str()).unwrap();
            }
            Some(Ok(tungstenite::Message::Ping(_) | tungstenite::Message::Pong(_))) => continue,
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

/// The server ended the connection: close frame, end of stream or reset.
async fn assert_closed(ws: &mut Client) {
    match ws.next().await {
        None | Some(Ok(tungstenite::Message::Close(_))) | Some(Err(_)) => {}
        Some(Ok(other)) => panic!("expected the connection to close, got {other:?}"),
    }
}

#[tokio::test]
async fn test_welcome_response_goodbye() {
    let model = Arc::new(ScriptedModel::new(vec![Ok(Message::assistant(
        "Let's build a chill playlist.",
    ))]));
    let url = serve(agent_with(model.clone())).await;
    let mut ws = connect(&url).await;

    let welcome = next_frame(&mut ws).await;
    assert_eq!(welcome["type"], "welcome");
    assert_eq!(
        welcome["content"],
        "Connected to MusicAI! What kind of playlist would you like to create?"
    );

    send_text(&mut ws, &json!({"message": "something chill"}).to_string()).await;
    assert_eq!(
        next_frame(&mut ws).await,
        json!({"type": "response", "content": "Let's build a chill playlist."})
    );

    // The JSON envelope is unwrapped before it reaches the model.
    assert_eq!(model.seen.lock().unwrap()[0][0].text(), "something chill");

    send_text(&mut ws, "Disconnect").await;
    assert_eq!(
        next_frame(&mut ws).await,
        json!({"type": "goodbye", "content": "Goodbye! Enjoy your playlist!"})
    );
    assert_closed(&mut ws).await;
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn test_agent_error_sends_error_frame_and_closes() {
    let model = Arc::new(ScriptedModel::new(vec![Err(AgentError::Api {
        status: 500,
        message: "boom".into(),
    })]));
    let url = serve(agent_with(model)).await;
    let mut ws = connect(&url).await;

    assert_eq!(next_frame(&mut ws).await["type"], "welcome");

    send_text(&mut ws, "make me a playlist").await;
    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(
        frame["content"],
        "An error occurred: model API error 500: boom"
    );
    assert_closed(&mut ws).await;
}

#[tokio::test]
async fn test_each_connection_gets_its_own_thread() {
    let model = Arc::new(ScriptedModel::new(vec![
        Ok(Message::assistant("one")),
        Ok(Message::assistant("two")),
    ]));
    let agent = agent_with(model.clone());
    let url = serve(agent.clone()).await;

    let mut first = connect(&url).await;
    assert_eq!(next_frame(&mut first).await["type"], "welcome");
    let mut second = connect(&url).await;
    assert_eq!(next_frame(&mut second).await["type"], "welcome");

    send_text(&mut first, "first").await;
    assert_eq!(next_frame(&mut first).await["content"], "one");
    send_text(&mut second, "second").await;
    assert_eq!(next_frame(&mut second).await["content"], "two");

    // The second connection starts from an empty history.
    assert_eq!(model.seen.lock().unwrap()[1].len(), 1);

    let sessions = agent.sessions();
    assert_eq!(sessions.count_threads().await, 2);
    assert_eq!(sessions.history("session_1").await[0].text(), "first");
    assert_eq!(sessions.history("session_2").await[0].text(), "second");
}
