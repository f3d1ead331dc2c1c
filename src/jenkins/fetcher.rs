use crate::events::AppEvent;
use crate::jenkins::JenkinsClient;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs one history fetch and reports the outcome tagged with `generation`.
pub async fn fetch_history(
    client: &JenkinsClient,
    generation: u64,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let event = match client.fetch_history().await {
        Ok(builds) => AppEvent::HistoryLoaded { generation, builds },
        Err(e) => {
            tracing::error!("history fetch #{generation} failed: {e}");
            AppEvent::HistoryFailed {
                generation,
                error: e.to_string(),
            }
        }
    };
    if tx.send(event).is_err() {
        tracing::warn!("history fetch #{generation}: channel closed");
    }
}

/// Spawns [`fetch_history`] on the runtime so the event loop keeps drawing.
pub fn spawn_fetch(
    client: Arc<JenkinsClient>,
    generation: u64,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        fetch_history(&client, generation, &tx).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn success_reports_loaded_with_generation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "appData": {"info": {"builds": [{"number": 1}, {"number": 2}]}}
            })))
            .mount(&server)
            .await;

        let client = JenkinsClient::new(&server.uri(), "o/r", None).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        fetch_history(&client, 7, &tx).await;

        match rx.recv().await {
            Some(AppEvent::HistoryLoaded { generation, builds }) => {
                assert_eq!(generation, 7);
                assert_eq!(builds.len(), 2);
            }
            other => panic!("expected HistoryLoaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_reports_failed_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = JenkinsClient::new(&server.uri(), "o/r", None).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        fetch_history(&client, 3, &tx).await;

        match rx.recv().await {
            Some(AppEvent::HistoryFailed { generation, error }) => {
                assert_eq!(generation, 3);
                assert!(error.contains("500"), "error was: {error}");
            }
            other => panic!("expected HistoryFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn closed_channel_does_not_panic() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = JenkinsClient::new(&server.uri(), "o/r", None).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        fetch_history(&client, 1, &tx).await;
    }
}
