//! Integration tests for the ragchat library.
//! These tests require a running backend named by RAGCHAT_BASE_URL.

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    use ragchat::chat::{
        ChatController, ChatPhase, ClientConfig, PlainTextRenderer, SubmitOutcome,
    };
    use ragchat::{ChatBackend, RagChat};

    fn client() -> Option<RagChat> {
        let base_url = std::env::var("RAGCHAT_BASE_URL").ok();
        if base_url.is_none() {
            eprintln!("Skipping test: RAGCHAT_BASE_URL not set");
            return None;
        }
        Some(RagChat::new(base_url).expect("Failed to create client"))
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let Some(client) = client() else {
            return;
        };

        let created = client.create_session("").await.expect("create");
        let sessions = client.list_sessions().await.expect("list");
        assert!(sessions.iter().any(|s| s.session_id == created.session_id));

        let history = client
            .history(&created.session_id, Some(50))
            .await
            .expect("history");
        assert!(history.is_empty());

        client
            .delete_session(&created.session_id)
            .await
            .expect("delete");
        let sessions = client.list_sessions().await.expect("list");
        assert!(sessions.iter().all(|s| s.session_id != created.session_id));
    }

    #[tokio::test]
    async fn test_controller_exchange() {
        let Some(client) = client() else {
            return;
        };
        let config = ClientConfig::new().with_reveal_interval(Duration::ZERO);
        let mut controller = ChatController::new(client, config);
        let mut renderer = PlainTextRenderer::with_color(false);

        let created = controller.create_session().await.expect("create");
        controller.set_draft("Say 'test passed'");
        let outcome = controller.submit(&mut renderer).await;
        assert!(
            matches!(outcome, SubmitOutcome::Revealing),
            "Chat should succeed against a live backend"
        );
        controller
            .run_reveal(&mut renderer, &AtomicBool::new(false))
            .await
            .expect("settle");
        assert_eq!(controller.state().phase(), ChatPhase::Settled);
        assert_eq!(controller.state().transcript().len(), 2);

        controller
            .delete_session(&created.session_id, &mut |_: &str| true)
            .await
            .expect("delete");
        assert!(controller.state().current_session().is_none());
    }
}
