use std::sync::{mpsc::Sender, Arc};

use anyhow::{anyhow, Result};
use tokio::runtime::{Builder, Runtime};

use crate::{
    domain::{conversation::CycleId, events::DispatchOutcome},
    infra::error::AppError,
    usecases::{
        contracts::ReplyDispatcher,
        send_message::{dispatch, ChatSource},
    },
};

const DISPATCH_OUTCOME_SEND_FAILED: &str = "DISPATCH_OUTCOME_SEND_FAILED";

/// Runs dispatches on a private tokio runtime so the UI thread never waits on
/// the network. Each outcome is reported on `outcome_tx`.
pub struct BackgroundDispatcher {
    runtime: Option<Runtime>,
    source: Arc<dyn ChatSource>,
    outcome_tx: Sender<DispatchOutcome>,
}

impl BackgroundDispatcher {
    pub fn new(
        source: Arc<dyn ChatSource>,
        outcome_tx: Sender<DispatchOutcome>,
    ) -> Result<Self, AppError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("chatbot-dispatch")
            .enable_all()
            .build()
            .map_err(AppError::RuntimeStart)?;

        Ok(Self {
            runtime: Some(runtime),
            source,
            outcome_tx,
        })
    }
}

impl ReplyDispatcher for BackgroundDispatcher {
    fn start(&self, cycle: CycleId, message: String) -> Result<()> {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| anyhow!("dispatch runtime is shut down"))?;

        let source = Arc::clone(&self.source);
        let outcome_tx = self.outcome_tx.clone();

        runtime.spawn(async move {
            let reply = dispatch(source.as_ref(), &message).await;

            if let Err(error) = outcome_tx.send(DispatchOutcome { cycle, reply }) {
                tracing::warn!(
                    code = DISPATCH_OUTCOME_SEND_FAILED,
                    cycle,
                    error = %error,
                    "dispatch outcome dropped; UI receiver is gone"
                );
            }
        });

        Ok(())
    }
}

impl Drop for BackgroundDispatcher {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, time::Duration};

    use async_trait::async_trait;

    use super::*;
    use crate::usecases::send_message::{ChatSourceError, RawChatResponse};

    struct EchoSource;

    #[async_trait]
    impl ChatSource for EchoSource {
        async fn post_chat(&self, message: &str) -> Result<RawChatResponse, ChatSourceError> {
            Ok(RawChatResponse::new(
                200,
                serde_json::json!({ "reply": format!("echo: {message}") }).to_string(),
            ))
        }
    }

    struct DownSource;

    #[async_trait]
    impl ChatSource for DownSource {
        async fn post_chat(&self, _message: &str) -> Result<RawChatResponse, ChatSourceError> {
            Err(ChatSourceError::Timeout)
        }
    }

    #[test]
    fn reports_reply_for_the_started_cycle() {
        let (tx, rx) = mpsc::channel();
        let dispatcher = BackgroundDispatcher::new(Arc::new(EchoSource), tx).expect("runtime");

        dispatcher.start(3, "hello".to_owned()).expect("start");

        let outcome = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("outcome must arrive");
        assert_eq!(
            outcome,
            DispatchOutcome {
                cycle: 3,
                reply: "echo: hello".to_owned()
            }
        );
    }

    #[test]
    fn failures_still_produce_an_outcome() {
        let (tx, rx) = mpsc::channel();
        let dispatcher = BackgroundDispatcher::new(Arc::new(DownSource), tx).expect("runtime");

        dispatcher.start(0, "hello".to_owned()).expect("start");

        let outcome = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("outcome must arrive");
        assert_eq!(outcome.reply, "Error: Unable to get response");
    }

    #[test]
    fn start_does_not_block_caller() {
        struct SlowSource;

        #[async_trait]
        impl ChatSource for SlowSource {
            async fn post_chat(&self, _message: &str) -> Result<RawChatResponse, ChatSourceError> {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Ok(RawChatResponse::new(200, r#"{"reply":"late"}"#))
            }
        }

        let (tx, rx) = mpsc::channel();
        let dispatcher = BackgroundDispatcher::new(Arc::new(SlowSource), tx).expect("runtime");

        dispatcher.start(1, "hello".to_owned()).expect("start");

        assert!(rx.try_recv().is_err());
        let outcome = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("outcome must arrive");
        assert_eq!(outcome.reply, "late");
    }
}
