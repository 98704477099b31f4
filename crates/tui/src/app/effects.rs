use super::*;
use chrono::Utc;
use codelens_client::ClientError;

/// Logs the classified failure and keeps the detailed text for the UI.
fn describe(operation: &str, error: ClientError) -> String {
    tracing::debug!(
        transient = error.is_transient(),
        summary = error.user_message(),
        "{operation} request failed"
    );
    error.to_string()
}

impl App {
    pub fn init(&mut self) {
        tracing::info!(base_url = %self.config.service.base_url, "Starting codelens");
        self.dispatch(Action::CheckHealth);
    }

    pub(super) fn run_effect(&mut self, effect: Effect) {
        let Some(client) = self.client.clone() else {
            let reason = "service client is not configured".to_string();
            let event = match effect {
                Effect::Upload { ticket, .. } => AppAsyncEvent::UploadFinished {
                    ticket,
                    result: Err(reason),
                },
                Effect::Analyze { .. } => AppAsyncEvent::AnalyzeFinished {
                    result: Err(reason),
                    finished_at: Utc::now(),
                },
                Effect::ListChunks { .. } => AppAsyncEvent::ChunksLoaded {
                    result: Err(reason),
                },
                Effect::CheckHealth => AppAsyncEvent::HealthChecked {
                    result: Err(reason),
                },
            };
            self.dispatch(Action::Async(event));
            return;
        };

        match effect {
            Effect::Upload { ticket, path } => {
                self.spawn_app_task(
                    async move {
                        let result = client
                            .upload_file(&path)
                            .await
                            .map_err(|e| describe("upload", e));
                        AppAsyncEvent::UploadFinished { ticket, result }
                    },
                    move |reason| AppAsyncEvent::UploadFinished {
                        ticket,
                        result: Err(reason),
                    },
                );
            }
            Effect::Analyze { query } => {
                self.spawn_app_task(
                    async move {
                        let result = client
                            .analyze(&query)
                            .await
                            .map_err(|e| describe("analyze", e));
                        AppAsyncEvent::AnalyzeFinished {
                            result,
                            finished_at: Utc::now(),
                        }
                    },
                    |reason| AppAsyncEvent::AnalyzeFinished {
                        result: Err(reason),
                        finished_at: Utc::now(),
                    },
                );
            }
            Effect::ListChunks { limit } => {
                self.spawn_app_task(
                    async move {
                        let result = client
                            .list_chunks(limit)
                            .await
                            .map_err(|e| describe("list_chunks", e));
                        AppAsyncEvent::ChunksLoaded { result }
                    },
                    |reason| AppAsyncEvent::ChunksLoaded {
                        result: Err(reason),
                    },
                );
            }
            Effect::CheckHealth => {
                self.spawn_app_task(
                    async move {
                        let result = client
                            .health_check()
                            .await
                            .map_err(|e| describe("health", e));
                        AppAsyncEvent::HealthChecked { result }
                    },
                    |reason| AppAsyncEvent::HealthChecked {
                        result: Err(reason),
                    },
                );
            }
        }
    }

    pub fn process_async_events(&mut self) {
        let mut async_events = Vec::new();
        if let Some(ref mut rx) = self.app_async_rx {
            while let Ok(event) = rx.try_recv() {
                async_events.push(event);
            }
        }

        for event in async_events {
            self.dispatch(Action::Async(event));
        }
    }
}
