//! Program generation with guaranteed fallback.
//!
//! `ProgramGenerator::generate` never fails. Without a credential it goes
//! straight to the template generator; otherwise it makes one service call
//! and falls back on any transport, status, payload or parse failure.
//!
//! The service call runs as its own tokio task, so a caller that stops
//! waiting does not cancel it. `PendingProgram` lets a caller mark a request
//! as abandoned so the late result is dropped instead of applied.

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::http::HttpTextGenerator;
use crate::{
    fallback, normalize, prompt, GeneratedProgram, GenerationParams, ProgramSource,
};
use async_trait::async_trait;
use reqwest::Url;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// External text generation service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the raw reply text
    async fn complete(&self, prompt: &str) -> std::result::Result<String, GenerationError>;
}

/// A generated program and the path that produced it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub program: GeneratedProgram,
    pub source: ProgramSource,
}

impl GenerationOutcome {
    fn fallback(params: &GenerationParams) -> Self {
        Self {
            program: fallback::fallback(params),
            source: ProgramSource::Fallback,
        }
    }
}

/// Caller-facing generation client
#[derive(Clone, Default)]
pub struct ProgramGenerator {
    service: Option<Arc<dyn TextGenerator>>,
}

impl ProgramGenerator {
    /// Generator that never touches the network
    pub fn offline() -> Self {
        Self { service: None }
    }

    pub fn with_service(service: Arc<dyn TextGenerator>) -> Self {
        Self {
            service: Some(service),
        }
    }

    /// Build from configuration; no API key or an unusable endpoint means offline
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let Some(api_key) = config.effective_api_key() else {
            tracing::info!("No generation service credential configured, using templates");
            return Self::offline();
        };

        let endpoint = match Url::parse(&config.endpoint) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(
                    "Invalid generator endpoint '{}': {}, using templates",
                    config.endpoint,
                    e
                );
                return Self::offline();
            }
        };

        match HttpTextGenerator::new(
            endpoint,
            api_key,
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        ) {
            Ok(service) => Self::with_service(Arc::new(service)),
            Err(e) => {
                tracing::warn!("Failed to build HTTP client: {}, using templates", e);
                Self::offline()
            }
        }
    }

    pub fn is_online(&self) -> bool {
        self.service.is_some()
    }

    /// Generate a program, always succeeding
    pub async fn generate(&self, params: &GenerationParams) -> GeneratedProgram {
        self.generate_with_source(params).await.program
    }

    /// Generate a program and report whether the service or the templates produced it
    pub async fn generate_with_source(&self, params: &GenerationParams) -> GenerationOutcome {
        let Some(service) = self.service.clone() else {
            return GenerationOutcome::fallback(params);
        };

        let prompt = prompt::build_prompt(params);
        tracing::debug!("Requesting program from generation service ({} chars)", prompt.len());

        // Detached: dropping this future leaves the request running.
        let call = tokio::spawn(async move { service.complete(&prompt).await });

        let text = match call.await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!("Generation service unavailable: {}. Using templates.", e);
                return GenerationOutcome::fallback(params);
            }
            Err(e) => {
                tracing::warn!("Generation request task failed: {}. Using templates.", e);
                return GenerationOutcome::fallback(params);
            }
        };

        match normalize::normalize(&text, params) {
            Ok(program) => {
                tracing::info!(
                    "Generation service returned '{}' with {} workouts",
                    program.name,
                    program.workouts.len()
                );
                GenerationOutcome {
                    program,
                    source: ProgramSource::Service,
                }
            }
            Err(e) => {
                tracing::warn!("Unusable generation response: {}. Using templates.", e);
                GenerationOutcome::fallback(params)
            }
        }
    }

    /// Start generating in the background
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, params: GenerationParams) -> PendingProgram {
        let generator = self.clone();
        let task_params = params.clone();
        let handle =
            tokio::spawn(async move { generator.generate_with_source(&task_params).await });

        PendingProgram {
            handle,
            params,
            abandoned: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// A generation that is still running
pub struct PendingProgram {
    handle: JoinHandle<GenerationOutcome>,
    params: GenerationParams,
    abandoned: Arc<AtomicBool>,
}

impl PendingProgram {
    /// Mark the result as unwanted; the request itself keeps running
    pub fn abandon(&self) {
        self.abandoned.store(true, Ordering::SeqCst);
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::SeqCst)
    }

    /// Wait for the outcome; `None` if the request was abandoned
    pub async fn finish(self) -> Option<GenerationOutcome> {
        let outcome = match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Generation task failed: {}. Using templates.", e);
                GenerationOutcome::fallback(&self.params)
            }
        };

        if self.abandoned.load(Ordering::SeqCst) {
            tracing::debug!("Discarding result of abandoned generation '{}'", outcome.program.name);
            return None;
        }
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Experience, Goal, SplitType};
    use std::sync::atomic::AtomicUsize;

    struct StubService {
        reply: std::result::Result<String, ()>,
        delay: Duration,
        calls: Arc<AtomicUsize>,
        finished: Arc<AtomicUsize>,
    }

    impl StubService {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                delay: Duration::ZERO,
                calls: Arc::new(AtomicUsize::new(0)),
                finished: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                ..Self::replying("")
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl TextGenerator for StubService {
        async fn complete(&self, _prompt: &str) -> std::result::Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.finished.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(GenerationError::Status("status 503".into())),
            }
        }
    }

    fn params() -> GenerationParams {
        GenerationParams::new(
            SplitType::PushPullLegs,
            ["barbell", "dumbbell"],
            60,
            Experience::Advanced,
            Goal::Strength,
            3,
        )
    }

    const SERVICE_REPLY: &str = r#"Here you go:
{"name": "Service Plan", "description": "From the service", "daysPerWeek": 1,
 "workouts": [{"name": "Heavy Day", "dayNumber": 1, "focus": "Everything",
   "exercises": [{"name": "Squat", "muscleGroup": "Legs", "sets": 5, "reps": "5", "restSeconds": 180}],
   "estimatedDuration": 60}]}
Good luck!"#;

    #[tokio::test]
    async fn test_offline_uses_fallback() {
        crate::logging::init_test();
        let generator = ProgramGenerator::offline();
        let outcome = generator.generate_with_source(&params()).await;
        assert_eq!(outcome.source, ProgramSource::Fallback);
        assert_eq!(outcome.program, fallback::fallback(&params()));
    }

    #[tokio::test]
    async fn test_service_reply_is_normalized() {
        let stub = StubService::replying(SERVICE_REPLY);
        let calls = Arc::clone(&stub.calls);
        let generator = ProgramGenerator::with_service(Arc::new(stub));

        let outcome = generator.generate_with_source(&params()).await;

        assert_eq!(outcome.source, ProgramSource::Service);
        assert_eq!(outcome.program.name, "Service Plan");
        assert_eq!(outcome.program.workouts[0].exercises[0].sets, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_service_error_falls_back_after_one_attempt() {
        let stub = StubService::failing();
        let calls = Arc::clone(&stub.calls);
        let generator = ProgramGenerator::with_service(Arc::new(stub));

        let program = generator.generate(&params()).await;

        assert_eq!(program, fallback::fallback(&params()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_reply_falls_back() {
        for reply in ["Sorry, I can't do that.", r#"{"description": "no name"}"#, "{\"name\": 1"] {
            let generator = ProgramGenerator::with_service(Arc::new(StubService::replying(reply)));
            let outcome = generator.generate_with_source(&params()).await;
            assert_eq!(outcome.source, ProgramSource::Fallback, "reply: {}", reply);
            assert_eq!(outcome.program.workouts.len(), 3);
        }
    }

    #[tokio::test]
    async fn test_dropped_caller_does_not_cancel_request() {
        let stub = StubService::replying(SERVICE_REPLY).delayed(Duration::from_millis(50));
        let finished = Arc::clone(&stub.finished);
        let generator = ProgramGenerator::with_service(Arc::new(stub));

        let p = params();
        let waited =
            tokio::time::timeout(Duration::from_millis(5), generator.generate(&p)).await;
        assert!(waited.is_err(), "caller should have given up first");

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_abandoned_result_is_discarded() {
        let stub = StubService::replying(SERVICE_REPLY).delayed(Duration::from_millis(20));
        let finished = Arc::clone(&stub.finished);
        let generator = ProgramGenerator::with_service(Arc::new(stub));

        let pending = generator.start(params());
        pending.abandon();
        assert!(pending.is_abandoned());

        assert!(pending.finish().await.is_none());
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pending_result_delivered_when_kept() {
        let generator = ProgramGenerator::offline();
        let pending = generator.start(params());
        let outcome = pending.finish().await.unwrap();
        assert_eq!(outcome.source, ProgramSource::Fallback);
    }

    #[test]
    fn test_from_config_without_key_is_offline() {
        let config = GeneratorConfig {
            api_key: Some("   ".into()),
            ..GeneratorConfig::default()
        };
        if std::env::var(crate::config::API_KEY_ENV).is_err() {
            assert!(!ProgramGenerator::from_config(&config).is_online());
        }
    }

    #[test]
    fn test_from_config_bad_endpoint_goes_offline() {
        let config = GeneratorConfig {
            api_key: Some("secret".into()),
            endpoint: "not a url".into(),
            ..GeneratorConfig::default()
        };
        assert!(!ProgramGenerator::from_config(&config).is_online());
    }
}
