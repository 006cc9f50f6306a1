//! Domain operations over the prompt store.
//!
//! [`PromptRepository`] is the only component that understands prompt
//! semantics. Every mutating operation performs exactly one load-mutate-save
//! cycle against its [`StoreBackend`]; nothing is cached between calls, so
//! each call observes the latest persisted state. There is no locking: two
//! overlapping mutations are last-write-wins at document granularity, which is
//! accepted for the single-user deployments this targets.

use thiserror::Error;
use uuid::Uuid;

use crate::llm::{CompletionGateway, GatewayError, Turn};
use crate::prompt::Prompt;
use crate::store::{StoreBackend, StoreError};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("prompt not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub struct PromptRepository<S, G> {
    store: S,
    gateway: G,
    model: String,
}

impl<S: StoreBackend, G: CompletionGateway> PromptRepository<S, G> {
    /// Opens a repository over `store`, seeding the backing document if it
    /// does not exist yet.
    pub fn new(store: S, gateway: G, model: impl Into<String>) -> Result<Self, StoreError> {
        store.ensure()?;
        Ok(Self {
            store,
            gateway,
            model: model.into(),
        })
    }

    /// All prompts in insertion order. Read-only.
    pub fn list(&self) -> Result<Vec<Prompt>, StoreError> {
        Ok(self.store.load()?.prompts)
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<Prompt>, StoreError> {
        Ok(self.store.load()?.find(id).cloned())
    }

    /// Stores a new prompt whose sole iteration holds `text` and returns its
    /// id. Empty text is accepted; validation is the caller's concern.
    pub fn create(&self, text: &str) -> Result<Uuid, StoreError> {
        let mut doc = self.store.load()?;
        let prompt = Prompt::new(text);
        let id = prompt.id;
        doc.prompts.push(prompt);
        self.store.save(&doc)?;
        Ok(id)
    }

    /// Increments the prompt's thumbs-up (or thumbs-down) counter by one.
    ///
    /// Returns `false` when `id` is unknown; the document is left untouched
    /// and nothing is written.
    pub fn rate(&self, id: &Uuid, up: bool) -> Result<bool, StoreError> {
        let mut doc = self.store.load()?;
        let Some(prompt) = doc.find_mut(id) else {
            return Ok(false);
        };
        if up {
            prompt.thumbs_up += 1;
        } else {
            prompt.thumbs_down += 1;
        }
        self.store.save(&doc)?;
        Ok(true)
    }

    /// Appends a timestamped comment. Returns `false` when `id` is unknown.
    pub fn comment(&self, id: &Uuid, text: &str) -> Result<bool, StoreError> {
        let mut doc = self.store.load()?;
        let Some(prompt) = doc.find_mut(id) else {
            return Ok(false);
        };
        prompt.push_comment(text);
        self.store.save(&doc)?;
        Ok(true)
    }

    /// Rewrites the prompt's latest text through the completion gateway and
    /// appends the trimmed reply as a new iteration.
    ///
    /// The turn list sent to the gateway is: the global system prompt (if
    /// non-empty), then `override_system_prompt` (if provided and non-empty),
    /// then the last iteration's text as the user turn. A gateway failure
    /// propagates unchanged and nothing is persisted.
    pub async fn regenerate(
        &self,
        id: &Uuid,
        override_system_prompt: Option<&str>,
    ) -> Result<String, RepositoryError> {
        let mut doc = self.store.load()?;
        let last = doc
            .find(id)
            .ok_or(RepositoryError::NotFound(*id))?
            .latest_text()
            .to_string();

        let mut turns = Vec::new();
        if !doc.system_prompt.is_empty() {
            turns.push(Turn::system(doc.system_prompt.clone()));
        }
        if let Some(system) = override_system_prompt.filter(|s| !s.is_empty()) {
            turns.push(Turn::system(system));
        }
        turns.push(Turn::user(last));

        let reply = self.gateway.complete(&turns, &self.model).await?;
        let text = reply.trim().to_string();

        let prompt = doc.find_mut(id).ok_or(RepositoryError::NotFound(*id))?;
        prompt.push_iteration(text.clone());
        self.store.save(&doc)?;
        Ok(text)
    }

    /// The global system prompt prefixed to every regeneration.
    pub fn system_prompt(&self) -> Result<String, StoreError> {
        Ok(self.store.load()?.system_prompt)
    }

    pub fn set_system_prompt(&self, text: &str) -> Result<(), StoreError> {
        let mut doc = self.store.load()?;
        doc.system_prompt = text.to_string();
        self.store.save(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_store::JsonFileStore;
    use crate::llm::TurnRole;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct MockGateway {
        reply: String,
        fail: bool,
        calls: Mutex<Vec<Vec<Turn>>>,
    }

    impl MockGateway {
        fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                fail: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: String::new(),
                fail: true,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl CompletionGateway for &MockGateway {
        async fn complete(&self, turns: &[Turn], _model: &str) -> Result<String, GatewayError> {
            self.calls.lock().unwrap().push(turns.to_vec());
            if self.fail {
                return Err(GatewayError::EmptyResponse);
            }
            Ok(self.reply.clone())
        }
    }

    fn repository<'a>(
        dir: &TempDir,
        gateway: &'a MockGateway,
    ) -> PromptRepository<JsonFileStore, &'a MockGateway> {
        let store = JsonFileStore::new(dir.path().join("prompts_db.json"));
        PromptRepository::new(store, gateway, "gpt-4o-mini").unwrap()
    }

    fn raw_db(dir: &TempDir) -> String {
        fs::read_to_string(dir.path().join("prompts_db.json")).unwrap()
    }

    #[test]
    fn test_create_then_list_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("unused");
        let repository = repository(&temp_dir, &gateway);

        let id = repository.create("hello").unwrap();

        let prompts = repository.list().unwrap();
        assert_eq!(1, prompts.len());
        assert_eq!(id, prompts[0].id);
        assert_eq!(1, prompts[0].iterations.len());
        assert_eq!("hello", prompts[0].iterations[0].text);
        assert_eq!(0, prompts[0].thumbs_up);
        assert_eq!(0, prompts[0].thumbs_down);
        assert!(prompts[0].comments.is_empty());
    }

    #[test]
    fn test_create_accepts_empty_text() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("unused");
        let repository = repository(&temp_dir, &gateway);

        let id = repository.create("").unwrap();
        let prompt = repository.get(&id).unwrap().unwrap();
        assert_eq!("", prompt.latest_text());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("unused");
        let repository = repository(&temp_dir, &gateway);

        let first = repository.create("first").unwrap();
        let second = repository.create("second").unwrap();
        let third = repository.create("third").unwrap();

        let ids: Vec<Uuid> = repository.list().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(vec![first, second, third], ids);
    }

    #[test]
    fn test_rating_monotonicity() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("unused");
        let repository = repository(&temp_dir, &gateway);

        let id = repository.create("rate me").unwrap();

        // Interleaved: 3 up, 2 down.
        assert!(repository.rate(&id, true).unwrap());
        assert!(repository.rate(&id, false).unwrap());
        assert!(repository.rate(&id, true).unwrap());
        assert!(repository.rate(&id, false).unwrap());
        assert!(repository.rate(&id, true).unwrap());

        let prompt = repository.get(&id).unwrap().unwrap();
        assert_eq!(3, prompt.thumbs_up);
        assert_eq!(2, prompt.thumbs_down);
    }

    #[test]
    fn test_rate_unknown_id_leaves_store_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("unused");
        let repository = repository(&temp_dir, &gateway);
        repository.create("existing").unwrap();

        let before = raw_db(&temp_dir);
        assert!(!repository.rate(&Uuid::new_v4(), true).unwrap());
        assert_eq!(before, raw_db(&temp_dir));
    }

    #[test]
    fn test_comment_appends_with_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("unused");
        let repository = repository(&temp_dir, &gateway);

        let id = repository.create("needs feedback").unwrap();
        assert!(repository.comment(&id, "make it shorter").unwrap());
        assert!(repository.comment(&id, "add a title").unwrap());

        let prompt = repository.get(&id).unwrap().unwrap();
        assert_eq!(2, prompt.comments.len());
        assert_eq!("make it shorter", prompt.comments[0].text);
        assert_eq!("add a title", prompt.comments[1].text);
    }

    #[test]
    fn test_comment_unknown_id_leaves_store_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("unused");
        let repository = repository(&temp_dir, &gateway);
        repository.create("existing").unwrap();

        let before = raw_db(&temp_dir);
        assert!(!repository.comment(&Uuid::new_v4(), "lost").unwrap());
        assert_eq!(before, raw_db(&temp_dir));
    }

    #[tokio::test]
    async fn test_regenerate_appends_trimmed_reply() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("  Sunny, 20°C.\n");
        let repository = repository(&temp_dir, &gateway);

        let id = repository.create("Summarize today's weather").unwrap();
        let text = repository.regenerate(&id, None).await.unwrap();
        assert_eq!("Sunny, 20°C.", text);

        let prompt = repository.get(&id).unwrap().unwrap();
        assert_eq!(2, prompt.iterations.len());
        assert_eq!("Summarize today's weather", prompt.iterations[0].text);
        assert_eq!("Sunny, 20°C.", prompt.iterations[1].text);
    }

    #[tokio::test]
    async fn test_regenerate_uses_latest_iteration_as_user_turn() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("round two");
        let repository = repository(&temp_dir, &gateway);

        let id = repository.create("round zero").unwrap();
        repository.regenerate(&id, None).await.unwrap();
        repository.regenerate(&id, None).await.unwrap();

        let calls = gateway.calls.lock().unwrap();
        assert_eq!(2, calls.len());
        assert_eq!(vec![Turn::user("round zero")], calls[0]);
        // Second call is grounded on the first reply, not the original text.
        assert_eq!(vec![Turn::user("round two")], calls[1]);
    }

    #[tokio::test]
    async fn test_regenerate_turn_order_with_override() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("ok");
        let repository = repository(&temp_dir, &gateway);

        repository.set_system_prompt("global instruction").unwrap();
        let id = repository.create("the question").unwrap();
        repository
            .regenerate(&id, Some("override instruction"))
            .await
            .unwrap();

        let calls = gateway.calls.lock().unwrap();
        assert_eq!(
            vec![
                Turn::system("global instruction"),
                Turn::system("override instruction"),
                Turn::user("the question"),
            ],
            calls[0]
        );
    }

    #[tokio::test]
    async fn test_regenerate_skips_empty_system_turns() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("ok");
        let repository = repository(&temp_dir, &gateway);

        let id = repository.create("bare question").unwrap();
        repository.regenerate(&id, Some("")).await.unwrap();

        let calls = gateway.calls.lock().unwrap();
        assert!(calls[0].iter().all(|t| t.role == TurnRole::User));
    }

    #[tokio::test]
    async fn test_regenerate_unknown_id_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("unused");
        let repository = repository(&temp_dir, &gateway);
        repository.create("existing").unwrap();

        let before = raw_db(&temp_dir);
        let result = repository.regenerate(&Uuid::new_v4(), None).await;
        match result {
            Err(RepositoryError::NotFound(_)) => {}
            other => panic!("Expected NotFound, got {other:?}"),
        }
        // Nothing was written, and the gateway was never called.
        assert_eq!(before, raw_db(&temp_dir));
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_regenerate_gateway_failure_persists_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::failing();
        let repository = repository(&temp_dir, &gateway);

        let id = repository.create("doomed").unwrap();
        let before = raw_db(&temp_dir);

        let result = repository.regenerate(&id, None).await;
        match result {
            Err(RepositoryError::Gateway(_)) => {}
            other => panic!("Expected Gateway error, got {other:?}"),
        }

        assert_eq!(before, raw_db(&temp_dir));
        assert_eq!(1, repository.get(&id).unwrap().unwrap().iterations.len());
    }

    #[test]
    fn test_system_prompt_get_set_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("unused");
        let repository = repository(&temp_dir, &gateway);

        assert_eq!("", repository.system_prompt().unwrap());
        repository.set_system_prompt("Answer in one line.").unwrap();
        assert_eq!("Answer in one line.", repository.system_prompt().unwrap());
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = MockGateway::replying("Sunny, 20°C.");
        let repository = repository(&temp_dir, &gateway);

        let id = repository.create("Summarize today's weather").unwrap();
        assert!(repository.rate(&id, true).unwrap());
        assert!(repository.comment(&id, "make it shorter").unwrap());
        let text = repository.regenerate(&id, None).await.unwrap();
        assert_eq!("Sunny, 20°C.", text);

        let prompts = repository.list().unwrap();
        assert_eq!(1, prompts.len());

        let prompt = &prompts[0];
        assert_eq!(2, prompt.iterations.len());
        assert_eq!("Summarize today's weather", prompt.iterations[0].text);
        assert_eq!("Sunny, 20°C.", prompt.iterations[1].text);
        assert_eq!(1, prompt.thumbs_up);
        assert_eq!(0, prompt.thumbs_down);
        assert_eq!(1, prompt.comments.len());
        assert_eq!("make it shorter", prompt.comments[0].text);
    }
}
