//! Debounced search over a [`Resource`].

use super::resource::{Resource, ResourceState};
use crate::error::Result;
use futures::future::BoxFuture;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Search controller with keystroke debounce and immediate submit.
///
/// Typed input waits for `delay` of quiet before a request is sent; each new
/// keystroke cancels the pending one. A blank query never reaches the network
/// and clears results at once.
pub struct DebouncedSearch<T> {
    resource: Resource<String, T>,
    delay: Duration,
    input: String,
    pending: Option<JoinHandle<()>>,
}

impl<T> DebouncedSearch<T>
where
    T: Send + Sync + 'static,
{
    pub fn new<F>(name: &'static str, delay: Duration, fetch: F) -> Self
    where
        F: Fn(String) -> BoxFuture<'static, Result<T>> + Send + Sync + 'static,
    {
        Self {
            resource: Resource::new(name, String::new(), fetch),
            delay,
            input: String::new(),
            pending: None,
        }
    }

    /// The raw input as typed.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The query the current results belong to.
    pub fn query(&self) -> String {
        self.resource.deps()
    }

    pub fn results(&self) -> watch::Ref<'_, ResourceState<T>> {
        self.resource.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.resource.subscribe()
    }

    /// Whether a debounced query is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }

    /// Replace the input, scheduling a debounced query.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.cancel_pending();

        let query = self.input.trim().to_string();
        if query.is_empty() {
            self.resource.clear();
            return;
        }

        let handle = self.resource.handle();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            handle.replace_deps(query);
        }));
    }

    pub fn push_char(&mut self, c: char) {
        let mut input = std::mem::take(&mut self.input);
        input.push(c);
        self.set_input(input);
    }

    pub fn pop_char(&mut self) {
        let mut input = std::mem::take(&mut self.input);
        input.pop();
        self.set_input(input);
    }

    /// Send the current input now, skipping the debounce.
    pub fn submit(&mut self) -> Option<JoinHandle<()>> {
        self.cancel_pending();
        let query = self.input.trim().to_string();
        if query.is_empty() {
            self.resource.clear();
            return None;
        }
        Some(self.resource.replace_deps(query))
    }

    /// Empty the input and results.
    pub fn reset(&mut self) {
        self.set_input(String::new());
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl<T> Drop for DebouncedSearch<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn recording(calls: Arc<Mutex<Vec<String>>>) -> DebouncedSearch<Vec<String>> {
        DebouncedSearch::new("search", Duration::from_millis(300), move |query: String| {
            calls.lock().unwrap().push(query.clone());
            async move { Ok(vec![format!("{query}-result")]) }.boxed()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_within_delay_sends_one_query() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut search = recording(Arc::clone(&calls));

        search.set_input("bit");
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.set_input("bitcoin");
        assert!(search.is_pending());
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*calls.lock().unwrap(), vec!["bitcoin".to_string()]);
        assert_eq!(search.query(), "bitcoin");
        assert_eq!(
            search.results().data,
            Some(vec!["bitcoin-result".to_string()])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pauses_longer_than_delay_send_each_query() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut search = recording(Arc::clone(&calls));

        search.set_input("eth");
        tokio::time::sleep(Duration::from_millis(350)).await;
        search.set_input("ethereum");
        tokio::time::sleep(Duration::from_millis(350)).await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["eth".to_string(), "ethereum".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_skips_debounce() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut search = recording(Arc::clone(&calls));

        search.set_input("sol");
        search.submit().unwrap().await.unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["sol".to_string()]);

        // The cancelled debounce never fires.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_clears_without_request() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut search = recording(Arc::clone(&calls));

        search.set_input("doge");
        search.submit().unwrap().await.unwrap();
        assert!(search.results().data.is_some());

        search.set_input("   ");
        assert!(search.results().data.is_none());
        assert!(search.submit().is_none());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*calls.lock().unwrap(), vec!["doge".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_query_after_clear_fetches_again() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut search = recording(Arc::clone(&calls));

        search.set_input("ada");
        search.submit().unwrap().await.unwrap();
        search.reset();
        search.set_input("ada");
        search.submit().unwrap().await.unwrap();

        assert_eq!(calls.lock().unwrap().len(), 2);
        assert_eq!(search.input(), "ada");
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_and_pop_chars() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut search = recording(Arc::clone(&calls));

        for c in "xrpp".chars() {
            search.push_char(c);
        }
        search.pop_char();
        tokio::time::sleep(Duration::from_millis(301)).await;

        assert_eq!(*calls.lock().unwrap(), vec!["xrp".to_string()]);
    }
}
