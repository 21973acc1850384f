//! In-memory fetcher for crawler tests
//!
//! Serves canned HTML keyed by URL, optionally after a delay, and keeps count
//! of open sessions so tests can check the concurrency bound and that every
//! session is closed.

use crate::crawler::parser::HtmlDocument;
use crate::crawler::session::{FetchError, FetchSession, Fetcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
struct ScriptedPage {
    html: String,
    delay: Duration,
    panics: bool,
}

#[derive(Debug, Default)]
struct Counters {
    open: AtomicUsize,
    max_open: AtomicUsize,
    opened: AtomicUsize,
    navigated: Mutex<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedFetcher {
    pages: Arc<HashMap<String, ScriptedPage>>,
    default_delay: Duration,
    counters: Arc<Counters>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `html` at `url`
    pub fn page(self, url: &str, html: &str) -> Self {
        let delay = self.default_delay;
        self.insert(url, html, delay)
    }

    /// Serves `html` at `url` after `delay`
    pub fn slow_page(self, url: &str, html: &str, delay: Duration) -> Self {
        self.insert(url, html, delay)
    }

    /// Navigating to `url` panics
    pub fn panicking_page(mut self, url: &str) -> Self {
        self = self.insert(url, "", Duration::ZERO);
        let key = Url::parse(url).expect("scripted URL").to_string();
        if let Some(page) = Arc::make_mut(&mut self.pages).get_mut(&key) {
            page.panics = true;
        }
        self
    }

    /// Delay applied to pages added after this call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    fn insert(mut self, url: &str, html: &str, delay: Duration) -> Self {
        let key = Url::parse(url).expect("scripted URL").to_string();
        Arc::make_mut(&mut self.pages).insert(
            key,
            ScriptedPage {
                html: html.to_string(),
                delay,
                panics: false,
            },
        );
        self
    }

    /// Sessions currently open
    pub fn open_sessions(&self) -> usize {
        self.counters.open.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously open sessions seen
    pub fn max_open_sessions(&self) -> usize {
        self.counters.max_open.load(Ordering::SeqCst)
    }

    /// Sessions opened over the fetcher's lifetime
    pub fn sessions_opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    /// Every URL navigated to, in call order
    pub fn navigated(&self) -> Vec<String> {
        self.counters.navigated.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    type Session = ScriptedSession;

    async fn open_session(&self) -> Result<ScriptedSession, FetchError> {
        let open = self.counters.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_open.fetch_max(open, Ordering::SeqCst);
        self.counters.opened.fetch_add(1, Ordering::SeqCst);

        Ok(ScriptedSession {
            pages: self.pages.clone(),
            counters: self.counters.clone(),
        })
    }
}

pub struct ScriptedSession {
    pages: Arc<HashMap<String, ScriptedPage>>,
    counters: Arc<Counters>,
}

#[async_trait]
impl FetchSession for ScriptedSession {
    type Document = HtmlDocument;

    async fn navigate(&mut self, url: &Url, _timeout: Duration) -> Result<HtmlDocument, FetchError> {
        self.counters
            .navigated
            .lock()
            .unwrap()
            .push(url.to_string());

        let page = self.pages.get(url.as_str()).cloned();
        let Some(page) = page else {
            return Err(FetchError::Connect {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        };

        if page.panics {
            panic!("scripted panic navigating to {}", url);
        }
        if !page.delay.is_zero() {
            tokio::time::sleep(page.delay).await;
        }
        Ok(HtmlDocument::parse(&page.html))
    }

    async fn close(self) {
        self.counters.open.fetch_sub(1, Ordering::SeqCst);
    }
}
