//! Shared test utilities for the recipe-box test suite.
//!
//! Provides a scripted [`FakeTransport`], a [`RecordingPage`] that captures
//! every page effect, a [`RecordingRegion`] that keeps each write, a
//! [`LogCapture`] sink for log assertions, and fixture builders for recipe
//! summaries.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let transport = FakeTransport::new();
//! transport.respond(Method::Get, "/api/recipes", 200, collection_json(&["Soup"]));
//!
//! let page = RecordingPage::new();
//! // ... drive a controller or submitter ...
//! assert_eq!(page.alerts(), vec!["Recipe deleted successfully."]);
//! ```

use crate::page::{CookbookButton, Page, Region, Tone};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use crate::types::RecipeSummary;
use maud::Markup;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

// =========================================================================
// Fixtures
// =========================================================================

/// A summary with predictable description and image derived from the name.
pub fn summary(name: &str, rating: f64) -> RecipeSummary {
    RecipeSummary {
        name: name.to_string(),
        description: format!("{name} description"),
        image: format!("/static/uploads/{name}.jpg"),
        average_rating: rating,
    }
}

/// `{"recipes": [...]}` body with one backend-shaped row per name.
pub fn collection_json(names: &[&str]) -> Value {
    let rows: Vec<Value> = names
        .iter()
        .map(|name| {
            json!({
                "recipe_name": name,
                "recipe_description": format!("{name} description"),
                "recipe_image": format!("/static/uploads/{name}.jpg"),
                "avg_rating": 3.0
            })
        })
        .collect();
    json!({ "recipes": rows })
}

// =========================================================================
// Scripted transport
// =========================================================================

type Handler = Box<dyn Fn(&ApiRequest) -> (ApiResponse, Duration) + Send + Sync>;

struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

/// Transport answering from registered routes and recording every request.
///
/// Later registrations for the same method and path take precedence. A
/// request with no matching route fails as a transport error, which is
/// how tests simulate an unreachable server.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        let body = body.to_string();
        self.route(method, path, move |_| ApiResponse {
            status,
            body: body.clone(),
        });
    }

    pub fn respond_text(&self, method: Method, path: &str, status: u16, body: &str) {
        let body = body.to_string();
        self.route(method, path, move |_| ApiResponse {
            status,
            body: body.clone(),
        });
    }

    pub fn route<F>(&self, method: Method, path: &str, handler: F)
    where
        F: Fn(&ApiRequest) -> ApiResponse + Send + Sync + 'static,
    {
        self.route_delayed(method, path, move |req| (handler(req), Duration::ZERO));
    }

    /// Like [`route`](Self::route), but the handler also picks how long the
    /// response takes to arrive.
    pub fn route_delayed<F>(&self, method: Method, path: &str, handler: F)
    where
        F: Fn(&ApiRequest) -> (ApiResponse, Duration) + Send + Sync + 'static,
    {
        self.routes.lock().unwrap().push(Route {
            method,
            path: path.to_string(),
            handler: Box::new(handler),
        });
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let scripted = {
            let routes = self.routes.lock().unwrap();
            routes
                .iter()
                .rev()
                .find(|r| r.method == request.method && r.path == request.path)
                .map(|r| (r.handler)(&request))
        };
        match scripted {
            Some((response, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
            None => Err(TransportError::Send {
                path: request.path,
                reason: "connection refused".to_string(),
            }),
        }
    }
}

// =========================================================================
// Recording page and region
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Alert(String),
    Confirm(String),
    Navigate(String),
    Reload,
    Message(String, Tone),
    Button(CookbookButton),
    Banner(String),
    BannerDismissed,
}

/// Page that records effects in order. Confirmation prompts are answered
/// with a fixed value.
pub struct RecordingPage {
    events: Mutex<Vec<PageEvent>>,
    accept_confirm: AtomicBool,
}

impl RecordingPage {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            accept_confirm: AtomicBool::new(true),
        }
    }

    /// A page whose user declines every confirmation prompt.
    pub fn declining() -> Self {
        let page = Self::new();
        page.accept_confirm.store(false, Ordering::SeqCst);
        page
    }

    pub fn events(&self) -> Vec<PageEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PageEvent::Alert(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PageEvent::Navigate(to) => Some(to),
                _ => None,
            })
            .collect()
    }

    pub fn last_button(&self) -> Option<CookbookButton> {
        self.events().into_iter().rev().find_map(|e| match e {
            PageEvent::Button(b) => Some(b),
            _ => None,
        })
    }

    fn record(&self, event: PageEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Page for RecordingPage {
    fn alert(&self, message: &str) {
        self.record(PageEvent::Alert(message.to_string()));
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.record(PageEvent::Confirm(prompt.to_string()));
        self.accept_confirm.load(Ordering::SeqCst)
    }

    fn navigate(&self, location: &str) {
        self.record(PageEvent::Navigate(location.to_string()));
    }

    fn reload(&self) {
        self.record(PageEvent::Reload);
    }

    fn show_message(&self, text: &str, tone: Tone) {
        self.record(PageEvent::Message(text.to_string(), tone));
    }

    fn set_cookbook_button(&self, button: CookbookButton) {
        self.record(PageEvent::Button(button));
    }

    fn show_banner(&self, banner: Markup) {
        self.record(PageEvent::Banner(banner.into_string()));
    }

    fn dismiss_banner(&self) {
        self.record(PageEvent::BannerDismissed);
    }
}

/// Region that keeps every write; the last one is the visible content.
#[derive(Default)]
pub struct RecordingRegion {
    writes: Mutex<Vec<String>>,
}

impl RecordingRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> String {
        self.writes.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

impl Region for RecordingRegion {
    fn replace(&self, content: Markup) {
        self.writes.lock().unwrap().push(content.into_string());
    }
}

/// Occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

// =========================================================================
// Logs
// =========================================================================

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Collect `info` and above on this thread until the guard drops.
    /// Async tests must stay on the current-thread runtime.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        (capture, tracing::subscriber::set_default(subscriber))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
