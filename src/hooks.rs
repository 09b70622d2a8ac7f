//! Request lifecycle hooks and the authentication contract.
//!
//! An authentication strategy is handed a [`Hooks`] registry right before a
//! request is dispatched and may register callbacks into it. The [`Pipeline`]
//! drives that exchange for a single request; sending it is left to the
//! caller's HTTP client, which runs the after-response hooks through
//! [`Hooks::finish`].

use reqwest::{Request, Response};

/// Callback run against an outgoing request
pub type BeforeRequestHook = Box<dyn Fn(&mut Request) + Send + Sync>;
/// Callback run against a received response
pub type AfterResponseHook = Box<dyn Fn(&Response) + Send + Sync>;

/// Lifecycle points a hook can attach to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookEvent {
    BeforeRequest,
    AfterResponse,
}

/// Registry of lifecycle callbacks for one request
#[derive(Default)]
pub struct Hooks {
    before_request: Vec<BeforeRequestHook>,
    after_response: Vec<AfterResponseHook>,
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("before_request", &self.before_request.len())
            .field("after_response", &self.after_response.len())
            .finish()
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback to run before the request is sent
    pub fn before_request<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut Request) + Send + Sync + 'static,
    {
        self.before_request.push(Box::new(hook));
        self
    }

    /// Register a callback to run once the response is received
    pub fn after_response<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&Response) + Send + Sync + 'static,
    {
        self.after_response.push(Box::new(hook));
        self
    }

    /// Number of callbacks registered for `event`
    pub fn len(&self, event: HookEvent) -> usize {
        match event {
            HookEvent::BeforeRequest => self.before_request.len(),
            HookEvent::AfterResponse => self.after_response.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.before_request.is_empty() && self.after_response.is_empty()
    }

    /// Run the before-request callbacks in registration order
    pub fn dispatch_before_request(&self, request: &mut Request) {
        log::trace!(
            "Dispatching {} before-request hook(s) for {}",
            self.before_request.len(),
            request.url()
        );
        for hook in &self.before_request {
            hook(request);
        }
    }

    /// Run the after-response callbacks in registration order
    pub fn dispatch_after_response(&self, response: &Response) {
        log::trace!(
            "Dispatching {} after-response hook(s) for {}",
            self.after_response.len(),
            response.url()
        );
        for hook in &self.after_response {
            hook(response);
        }
    }

    /// Run the after-response callbacks once the caller received `response`
    pub fn finish(self, response: &Response) {
        self.dispatch_after_response(response);
    }
}

/// Authentication strategy plugged into a request [`Pipeline`].
///
/// `register` is called once per request, before it is dispatched.
/// Implementations may register any number of hooks, including none.
pub trait Authentication: Send + Sync {
    fn register(&self, hooks: &mut Hooks);
}

/// Request pipeline that signs requests with an authentication strategy
pub struct Pipeline {
    auth: Box<dyn Authentication>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("auth", &"<authentication>")
            .finish()
    }
}

impl Pipeline {
    pub fn new<A>(auth: A) -> Self
    where
        A: Authentication + 'static,
    {
        Self {
            auth: Box::new(auth),
        }
    }

    /// Let the strategy register its hooks and run the before-request ones
    pub fn prepare(&self, mut request: Request) -> PreparedRequest {
        let mut hooks = Hooks::new();
        self.auth.register(&mut hooks);
        log::debug!(
            "Authentication registered {} before-request and {} after-response hook(s)",
            hooks.len(HookEvent::BeforeRequest),
            hooks.len(HookEvent::AfterResponse)
        );

        hooks.dispatch_before_request(&mut request);
        PreparedRequest { request, hooks }
    }
}

/// A request that went through [`Pipeline::prepare`], together with the hooks
/// registered for it
#[derive(Debug)]
pub struct PreparedRequest {
    request: Request,
    hooks: Hooks,
}

impl PreparedRequest {
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Split into the signed request and the hooks still owed to its response
    pub fn into_parts(self) -> (Request, Hooks) {
        (self.request, self.hooks)
    }

    pub fn into_request(self) -> Request {
        self.request
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, AUTHORIZATION};
    use reqwest::Method;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn request() -> Request {
        Request::new(
            Method::GET,
            "https://sandbox.moip.com.br/v2/orders".parse().unwrap(),
        )
    }

    struct CountingAuth {
        calls: Arc<AtomicUsize>,
    }

    impl Authentication for CountingAuth {
        fn register(&self, hooks: &mut Hooks) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            hooks.before_request(|request| {
                request
                    .headers_mut()
                    .insert("x-hook", HeaderValue::from_static("first"));
            });
            hooks.before_request(|request| {
                request
                    .headers_mut()
                    .insert("x-hook", HeaderValue::from_static("second"));
            });
            hooks.after_response(|_| {});
        }
    }

    #[test]
    fn test_new_hooks_are_empty() {
        let hooks = Hooks::new();
        assert!(hooks.is_empty());
        assert_eq!(hooks.len(HookEvent::BeforeRequest), 0);
        assert_eq!(hooks.len(HookEvent::AfterResponse), 0);
    }

    #[test]
    fn test_before_request_hooks_run_in_registration_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new(CountingAuth {
            calls: calls.clone(),
        });

        let prepared = pipeline.prepare(request());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(prepared.hooks().len(HookEvent::BeforeRequest), 2);
        assert_eq!(prepared.hooks().len(HookEvent::AfterResponse), 1);
        assert_eq!(prepared.request().headers()["x-hook"], "second");
        assert!(prepared.request().headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_register_is_called_once_per_prepared_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new(CountingAuth {
            calls: calls.clone(),
        });

        let _ = pipeline.prepare(request());
        let _ = pipeline.prepare(request());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    fn response() -> Response {
        Response::from(
            http::Response::builder()
                .status(200)
                .body("{}")
                .unwrap(),
        )
    }

    struct RecordingAuth {
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Authentication for RecordingAuth {
        fn register(&self, hooks: &mut Hooks) {
            for name in ["first", "second", "third"] {
                let seen = self.seen.clone();
                hooks.after_response(move |response| {
                    assert_eq!(response.status(), 200);
                    seen.lock().unwrap().push(name);
                });
            }
        }
    }

    #[test]
    fn test_after_response_hooks_run_once_each_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let prepared = Pipeline::new(RecordingAuth { seen: seen.clone() }).prepare(request());

        // Nothing runs before a response exists
        assert!(seen.lock().unwrap().is_empty());

        let (request, hooks) = prepared.into_parts();
        assert_eq!(request.url().path(), "/v2/orders");
        hooks.finish(&response());

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_dispatch_after_response_without_hooks_is_a_no_op() {
        let hooks = Hooks::new();
        hooks.dispatch_after_response(&response());
        assert!(hooks.is_empty());
    }
}
