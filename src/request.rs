//! The unit of work flowing through a [`Queue`](crate::queue::Queue).
//!
//! A `Request` is either a pending HTTP call (on the outgoing queue) or a
//! wrapped body received from the broker (on the incoming queue). It is
//! linked into at most one queue at a time: `push` takes it by value, `pop`
//! hands it back by value.

/// The three HTTP methods the broker surface uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Delete,
}

/// An owned, immutable-except-for-`attempts` description of one HTTP
/// exchange.
///
/// All three address/payload fields are optional at construction time,
/// but a `Request` dispatched through a
/// [`RequestTransport`](crate::transport::RequestTransport) must have a
/// non-empty `url` and a `method`. A `Request` handed back by
/// [`Client::retrieve`](crate::client::Client::retrieve) has only `body`
/// populated; the puller strips method and url when wrapping a received
/// body. `attempts` counts failed `perform` calls on the outgoing side;
/// it is what bounds [`RetryPolicy::Bounded`](crate::config::RetryPolicy::Bounded).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub method: Option<Method>,
    pub url: Option<String>,
    pub body: Option<String>,
    pub attempts: u32,
}

impl Request {
    pub fn new(method: Option<Method>, url: Option<String>, body: Option<String>) -> Self {
        Self {
            method,
            url,
            body,
            attempts: 0,
        }
    }

    /// Build the `GET {server}/queue/{name}` long-poll request.
    pub(crate) fn poll(server_url: &str, name: &str) -> Self {
        Self::new(
            Some(Method::Get),
            Some(format!("{server_url}/queue/{name}")),
            None,
        )
    }

    /// Build the `PUT {server}/topic/{topic}` publish request.
    pub(crate) fn publish(server_url: &str, topic: &str, body: String) -> Self {
        Self::new(
            Some(Method::Put),
            Some(format!("{server_url}/topic/{topic}")),
            Some(body),
        )
    }

    /// Build the `PUT {server}/subscription/{name}/{topic}` subscribe request.
    pub(crate) fn subscribe(server_url: &str, name: &str, topic: &str) -> Self {
        Self::new(
            Some(Method::Put),
            Some(format!("{server_url}/subscription/{name}/{topic}")),
            None,
        )
    }

    /// Build the `DELETE {server}/subscription/{name}/{topic}` unsubscribe request.
    pub(crate) fn unsubscribe(server_url: &str, name: &str, topic: &str) -> Self {
        Self::new(
            Some(Method::Delete),
            Some(format!("{server_url}/subscription/{name}/{topic}")),
            None,
        )
    }

    /// Wrap a body received by the puller. Method and url are deliberately
    /// absent — the worker strips/ignores them, per the core's data model.
    pub(crate) fn received(body: String) -> Self {
        Self::new(None, None, Some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_request_shape() {
        let req = Request::publish("http://localhost:8080", "t", "hello".into());
        assert_eq!(req.method, Some(Method::Put));
        assert_eq!(req.url.as_deref(), Some("http://localhost:8080/topic/t"));
        assert_eq!(req.body.as_deref(), Some("hello"));
    }

    #[test]
    fn subscribe_and_unsubscribe_share_a_url() {
        let sub = Request::subscribe("http://localhost:8080", "bob", "chat");
        let unsub = Request::unsubscribe("http://localhost:8080", "bob", "chat");
        assert_eq!(sub.url, unsub.url);
        assert_eq!(sub.method, Some(Method::Put));
        assert_eq!(unsub.method, Some(Method::Delete));
        assert!(sub.body.is_none());
        assert!(unsub.body.is_none());
    }

    #[test]
    fn received_strips_method_and_url() {
        let req = Request::received("payload".into());
        assert!(req.method.is_none());
        assert!(req.url.is_none());
        assert_eq!(req.body.as_deref(), Some("payload"));
    }
}
