use crate::error::EndpointError;
use crate::request::OutgoingRequest;

/// A named step run against a request before it is handed to a transport.
pub trait BuildHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn handle(&self, req: &mut OutgoingRequest) -> Result<(), EndpointError>;
}

/// Ordered list of build handlers.
#[derive(Default)]
pub struct BuildHandlers {
    list: Vec<Box<dyn BuildHandler>>,
}

impl BuildHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, h: impl BuildHandler + 'static) {
        self.list.push(Box::new(h));
    }

    pub fn push_front(&mut self, h: impl BuildHandler + 'static) {
        self.list.insert(0, Box::new(h));
    }

    /// Removes every handler named `name`; returns how many were removed.
    pub fn remove_by_name(&mut self, name: &str) -> usize {
        let before = self.list.len();
        self.list.retain(|h| h.name() != name);
        before - self.list.len()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.list.iter().map(|h| h.name()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// Runs handlers in order; the first error stops the chain.
    pub fn run(&self, req: &mut OutgoingRequest) -> Result<(), EndpointError> {
        for h in &self.list {
            tracing::trace!(operation = req.operation(), handler = h.name(), "build handler");
            h.handle(req)
                .map_err(|e| EndpointError::in_operation(req.operation(), e))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for BuildHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use http::Method;

    struct Tag(&'static str);
    impl BuildHandler for Tag {
        fn name(&self) -> &'static str {
            self.0
        }
        fn handle(&self, req: &mut OutgoingRequest) -> Result<(), EndpointError> {
            let v = http::HeaderValue::from_static(self.0);
            req.headers_mut().append("x-handler", v);
            Ok(())
        }
    }

    struct Fail;
    impl BuildHandler for Fail {
        fn name(&self) -> &'static str {
            "fail"
        }
        fn handle(&self, _: &mut OutgoingRequest) -> Result<(), EndpointError> {
            Err(EndpointError::InvalidEndpoint("boom".into()))
        }
    }

    fn request() -> OutgoingRequest {
        OutgoingRequest::new("TestOperation", Method::GET, "https://example.com").unwrap()
    }

    fn handler_tags(req: &OutgoingRequest) -> Vec<&str> {
        req.headers()
            .get_all("x-handler")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect()
    }

    #[test]
    fn runs_in_list_order() {
        let mut hs = BuildHandlers::new();
        hs.push_back(Tag("b"));
        hs.push_back(Tag("c"));
        hs.push_front(Tag("a"));
        assert_eq!(hs.names(), ["a", "b", "c"]);

        let mut req = request();
        hs.run(&mut req).unwrap();
        assert_eq!(handler_tags(&req), ["a", "b", "c"]);
    }

    #[test]
    fn first_error_stops_the_chain() {
        let mut hs = BuildHandlers::new();
        hs.push_back(Tag("a"));
        hs.push_back(Fail);
        hs.push_back(Tag("never"));

        let mut req = request();
        let err = hs.run(&mut req).unwrap_err();
        match err {
            EndpointError::InOperation { operation, source } => {
                assert_eq!(operation, "TestOperation");
                assert!(matches!(*source, EndpointError::InvalidEndpoint(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(handler_tags(&req), ["a"]);
    }

    #[test]
    fn remove_by_name_drops_every_match() {
        let mut hs = BuildHandlers::new();
        hs.push_back(Tag("a"));
        hs.push_back(Tag("b"));
        hs.push_back(Tag("a"));
        assert_eq!(hs.remove_by_name("a"), 2);
        assert_eq!(hs.remove_by_name("missing"), 0);
        assert_eq!(hs.names(), ["b"]);
        hs.clear();
        assert!(hs.is_empty());
    }
}
