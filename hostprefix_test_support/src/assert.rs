use hostprefix_core::prelude::OutgoingRequest;

pub struct RequestAssert<'a> {
    req: &'a OutgoingRequest,
}

pub fn assert_request(req: &OutgoingRequest) -> RequestAssert<'_> {
    RequestAssert { req }
}

impl<'a> RequestAssert<'a> {
    pub fn dial_host(self, expected: &str) -> Self {
        let got = self.req.dial_host();
        if got != expected {
            panic!(
                "dial host mismatch\n  expected: {expected}\n  got: {got}\n  header host: {:?}",
                self.req.header_host()
            );
        }
        self
    }

    pub fn header_host(self, expected: &str) -> Self {
        let got = self.req.header_host();
        if got != expected {
            panic!(
                "header host mismatch\n  expected: {expected:?}\n  got: {got:?}\n  dial host: {}",
                self.req.dial_host()
            );
        }
        self
    }

    pub fn no_header_host(self) -> Self {
        self.header_host("")
    }

    pub fn url(self, expected: &str) -> Self {
        let got = match self.req.url() {
            Ok(u) => u.to_string(),
            Err(e) => panic!("url rebuild failed\n  expected: {expected}\n  error: {e}"),
        };
        if got != expected {
            panic!("url mismatch\n  expected: {expected}\n  got: {got}");
        }
        self
    }
}
