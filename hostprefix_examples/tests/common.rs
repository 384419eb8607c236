use hostprefix_core::prelude::*;
use hostprefix_test_support::{init_tracing, request};

/// One host prefix scenario: request hosts in, expected hosts out.
#[allow(unused)]
pub struct HostCase {
    pub name: &'static str,
    pub url_host: &'static str,
    pub req_host: &'static str,
    pub prefix: &'static str,
    pub labels: Option<LabelSet>,
    pub disabled: bool,
    pub expect_url_host: &'static str,
    pub expect_req_host: &'static str,
}

#[allow(unused)]
impl HostCase {
    pub fn run(&self) -> OutgoingRequest {
        init_tracing();
        let mut req = request(&format!("https://{}", self.url_host))
            .with_header_host(self.req_host)
            .with_config(
                RequestConfig::new().with_disable_host_prefix_injection(self.disabled),
            );

        match &self.labels {
            Some(labels) => {
                let labels = labels.clone();
                HostPrefixBuilder::new(self.prefix)
                    .with_labels_fn(move || labels.clone())
                    .build(&mut req);
            }
            None => HostPrefixBuilder::new(self.prefix).build(&mut req),
        }
        req
    }
}
