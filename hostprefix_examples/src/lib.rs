use bytes::Bytes;
use hostprefix_core::prelude::*;
use http::Method;

/// An SDK operation. Operations with a `HOST_PREFIX` get it injected in front of
/// the client's endpoint host, with placeholders filled from `host_labels`.
pub trait Operation: Clone + Send + Sync + 'static {
    const NAME: &'static str;
    const METHOD: Method;
    const HOST_PREFIX: Option<&'static str> = None;

    fn path(&self) -> String;

    fn host_labels(&self) -> LabelSet {
        LabelSet::new()
    }

    fn body(&self) -> Option<Bytes> {
        None
    }
}

#[derive(Clone, Debug)]
pub struct ServiceClient {
    endpoint: String,
    header_host: Option<String>,
    config: RequestConfig,
}

impl ServiceClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            header_host: None,
            config: RequestConfig::default(),
        }
    }

    #[inline]
    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    /// Dial `endpoint` but declare `host` as the request's `Host`.
    #[inline]
    pub fn with_header_host(mut self, host: impl Into<String>) -> Self {
        self.header_host = Some(host.into());
        self
    }

    #[inline]
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Build handlers for `op`: host prefix first, then endpoint host validation.
    pub fn handlers<O: Operation>(&self, op: &O) -> BuildHandlers {
        let mut handlers = BuildHandlers::new();
        if let Some(prefix) = O::HOST_PREFIX {
            let op = op.clone();
            handlers.push_back(host_prefix_handler(prefix, move || op.host_labels()));
        }
        handlers.push_back(ValidateEndpointHostHandler);
        handlers
    }

    pub fn build_request<O: Operation>(
        &self,
        op: &O,
        overrides: &RequestConfig,
    ) -> Result<OutgoingRequest, EndpointError> {
        let endpoint = format!("{}{}", self.endpoint.trim_end_matches('/'), op.path());
        let mut req = OutgoingRequest::new(O::NAME, O::METHOD, &endpoint)
            .map_err(|e| EndpointError::in_operation(O::NAME, e))?
            .with_config(self.config.merge(overrides));
        if let Some(host) = &self.header_host {
            req = req.with_header_host(host.clone());
        }
        if let Some(body) = op.body() {
            req = req.with_body(body);
        }

        self.handlers(op).run(&mut req)?;
        tracing::debug!(
            operation = O::NAME,
            host = req.dial_host(),
            header_host = req.header_host(),
            "request built"
        );
        Ok(req)
    }

    pub fn http_request<O: Operation>(
        &self,
        op: &O,
    ) -> Result<http::Request<Bytes>, EndpointError> {
        self.build_request(op, &RequestConfig::default())?
            .into_http()
            .map_err(|e| EndpointError::in_operation(O::NAME, e))
    }
}

pub mod operations {
    use super::Operation;
    use bytes::Bytes;
    use hostprefix_core::prelude::LabelSet;
    use http::Method;

    /// Account-scoped control plane call; dials `{AccountId}.<endpoint>`.
    #[derive(Clone, Debug)]
    pub struct GetPublicAccessBlock {
        pub account_id: String,
    }

    impl GetPublicAccessBlock {
        pub fn new(account_id: impl Into<String>) -> Self {
            Self {
                account_id: account_id.into(),
            }
        }
    }

    impl Operation for GetPublicAccessBlock {
        const NAME: &'static str = "GetPublicAccessBlock";
        const METHOD: Method = Method::GET;
        const HOST_PREFIX: Option<&'static str> = Some("{AccountId}.");

        fn path(&self) -> String {
            "/v20180820/configuration/publicAccessBlock".to_string()
        }

        fn host_labels(&self) -> LabelSet {
            LabelSet::new().with("AccountId", self.account_id.clone())
        }
    }

    /// Data plane write; dials `data-<endpoint>`.
    #[derive(Clone, Debug)]
    pub struct PutRecord {
        pub stream: String,
        pub data: Bytes,
    }

    impl PutRecord {
        pub fn new(stream: impl Into<String>, data: impl Into<Bytes>) -> Self {
            Self {
                stream: stream.into(),
                data: data.into(),
            }
        }
    }

    impl Operation for PutRecord {
        const NAME: &'static str = "PutRecord";
        const METHOD: Method = Method::POST;
        const HOST_PREFIX: Option<&'static str> = Some("data-");

        fn path(&self) -> String {
            format!("/streams/{}/records", self.stream)
        }

        fn body(&self) -> Option<Bytes> {
            Some(self.data.clone())
        }
    }

    /// Job lookup pinned to a `{Region}-{JobId}.` subdomain.
    #[derive(Clone, Debug)]
    pub struct DescribeJob {
        pub region: String,
        pub job_id: String,
    }

    impl Operation for DescribeJob {
        const NAME: &'static str = "DescribeJob";
        const METHOD: Method = Method::GET;
        const HOST_PREFIX: Option<&'static str> = Some("{Region}-{JobId}.");

        fn path(&self) -> String {
            "/jobs".to_string()
        }

        fn host_labels(&self) -> LabelSet {
            [
                ("Region", self.region.as_str()),
                ("JobId", self.job_id.as_str()),
            ]
            .into_iter()
            .collect()
        }
    }

    /// No host prefix.
    #[derive(Clone, Debug, Default)]
    pub struct ListStreams;

    impl Operation for ListStreams {
        const NAME: &'static str = "ListStreams";
        const METHOD: Method = Method::GET;

        fn path(&self) -> String {
            "/streams".to_string()
        }
    }
}
