use crate::config::RequestConfig;
use crate::error::EndpointError;
use bytes::Bytes;
use http::header::HOST;
use http::uri::Scheme;
use http::{HeaderMap, HeaderValue, Method};
use url::{Host, Url};

#[derive(Clone, Debug)]
struct RequestMeta {
    operation: &'static str,
    method: Method,
}

/// A request on its way through the build handlers.
///
/// Two host fields are tracked separately:
/// - `dial_host`: the authority the transport connects to (may carry `:port`).
/// - `header_host`: the declared `Host` header; empty means "same as dial host".
#[derive(Clone, Debug)]
pub struct OutgoingRequest {
    meta: RequestMeta,
    scheme: Scheme,
    dial_host: String,
    header_host: String,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Option<Bytes>,
    config: RequestConfig,
}

impl OutgoingRequest {
    /// Starts a request against `endpoint` (`scheme://host[:port][/path][?query]`).
    pub fn new(
        operation: &'static str,
        method: Method,
        endpoint: &str,
    ) -> Result<Self, EndpointError> {
        let url = Url::parse(endpoint)?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| EndpointError::InvalidEndpoint(format!("{endpoint}: missing host")))?;
        // An explicit default port (`https://host:443`) is kept in the dial host.
        let port = url.port().or_else(|| {
            raw_authority(endpoint)
                .and_then(|a| split_authority(a).1)
                .filter(|p| !p.is_empty())
                .and_then(|_| url.port_or_known_default())
        });
        let dial_host = match port {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let scheme = Scheme::try_from(url.scheme()).map_err(http::Error::from)?;

        Ok(Self {
            meta: RequestMeta { operation, method },
            scheme,
            dial_host,
            header_host: String::new(),
            path: url.path().to_string(),
            query: url.query().map(str::to_string),
            headers: HeaderMap::new(),
            body: None,
            config: RequestConfig::default(),
        })
    }

    #[inline]
    pub fn with_header_host(mut self, host: impl Into<String>) -> Self {
        self.header_host = host.into();
        self
    }

    #[inline]
    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[inline]
    pub fn operation(&self) -> &'static str {
        self.meta.operation
    }

    #[inline]
    pub fn dial_host(&self) -> &str {
        &self.dial_host
    }

    #[inline]
    pub fn header_host(&self) -> &str {
        &self.header_host
    }

    /// The host a server sees: the header host when declared, else the dial host.
    pub fn effective_host(&self) -> &str {
        if self.header_host.is_empty() {
            &self.dial_host
        } else {
            &self.header_host
        }
    }

    #[inline]
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    #[inline]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    #[inline]
    pub(crate) fn dial_host_mut(&mut self) -> &mut String {
        &mut self.dial_host
    }

    #[inline]
    pub(crate) fn header_host_mut(&mut self) -> &mut String {
        &mut self.header_host
    }

    /// Rebuilds the URL from the (possibly rewritten) dial host.
    ///
    /// The dial host must parse back as exactly that host and port; text that
    /// would turn into userinfo, a path or another host is rejected.
    pub fn url(&self) -> Result<Url, EndpointError> {
        let invalid = |reason: String| {
            EndpointError::InvalidEndpoint(format!("dial host '{}': {reason}", self.dial_host))
        };
        let (host, port) = split_authority(&self.dial_host);
        let expected_host = Host::parse(host).map_err(|e| invalid(e.to_string()))?;
        let expected_port = match port {
            Some(p) => Some(
                p.parse::<u16>()
                    .map_err(|_| invalid(format!("invalid port '{p}'")))?,
            ),
            None => None,
        };

        let base = format!("{}://{}", self.scheme, self.dial_host);
        let mut url = Url::parse(&base)?;
        let same_host = url.host().map(|h| h.to_owned()) == Some(expected_host);
        let same_port = match expected_port {
            Some(p) => url.port_or_known_default() == Some(p),
            None => url.port().is_none(),
        };
        if !same_host || !same_port || !url.username().is_empty() || url.password().is_some() {
            return Err(invalid(format!("parses as '{}'", url.authority())));
        }
        url.set_path(&self.path);
        url.set_query(self.query.as_deref());
        Ok(url)
    }

    /// Hands the request over to a transport. A declared header host becomes `Host`.
    pub fn into_http(self) -> Result<http::Request<Bytes>, EndpointError> {
        let url = self.url()?;
        let uri = url.as_str().parse::<http::Uri>().map_err(http::Error::from)?;

        let mut req = http::Request::new(self.body.unwrap_or_default());
        *req.method_mut() = self.meta.method;
        *req.uri_mut() = uri;
        *req.headers_mut() = self.headers;
        if !self.header_host.is_empty() {
            req.headers_mut()
                .insert(HOST, HeaderValue::from_str(&self.header_host)?);
        }
        Ok(req)
    }
}

/// `host[:port]` of an endpoint string, as written (userinfo stripped).
fn raw_authority(endpoint: &str) -> Option<&str> {
    let (_, rest) = endpoint.split_once("://")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    Some(authority.rsplit_once('@').map_or(authority, |(_, a)| a))
}

/// Splits `host:port`, leaving bracketed IPv6 literals intact.
fn split_authority(authority: &str) -> (&str, Option<&str>) {
    match authority.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && (host.ends_with(']') || !host.contains(':')) => {
            (host, Some(port))
        }
        _ => (authority, None),
    }
}
