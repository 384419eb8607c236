use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EndpointError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("build url error: {0}")]
    BuildUrl(#[from] url::ParseError),

    #[error("http: {0}")]
    Http(#[from] http::Error),

    #[error("invalid host header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("invalid endpoint host for {operation}: host='{host}' {}", ViolationsDisplay(.violations))]
    InvalidEndpointHost {
        operation: &'static str,
        host: String,
        violations: Vec<HostViolation>,
    },

    #[error("config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("in operation {operation}: {source}")]
    InOperation {
        operation: &'static str,
        source: Box<EndpointError>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostViolation {
    /// host:port could not be split.
    Malformed(String),
    /// expected [0-65535].
    InvalidPort(String),
    /// expected [a-zA-Z0-9-]{1,63}.
    InvalidLabel { index: usize, label: String },
    Empty,
    /// hostname longer than 255 bytes.
    TooLong(usize),
}

impl fmt::Display for HostViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostViolation::Malformed(reason) => write!(f, "malformed host:port ({reason})"),
            HostViolation::InvalidPort(port) => {
                write!(f, "endpoint port number '{port}' not in [0-65535]")
            }
            HostViolation::InvalidLabel { index, label } => write!(
                f,
                "endpoint host label[{index}]='{label}' does not match [a-zA-Z0-9-]{{1,63}}"
            ),
            HostViolation::Empty => f.write_str("endpoint host is empty"),
            HostViolation::TooLong(len) => {
                write!(f, "endpoint host is {len} bytes, max 255")
            }
        }
    }
}

struct ViolationsDisplay<'a>(&'a [HostViolation]);
impl fmt::Display for ViolationsDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl EndpointError {
    #[inline]
    pub fn in_operation(operation: &'static str, e: EndpointError) -> EndpointError {
        match e {
            EndpointError::InOperation { .. } => e,
            _ => EndpointError::InOperation {
                operation,
                source: Box::new(e),
            },
        }
    }

    /// Host violations, looking through an `InOperation` wrapper.
    pub fn host_violations(&self) -> Option<&[HostViolation]> {
        match self {
            EndpointError::InvalidEndpointHost { violations, .. } => Some(violations),
            EndpointError::InOperation { source, .. } => source.host_violations(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn in_operation_is_not_nested_twice() {
        let inner = EndpointError::InvalidEndpoint("no host".into());
        let once = EndpointError::in_operation("GetThing", inner);
        let twice = EndpointError::in_operation("Other", once);
        match twice {
            EndpointError::InOperation { operation, source } => {
                assert_eq!(operation, "GetThing");
                assert!(matches!(*source, EndpointError::InvalidEndpoint(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_host_message_lists_every_violation() {
        let err = EndpointError::InvalidEndpointHost {
            operation: "GetThing",
            host: "{x}.example.com:99999".into(),
            violations: vec![
                HostViolation::InvalidPort("99999".into()),
                HostViolation::InvalidLabel {
                    index: 0,
                    label: "{x}".into(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("GetThing"), "{msg}");
        assert!(msg.contains("'99999'"), "{msg}");
        assert!(msg.contains("label[0]='{x}'"), "{msg}");
        assert_eq!(err.host_violations().map(|v| v.len()), Some(2));
    }
}
