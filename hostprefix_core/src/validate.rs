use crate::error::{EndpointError, HostViolation};
use crate::handler::BuildHandler;
use crate::request::OutgoingRequest;

pub const VALIDATE_ENDPOINT_HOST_HANDLER_NAME: &str =
    "hostprefix.protocol.ValidateEndpointHostHandler";

const MAX_LABEL_LEN: usize = 63;
const MAX_HOST_LEN: usize = 255;

/// `[a-zA-Z0-9-]{1,63}`
pub fn valid_host_label(label: &str) -> bool {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return false;
    }
    label
        .bytes()
        .all(|b| matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-'))
}

/// Decimal port in `0..=65535`.
pub fn valid_port_number(port: &str) -> bool {
    !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) && port.parse::<u16>().is_ok()
}

fn split_host_port(host: &str) -> Result<(&str, &str), String> {
    if let Some(rest) = host.strip_prefix('[') {
        let Some((addr, tail)) = rest.split_once(']') else {
            return Err("missing ']' in address".to_string());
        };
        return match tail.strip_prefix(':') {
            Some(port) => Ok((addr, port)),
            None if tail.is_empty() => Err("missing port in address".to_string()),
            None => Err(format!("unexpected '{tail}' after address")),
        };
    }
    let Some((name, port)) = host.rsplit_once(':') else {
        return Err("missing port in address".to_string());
    };
    if name.contains(':') {
        return Err("too many colons in address".to_string());
    }
    if name.contains(['[', ']']) || port.contains(['[', ']']) {
        return Err("unexpected bracket in address".to_string());
    }
    Ok((name, port))
}

/// Validates `host` (`hostname[:port]`) as an RFC 3986 host, reporting every
/// violation found. A trailing dot (FQDN) is accepted.
pub fn validate_endpoint_host(operation: &'static str, host: &str) -> Result<(), EndpointError> {
    let mut violations = Vec::new();

    let hostname = if host.contains(':') {
        match split_host_port(host) {
            Ok((name, port)) => {
                if !valid_port_number(port) {
                    violations.push(HostViolation::InvalidPort(port.to_string()));
                }
                name
            }
            Err(reason) => {
                violations.push(HostViolation::Malformed(reason));
                ""
            }
        }
    } else {
        host
    };

    let labels: Vec<&str> = hostname.split('.').collect();
    let last = labels.len() - 1;
    for (index, label) in labels.iter().enumerate() {
        if index == last && label.is_empty() {
            continue;
        }
        if !valid_host_label(label) {
            violations.push(HostViolation::InvalidLabel {
                index,
                label: label.to_string(),
            });
        }
    }

    if hostname.is_empty() {
        violations.push(HostViolation::Empty);
    }
    if hostname.len() > MAX_HOST_LEN {
        violations.push(HostViolation::TooLong(hostname.len()));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(EndpointError::InvalidEndpointHost {
            operation,
            host: host.to_string(),
            violations,
        })
    }
}

/// Validates the dial host of the request it runs against.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidateEndpointHostHandler;

impl BuildHandler for ValidateEndpointHostHandler {
    fn name(&self) -> &'static str {
        VALIDATE_ENDPOINT_HOST_HANDLER_NAME
    }

    fn handle(&self, req: &mut OutgoingRequest) -> Result<(), EndpointError> {
        validate_endpoint_host(req.operation(), req.dial_host())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn violations(host: &str) -> Vec<HostViolation> {
        match validate_endpoint_host("TestOperation", host) {
            Ok(()) => Vec::new(),
            Err(EndpointError::InvalidEndpointHost { violations, .. }) => violations,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn host_label_rules() {
        assert!(valid_host_label("abc-123"));
        assert!(valid_host_label("A"));
        assert!(valid_host_label(&"a".repeat(63)));
        assert!(!valid_host_label(&"a".repeat(64)));
        assert!(!valid_host_label(""));
        assert!(!valid_host_label("under_score"));
        assert!(!valid_host_label("{first}"));
    }

    #[test]
    fn port_number_rules() {
        assert!(valid_port_number("0"));
        assert!(valid_port_number("443"));
        assert!(valid_port_number("65535"));
        assert!(!valid_port_number("65536"));
        assert!(!valid_port_number(""));
        assert!(!valid_port_number("+80"));
        assert!(!valid_port_number("http"));
    }

    #[test]
    fn accepts_plain_ported_and_fqdn_hosts() {
        assert!(violations("service.region.example.com").is_empty());
        assert!(violations("service.region.example.com:1234").is_empty());
        assert!(violations("service.region.example.com.").is_empty());
        assert!(violations("localhost:0").is_empty());
    }

    #[test]
    fn reports_every_violation() {
        let got = violations("{first}.-bad_.example.com:99999");
        assert_eq!(
            got,
            vec![
                HostViolation::InvalidPort("99999".into()),
                HostViolation::InvalidLabel {
                    index: 0,
                    label: "{first}".into()
                },
                HostViolation::InvalidLabel {
                    index: 1,
                    label: "-bad_".into()
                },
            ]
        );
    }

    #[test]
    fn rejects_empty_and_oversize_hostnames() {
        assert_eq!(violations(""), vec![HostViolation::Empty]);
        assert_eq!(violations(":80"), vec![HostViolation::Empty]);

        let long = vec!["a".repeat(63); 5].join(".");
        assert_eq!(violations(&long), vec![HostViolation::TooLong(long.len())]);
    }

    #[test]
    fn rejects_empty_inner_label() {
        assert_eq!(
            violations("a..b"),
            vec![HostViolation::InvalidLabel {
                index: 1,
                label: String::new()
            }]
        );
    }

    #[test]
    fn malformed_host_port_is_reported() {
        let got = violations("a:b:c");
        assert!(matches!(got[0], HostViolation::Malformed(_)), "{got:?}");

        // bracketed literal splits, but "::1" is not a host label
        let got = violations("[::1]:8080");
        assert_eq!(
            got,
            vec![HostViolation::InvalidLabel {
                index: 0,
                label: "::1".into()
            }]
        );
    }
}
