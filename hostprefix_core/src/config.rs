use crate::error::EndpointError;
use serde::Deserialize;

/// Per-request configuration read by the build handlers.
///
/// Unset fields inherit from the layer below when configs are merged
/// (client -> operation -> request).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    #[serde(alias = "disableHostPrefixInjection")]
    pub disable_host_prefix_injection: Option<bool>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(s: &str) -> Result<Self, EndpointError> {
        Ok(serde_json::from_str(s)?)
    }

    #[inline]
    pub fn with_disable_host_prefix_injection(mut self, disabled: bool) -> Self {
        self.disable_host_prefix_injection = Some(disabled);
        self
    }

    #[inline]
    pub fn host_prefix_disabled(&self) -> bool {
        self.disable_host_prefix_injection.unwrap_or(false)
    }

    /// Layers `over` on top of `self`: fields set in `over` win.
    pub fn merge(mut self, over: &RequestConfig) -> Self {
        if let Some(v) = over.disable_host_prefix_injection {
            self.disable_host_prefix_injection = Some(v);
        }
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unset_flag_means_enabled() {
        assert!(!RequestConfig::new().host_prefix_disabled());
        assert!(
            RequestConfig::new()
                .with_disable_host_prefix_injection(true)
                .host_prefix_disabled()
        );
    }

    #[test]
    fn merge_keeps_lower_layer_when_override_is_unset() {
        let client = RequestConfig::new().with_disable_host_prefix_injection(true);
        assert!(client.merge(&RequestConfig::new()).host_prefix_disabled());

        let op = RequestConfig::new().with_disable_host_prefix_injection(false);
        assert!(!client.merge(&op).host_prefix_disabled());
    }

    #[test]
    fn loads_from_json_with_either_key_style() {
        let snake = RequestConfig::from_json_str(r#"{"disable_host_prefix_injection":true}"#)
            .unwrap();
        assert!(snake.host_prefix_disabled());

        let camel =
            RequestConfig::from_json_str(r#"{"disableHostPrefixInjection":true}"#).unwrap();
        assert!(camel.host_prefix_disabled());

        let empty = RequestConfig::from_json_str("{}").unwrap();
        assert_eq!(empty.disable_host_prefix_injection, None);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = RequestConfig::from_json_str("{\"disable_host_prefix_injection\":").unwrap_err();
        assert!(matches!(err, EndpointError::Config(_)));
    }
}
