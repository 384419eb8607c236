use crate::error::EndpointError;
use crate::handler::BuildHandler;
use crate::request::OutgoingRequest;
use std::borrow::Cow;
use std::collections::HashMap;

pub const HOST_PREFIX_HANDLER_NAME: &str = "hostprefix.endpoint.HostPrefixHandler";

/// Label values substituted into `{name}` placeholders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelSet(HashMap<String, String>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    #[inline]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for LabelSet {
    fn from(m: HashMap<String, String>) -> Self {
        Self(m)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Prefix text with optional `{name}` placeholders, e.g. `"{AccountId}."`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixTemplate {
    raw: String,
}

impl PrefixTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in template order, duplicates kept.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> + '_ {
        Pieces { rest: &self.raw }.filter_map(|p| match p {
            Piece::Placeholder(name) => Some(name),
            Piece::Literal(_) => None,
        })
    }

    pub fn is_static(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// Substitutes placeholders left to right.
    ///
    /// Without labels the template is returned verbatim. A placeholder missing
    /// from `labels` stays in the output as its literal `{name}` text.
    pub fn resolve(&self, labels: Option<&LabelSet>) -> Cow<'_, str> {
        let Some(labels) = labels else {
            return Cow::Borrowed(&self.raw);
        };
        if self.is_static() {
            return Cow::Borrowed(&self.raw);
        }

        let mut out = String::with_capacity(self.raw.len());
        for piece in (Pieces { rest: &self.raw }) {
            match piece {
                Piece::Literal(s) => out.push_str(s),
                Piece::Placeholder(name) => match labels.get(name) {
                    Some(v) => out.push_str(v),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
        Cow::Owned(out)
    }
}

impl From<&str> for PrefixTemplate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PrefixTemplate {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Splits a template into literal runs and `{name}` tokens.
///
/// `{}` is literal. A `{` followed by another `{` before any `}` is literal up to
/// the second one. A `{` with no closing `}` leaves the remainder literal.
struct Pieces<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Pieces<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Piece<'a>> {
        if self.rest.is_empty() {
            return None;
        }
        let rest = self.rest;

        let Some(open) = rest.find('{') else {
            self.rest = "";
            return Some(Piece::Literal(rest));
        };
        if open > 0 {
            self.rest = &rest[open..];
            return Some(Piece::Literal(&rest[..open]));
        }

        // rest starts with '{'
        let after = &rest[1..];
        match after.find(['{', '}']) {
            Some(i) if after.as_bytes()[i] == b'}' && i > 0 => {
                self.rest = &after[i + 1..];
                Some(Piece::Placeholder(&after[..i]))
            }
            Some(i) if after.as_bytes()[i] == b'}' => {
                // "{}"
                self.rest = &after[i + 1..];
                Some(Piece::Literal(&rest[..2]))
            }
            Some(i) => {
                // nested '{': everything before it is literal
                self.rest = &after[i..];
                Some(Piece::Literal(&rest[..i + 1]))
            }
            None => {
                self.rest = "";
                Some(Piece::Literal(rest))
            }
        }
    }
}

/// Prepends a (possibly labelled) prefix to a request's hosts.
///
/// `F` produces the labels; it is called once per [`build`](Self::build) that
/// is not bypassed by `disable_host_prefix_injection`.
#[derive(Clone)]
pub struct HostPrefixBuilder<F = fn() -> LabelSet> {
    prefix: PrefixTemplate,
    labels_fn: Option<F>,
}

impl HostPrefixBuilder {
    pub fn new(prefix: impl Into<PrefixTemplate>) -> Self {
        Self {
            prefix: prefix.into(),
            labels_fn: None,
        }
    }
}

impl<F> HostPrefixBuilder<F>
where
    F: Fn() -> LabelSet,
{
    pub fn with_labels_fn<G>(self, labels_fn: G) -> HostPrefixBuilder<G>
    where
        G: Fn() -> LabelSet,
    {
        HostPrefixBuilder {
            prefix: self.prefix,
            labels_fn: Some(labels_fn),
        }
    }

    /// Rewrites `req`'s dial host and, when declared, its header host.
    ///
    /// Not idempotent: building twice prepends the prefix twice.
    pub fn build(&self, req: &mut OutgoingRequest) {
        if req.config().host_prefix_disabled() {
            tracing::debug!(
                operation = req.operation(),
                template = self.prefix.as_str(),
                "host prefix injection disabled"
            );
            return;
        }

        let labels = self.labels_fn.as_ref().map(|f| f());
        let prefix = self.prefix.resolve(labels.as_ref());
        if let Some(labels) = labels.as_ref() {
            for name in self.prefix.placeholders() {
                if labels.get(name).is_none() {
                    tracing::warn!(
                        operation = req.operation(),
                        template = self.prefix.as_str(),
                        placeholder = name,
                        "no label for host prefix placeholder"
                    );
                }
            }
        }

        req.dial_host_mut().insert_str(0, &prefix);
        if !req.header_host().is_empty() {
            req.header_host_mut().insert_str(0, &prefix);
        }

        tracing::debug!(
            operation = req.operation(),
            template = self.prefix.as_str(),
            prefix = %prefix,
            host = req.dial_host(),
            "host prefix applied"
        );
    }
}

impl<F> BuildHandler for HostPrefixBuilder<F>
where
    F: Fn() -> LabelSet + Send + Sync,
{
    fn name(&self) -> &'static str {
        HOST_PREFIX_HANDLER_NAME
    }

    fn handle(&self, req: &mut OutgoingRequest) -> Result<(), EndpointError> {
        self.build(req);
        Ok(())
    }
}

/// Named handler prepending `prefix`, with labels from `labels_fn`.
pub fn host_prefix_handler<F>(
    prefix: impl Into<PrefixTemplate>,
    labels_fn: F,
) -> HostPrefixBuilder<F>
where
    F: Fn() -> LabelSet + Send + Sync,
{
    HostPrefixBuilder::new(prefix).with_labels_fn(labels_fn)
}
