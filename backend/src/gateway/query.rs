use std::fmt::Display;

/// Ordered query parameters where a key may have no value.
///
/// Keys without a value are dropped when the query string is built, so
/// optional filters can be passed straight through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, Option<String>)>);

impl QueryParams {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a parameter with a value
    #[must_use]
    pub fn with(self, key: impl Into<String>, value: impl Display) -> Self {
        self.with_opt(key, Some(value))
    }

    /// Adds a parameter that is skipped when `value` is `None`
    #[must_use]
    pub fn with_opt(mut self, key: impl Into<String>, value: Option<impl Display>) -> Self {
        self.0.push((key.into(), value.map(|v| v.to_string())));
        self
    }

    /// Pairs that will actually be sent
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (key.as_str(), v)))
    }

    /// Whether no pair will be sent
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs().next().is_none()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), Some(value.into())))
                .collect(),
        )
    }
}
