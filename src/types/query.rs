use super::errors::RelayError;

/// Raw `/process_query` parameters. The page sends a ready `query`;
/// `idea` + `details` are accepted as an alternative.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pub query: Option<String>,
    pub idea: Option<String>,
    pub details: Option<String>,
}

/// First occurrence of a repeated parameter wins; unknown keys are ignored.
impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "query" => &mut params.query,
                "idea" => &mut params.idea,
                "details" => &mut params.details,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

/// A non-empty user query. Whitespace counts as content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(text: impl Into<String>) -> Result<Self, RelayError> {
        let text = text.into();
        if text.is_empty() {
            return Err(RelayError::no_query());
        }
        Ok(Self(text))
    }

    /// Same shape the page builds client-side.
    pub fn compose(idea: &str, details: Option<&str>) -> Result<Self, RelayError> {
        let idea = idea.trim();
        if idea.is_empty() {
            return Err(RelayError::no_query());
        }
        let details = details.map(str::trim).unwrap_or_default();
        Self::new(format!("Project Idea: {idea}. Details: {details}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<QueryParams> for Query {
    type Error = RelayError;

    fn try_from(params: QueryParams) -> Result<Self, Self::Error> {
        match (params.query, params.idea) {
            (Some(query), _) if !query.is_empty() => Query::new(query),
            (_, Some(idea)) => Query::compose(&idea, params.details.as_deref()),
            _ => Err(RelayError::no_query()),
        }
    }
}
