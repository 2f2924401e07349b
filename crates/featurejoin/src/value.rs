use std::fmt;

/// Separator used when a multi-valued field is encoded as a single string.
pub const DELIMITER: &str = ",";

/// A single property value on a `Feature`.
///
/// Between joins every value is either `Null` or a `Scalar`.  The
/// `Accumulator` form only exists while the merge policy is collecting
/// contributions for one receiver, and is flattened back into a `Scalar`
/// before the next comparison.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum PropertyValue {
    /// Explicitly unset.
    #[default]
    Null,
    /// A single (possibly comma-joined) string value.
    Scalar(String),
    /// Ordered, duplicate-free contributions.  `None` is a contributed null.
    Accumulator(Vec<Option<String>>),
}

impl PropertyValue {
    /// Shorthand for `PropertyValue::Scalar(value.into())`.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    #[inline] pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

    #[inline] pub fn is_accumulator(&self) -> bool { matches!(self, Self::Accumulator(_)) }

    /// True for values that count as "unset": null, empty string, empty accumulator.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Scalar(s) => s.is_empty(),
            Self::Accumulator(tokens) => tokens.is_empty(),
        }
    }

    /// The scalar view of this value, `None` for null and for accumulators.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Upgrade into an accumulator.
    ///
    /// A scalar is split on `DELIMITER` so a previously merged value keeps all
    /// of its earlier contributions, empty pieces included as null tokens.
    /// Null becomes an empty accumulator.
    pub fn to_accumulator(self) -> Self {
        match self {
            Self::Null => Self::Accumulator(Vec::new()),
            Self::Scalar(s) => {
                let mut tokens = Vec::new();
                for token in s.split(DELIMITER) {
                    let token = (!token.is_empty()).then(|| token.to_string());
                    if !tokens.contains(&token) {
                        tokens.push(token);
                    }
                }
                Self::Accumulator(tokens)
            }
            accumulator => accumulator,
        }
    }

    /// Append `token` unless it is already present.  Returns whether it was added.
    ///
    /// Calling this on a non-accumulator upgrades it first.
    pub fn push(&mut self, token: Option<String>) -> bool {
        if !self.is_accumulator() {
            *self = std::mem::take(self).to_accumulator();
        }
        match self {
            Self::Accumulator(tokens) if !tokens.contains(&token) => {
                tokens.push(token);
                true
            }
            _ => false,
        }
    }

    /// Collapse an accumulator into a comma-joined scalar.
    ///
    /// Null tokens render as empty strings, so a lone null token becomes the
    /// empty scalar and splits back into `[None]`.  Only an accumulator with
    /// no contributions collapses to `Null`.  Scalars and nulls pass through.
    pub fn flatten(self) -> Self {
        match self {
            Self::Accumulator(tokens) if tokens.is_empty() => Self::Null,
            Self::Accumulator(tokens) => Self::Scalar(
                tokens.iter()
                    .map(|token| token.as_deref().unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join(DELIMITER),
            ),
            other => other,
        }
    }

    /// The distinct non-null tokens this value encodes, in order.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Self::Null => Vec::new(),
            Self::Scalar(s) => s.split(DELIMITER).filter(|t| !t.is_empty()).collect(),
            Self::Accumulator(tokens) => tokens.iter().filter_map(|t| t.as_deref()).collect(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Scalar(s) => f.write_str(s),
            accumulator => write!(f, "{}", accumulator.clone().flatten()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self { Self::Scalar(value.to_string()) }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self { Self::Scalar(value) }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
