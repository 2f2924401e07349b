use crate::feature::Properties;
use crate::value::PropertyValue;

/// What to do when the source feature's value for a field is null.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NullValues {
    /// Record the null as a contribution; it renders as an empty token.
    #[default]
    Accumulate,
    /// Ignore null contributions entirely.
    Skip,
}

/// Merges field values from a source feature into a receiver.
#[derive(Clone, Copy, Debug, Default)]
pub struct MergePolicy {
    pub nulls: NullValues,
}

impl MergePolicy {
    pub fn new(nulls: NullValues) -> Self { Self { nulls } }

    /// Accumulate `source[field]` into `receiver[field]`.
    ///
    /// The receiver's value is upgraded to an accumulator (splitting any
    /// previously merged scalar), and each token of the source value is
    /// appended unless already present.  Returns whether anything was added.
    pub fn merge_field(&self, receiver: &mut Properties, source: &Properties, field: &str) -> bool {
        let contribution = source.get(field).cloned().unwrap_or_default();
        let mut tokens = match contribution.to_accumulator() {
            PropertyValue::Accumulator(tokens) => tokens,
            _ => Vec::new(),
        };
        if tokens.is_empty() {
            tokens.push(None);
        }
        if self.nulls == NullValues::Skip {
            tokens.retain(Option::is_some);
        }
        if tokens.is_empty() {
            return false;
        }

        if !receiver.contains_key(field) {
            receiver.insert(field, PropertyValue::Null);
        }
        let Some(value) = receiver.get_mut(field) else { return false };

        let mut added = false;
        for token in tokens {
            added |= value.push(token);
        }
        added
    }

    /// Collapse every accumulator in `receiver` back into a scalar.
    pub fn flatten(receiver: &mut Properties) {
        for value in receiver.values_mut() {
            if value.is_accumulator() {
                *value = std::mem::take(value).flatten();
            }
        }
    }

    /// Merge every field in `fields`, then flatten the receiver.
    pub fn merge<S: AsRef<str>>(&self, receiver: &mut Properties, source: &Properties, fields: &[S]) -> bool {
        let mut added = false;
        for field in fields {
            added |= self.merge_field(receiver, source, field.as_ref());
        }
        Self::flatten(receiver);
        added
    }
}
