//! Tri-state association input.

/// Caller intent for a collection-valued association on update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Assoc<T> {
    /// Field not sent (or sent as `null`): leave the association unchanged.
    #[default]
    Absent,
    /// Empty collection sent: remove every associated entity.
    Cleared,
    /// Non-empty collection sent: replace the association with these items.
    Populated(Vec<T>),
}

impl<T> From<Option<Vec<T>>> for Assoc<T> {
    fn from(value: Option<Vec<T>>) -> Self {
        match value {
            None => Self::Absent,
            Some(items) if items.is_empty() => Self::Cleared,
            Some(items) => Self::Populated(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Assoc;

    #[test]
    fn option_maps_to_three_states() {
        assert_eq!(Assoc::<u8>::from(None), Assoc::Absent);
        assert_eq!(Assoc::<u8>::from(Some(vec![])), Assoc::Cleared);
        assert_eq!(Assoc::from(Some(vec![1u8])), Assoc::Populated(vec![1]));
    }
}
