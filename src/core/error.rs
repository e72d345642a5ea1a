use thiserror::Error;

pub type BreakevenResult<T> = Result<T, BreakevenError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreakevenError {
    /// The earlier claiming age must be strictly below the later one.
    #[error("The earlier starting age must be less than the later starting age.")]
    AgeOrder { early_age: u32, late_age: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_order_message_matches_input_form_wording() {
        let err = BreakevenError::AgeOrder {
            early_age: 67,
            late_age: 62,
        };
        assert_eq!(
            err.to_string(),
            "The earlier starting age must be less than the later starting age."
        );
    }
}
