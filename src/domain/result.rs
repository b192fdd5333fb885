//! Result type alias for isalink

use super::errors::IsaLinkError;

/// Result type alias for isalink operations
///
/// # Examples
///
/// ```
/// use isalink::domain::result::Result;
/// use isalink::domain::errors::IsaLinkError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(IsaLinkError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, IsaLinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
