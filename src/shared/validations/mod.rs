use rust_decimal::Decimal;

use super::{DomainError, PageRequest, DEFAULT_PAGE_SIZE};

pub fn validate_pagination(page: Option<u64>, size: Option<u64>) -> PageRequest {
    PageRequest::new(page.unwrap_or(1), size.unwrap_or(DEFAULT_PAGE_SIZE))
}

/// Reject a missing or non-positive amount with the given message.
pub fn require_positive(value: Option<Decimal>, message: &str) -> Result<Decimal, DomainError> {
    match value {
        Some(v) if v > Decimal::ZERO => Ok(v),
        _ => Err(DomainError::Validation(message.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let req = validate_pagination(None, None);
        assert_eq!(req.page, 1);
        assert_eq!(req.size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn require_positive_rejects_zero_and_missing() {
        assert!(require_positive(None, "x").is_err());
        assert!(require_positive(Some(Decimal::ZERO), "x").is_err());
        assert_eq!(require_positive(Some(Decimal::ONE), "x").unwrap(), Decimal::ONE);
    }
}
