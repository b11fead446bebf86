//! Size ceilings checked before any model call is made.

use crate::errors::{AnalyzeError, AnalyzeResult, PayloadPart};

/// Ceiling for the whole request body (5 MiB).
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Ceiling for the embedded `image` field (4 MiB).
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Rejects a body longer than [`MAX_BODY_BYTES`].
pub fn check_body_len(len: usize) -> AnalyzeResult<()> {
    check(PayloadPart::Body, len, MAX_BODY_BYTES)
}

/// Rejects an image field longer than [`MAX_IMAGE_BYTES`] (measured as encoded text).
pub fn check_image_len(image: &str) -> AnalyzeResult<()> {
    check(PayloadPart::Image, image.len(), MAX_IMAGE_BYTES)
}

fn check(part: PayloadPart, actual: usize, limit: usize) -> AnalyzeResult<()> {
    if actual > limit {
        Err(AnalyzeError::PayloadTooLarge {
            part,
            actual,
            limit,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_limit_is_inclusive() {
        assert!(check_body_len(MAX_BODY_BYTES).is_ok());
        assert!(matches!(
            check_body_len(MAX_BODY_BYTES + 1),
            Err(AnalyzeError::PayloadTooLarge {
                part: PayloadPart::Body,
                ..
            })
        ));
    }

    #[test]
    fn six_mib_body_is_rejected() {
        assert!(check_body_len(6 * 1024 * 1024).is_err());
    }

    #[test]
    fn image_limit_counts_encoded_bytes() {
        let ok = "A".repeat(MAX_IMAGE_BYTES);
        assert!(check_image_len(&ok).is_ok());

        let big = "A".repeat(MAX_IMAGE_BYTES + 1);
        match check_image_len(&big) {
            Err(AnalyzeError::PayloadTooLarge { part, actual, limit }) => {
                assert_eq!(part, PayloadPart::Image);
                assert_eq!(actual, MAX_IMAGE_BYTES + 1);
                assert_eq!(limit, MAX_IMAGE_BYTES);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
