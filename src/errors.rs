// ABOUTME: Unified error handling re-exported from salon-core
// ABOUTME: Provides AppError, ErrorCode, BookingError, and DatabaseError to the application crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use salon_core::errors::*;

/// Result type for booking workflow operations
pub type BookingResult<T> = Result<T, BookingError>;

/// Classify an error bubbling out of a command into a coded `AppError`
///
/// Booking, repository, and parse failures keep their codes and details;
/// anything else is reported as an internal error.
#[must_use]
pub fn classify(error: anyhow::Error) -> AppError {
    let error = match error.downcast::<AppError>() {
        Ok(app_error) => return app_error,
        Err(other) => other,
    };
    let error = match error.downcast::<BookingError>() {
        Ok(booking) => return booking.into(),
        Err(other) => other,
    };
    let error = match error.downcast::<DatabaseError>() {
        Ok(database) => return database.into(),
        Err(other) => other,
    };
    match error.downcast::<serde_json::Error>() {
        Ok(json) => json.into(),
        Err(other) => AppError::internal(format!("{other:#}")),
    }
}

/// Render an error as the JSON payload printed by the CLI
#[must_use]
pub fn render(error: anyhow::Error) -> String {
    let response = ErrorResponse::from(classify(error));
    serde_json::to_string_pretty(&response).unwrap_or(response.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSlot;
    use anyhow::Context;

    #[test]
    fn test_booking_error_keeps_code_and_details() {
        let error = anyhow::Error::from(BookingError::CouponInvalid {
            code: "NOPE".to_owned(),
        });
        let app_error = classify(error);

        assert_eq!(app_error.code, ErrorCode::InvalidInput);
        assert_eq!(app_error.details["coupon"], "NOPE");
    }

    #[test]
    fn test_repository_error_maps_through_database_codes() {
        let error = anyhow::Error::from(DatabaseError::NotFound {
            entity: "appointment",
            id: "a-1".to_owned(),
        });
        assert_eq!(classify(error).code, ErrorCode::ResourceNotFound);
    }

    #[test]
    fn test_parse_failure_stays_invalid_input() {
        let Err(parse) = TimeSlot::parse("25:99") else {
            panic!("slot should not parse");
        };
        let app_error = classify(anyhow::Error::from(parse));
        assert_eq!(app_error.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_context_wrapped_json_error_is_serialization() {
        let result: anyhow::Result<Vec<u32>> =
            serde_json::from_str("[oops").context("Catalog must be a JSON array of services");
        let Err(error) = result else {
            panic!("catalog should not parse");
        };
        assert_eq!(classify(error).code, ErrorCode::SerializationError);
    }

    #[test]
    fn test_unclassified_error_is_internal() {
        let rendered = render(anyhow::anyhow!("disk on fire"));
        let response: ErrorResponse = serde_json::from_str(&rendered).unwrap();

        assert_eq!(response.code, ErrorCode::InternalError);
        assert!(response.message.contains("disk on fire"));
    }
}
