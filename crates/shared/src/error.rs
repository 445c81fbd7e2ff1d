//! Application-level response codes.
//!
//! Every JSON response carries a numeric `code` next to the HTTP status.
//! Clients branch on the code; the status only tells them who is at fault.

use serde::Serialize;

/// Application response code carried in the `code` field of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// Request handled.
    Ok,
    /// Malformed body, missing field or empty key.
    BadRequest,
    /// Upload exceeds the configured ceiling.
    ContentTooLong,
    /// The store rejected the write.
    UploadFailed,
    /// Object missing or unreadable.
    ObjectNotFound,
    /// Object was read but its metadata could not be fetched.
    StatFailed,
}

impl ResponseCode {
    /// Returns the wire value of this code.
    ///
    /// Upload and download codes live in separate namespaces, so `2` means
    /// "too long" or "upload failed" on `POST /upload` and "not found" on
    /// downloads.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::BadRequest => 1,
            Self::ContentTooLong | Self::UploadFailed | Self::ObjectNotFound => 2,
            Self::StatFailed => 3,
        }
    }

    /// Returns the HTTP status code that accompanies this code.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest | Self::ContentTooLong => 400,
            Self::ObjectNotFound => 404,
            Self::UploadFailed | Self::StatFailed => 500,
        }
    }
}

impl Serialize for ResponseCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ResponseCode::Ok, 0, 200)]
    #[case(ResponseCode::BadRequest, 1, 400)]
    #[case(ResponseCode::ContentTooLong, 2, 400)]
    #[case(ResponseCode::UploadFailed, 2, 500)]
    #[case(ResponseCode::ObjectNotFound, 2, 404)]
    #[case(ResponseCode::StatFailed, 3, 500)]
    fn test_code_values_and_statuses(
        #[case] code: ResponseCode,
        #[case] value: u8,
        #[case] status: u16,
    ) {
        assert_eq!(code.value(), value);
        assert_eq!(code.status_code(), status);
    }
}
