use snip_core::{ShortenerError, StorageError};
use tonic::{Code, Status};

/// Carries a service failure to the gRPC status it is reported as.
#[derive(Debug)]
pub(crate) struct GrpcError(ShortenerError);

impl From<ShortenerError> for GrpcError {
    fn from(error: ShortenerError) -> Self {
        GrpcError(error)
    }
}

impl From<GrpcError> for Status {
    fn from(GrpcError(error): GrpcError) -> Self {
        let code = match &error {
            ShortenerError::InvalidUrl(_) | ShortenerError::InvalidShortCode(_) => {
                Code::InvalidArgument
            }
            ShortenerError::NotFound(_) => Code::NotFound,
            ShortenerError::CreationFailed(_) => Code::Internal,
            ShortenerError::Storage(StorageError::Unavailable(_) | StorageError::Timeout(_)) => {
                Code::Unavailable
            }
            ShortenerError::Storage(_) => Code::Internal,
        };
        Status::new(code, error.to_string())
    }
}
