//! Foundation types shared by every domain module.

mod envelope;
mod structured;
mod upload;

pub use envelope::{
    Envelope, CODE_BAD_REQUEST, CODE_OK, CODE_PAYMENT_REQUIRED, DEFAULT_SUCCESS_MESSAGE,
};
pub use structured::{parse_structured, CONTENT_KEY};
pub use upload::{
    file_extension, validate_file_size, validate_file_type, DocumentFormat, UploadError,
    UploadKind,
};
