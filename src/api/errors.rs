use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("booking service rejected the request ({status}): {message}")]
    Backend { status: u16, message: String },
}
