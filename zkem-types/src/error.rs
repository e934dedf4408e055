pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown attendance state code: {0}")]
    UnknownEventCode(u16),
}
