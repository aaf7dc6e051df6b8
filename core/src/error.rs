/// Failure while reading or writing a text file.
#[derive(Debug, thiserror::Error)]
pub enum Error<E> {
    #[error("{0}")]
    Io(E),
    #[error("line {line} is not valid UTF-8")]
    Encoding { line: usize },
}

pub type Result<T, E> = core::result::Result<T, Error<E>>;
