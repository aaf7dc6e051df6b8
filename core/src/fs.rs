use alloc::{string::String, vec::Vec};
use core::fmt;

use embedded_io::{ErrorType, Read, Write};

use crate::error::{Error, Result};

const READ_CHUNK: usize = 256;

pub enum Mode {
    Read,
    /// Create or truncate.
    Write,
}

pub trait Filesystem {
    type Error: embedded_io::Error + fmt::Display;
    type File<'a>: File + ErrorType<Error = Self::Error>
    where
        Self: 'a;

    fn open_file(
        &self,
        path: &str,
        mode: Mode,
    ) -> core::result::Result<Self::File<'_>, Self::Error>;
    /// Entry names in `path`. Directories carry a trailing `/`.
    fn list_dir(&self, path: &str) -> core::result::Result<Vec<String>, Self::Error>;
}

pub trait File: Read + Write {}

/// Line terminator of a text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Splits a byte stream into lines.
///
/// A read that returns no data is not final: once the source grows, later
/// calls pick up the new lines, which is what tailing a log needs.
pub struct LineReader<R> {
    inner: R,
    pending: Vec<u8>,
    lines_read: usize,
    ending: Option<LineEnding>,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: Vec::new(),
            lines_read: 0,
            ending: None,
        }
    }

    /// Terminator of the first complete line; `Lf` until one is read.
    pub fn line_ending(&self) -> LineEnding {
        self.ending.unwrap_or_default()
    }

    /// Next complete line without its terminator, or `None` when the source
    /// has nothing more right now.
    pub fn read_line(&mut self) -> Result<Option<String>, R::Error> {
        loop {
            if let Some(end) = self.pending.iter().position(|b| *b == b'\n') {
                let mut line: Vec<u8> = self.pending.drain(..=end).collect();
                line.pop();
                let ending = if line.last() == Some(&b'\r') {
                    line.pop();
                    LineEnding::CrLf
                } else {
                    LineEnding::Lf
                };
                self.ending.get_or_insert(ending);
                return self.decode(line).map(Some);
            }
            let mut chunk = [0u8; READ_CHUNK];
            let n = self.inner.read(&mut chunk).map_err(Error::Io)?;
            if n == 0 {
                return Ok(None);
            }
            self.pending.extend_from_slice(&chunk[..n]);
        }
    }

    /// Takes whatever follows the last line terminator.
    pub fn take_partial(&mut self) -> Result<Option<String>, R::Error> {
        if self.pending.is_empty() {
            return Ok(None);
        }
        let rest = core::mem::take(&mut self.pending);
        self.decode(rest).map(Some)
    }

    fn decode(&mut self, bytes: Vec<u8>) -> Result<String, R::Error> {
        self.lines_read += 1;
        String::from_utf8(bytes).map_err(|_| Error::Encoding {
            line: self.lines_read,
        })
    }
}

/// All lines of a file, with the terminator it uses.
pub fn read_lines<F: Filesystem>(
    fs: &F,
    path: &str,
) -> Result<(Vec<String>, LineEnding), F::Error> {
    let file = fs.open_file(path, Mode::Read).map_err(Error::Io)?;
    let mut reader = LineReader::new(file);
    let mut lines = Vec::new();
    while let Some(line) = reader.read_line()? {
        lines.push(line);
    }
    if let Some(rest) = reader.take_partial()? {
        lines.push(rest);
    }
    Ok((lines, reader.line_ending()))
}

/// Replaces the file with `lines`, each followed by `ending`.
pub fn write_lines<F: Filesystem>(
    fs: &F,
    path: &str,
    lines: &[String],
    ending: LineEnding,
) -> Result<(), F::Error> {
    let mut file = fs.open_file(path, Mode::Write).map_err(Error::Io)?;
    for line in lines {
        file.write_all(line.as_bytes()).map_err(Error::Io)?;
        file.write_all(ending.as_bytes()).map_err(Error::Io)?;
    }
    file.flush().map_err(Error::Io)
}
