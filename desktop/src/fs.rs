use std::fs;
use std::io;

use touchkit_core::fs::{File, Filesystem, Mode};

/// Host filesystem. Paths are used as given, relative to the working
/// directory.
pub struct DesktopFs;

pub struct StdFile(fs::File);

impl embedded_io::ErrorType for StdFile {
    type Error = io::Error;
}

impl embedded_io::Read for StdFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        io::Read::read(&mut self.0, buf)
    }
}

impl embedded_io::Write for StdFile {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        io::Write::write(&mut self.0, buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        io::Write::flush(&mut self.0)
    }
}

impl File for StdFile {}

impl Filesystem for DesktopFs {
    type Error = io::Error;
    type File<'a>
        = StdFile
    where
        Self: 'a;

    fn open_file(&self, path: &str, mode: Mode) -> Result<Self::File<'_>, Self::Error> {
        let file = match mode {
            Mode::Read => fs::File::open(path)?,
            Mode::Write => fs::File::create(path)?,
        };
        Ok(StdFile(file))
    }

    fn list_dir(&self, path: &str) -> Result<Vec<String>, Self::Error> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let mut name = entry.file_name().to_string_lossy().to_string();
            if entry.file_type()?.is_dir() {
                name.push('/');
            }
            entries.push(name);
        }
        Ok(entries)
    }
}
