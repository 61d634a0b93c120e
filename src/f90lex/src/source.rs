// f90lex/src/source.rs

//! Physical line sources for the lexer.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::Path;

/// Lines of an in-memory text.
pub type TextLines = SourceLines<Cursor<String>>;

/// Lines of a file on disk.
pub type FileLines = SourceLines<BufReader<File>>;

/// Iterator over the physical lines of a reader, terminators included.
///
/// Unlike [`BufRead::lines`], each line keeps its `\n` or `\r\n`, so the
/// lexer can reproduce the input byte for byte. A final line without a
/// terminator is yielded as is.
pub struct SourceLines<R> {
    reader: R,
    done: bool,
}

impl<R: BufRead> SourceLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

impl SourceLines<Cursor<String>> {
    pub fn from_text(text: &str) -> Self {
        Self::new(Cursor::new(text.to_owned()))
    }
}

impl SourceLines<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for SourceLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(Ok(line)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
