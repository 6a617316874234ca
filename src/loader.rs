use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::error::Error;
use crate::types::ParseOptions;
use crate::{EnvMap, Parser};

#[derive(Debug)]
enum Source<'a> {
    Str(&'a str),
    Bytes(&'a [u8]),
}

/// Builder over a borrowed in-memory source.
pub struct EnvikBuilder<'a> {
    source: Source<'a>,
    options: ParseOptions,
}

impl<'a> EnvikBuilder<'a> {
    pub fn new(source_str: &'a str) -> Self {
        Self {
            source: Source::Str(source_str),
            options: ParseOptions::default(),
        }
    }

    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self {
            source: Source::Bytes(bytes),
            options: ParseOptions::default(),
        }
    }

    /// Abort on the first malformed line instead of skipping it
    pub fn strict(mut self) -> Self {
        self.options.strict = true;
        self
    }

    /// Parse the input into an EnvMap
    pub fn parse(self) -> Result<EnvMap, Error> {
        match self.source {
            Source::Str(s) => Parser::with_options(s, self.options).parse(),
            Source::Bytes(b) => {
                let s = std::str::from_utf8(b).map_err(|e| Error::InvalidUtf8 {
                    offset: e.valid_up_to(),
                })?;
                Parser::with_options(s, self.options).parse()
            }
        }
    }
}

enum OwnedSource {
    File(PathBuf),
    Reader(Box<dyn Read>),
}

/// Builder for parsing from owned sources (files and readers).
pub struct OwnedEnvikBuilder {
    source: OwnedSource,
    options: ParseOptions,
    optional: bool,
}

impl OwnedEnvikBuilder {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: OwnedSource::File(path.into()),
            options: ParseOptions::default(),
            optional: false,
        }
    }

    pub fn from_reader(reader: impl Read + 'static) -> Self {
        Self {
            source: OwnedSource::Reader(Box::new(reader)),
            options: ParseOptions::default(),
            optional: false,
        }
    }

    /// Abort on the first malformed line instead of skipping it
    pub fn strict(mut self) -> Self {
        self.options.strict = true;
        self
    }

    /// Treat a missing file as an empty map instead of `FileNotFound`
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Read, decode and parse the source into an EnvMap
    pub fn parse(self) -> Result<EnvMap, Error> {
        let bytes = match self.source {
            OwnedSource::File(path) => match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    if self.optional {
                        return Ok(EnvMap::new());
                    }
                    return Err(Error::FileNotFound { path });
                }
                Err(e) => {
                    return Err(Error::Io(format!(
                        "failed to read {}: {}",
                        path.display(),
                        e
                    )))
                }
            },
            OwnedSource::Reader(mut reader) => {
                let mut bytes = Vec::new();
                reader
                    .read_to_end(&mut bytes)
                    .map_err(|e| Error::Io(format!("failed to read from reader: {}", e)))?;
                bytes
            }
        };

        let content = String::from_utf8(bytes).map_err(|e| Error::InvalidUtf8 {
            offset: e.utf8_error().valid_up_to(),
        })?;
        Parser::with_options(&content, self.options).parse()
    }
}

/// Main entry point for configuring and loading `.env` sources
pub struct Envik;

impl Envik {
    /// Create a builder from a string slice
    pub fn from_str(input: &str) -> EnvikBuilder<'_> {
        EnvikBuilder::new(input)
    }

    /// Create a builder from bytes
    pub fn from_bytes(input: &[u8]) -> EnvikBuilder<'_> {
        EnvikBuilder::from_bytes(input)
    }

    /// Create a builder from a file path
    pub fn from_file(path: impl Into<PathBuf>) -> OwnedEnvikBuilder {
        OwnedEnvikBuilder::from_file(path)
    }

    /// Create a builder from a reader
    pub fn from_reader(reader: impl Read + 'static) -> OwnedEnvikBuilder {
        OwnedEnvikBuilder::from_reader(reader)
    }

    /// Search for a file in the current directory and its ancestors
    pub fn find_file(filename: &str) -> Result<OwnedEnvikBuilder, Error> {
        let current = std::env::current_dir()
            .map_err(|e| Error::Io(format!("failed to get current directory: {}", e)))?;

        let mut dir = current.as_path();
        loop {
            let file_path = dir.join(filename);
            if file_path.exists() {
                return Ok(OwnedEnvikBuilder::from_file(file_path));
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }

        Err(Error::FileNotFound {
            path: PathBuf::from(filename),
        })
    }

    /// Load variables from a file with the default lenient options
    pub fn load(path: impl Into<PathBuf>) -> Result<EnvMap, Error> {
        OwnedEnvikBuilder::from_file(path).parse()
    }

    /// Load variables from a file and set them in the process environment
    pub fn load_and_apply(path: impl Into<PathBuf>) -> Result<EnvMap, Error> {
        let env = Self::load(path)?;
        env.apply_to_env();
        Ok(env)
    }
}
