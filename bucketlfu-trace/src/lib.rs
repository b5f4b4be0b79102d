//! # bucketlfu Trace
//!
//! Readers for cache access traces and a replay driver that measures the hit
//! ratio of any [`Cache`](bucketlfu_core::Cache) over them.
//!
//! Two line-oriented formats are understood, selected by file extension:
//!
//! - `.arc` - run-length lines `<key> <count> ...` ([`ArcReader`])
//! - `.lirs` - one key per line ([`LirsReader`])
//!
//! Either may be gzip-compressed with a trailing `.gz`; multi-member gzip
//! files are read through to the last member.
//!
//! ```no_run
//! use bucketlfu_core::BucketLfu;
//! use bucketlfu_trace::{replay, Trace};
//!
//! let mut trace = Trace::open("traces/P8.lis.arc.gz")?;
//! let cache: BucketLfu<i64, i64> = BucketLfu::new(4096);
//! let result = replay(&cache, &mut trace, 1024)?;
//! println!("hit ratio: {:.2}%", result.ratio() * 100.0);
//! # Ok::<(), bucketlfu_trace::TraceError>(())
//! ```
mod arc;
mod error;
mod lirs;
mod replay;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::debug;

pub use arc::ArcReader;
pub use error::TraceError;
pub use lirs::LirsReader;
pub use replay::{replay, HitRatio};

/// A source of integer keys.
pub trait KeyReader {
    /// Fills `keys` from the front and returns how many slots were written.
    ///
    /// A count below `keys.len()` means the trace is exhausted; later calls
    /// return `Ok(0)`.
    fn read_keys(&mut self, keys: &mut [i64]) -> Result<usize, TraceError>;
}

/// Line format of a trace file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceFormat {
    Arc,
    Lirs,
}

impl TraceFormat {
    /// Determines the format from `path`, returning it together with whether
    /// the file is gzip-compressed.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucketlfu_trace::TraceFormat;
    ///
    /// assert_eq!(TraceFormat::detect("a.arc").unwrap(), (TraceFormat::Arc, false));
    /// assert_eq!(TraceFormat::detect("a.lirs.gz").unwrap(), (TraceFormat::Lirs, true));
    /// assert!(TraceFormat::detect("a.csv").is_err());
    /// ```
    pub fn detect(path: impl AsRef<Path>) -> Result<(Self, bool), TraceError> {
        let path = path.as_ref();
        let compressed = path.extension().map_or(false, |ext| ext == "gz");
        let inner = if compressed {
            path.with_extension("")
        } else {
            path.to_path_buf()
        };

        let format = match inner.extension().and_then(|ext| ext.to_str()) {
            Some("arc") => TraceFormat::Arc,
            Some("lirs") => TraceFormat::Lirs,
            _ => {
                return Err(TraceError::UnknownFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        Ok((format, compressed))
    }

    fn reader<R>(self, input: R) -> Box<dyn KeyReader + Send>
    where
        R: BufRead + Send + 'static,
    {
        match self {
            TraceFormat::Arc => Box::new(ArcReader::new(input)),
            TraceFormat::Lirs => Box::new(LirsReader::new(input)),
        }
    }
}

/// An open trace file.
///
/// Dropping the `Trace` releases the decompressor first and then the file
/// it wraps.
pub struct Trace {
    reader: Box<dyn KeyReader + Send>,
    format: TraceFormat,
    compressed: bool,
}

impl Trace {
    /// Opens the trace at `path`, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// - [`TraceError::UnknownFormat`] if the extension is not recognized;
    ///   the file is not touched in that case
    /// - [`TraceError::Io`] if the file cannot be opened, or if a `.gz` file
    ///   does not start with a valid gzip stream
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let (format, compressed) = TraceFormat::detect(path)?;
        let file = File::open(path)?;

        let reader = if compressed {
            let mut input = BufReader::new(MultiGzDecoder::new(file));
            // Decodes the header now; the buffered bytes stay in `input`.
            input.fill_buf()?;
            format.reader(input)
        } else {
            format.reader(BufReader::new(file))
        };

        debug!(
            "opened {:?} trace {} (gzip: {})",
            format,
            path.display(),
            compressed
        );
        Ok(Self {
            reader,
            format,
            compressed,
        })
    }

    pub fn format(&self) -> TraceFormat {
        self.format
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Reads up to `keys.len()` keys. See [`KeyReader::read_keys`].
    pub fn read(&mut self, keys: &mut [i64]) -> Result<usize, TraceError> {
        self.reader.read_keys(keys)
    }
}

impl KeyReader for Trace {
    fn read_keys(&mut self, keys: &mut [i64]) -> Result<usize, TraceError> {
        self.read(keys)
    }
}

/// Reads lines into `buf` until a non-blank one appears, returning it without
/// its line terminator. `None` marks the end of input.
pub(crate) fn read_nonblank_line<'a, R: BufRead>(
    reader: &mut R,
    buf: &'a mut String,
) -> io::Result<Option<&'a str>> {
    loop {
        buf.clear();
        if reader.read_line(buf)? == 0 {
            return Ok(None);
        }
        if !buf.trim().is_empty() {
            return Ok(Some(buf.trim_end_matches(&['\r', '\n'][..])));
        }
    }
}
