use std::io::BufRead;

use crate::{read_nonblank_line, KeyReader, TraceError};

/// Reader for LIRS traces: one integer key per line, blank lines skipped.
pub struct LirsReader<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> LirsReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead> KeyReader for LirsReader<R> {
    fn read_keys(&mut self, keys: &mut [i64]) -> Result<usize, TraceError> {
        for (i, slot) in keys.iter_mut().enumerate() {
            let line = match read_nonblank_line(&mut self.reader, &mut self.line)? {
                Some(line) => line,
                None => return Ok(i),
            };
            *slot = line.trim().parse().map_err(|_| TraceError::InvalidLine {
                line: line.to_string(),
            })?;
        }
        Ok(keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_until_end_of_trace() {
        let mut r = LirsReader::new(Cursor::new("\n1\n10\n\n100\n"));

        let mut keys = [0; 2];
        assert_eq!(r.read_keys(&mut keys).unwrap(), 2);
        assert_eq!(keys, [1, 10]);

        let n = r.read_keys(&mut keys).unwrap();
        assert_eq!(n, 1);
        assert_eq!(keys[0], 100);

        assert_eq!(r.read_keys(&mut keys).unwrap(), 0);
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut r = LirsReader::new(Cursor::new("7\r\n8\r\n"));
        let mut keys = [0; 4];
        let n = r.read_keys(&mut keys).unwrap();
        assert_eq!(&keys[..n], &[7, 8]);
    }

    #[test]
    fn test_non_numeric_line_is_invalid() {
        let mut r = LirsReader::new(Cursor::new("1\nx\n"));
        let err = r.read_keys(&mut [0; 4]).unwrap_err();
        assert!(matches!(err, TraceError::InvalidLine { ref line } if line == "x"));
    }
}
