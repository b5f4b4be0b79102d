use std::io::BufRead;

use crate::{read_nonblank_line, KeyReader, TraceError};

/// Reader for ARC traces.
///
/// Each line starts with `<key> <count>`: a run of `count` consecutive keys
/// beginning at `key`. Any further fields on the line are ignored and blank
/// lines are skipped. A run may span several `read_keys` calls.
pub struct ArcReader<R> {
    reader: R,
    line: String,
    next_key: i64,
    remaining: u64,
}

impl<R: BufRead> ArcReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            next_key: 0,
            remaining: 0,
        }
    }

    /// Loads the next run. Returns `false` at the end of the trace.
    fn next_run(&mut self) -> Result<bool, TraceError> {
        let line = match read_nonblank_line(&mut self.reader, &mut self.line)? {
            Some(line) => line,
            None => return Ok(false),
        };

        let (key, count) = parse_run(line).ok_or_else(|| TraceError::InvalidLine {
            line: line.to_string(),
        })?;
        self.next_key = key;
        self.remaining = count;
        Ok(true)
    }
}

fn parse_run(line: &str) -> Option<(i64, u64)> {
    let mut fields = line.split_ascii_whitespace();
    let key = fields.next()?.parse().ok()?;
    let count = fields.next()?.parse().ok()?;
    Some((key, count))
}

impl<R: BufRead> KeyReader for ArcReader<R> {
    fn read_keys(&mut self, keys: &mut [i64]) -> Result<usize, TraceError> {
        for (i, slot) in keys.iter_mut().enumerate() {
            while self.remaining == 0 {
                if !self.next_run()? {
                    return Ok(i);
                }
            }
            *slot = self.next_key;
            self.next_key = self.next_key.wrapping_add(1);
            self.remaining -= 1;
        }
        Ok(keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(input: &str) -> ArcReader<Cursor<Vec<u8>>> {
        ArcReader::new(Cursor::new(input.as_bytes().to_vec()))
    }

    #[test]
    fn test_expands_runs_across_calls() {
        let mut r = reader("\n1 1 0 0\n10 3 0 1\n100 2 0 2\n");

        let mut keys = [0; 4];
        assert_eq!(r.read_keys(&mut keys).unwrap(), 4);
        assert_eq!(keys, [1, 10, 11, 12]);

        let n = r.read_keys(&mut keys).unwrap();
        assert_eq!(n, 2);
        assert_eq!(&keys[..n], &[100, 101]);

        assert_eq!(r.read_keys(&mut keys).unwrap(), 0);
    }

    #[test]
    fn test_run_split_over_small_buffers() {
        let mut r = reader("5 5\n");
        let mut keys = [0; 2];
        assert_eq!(r.read_keys(&mut keys).unwrap(), 2);
        assert_eq!(keys, [5, 6]);
        assert_eq!(r.read_keys(&mut keys).unwrap(), 2);
        assert_eq!(keys, [7, 8]);
        assert_eq!(r.read_keys(&mut keys).unwrap(), 1);
        assert_eq!(keys[0], 9);
    }

    #[test]
    fn test_zero_count_line_contributes_nothing() {
        let mut r = reader("1 0\n2 1\n");
        let mut keys = [0; 4];
        let n = r.read_keys(&mut keys).unwrap();
        assert_eq!(&keys[..n], &[2]);
    }

    #[test]
    fn test_missing_count_is_invalid() {
        let mut r = reader("1");
        let err = r.read_keys(&mut [0; 1]).unwrap_err();
        assert_eq!(err.to_string(), r#"invalid line: "1""#);
    }

    #[test]
    fn test_non_numeric_count_is_invalid() {
        let mut r = reader("1 b 2 3");
        let err = r.read_keys(&mut [0; 1]).unwrap_err();
        assert_eq!(err.to_string(), r#"invalid line: "1 b 2 3""#);
    }

    #[test]
    fn test_empty_input() {
        let mut r = reader("");
        assert_eq!(r.read_keys(&mut [0; 8]).unwrap(), 0);
    }
}
