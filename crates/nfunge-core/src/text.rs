//! Loading text into funge-space and dumping regions back out.

use crate::error::{SpaceError, SpaceResult};
use crate::space::Space;
use crate::{Value, Vector, BLANK};

const LINE_FEED: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';
const FORM_FEED: u8 = 0x0c;

/// Axes rendered by load and dump (line, page).
const TEXT_AXES: usize = 3;

/// Largest region, in cells, that [`Space::dump`] renders.
pub const MAX_DUMP_CELLS: u64 = 1 << 26;

impl Space {
    /// Places `source` at `origin`.
    ///
    /// In text mode line breaks advance the second axis and form feeds the
    /// third, each only if the space has that axis; otherwise they are
    /// dropped. In binary mode every byte is a cell on the first axis.
    /// Blanks are skipped, so existing cells under them survive.
    ///
    /// Returns the size of the least box anchored at `origin` that holds
    /// every cell written.
    pub fn load(&mut self, origin: &Vector, source: &[u8], binary: bool) -> SpaceResult<Vector> {
        let dims = self.dimensions();
        let mut pos = [0 as Value; TEXT_AXES];
        let mut extent: Option<[Value; TEXT_AXES]> = None;

        let mut bytes = source.iter().copied().peekable();
        while let Some(b) = bytes.next() {
            if !binary {
                match b {
                    CARRIAGE_RETURN | LINE_FEED => {
                        if b == CARRIAGE_RETURN && bytes.peek() == Some(&LINE_FEED) {
                            bytes.next();
                        }
                        if dims >= 2 {
                            pos[0] = 0;
                            pos[1] += 1;
                        }
                        continue;
                    }
                    FORM_FEED => {
                        if dims >= 3 {
                            pos[0] = 0;
                            pos[1] = 0;
                            pos[2] += 1;
                        }
                        continue;
                    }
                    _ => {}
                }
            }
            if b as Value != BLANK {
                let at = origin + &Vector::from(pos);
                self.set(&at, b as Value)?;
                let e = extent.get_or_insert([0; TEXT_AXES]);
                for (max, c) in e.iter_mut().zip(pos) {
                    *max = (*max).max(c);
                }
            }
            pos[0] += 1;
        }

        Ok(match extent {
            Some(e) => Vector::new(
                e.iter()
                    .take(dims.min(TEXT_AXES))
                    .map(|m| m + 1)
                    .collect::<Vec<_>>(),
            ),
            None => Vector::zero(),
        })
    }

    /// Renders the box `origin .. origin + size` as text.
    ///
    /// Axes the space does not have count as size one. With `linear` set,
    /// trailing blanks, empty lines and empty pages are dropped and the
    /// remaining runs of filler are written as a repeat count followed by
    /// the filler byte.
    pub fn dump(&self, origin: &Vector, size: &Vector, linear: bool) -> SpaceResult<Vec<u8>> {
        let dims = self.dimensions();
        let extent = |axis: usize| -> Value {
            if axis >= dims {
                1
            } else {
                size.get(axis).max(0)
            }
        };
        let (sx, sy, sz) = (extent(0), extent(1), extent(2));
        // empty axes still emit separators, so they count as one
        let cells = [sx, sy, sz]
            .iter()
            .fold(1u64, |acc, &e| acc.saturating_mul(e.max(1) as u64));
        if cells > MAX_DUMP_CELLS {
            return Err(SpaceError::TooLarge { size: size.clone() });
        }

        let mut pages: Vec<Vec<Vec<u8>>> = Vec::new();
        for z in 0..sz {
            let mut lines = Vec::new();
            for y in 0..sy {
                let mut line = Vec::new();
                for x in 0..sx {
                    let at = origin + &Vector::from([x, y, z]);
                    line.push(cell_byte(self.get(&at)?));
                }
                lines.push(line);
            }
            pages.push(lines);
        }

        if !linear {
            return Ok(join(pages));
        }

        for lines in &mut pages {
            for line in lines.iter_mut() {
                while line.last() == Some(&b' ') {
                    line.pop();
                }
            }
            while lines.last().is_some_and(|l| l.is_empty()) {
                lines.pop();
            }
        }
        while pages.last().is_some_and(|p| p.is_empty()) {
            pages.pop();
        }
        Ok(compress_runs(&join(pages)))
    }
}

fn cell_byte(value: Value) -> u8 {
    u8::try_from(value).unwrap_or(b'?')
}

fn join(pages: Vec<Vec<Vec<u8>>>) -> Vec<u8> {
    let mut out = Vec::new();
    for (z, lines) in pages.into_iter().enumerate() {
        if z > 0 {
            out.push(FORM_FEED);
        }
        for (y, line) in lines.into_iter().enumerate() {
            if y > 0 {
                out.push(LINE_FEED);
            }
            out.extend(line);
        }
    }
    out
}

fn is_filler(b: u8) -> bool {
    matches!(b, b' ' | LINE_FEED | FORM_FEED)
}

fn compress_runs(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let mut run = 1;
        while is_filler(b) && i + run < bytes.len() && bytes[i + run] == b {
            run += 1;
        }
        if run > 1 {
            out.extend(run.to_string().into_bytes());
        }
        out.push(b);
        i += run;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_two_dimensional() {
        let mut space = Space::new(2);
        let size = space.load(&Vector::zero(), b"ab\r\n c\rd", false).unwrap();
        assert_eq!(size, Vector::from([2, 3]));
        assert_eq!(space.get(&Vector::from([0, 0])).unwrap(), 'a' as Value);
        assert_eq!(space.get(&Vector::from([1, 1])).unwrap(), 'c' as Value);
        assert_eq!(space.get(&Vector::from([0, 2])).unwrap(), 'd' as Value);
        assert_eq!(space.len(), 4);
    }

    #[test]
    fn test_load_drops_unsupported_breaks() {
        let mut space = Space::new(1);
        let size = space.load(&Vector::from([10]), b"1\n2\x0c3", false).unwrap();
        assert_eq!(size, Vector::from([3]));
        assert_eq!(space.get(&Vector::from([12])).unwrap(), '3' as Value);

        let mut space = Space::new(2);
        space.load(&Vector::zero(), b"1\x0c2", false).unwrap();
        assert_eq!(space.get(&Vector::from([1, 0])).unwrap(), '2' as Value);
    }

    #[test]
    fn test_load_pages() {
        let mut space = Space::new(3);
        let size = space.load(&Vector::zero(), b"ab\ncd\x0cef", false).unwrap();
        assert_eq!(size, Vector::from([2, 2, 2]));
        assert_eq!(space.get(&Vector::from([1, 0, 1])).unwrap(), 'f' as Value);
    }

    #[test]
    fn test_load_binary_keeps_breaks() {
        let mut space = Space::new(2);
        let size = space.load(&Vector::zero(), b"a\nb", true).unwrap();
        assert_eq!(size, Vector::from([3, 1]));
        assert_eq!(space.get(&Vector::from([1, 0])).unwrap(), '\n' as Value);
    }

    #[test]
    fn test_load_blank_is_transparent() {
        let mut space = Space::new(2);
        space.set(&Vector::from([1, 0]), 'x' as Value).unwrap();
        let size = space.load(&Vector::zero(), b"a b", false).unwrap();
        assert_eq!(size, Vector::from([3, 1]));
        assert_eq!(space.get(&Vector::from([1, 0])).unwrap(), 'x' as Value);
        let size = space.load(&Vector::zero(), b"   ", false).unwrap();
        assert!(size.is_zero());
    }

    #[test]
    fn test_dump_inverts_load() {
        let source = b"ab c\n  d \nxyz ";
        let mut space = Space::new(2);
        space.load(&Vector::zero(), source, false).unwrap();
        let out = space.dump(&Vector::zero(), &Vector::from([4, 3]), false).unwrap();
        assert_eq!(out, source.to_vec());
    }

    #[test]
    fn test_dump_linear() {
        let mut space = Space::new(2);
        space.load(&Vector::zero(), b"a    b\n\n\nc", false).unwrap();
        let out = space.dump(&Vector::zero(), &Vector::from([8, 6]), true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a4 b3\nc");
    }

    #[test]
    fn test_dump_pages() {
        let mut space = Space::new(3);
        space.load(&Vector::zero(), b"a\x0cb", false).unwrap();
        let out = space.dump(&Vector::zero(), &Vector::from([1, 1, 2]), false).unwrap();
        assert_eq!(out, b"a\x0cb".to_vec());
    }

    #[test]
    fn test_dump_refuses_huge_regions() {
        let mut space = Space::new(3);
        space.load(&Vector::zero(), b"a", false).unwrap();
        let size = Vector::from([1, 1, Value::MAX]);
        assert_eq!(
            space.dump(&Vector::zero(), &size, false),
            Err(SpaceError::TooLarge { size: size.clone() })
        );
        // a zero-width region still has a line per row
        let size = Vector::from([0, 1 << 14, 1 << 14]);
        assert!(space.dump(&Vector::zero(), &size, true).is_err());
        // axes the space lacks do not count
        let flat = Space::new(1);
        assert!(flat.dump(&Vector::zero(), &Vector::from([2, Value::MAX]), false).is_ok());
    }
}
