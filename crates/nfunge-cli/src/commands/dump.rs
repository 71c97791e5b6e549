//! `nfunge dump` - Print a program as loaded into funge-space.

use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use nfunge_core::{Space, Value, Vector};

/// Render the occupied box of a loaded program, with its least point as
/// the origin.
pub fn render(source: &[u8], dims: usize, linear: bool) -> Result<Vec<u8>> {
    let mut space = Space::new(dims);
    space.load(&Vector::zero(), source, false)?;
    let Some((least, greatest)) = space.bounds() else {
        return Ok(Vec::new());
    };
    let size = &(&greatest - &least) + &Vector::new(vec![1 as Value; dims]);
    Ok(space.dump(&least, &size, linear)?)
}

pub fn run(path: &str, dims: usize, linear: bool) -> Result<()> {
    let source = fs::read(path).with_context(|| format!("cannot read {}", path))?;
    let text = render(&source, dims, linear)?;
    let mut out = io::stdout().lock();
    out.write_all(&text)?;
    out.flush()?;
    Ok(())
}
