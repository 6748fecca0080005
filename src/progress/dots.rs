use console::Term;
use std::fmt;
use std::io::{self, Write};

/// Dot trail written to any [`Write`] sink, stderr by default.
pub struct DotProgress {
    out: Box<dyn Write + Send>,
}

impl fmt::Debug for DotProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DotProgress").finish_non_exhaustive()
    }
}

impl Default for DotProgress {
    fn default() -> Self {
        Self::stderr()
    }
}

impl DotProgress {
    pub fn new<W>(out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self { out: Box::new(out) }
    }

    /// Writes to the terminal's stderr, whether or not it is a TTY.
    pub fn stderr() -> Self {
        Self::new(Term::stderr())
    }

    /// Opens the line of a file: ` => <label> `.
    pub fn start(&mut self, label: &str) -> io::Result<()> {
        write!(self.out, " => {} ", label)?;
        self.out.flush()
    }

    /// One chunk written.
    pub fn tick(&mut self) -> io::Result<()> {
        self.out.write_all(b".")?;
        self.out.flush()
    }

    /// Closes the line with the size actually written.
    pub fn finish(&mut self, size: u64) -> io::Result<()> {
        writeln!(self.out, " {} bytes", size)?;
        self.out.flush()
    }
}
