use std::convert::Infallible;
use std::io::{self, Write};

use tracing::warn;

/// Receives the `Location: <url>` header line produced by a redirect.
pub trait HeaderSink {
    fn send_header(&self, line: &str);
}

impl<F> HeaderSink for F
where
    F: Fn(&str),
{
    fn send_header(&self, line: &str) {
        self(line)
    }
}

/// Ends the request once the redirect header has been sent.
pub trait Terminate {
    type Output;

    fn terminate(&self) -> Self::Output;
}

impl<F, R> Terminate for F
where
    F: Fn() -> R,
{
    type Output = R;

    fn terminate(&self) -> R {
        self()
    }
}

/// Writes the header line to stdout as a CGI response head.
#[derive(Debug, Clone, Copy, Default)]
pub struct CgiHeader;

impl HeaderSink for CgiHeader {
    fn send_header(&self, line: &str) {
        if let Err(err) = write_cgi_head(&mut io::stdout().lock(), line) {
            warn!(error = %err, "failed to write redirect header");
        }
    }
}

fn write_cgi_head(out: &mut impl Write, line: &str) -> io::Result<()> {
    write!(out, "Status: 302 Found\r\n{line}\r\n\r\n")?;
    out.flush()
}

/// Exits the process with status 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminate for ProcessExit {
    type Output = Infallible;

    fn terminate(&self) -> Infallible {
        std::process::exit(0)
    }
}

pub(crate) fn location_header(url: &str) -> String {
    format!("Location: {url}")
}
