//! Small pandoc wrapper.
//!
//! Builds `pandoc` command lines from a [`Request`] and runs them as a child
//! process. Converts to PDF by default, from LaTeX, docx, odt and markdown
//! (rendered as beamer slides).

mod command;
mod diagnostics;
mod process;
mod toolchain;

use std::path::PathBuf;
use thiserror::Error;

pub use command::*;
pub use diagnostics::*;
pub use process::*;
pub use toolchain::*;


#[derive(Error, Debug)]
pub enum Error {
    #[error("{name} binary not found on PATH")]
    BinaryNotFound { name: String },
    #[error("failed to run pandoc: {0}")]
    Spawn(#[from] std::io::Error),
}


/// Which converter a request goes through, with the extras that converter takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Base flags only.
    Plain,
    Latex {
        template: Option<String>,
        bibliography: Option<String>,
        /// Where pandoc looks up images and other resources. Defaults to the
        /// directory of the input file.
        resource_path: Option<String>,
    },
    Docx {
        template: Option<String>,
    },
    Odt {
        template: Option<String>,
    },
    /// Markdown rendered as beamer slides.
    Markdown {
        template: Option<String>,
        toc: bool,
    },
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Plain => "Base",
            Kind::Latex { .. } => "Latex",
            Kind::Docx { .. } => "Docx",
            Kind::Odt { .. } => "Odt",
            Kind::Markdown { .. } => "Md",
        }
    }

    /// The format tag a converter reads, and for docx/odt also writes when a
    /// reference document is used.
    pub fn native_format(&self) -> Option<&'static str> {
        match self {
            Kind::Plain => None,
            Kind::Latex { .. } => Some(LATEX),
            Kind::Docx { .. } => Some(DOCX),
            Kind::Odt { .. } => Some(ODT),
            Kind::Markdown { .. } => Some(MARKDOWN),
        }
    }

    pub fn template(&self) -> Option<&str> {
        match self {
            Kind::Plain => None,
            Kind::Latex { template, .. }
            | Kind::Docx { template }
            | Kind::Odt { template }
            | Kind::Markdown { template, .. } => template.as_deref(),
        }
    }
}


/// Everything needed to describe one conversion.
///
/// A request is never run directly: [`Toolchain::build`] turns it into an
/// [`Invocation`], which is what gets executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub input: String,
    /// Defaults to `<input up to the first '.'>-output.pdf`.
    pub output: Option<String>,
    pub from: Option<String>,
    /// `None` means PDF.
    pub to: Option<String>,
    /// Working directory of the pandoc process. Templates, bibliographies
    /// and the input itself are resolved relative to it.
    pub workdir: PathBuf,
    pub verbose: bool,
    pub kind: Kind,
}

impl Request {
    /// Creates a request reading the converter's native format.
    pub fn new(input: impl Into<String>, kind: Kind) -> Self {
        Self {
            input: input.into(),
            output: None,
            from: kind.native_format().map(str::to_string),
            to: None,
            workdir: PathBuf::from("."),
            verbose: false,
            kind,
        }
    }

    pub fn plain(input: impl Into<String>) -> Self {
        Self::new(input, Kind::Plain)
    }

    pub fn latex(input: impl Into<String>) -> Self {
        Self::new(input, Kind::Latex { template: None, bibliography: None, resource_path: None })
    }

    pub fn docx(input: impl Into<String>) -> Self {
        Self::new(input, Kind::Docx { template: None })
    }

    pub fn odt(input: impl Into<String>) -> Self {
        Self::new(input, Kind::Odt { template: None })
    }

    pub fn markdown(input: impl Into<String>) -> Self {
        Self::new(input, Kind::Markdown { template: None, toc: false })
    }

    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn from(mut self, format: impl Into<String>) -> Self {
        self.from = Some(format.into());
        self
    }

    pub fn to(mut self, format: impl Into<String>) -> Self {
        self.to = Some(format.into());
        self
    }

    pub fn workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = dir.into();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Ignored by [`Kind::Plain`].
    pub fn template(mut self, path: impl Into<String>) -> Self {
        match &mut self.kind {
            Kind::Plain => {}
            Kind::Latex { template, .. }
            | Kind::Docx { template }
            | Kind::Odt { template }
            | Kind::Markdown { template, .. } => *template = Some(path.into()),
        }
        self
    }

    /// Only used by [`Kind::Latex`].
    pub fn bibliography(mut self, path: impl Into<String>) -> Self {
        if let Kind::Latex { bibliography, .. } = &mut self.kind {
            *bibliography = Some(path.into());
        }
        self
    }

    /// Only used by [`Kind::Latex`].
    pub fn resource_path(mut self, path: impl Into<String>) -> Self {
        if let Kind::Latex { resource_path, .. } = &mut self.kind {
            *resource_path = Some(path.into());
        }
        self
    }

    /// Only used by [`Kind::Markdown`].
    pub fn toc(mut self, enabled: bool) -> Self {
        if let Kind::Markdown { toc, .. } = &mut self.kind {
            *toc = enabled;
        }
        self
    }
}
