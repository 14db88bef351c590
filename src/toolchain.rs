use std::path::{Path, PathBuf};
use lazy_static::lazy_static;
use crate::{Error, Kind};


pub const PANDOC: &str = "pandoc";

pub const OUTPUT_FLAG: &str = "-o";
pub const FROM_FLAG: &str = "-f";
pub const TO_FLAG: &str = "-t";
pub const PDF_ENGINE_FLAG: &str = "--pdf-engine=";
pub const VERBOSE_FLAG: &str = "--verbose";
pub const STANDALONE_FLAG: &str = "--standalone";
pub const BIBLIOGRAPHY_FLAG: &str = "--bibliography=";
pub const TEMPLATE_FLAG: &str = "--template=";
pub const RESOURCE_PATH_FLAG: &str = "--resource-path=";
pub const REFERENCE_DOC_FLAG: &str = "--reference-doc=";
pub const DATA_DIR_FLAG: &str = "--data-dir=";
pub const TOC_FLAG: &str = "--toc";

pub const BEAMER: &str = "beamer";
pub const XELATEX: &str = "xelatex";
pub const LATEX: &str = "latex";
pub const DOCX: &str = "docx";
pub const ODT: &str = "odt";
pub const MARKDOWN: &str = "markdown";

pub const DEFAULT_TEMPLATE: &str = "htwberlin.tex";
pub const DEFAULT_BEAMER_TEMPLATE: &str = "htwberlin-beamer.tex";


lazy_static! {
    static ref RESOLVED_PANDOC: Option<PathBuf> = which::which(PANDOC).ok();
}


/// Process-wide settings shared by every conversion: where pandoc lives,
/// which PDF engine it uses and the templates to fall back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    binary: PathBuf,
    pdf_engine: String,
    document_template: String,
    slides_template: String,
}

impl Toolchain {
    /// Looks pandoc up on `PATH`. The lookup runs once per process.
    pub fn detect() -> Result<Self, Error> {
        let binary = RESOLVED_PANDOC
            .clone()
            .ok_or_else(|| Error::BinaryNotFound { name: PANDOC.to_string() })?;

        Ok(Self::with_binary(binary))
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            pdf_engine: XELATEX.to_string(),
            document_template: DEFAULT_TEMPLATE.to_string(),
            slides_template: DEFAULT_BEAMER_TEMPLATE.to_string(),
        }
    }

    pub fn with_pdf_engine(mut self, engine: impl Into<String>) -> Self {
        self.pdf_engine = engine.into();
        self
    }

    /// Fallback template for LaTeX, docx and odt conversions.
    pub fn with_document_template(mut self, template: impl Into<String>) -> Self {
        self.document_template = template.into();
        self
    }

    /// Fallback template for markdown slides.
    pub fn with_slides_template(mut self, template: impl Into<String>) -> Self {
        self.slides_template = template.into();
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn pdf_engine(&self) -> &str {
        &self.pdf_engine
    }

    pub fn default_template(&self, kind: &Kind) -> &str {
        match kind {
            Kind::Markdown { .. } => &self.slides_template,
            _ => &self.document_template,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let toolchain = Toolchain::with_binary("/usr/bin/pandoc");
        assert_eq!(toolchain.binary(), Path::new("/usr/bin/pandoc"));
        assert_eq!(toolchain.pdf_engine(), "xelatex");
        assert_eq!(toolchain.default_template(&Kind::Docx { template: None }), "htwberlin.tex");
        assert_eq!(
            toolchain.default_template(&Kind::Markdown { template: None, toc: false }),
            "htwberlin-beamer.tex"
        );
    }

    #[test]
    fn overrides() {
        let toolchain = Toolchain::with_binary("pandoc")
            .with_pdf_engine("lualatex")
            .with_document_template("plain.tex")
            .with_slides_template("slides.tex");

        assert_eq!(toolchain.pdf_engine(), "lualatex");
        assert_eq!(toolchain.default_template(&Kind::Plain), "plain.tex");
        assert_eq!(
            toolchain.default_template(&Kind::Markdown { template: None, toc: true }),
            "slides.tex"
        );
    }

    #[test]
    fn detect_agrees_with_path_lookup() {
        match (Toolchain::detect(), which::which(PANDOC)) {
            (Ok(toolchain), Ok(path)) => assert_eq!(toolchain.binary(), path),
            (Err(Error::BinaryNotFound { name }), Err(_)) => assert_eq!(name, "pandoc"),
            (got, expected) => panic!("detect returned {got:?}, lookup returned {expected:?}"),
        }
    }
}
