use thiserror::Error;


/// Something the builder recovered from on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The requested target format does not match the output extension, so
    /// the conversion falls back to PDF.
    #[error("not matching format ({extension} != {target}) - will try pdf...")]
    FormatMismatch {
        extension: String,
        target: String,
    },
    #[error("no template given - using {template}...")]
    DefaultTemplate {
        template: String,
    },
}


/// Receives warnings while a command line is being built.
pub trait Diagnostics {
    fn warn(&mut self, warning: Warning);
}

impl Diagnostics for Vec<Warning> {
    fn warn(&mut self, warning: Warning) {
        self.push(warning);
    }
}

/// Forwards warnings to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Log;

impl Diagnostics for Log {
    fn warn(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let mismatch = Warning::FormatMismatch { extension: "pdf".into(), target: "docx".into() };
        assert_eq!(mismatch.to_string(), "not matching format (pdf != docx) - will try pdf...");

        let template = Warning::DefaultTemplate { template: "htwberlin.tex".into() };
        assert_eq!(template.to_string(), "no template given - using htwberlin.tex...");
    }

    #[test]
    fn vec_collects_in_order() {
        let mut sink = Vec::new();
        sink.warn(Warning::DefaultTemplate { template: "a.tex".into() });
        sink.warn(Warning::DefaultTemplate { template: "b.tex".into() });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1], Warning::DefaultTemplate { template: "b.tex".into() });
    }
}
