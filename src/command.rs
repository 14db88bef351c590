use crate::diagnostics::{Diagnostics, Warning};
use crate::process::Invocation;
use crate::toolchain::*;
use crate::{Kind, Request};


/// Text after the last `.` of the final path segment.
pub fn extension(path: &str) -> Option<&str> {
    path.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.contains('/'))
}

/// `<input up to the first '.'>-output.pdf`
pub fn default_output(input: &str) -> String {
    let stem = input.split_once('.').map_or(input, |(stem, _)| stem);
    format!("{stem}-output.pdf")
}

/// Replaces the extension of `path` with `.pdf`, or appends it if there is none.
pub fn with_pdf_extension(path: &str) -> String {
    match path.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') => format!("{stem}.pdf"),
        _ => format!("{path}.pdf"),
    }
}

/// Directory part of `path`, `.` when there is none.
pub fn parent_dir(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) => "/",
        Some((dir, _)) => dir,
        None => ".",
    }
}


impl Toolchain {
    /// Assembles the pandoc command line for `request`.
    ///
    /// Warnings about settings that had to be adjusted go to `diagnostics`;
    /// building never fails.
    pub fn build(&self, request: &Request, diagnostics: &mut impl Diagnostics) -> Invocation {
        let mut builder = Builder::new(self, request);

        match &request.kind {
            Kind::Plain => {
                builder.base(true, diagnostics);
            }
            Kind::Latex { template, bibliography, resource_path } => {
                builder.base(true, diagnostics);
                let template = builder.template(template.as_deref(), diagnostics);
                let resource_path = resource_path
                    .as_deref()
                    .unwrap_or_else(|| parent_dir(&request.input));

                if let Some(bib) = bibliography {
                    builder.arg(format!("{BIBLIOGRAPHY_FLAG}{bib}"));
                }
                builder.standalone();
                builder.arg(format!("{TEMPLATE_FLAG}{template}"));
                builder.arg(format!("{RESOURCE_PATH_FLAG}{resource_path}"));
            }
            Kind::Docx { template } => {
                builder.base(true, diagnostics);
                builder.document(DOCX, template.as_deref(), diagnostics);
            }
            Kind::Odt { template } => {
                builder.base(true, diagnostics);
                builder.document(ODT, template.as_deref(), diagnostics);
            }
            Kind::Markdown { template, toc } => {
                // slides are always beamer, whatever the output is called
                builder.base(false, diagnostics);
                let template = builder.template(template.as_deref(), diagnostics);

                if *toc {
                    builder.arg(TOC_FLAG);
                }
                builder.standalone();
                builder.args([TO_FLAG, BEAMER]);
                builder.arg(format!("{TEMPLATE_FLAG}{template}"));
                builder.target = Some(BEAMER.to_string());
            }
        }

        builder.finish()
    }
}


struct Builder<'a> {
    toolchain: &'a Toolchain,
    request: &'a Request,
    args: Vec<String>,
    output: String,
    target: Option<String>,
}

impl<'a> Builder<'a> {
    fn new(toolchain: &'a Toolchain, request: &'a Request) -> Self {
        let output = request
            .output
            .clone()
            .unwrap_or_else(|| default_output(&request.input));

        Self { toolchain, request, args: Vec::new(), output, target: None }
    }

    fn arg(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    fn args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
    }

    /// `-f`, `-t` and `--verbose`. With `check_target` off the requested
    /// target is ignored and the variant sets its own.
    fn base(&mut self, check_target: bool, diagnostics: &mut impl Diagnostics) {
        let request = self.request;

        if let Some(from) = &request.from {
            self.args([FROM_FLAG, from.as_str()]);
        }

        if let (true, Some(to)) = (check_target, &request.to) {
            match extension(&self.output) {
                Some(ext) if ext == to.as_str() => {
                    self.args([TO_FLAG, to.as_str()]);
                    self.target = Some(to.clone());
                }
                ext => {
                    diagnostics.warn(Warning::FormatMismatch {
                        extension: ext.unwrap_or_default().to_string(),
                        target: to.clone(),
                    });
                    self.output = with_pdf_extension(&self.output);
                }
            }
        }

        if request.verbose {
            self.arg(VERBOSE_FLAG);
        }
    }

    /// pandoc runs inside the request's working directory, so the data
    /// directory is anchored there.
    fn standalone(&mut self) {
        self.arg(STANDALONE_FLAG);
        self.arg(format!("{DATA_DIR_FLAG}."));
    }

    fn template(&self, template: Option<&str>, diagnostics: &mut impl Diagnostics) -> String {
        match template {
            Some(template) => template.to_string(),
            None => {
                let template = self.toolchain.default_template(&self.request.kind).to_string();
                diagnostics.warn(Warning::DefaultTemplate { template: template.clone() });
                template
            }
        }
    }

    /// docx and odt: a template when rendering PDF, a reference document when
    /// writing the native format from a template of the same type.
    fn document(&mut self, native: &str, template: Option<&str>, diagnostics: &mut impl Diagnostics) {
        let template = self.template(template, diagnostics);
        self.standalone();

        let flag = match self.target.as_deref() {
            None => Some(TEMPLATE_FLAG),
            Some(to) if to == native && extension(&template) == Some(native) => Some(REFERENCE_DOC_FLAG),
            Some(_) => None,
        };

        if let Some(flag) = flag {
            self.arg(format!("{flag}{template}"));
        }
    }

    fn finish(mut self) -> Invocation {
        // TODO: beamer needs the engine only because it renders through
        // LaTeX; let the markdown arm ask for it instead of matching here.
        if matches!(self.target.as_deref(), None | Some(BEAMER)) {
            self.arg(format!("{PDF_ENGINE_FLAG}{}", self.toolchain.pdf_engine()));
        }
        self.args.push(OUTPUT_FLAG.to_string());
        self.args.push(self.output.clone());
        self.args.push(self.request.input.clone());

        Invocation {
            converter: self.request.kind.name(),
            program: self.toolchain.binary().to_path_buf(),
            args: self.args,
            input: self.request.input.clone(),
            output: self.output,
            target: self.target,
            workdir: self.request.workdir.clone(),
        }
    }
}
