use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use pandoc_wrapper::{ Kind, Log, Request, Toolchain, XELATEX };


#[derive(Parser, Debug)]
#[command(name = "pandoc-wrapper", version, about = "Convert documents with pandoc, to PDF unless told otherwise")]
struct Cli {
    /// Path to the pandoc executable, searched on PATH when omitted
    #[arg(long, env = "PANDOC_BIN", global = true)]
    pandoc: Option<PathBuf>,

    /// Engine used to render PDF output
    #[arg(long, default_value = XELATEX, global = true)]
    pdf_engine: String,

    #[command(subcommand)]
    converter: Converter,
}

#[derive(Subcommand, Debug)]
enum Converter {
    /// Base flags only; pandoc guesses the input format unless --from is given
    Plain {
        #[command(flatten)]
        common: Common,
        #[command(flatten)]
        target: Target,
    },
    /// LaTeX input
    Latex {
        #[command(flatten)]
        common: Common,
        #[command(flatten)]
        target: Target,
        /// Template (.tex), relative to the working directory
        #[arg(long)]
        template: Option<String>,
        /// Bibliography (.bib), relative to the working directory
        #[arg(long)]
        bibliography: Option<String>,
        /// Where images and other resources are looked up [default: directory of the input]
        #[arg(long)]
        resource_path: Option<String>,
    },
    /// Word document input
    Docx {
        #[command(flatten)]
        common: Common,
        #[command(flatten)]
        target: Target,
        /// Template (.tex) for PDF output, or reference document (.docx) for docx output
        #[arg(long)]
        template: Option<String>,
    },
    /// OpenDocument text input
    Odt {
        #[command(flatten)]
        common: Common,
        #[command(flatten)]
        target: Target,
        /// Template (.tex) for PDF output, or reference document (.odt) for odt output
        #[arg(long)]
        template: Option<String>,
    },
    /// Markdown input, rendered as beamer slides
    Markdown {
        #[command(flatten)]
        common: Common,
        /// Beamer template (.tex)
        #[arg(long)]
        template: Option<String>,
        /// Add a table of contents slide
        #[arg(long)]
        toc: bool,
    },
}

#[derive(Args, Debug)]
struct Common {
    /// File to convert, relative to the working directory
    #[arg(short, long)]
    input: String,
    /// Output file [default: <input>-output.pdf]
    #[arg(short, long)]
    output: Option<String>,
    /// Input format, overrides the converter's default
    #[arg(short, long)]
    from: Option<String>,
    /// Working directory of the pandoc process
    #[arg(short = 'C', long, default_value = ".")]
    workdir: PathBuf,
    /// Pass --verbose to pandoc
    #[arg(short, long)]
    verbose: bool,
    /// Print the command line instead of running it
    #[arg(long)]
    dry_run: bool,
    /// Open the result in the default viewer
    #[arg(long)]
    open: bool,
}

#[derive(Args, Debug)]
struct Target {
    /// Output format; must match the output extension, otherwise PDF is written
    #[arg(short, long)]
    to: Option<String>,
}


impl Converter {
    fn into_request(self) -> (Request, Common) {
        let (kind, common, to) = match self {
            Converter::Plain { common, target } => (Kind::Plain, common, target.to),
            Converter::Latex { common, target, template, bibliography, resource_path } => {
                (Kind::Latex { template, bibliography, resource_path }, common, target.to)
            }
            Converter::Docx { common, target, template } => (Kind::Docx { template }, common, target.to),
            Converter::Odt { common, target, template } => (Kind::Odt { template }, common, target.to),
            Converter::Markdown { common, template, toc } => (Kind::Markdown { template, toc }, common, None),
        };

        let mut request = Request::new(common.input.clone(), kind)
            .workdir(common.workdir.clone())
            .verbose(common.verbose);
        request.output = common.output.clone();
        request.to = to;
        if let Some(from) = &common.from {
            request.from = Some(from.clone());
        }

        (request, common)
    }
}


fn cmd_convert(toolchain: &Toolchain, request: Request, flags: &Common) -> ExitCode {
    let invocation = toolchain.build(&request, &mut Log);

    if flags.dry_run {
        println!("{}", invocation.argv().join(" "));
        return 0.into()
    }

    let output = match invocation.execute() {
        Ok(output) => output,
        Err(err) => {
            error!("failed to launch pandoc: {err}");
            return 3.into()
        }
    };

    if !output.stdout.is_empty() {
        println!("{}", output.stdout.trim_end());
    }
    if !output.stderr.is_empty() {
        eprintln!("process errors: {}", output.stderr.trim_end());
    }

    if !output.success() {
        error!("pandoc failed: {}", output.status);
        return 4.into()
    }

    info!("wrote {}", invocation.output());

    if flags.open {
        let path = invocation.workdir().join(invocation.output());
        if let Err(err) = open::that(&path) {
            error!("failed to open {} in default app: {err}", path.display());
            return 5.into()
        }
    }

    0.into()
}


fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let toolchain = match cli.pandoc {
        Some(binary) => Toolchain::with_binary(binary),
        None => match Toolchain::detect() {
            Ok(toolchain) => toolchain,
            Err(err) => {
                error!("{err}");
                return 1.into()
            }
        },
    };
    let toolchain = toolchain.with_pdf_engine(cli.pdf_engine);

    let (request, flags) = cli.converter.into_request();
    cmd_convert(&toolchain, request, &flags)
}
