use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use microdata2rdf::emitter::grouping::CanonicalGroupingEmitter;
use microdata2rdf::emitter::ntriples::NTriplesEmitter;
use microdata2rdf::emitter::turtle::TurtleEmitter;
use microdata2rdf::emitter::StatementSink;
use microdata2rdf::extraction::extractor::ExtractionOptions;
use microdata2rdf::parser::MicrodataParser;
use microdata2rdf::registry::VocabularyRegistry;

/// Extract HTML microdata to RDF.
#[derive(Parser)]
#[command(name = "microdata2rdf", version, about)]
struct Cli {
    /// HTML file to read, or `-` for stdin.
    input: PathBuf,

    /// Output file path [default: stdout].
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format: ntriples, nquads, turtle.
    #[arg(short, long, value_name = "FORMAT", default_value = "ntriples")]
    format: String,

    /// Document base URI [default: the input file's file:// URL].
    #[arg(short, long, value_name = "URI")]
    base_uri: Option<String>,

    /// Vocabulary registry JSON [default: built-in W3C registry].
    #[arg(long, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// Abort on an itemid that cannot be made absolute.
    #[arg(long)]
    fail_on_relative_itemid: bool,

    /// Abort on a relative itemtype.
    #[arg(long)]
    fail_on_relative_itemtype: bool,

    /// Emit statements for registry subPropertyOf/equivalentProperty.
    #[arg(long)]
    expand_equivalents: bool,

    /// Tag literals with the nearest lang attribute.
    #[arg(long)]
    language_literals: bool,

    /// Canonical grouping buffer size, in statements.
    #[arg(long, value_name = "N", default_value_t = 1024)]
    buffer_size: usize,

    /// Write statements in extraction order, without canonical grouping.
    #[arg(long)]
    unsorted: bool,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output.
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(cli: &Cli) -> io::Result<String> {
    let mut content = String::new();
    if cli.input.as_os_str() == "-" {
        io::stdin().read_to_string(&mut content)?;
    } else {
        File::open(&cli.input)?.read_to_string(&mut content)?;
    }
    Ok(content)
}

fn default_base_uri(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    if cli.input.as_os_str() == "-" {
        return Err("--base-uri is required when reading from stdin".into());
    }
    let path = std::fs::canonicalize(&cli.input)?;
    let url = Url::from_file_path(&path)
        .map_err(|_| format!("cannot build a file URL for {}", path.display()))?;
    Ok(url.to_string())
}

/// Parse into `sink`, optionally behind the canonical grouping emitter.
fn run_into<S: StatementSink>(
    cli: &Cli,
    parser: &MicrodataParser,
    input: &str,
    base_uri: &str,
    sink: S,
) -> Result<u64, Box<dyn std::error::Error>> {
    let count = if cli.unsorted {
        parser.parse(input, base_uri, sink)?
    } else {
        let grouped = CanonicalGroupingEmitter::with_capacity(sink, cli.buffer_size);
        parser.parse(input, base_uri, grouped)?
    };
    Ok(count)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.verbose {
        tracing::info!(input = %cli.input.display(), "loading input");
    }

    let input = read_input(&cli)?;
    let base_uri = match cli.base_uri {
        Some(ref base) => base.clone(),
        None => default_base_uri(&cli)?,
    };

    let registry = match cli.registry {
        Some(ref path) => Arc::new(VocabularyRegistry::from_path(path)?),
        None => VocabularyRegistry::builtin()?,
    };

    let options = ExtractionOptions {
        fail_on_relative_item_id: cli.fail_on_relative_itemid,
        fail_on_relative_item_type: cli.fail_on_relative_itemtype,
        expand_property_equivalents: cli.expand_equivalents,
        language_literals: cli.language_literals,
        ..ExtractionOptions::default()
    };
    let parser = MicrodataParser::with_registry(registry).with_options(options);

    // Determine output writer
    let output_writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let format = cli.format.to_lowercase();
    let statement_count = match format.as_str() {
        "ntriples" | "nt" | "nquads" | "nq" => {
            let mut emitter = NTriplesEmitter::new(output_writer);
            run_into(&cli, &parser, &input, &base_uri, &mut emitter)?
        }
        "turtle" | "ttl" => {
            let mut emitter = TurtleEmitter::new(output_writer);
            run_into(&cli, &parser, &input, &base_uri, &mut emitter)?
        }
        _ => {
            return Err(
                format!("Unknown format: {format}. Use 'ntriples', 'nquads' or 'turtle'.").into(),
            );
        }
    };

    // Print summary to stderr (unless quiet)
    if !cli.quiet {
        eprintln!(
            "Extracted {statement_count} statements from {}",
            cli.input.display()
        );
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
