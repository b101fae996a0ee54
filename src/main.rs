//! cvpress CLI: export resume JSON to a paginated PDF (or raw PNG capture)
//! and run the vibe-check upload against an analysis endpoint.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use cvpress::analyze::AtsClient;
use cvpress::{deliver, export, template, ExportConfig, LivePage};

#[derive(Parser)]
#[command(name = "cvpress")]
#[command(version)]
#[command(about = "Export resume surfaces to paginated A4 PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a resume JSON file and export the document
    Export {
        /// Input resume JSON
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "pdf")]
        format: OutputFormat,

        /// Print the email-share attachment payload instead of saving a file
        #[arg(long)]
        share: bool,
    },

    /// Upload a resume PDF for ATS scoring and print the report
    Analyze {
        /// Input resume PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Analysis endpoint URL
        #[arg(long)]
        endpoint: String,

        /// Request timeout in milliseconds
        #[arg(long, default_value_t = 30_000)]
        timeout_ms: u64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Pdf,
    Png,
}

fn run_export(input: &PathBuf, out: &PathBuf, format: OutputFormat, share: bool) -> anyhow::Result<()> {
    let json = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let resume: template::ResumeData =
        serde_json::from_str(&json).context("resume JSON is malformed")?;
    let title = resume.title.clone();

    let surface = template::compose_surface(&resume);
    let page = LivePage::new(vec![surface]);
    let config = ExportConfig::default();

    let rt = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    match format {
        OutputFormat::Pdf => {
            let doc = rt.block_on(export::export_pdf(&page, page.root(0), &config))?;
            if share {
                let payload = deliver::attachment_payload(&doc, title.as_deref());
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                let path = deliver::save_download(&doc, title.as_deref(), out)?;
                println!("Saved {}", path.display());
            }
        }
        OutputFormat::Png => {
            let bitmap = rt.block_on(export::render_surface(&page, page.root(0), &config))?;
            let png = bitmap.encode_png()?;
            let pdf_name = deliver::download_filename(title.as_deref());
            let name = format!("{}.png", pdf_name.strip_suffix(".pdf").unwrap_or(&pdf_name));
            let path = out.join(name);
            fs::write(&path, png).with_context(|| format!("failed to write {}", path.display()))?;
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}

fn run_analyze(input: &PathBuf, endpoint: &str, timeout_ms: u64) -> anyhow::Result<()> {
    let client = AtsClient::new(endpoint, timeout_ms)?;
    let report = client.analyze_file(input)?;

    println!("ATS score: {}", report.ats_score);
    for (label, items) in [
        ("Strengths", &report.strengths),
        ("Gaps", &report.gaps),
        ("Fixes", &report.fixes),
    ] {
        if items.is_empty() {
            continue;
        }
        println!("{}:", label);
        for item in items {
            println!("  - {}", item);
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Export { input, out, format, share } => run_export(input, out, *format, *share),
        Commands::Analyze { input, endpoint, timeout_ms } => run_analyze(input, endpoint, *timeout_ms),
    };

    // Failures surface as messages, never as a crash; the user may retry
    if let Err(e) = result {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
