use clap::{Parser, Subcommand};
use log::LevelFilter;
use microcms::build::{self, BuildRoots, BuildSettings, ErrorPolicy};
use microcms::config::{self, SiteConfig};
use microcms::convert::MarkdownConverter;
use microcms::output;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "microcms")]
#[command(about = "Mirror a directory tree into a site: Markdown becomes HTML, the rest is copied")]
#[command(long_about = "\
Mirror a directory tree into a site: Markdown becomes HTML, the rest is copied

Every file under the source directory lands at the same relative path under
the output directory. Files with a Markdown extension (.md, .markdown, ...)
are converted to .html; everything else is copied byte-for-byte.

  project/                 project/WWW/
  ├── microcms.toml        (never copied)
  ├── index.md       →     ├── index.html
  ├── css/root.css   →     ├── css/root.css
  └── .git/          ✗     (excluded)

Settings live in microcms.toml in the source directory.
Run 'microcms gen-config' to print a documented one.")]
#[command(version)]
struct Cli {
    /// Source directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory (relative paths resolve against the source directory)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log every walked, converted, and copied file
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert and copy the source tree into the output directory
    Build {
        /// Keep going after errors and report them all at the end
        #[arg(long)]
        collect_errors: bool,
    },
    /// Show what a build would do without writing anything
    Check {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert a single Markdown file and print the HTML
    Convert {
        /// Markdown file to convert
        file: PathBuf,
    },
    /// Print a stock microcms.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Build { collect_errors } => {
            let site_config = config::load_config(&cli.source)?;
            let roots = resolve_roots(&cli.source, cli.output.as_ref(), &site_config)?;
            let mut settings = BuildSettings::from_config(&site_config);
            if collect_errors {
                settings = settings.with_policy(ErrorPolicy::CollectAll);
            }
            let converter = MarkdownConverter::from_config(&site_config);

            println!(
                "==> Building {} \u{2192} {}",
                roots.source().display(),
                roots.output().display()
            );
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_build_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = build::build(&roots, &settings, &converter, Some(tx));
            printer.join().ok();

            let report = result?;
            output::print_build_summary(&report, roots.output());
            println!("==> Complete");
        }
        Command::Check { json } => {
            let site_config = config::load_config(&cli.source)?;
            let roots = resolve_roots(&cli.source, cli.output.as_ref(), &site_config)?;
            let settings = BuildSettings::from_config(&site_config);
            let planned = build::plan(&roots, &settings)?;
            if json {
                let entries: Vec<serde_json::Value> = planned
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "source": p.source.relative,
                            "target": p.target_relative,
                            "kind": p.kind,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("==> Checking {}", roots.source().display());
                output::print_plan(&planned);
            }
        }
        Command::Convert { file } => {
            let site_config = config::load_config(&cli.source)?;
            let converter = MarkdownConverter::from_config(&site_config);
            let html = converter.convert_file(&file)?;
            print!("{}", String::from_utf8_lossy(&html));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `--output` wins over `output_dir` from the config file.
fn resolve_roots(
    source: &std::path::Path,
    cli_output: Option<&PathBuf>,
    site_config: &SiteConfig,
) -> Result<BuildRoots, build::BuildError> {
    let output = cli_output
        .cloned()
        .unwrap_or_else(|| PathBuf::from(&site_config.output_dir));
    BuildRoots::new(source, output)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    SimpleLogger::new()
        .with_level(level)
        .without_timestamps()
        .init()
        .ok();
}
