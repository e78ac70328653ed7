use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use confscope_core::storage::{load_authors, load_papers, save_authors, save_papers};
use confscope_core::{ConfscopeConfig, ConfscopeError, ExitCode, SimilarityMetric};
use confscope_ingest::report::FixLatexReport;
use confscope_ingest::sources::{
    load_anthology, load_assignments, load_poster_sheets, load_schedule_rows,
};
use confscope_ingest::{
    AnthologySummary, ConvertSummary, IngestError, TitleMatcher, build_author_index,
    count_latex_entries, fix_latex_authors, fix_paper_authors, merge_posters, merge_schedule,
    normalize,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "confscope",
    about = "Conference program data preparation: papers, schedules, posters and authors",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting CONFSCOPE_JSON=1.
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr. CONFSCOPE_LOG takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the program assignment sheet into a papers file.
    Convert {
        input: PathBuf,
        #[arg(long)]
        sheet: Option<String>,
        /// Zero-based row holding the column names.
        #[arg(long)]
        header_row: Option<usize>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import papers and authors from an ACL Anthology XML file.
    Anthology {
        input: PathBuf,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long)]
        authors: Option<PathBuf>,
        /// Do not write the authors file.
        #[arg(long)]
        no_authors: bool,
    },

    /// Merge schedule rows from the assignment sheet into the papers file.
    Merge {
        schedule: PathBuf,
        #[arg(long)]
        papers: Option<PathBuf>,
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long)]
        sheet: Option<String>,
        #[arg(long)]
        header_row: Option<usize>,
        #[command(flatten)]
        matching: MatchingArgs,
    },

    /// Attach poster hall and board numbers from a poster workbook.
    Posters {
        workbook: PathBuf,
        /// Papers to update; defaults to the merged papers file.
        #[arg(long)]
        papers: Option<PathBuf>,
        /// Defaults to overwriting the papers file.
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long)]
        header_row: Option<usize>,
        #[command(flatten)]
        matching: MatchingArgs,
    },

    /// Rebuild the authors file from a papers file.
    Authors {
        #[arg(long)]
        papers: Option<PathBuf>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Repair LaTeX accent sequences in author names.
    FixLatex {
        #[arg(long)]
        authors: Option<PathBuf>,
        /// Also repair author names inside this papers file.
        #[arg(long)]
        papers: Option<PathBuf>,
        /// Report changes without writing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the normalized comparison key of each title.
    Normalize {
        #[arg(required = true)]
        titles: Vec<String>,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args)]
struct MatchingArgs {
    /// Fuzzy score a candidate must exceed.
    #[arg(long)]
    threshold: Option<f64>,
    /// ratcliff or levenshtein.
    #[arg(long)]
    metric: Option<SimilarityMetric>,
}

impl MatchingArgs {
    fn matcher(&self, default_threshold: f64, config: &ConfscopeConfig) -> Result<TitleMatcher> {
        let threshold = self.threshold.unwrap_or(default_threshold);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfscopeError::ConfigError(format!(
                "threshold must be within [0, 1], got {threshold}"
            ))
            .into());
        }
        Ok(TitleMatcher::new(threshold).with_metric(self.metric.unwrap_or(config.matching.metric)))
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective config.
    Show,
    /// Print the config file location.
    Path,
    /// Write a config file with default values.
    Init {
        #[arg(long)]
        force: bool,
    },
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() {
    let start = Instant::now();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json_output = cli.json || std::env::var("CONFSCOPE_JSON").as_deref() == Ok("1");

    if let Err(err) = run(cli.command, json_output, start) {
        let code = exit_code_of(&err);
        if json_output {
            let envelope = serde_json::json!({
                "status": "error",
                "error": error_kind(code),
                "message": format!("{err:#}"),
                "meta": { "duration_ms": start.elapsed().as_millis() }
            });
            println!("{envelope:#}");
        } else {
            eprintln!("Error: {err:#}");
        }
        std::process::exit(code as i32);
    }
}

fn run(command: Commands, json_output: bool, start: Instant) -> Result<()> {
    let config = ConfscopeConfig::load()?;
    let out = Output { json: json_output, start };

    match command {
        // ── Convert ────────────────────────────────────────────────────────
        Commands::Convert {
            input,
            sheet,
            header_row,
            output,
        } => {
            let sheet = sheet.unwrap_or_else(|| config.sheets.assignments_sheet.clone());
            let header_row = header_row.unwrap_or(config.sheets.header_row);
            let output = output.unwrap_or_else(|| config.papers_path());

            let papers = load_assignments(&input, &sheet, header_row)?;
            save_papers(&output, &papers)?;

            out.emit(&ConvertSummary::from_papers(&papers), &[("papers", &output)])
        }

        // ── Anthology ──────────────────────────────────────────────────────
        Commands::Anthology {
            input,
            year,
            output,
            authors,
            no_authors,
        } => {
            let year = year.unwrap_or(config.anthology.year);
            let output = output.unwrap_or_else(|| config.papers_path());

            let papers = load_anthology(&input, year)?;
            save_papers(&output, &papers)?;

            let mut written = vec![("papers", output)];
            let mut author_entries = 0;
            if !no_authors {
                let authors_path = authors.unwrap_or_else(|| config.authors_path());
                let index = build_author_index(&papers);
                author_entries = index.len();
                save_authors(&authors_path, &index)?;
                written.push(("authors", authors_path));
            }

            out.emit(&AnthologySummary::from_papers(&papers, author_entries), &written)
        }

        // ── Merge ──────────────────────────────────────────────────────────
        Commands::Merge {
            schedule,
            papers,
            output,
            sheet,
            header_row,
            matching,
        } => {
            let matcher = matching.matcher(config.matching.schedule_threshold, &config)?;
            let papers_path = papers.unwrap_or_else(|| config.papers_path());
            let output = output.unwrap_or_else(|| config.merged_path());
            let sheet = sheet.unwrap_or_else(|| config.sheets.assignments_sheet.clone());
            let header_row = header_row.unwrap_or(config.sheets.header_row);

            let mut papers = load_papers(&papers_path)?;
            let rows = load_schedule_rows(&schedule, &sheet, header_row)?;
            info!(papers = papers.len(), rows = rows.len(), "loaded merge inputs");

            let report = merge_schedule(
                &mut papers,
                &rows,
                &matcher,
                config.matching.unmatched_sample,
            );
            save_papers(&output, &papers)?;

            out.emit(&report, &[("papers", &output)])
        }

        // ── Posters ────────────────────────────────────────────────────────
        Commands::Posters {
            workbook,
            papers,
            output,
            header_row,
            matching,
        } => {
            let matcher = matching.matcher(config.matching.poster_threshold, &config)?;
            let papers_path = papers.unwrap_or_else(|| config.merged_path());
            let output = output.unwrap_or_else(|| papers_path.clone());

            let mut sheets_config = config.sheets.clone();
            if let Some(row) = header_row {
                sheets_config.header_row = row;
            }

            let mut papers = load_papers(&papers_path)?;
            let loaded = load_poster_sheets(&workbook, &sheets_config)?;
            if loaded.sheets.is_empty() {
                debug!(skipped = ?loaded.skipped_sheets, "no poster sheets found");
            }

            let report = merge_posters(
                &mut papers,
                &loaded.entries,
                &matcher,
                config.matching.unmatched_sample,
            );
            save_papers(&output, &papers)?;

            out.emit(&report, &[("papers", &output)])
        }

        // ── Authors ────────────────────────────────────────────────────────
        Commands::Authors { papers, output } => {
            let papers_path = papers.unwrap_or_else(|| config.papers_path());
            let output = output.unwrap_or_else(|| config.authors_path());

            let papers = load_papers(&papers_path)?;
            let index = build_author_index(&papers);
            save_authors(&output, &index)?;

            out.emit(
                &AnthologySummary::from_papers(&papers, index.len()),
                &[("authors", &output)],
            )
        }

        // ── Fix LaTeX ──────────────────────────────────────────────────────
        Commands::FixLatex {
            authors,
            papers,
            dry_run,
        } => {
            let authors_path = authors.unwrap_or_else(|| config.authors_path());
            let index = load_authors(&authors_path)?;
            let authors_before = index.len();
            let latex_entries = count_latex_entries(&index);
            let (fixed, changes) = fix_latex_authors(index);

            let mut report = FixLatexReport {
                authors_before,
                authors_after: fixed.len(),
                latex_entries,
                changes,
                papers_fixed: None,
            };

            let mut written: Vec<(&str, &Path)> = Vec::new();
            if !dry_run {
                save_authors(&authors_path, &fixed)?;
                written.push(("authors", authors_path.as_path()));
            }

            if let Some(papers_path) = papers.as_deref() {
                let mut papers = load_papers(papers_path)?;
                report.papers_fixed = Some(fix_paper_authors(&mut papers));
                if !dry_run {
                    save_papers(papers_path, &papers)?;
                    written.push(("papers", papers_path));
                }
            }

            out.emit(&report, &written)
        }

        // ── Normalize ──────────────────────────────────────────────────────
        Commands::Normalize { titles } => {
            let keys: Vec<NormalizedTitle> = titles
                .into_iter()
                .map(|title| NormalizedTitle {
                    key: normalize(&title),
                    title,
                })
                .collect();

            if out.json {
                out.print_ok(&keys)
            } else {
                for entry in &keys {
                    println!("{}\t{}", entry.title, entry.key);
                }
                Ok(())
            }
        }

        // ── Config ─────────────────────────────────────────────────────────
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                if out.json {
                    out.print_ok(&config)
                } else {
                    print!("{}", toml::to_string_pretty(&config)?);
                    Ok(())
                }
            }
            ConfigAction::Path => {
                let path = ConfscopeConfig::config_path();
                if out.json {
                    out.print_ok(&serde_json::json!({ "path": path, "exists": path.exists() }))
                } else {
                    println!("{}", path.display());
                    Ok(())
                }
            }
            ConfigAction::Init { force } => {
                let path = ConfscopeConfig::config_path();
                if path.exists() && !force {
                    return Err(ConfscopeError::ConfigError(format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    ))
                    .into());
                }
                ConfscopeConfig::default()
                    .save_to(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
                if out.json {
                    out.print_ok(&serde_json::json!({ "path": path }))
                } else {
                    println!("Wrote default config to {}", path.display());
                    Ok(())
                }
            }
        },
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct NormalizedTitle {
    title: String,
    key: String,
}

struct Output {
    json: bool,
    start: Instant,
}

impl Output {
    /// Print a command summary plus the files it wrote.
    fn emit<T, P>(&self, summary: &T, written: &[(&str, P)]) -> Result<()>
    where
        T: Serialize + Display,
        P: AsRef<Path>,
    {
        if self.json {
            let files: serde_json::Map<String, serde_json::Value> = written
                .iter()
                .map(|(kind, path)| {
                    (
                        kind.to_string(),
                        serde_json::Value::from(path.as_ref().display().to_string()),
                    )
                })
                .collect();
            return self.print_ok(&serde_json::json!({ "summary": summary, "written": files }));
        }

        println!("{summary}");
        for (kind, path) in written {
            println!("Saved {kind} to {}", path.as_ref().display());
        }
        Ok(())
    }

    fn print_ok<T: Serialize + ?Sized>(&self, data: &T) -> Result<()> {
        print_json(&serde_json::json!({
            "status": "ok",
            "data": data,
            "meta": { "duration_ms": self.start.elapsed().as_millis() }
        }))
    }
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("CONFSCOPE_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn exit_code_of(err: &anyhow::Error) -> ExitCode {
    if let Some(err) = err.downcast_ref::<IngestError>() {
        err.exit_code()
    } else if let Some(err) = err.downcast_ref::<ConfscopeError>() {
        err.exit_code()
    } else if err.downcast_ref::<std::io::Error>().is_some() {
        ExitCode::FileSystemError
    } else {
        ExitCode::GeneralError
    }
}

fn error_kind(code: ExitCode) -> &'static str {
    match code {
        ExitCode::Success => "ok",
        ExitCode::GeneralError => "error",
        ExitCode::NotFound => "not_found",
        ExitCode::InvalidArgs => "invalid_args",
        ExitCode::FileSystemError => "filesystem",
        ExitCode::InvalidInput => "invalid_input",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_merge_with_overrides() {
        let cli = Cli::try_parse_from([
            "confscope",
            "merge",
            "program.xlsx",
            "--threshold",
            "0.8",
            "--metric",
            "levenshtein",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Merge { schedule, matching, .. } => {
                assert_eq!(schedule, PathBuf::from("program.xlsx"));
                assert_eq!(matching.threshold, Some(0.8));
                assert_eq!(matching.metric, Some(SimilarityMetric::Levenshtein));
            }
            _ => panic!("expected merge"),
        }
    }

    #[test]
    fn test_matcher_rejects_out_of_range_threshold() {
        let args = MatchingArgs {
            threshold: Some(1.5),
            metric: None,
        };
        assert!(args.matcher(0.9, &ConfscopeConfig::default()).is_err());

        let args = MatchingArgs {
            threshold: None,
            metric: None,
        };
        let matcher = args.matcher(0.85, &ConfscopeConfig::default()).unwrap();
        assert_eq!(matcher.threshold(), 0.85);
        assert_eq!(matcher.metric(), SimilarityMetric::Ratcliff);
    }

    #[test]
    fn test_exit_codes_follow_error_kind() {
        let err = anyhow::Error::from(IngestError::SheetNotFound("Posters".into()));
        assert_eq!(exit_code_of(&err), ExitCode::NotFound);
        let err = anyhow::Error::from(ConfscopeError::ConfigError("bad".into()));
        assert_eq!(exit_code_of(&err), ExitCode::InvalidArgs);
        assert_eq!(error_kind(ExitCode::InvalidInput), "invalid_input");
    }
}
