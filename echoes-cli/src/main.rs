mod reports;
mod storage;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use echoes_planner::{
    Catalog, CombatStyle, Interaction, PlannerEngine, PlannerReport, PlannerSession, Preferences,
    Section, Selection, encode, path_from_slug, toggle_mastery, toggle_region, toggle_relic,
};
use reports::{CatalogSummary, SelectionSummary};
use storage::{FileCatalogLoader, FilePreferenceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable output
    Console,
    /// Pretty-printed JSON
    Json,
    /// Markdown suitable for sharing
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "echoes-cli", version)]
#[command(
    about = "Plan Raging Echoes league routes: decode shared links, toggle selections and report unlocked content"
)]
struct Args {
    /// Catalog JSON file to use instead of the bundled data
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Console)]
    format: OutputFormat,

    /// Optional path to write the output instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Show the selection encoded in a `/b/...` path
    Decode { path: String },
    /// Build a path from regions, masteries and relics
    Encode {
        /// Region code, repeatable
        #[arg(long = "region")]
        regions: Vec<String>,
        /// Mastery as STYLE=LEVEL, repeatable
        #[arg(long = "mastery")]
        masteries: Vec<String>,
        /// Relic code, repeatable
        #[arg(long = "relic")]
        relics: Vec<String>,
    },
    /// Apply one toggle to a path
    Toggle {
        path: String,
        #[command(flatten)]
        target: ToggleTarget,
    },
    /// Show what a path unlocks
    Report {
        path: String,
        /// Preferences file controlling which sections are shown
        #[arg(long)]
        prefs: Option<PathBuf>,
    },
    /// Edit stored display preferences
    Prefs {
        /// Preferences file to edit
        #[arg(long)]
        prefs: PathBuf,
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Summarise the loaded catalog
    Catalog,
}

#[derive(Debug, Clone, clap::Args)]
#[group(required = true, multiple = false)]
struct ToggleTarget {
    /// Region code to toggle
    #[arg(long)]
    region: Option<String>,
    /// Mastery rank to click, as STYLE=LEVEL
    #[arg(long)]
    mastery: Option<String>,
    /// Relic code to toggle
    #[arg(long)]
    relic: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
enum PrefsAction {
    /// Print the stored preferences
    List,
    /// Show a section
    Show { section: Section },
    /// Hide a section
    Hide { section: Section },
    /// Show every section
    ShowAll,
    /// Lock the selection
    Lock,
    /// Unlock the selection
    Unlock,
    /// Forget stored preferences
    Reset,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.format == OutputFormat::Console && args.output.is_none() {
        announce_banner();
    }

    let mut output_target = OutputTarget::new(args.output.clone())?;
    run(&args, &mut output_target)?;
    output_target.flush_inner()?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "🗺️  Raging Echoes Planner".bright_cyan().bold());
    println!("{}", "=========================".cyan());
}

type FileEngine = PlannerEngine<FileCatalogLoader, FilePreferenceStore>;

fn engine(args: &Args, prefs: Option<PathBuf>) -> FileEngine {
    PlannerEngine::new(
        FileCatalogLoader::new(args.catalog.clone()),
        FilePreferenceStore::new(prefs),
    )
}

fn open_session(args: &Args, path: &str) -> Result<PlannerSession> {
    engine(args, None)
        .open_session(path)
        .with_context(|| catalog_context(args))
}

fn catalog_context(args: &Args) -> String {
    args.catalog.as_ref().map_or_else(
        || "failed to load bundled catalog".to_string(),
        |p| format!("failed to load catalog {}", p.display()),
    )
}

fn run(args: &Args, out: &mut dyn Write) -> Result<()> {
    match &args.command {
        Command::Decode { path } => {
            let session = open_session(args, path)?;
            let summary = SelectionSummary::new(session.catalog(), session.selection());
            write_selection(args.format, out, &summary)
        }
        Command::Encode {
            regions,
            masteries,
            relics,
        } => {
            let session = open_session(args, "/b/")?;
            let catalog = session.catalog();
            let selection = build_selection(catalog, regions, masteries, relics)?;
            let summary = SelectionSummary::new(catalog, &selection);
            write_selection(args.format, out, &summary)
        }
        Command::Toggle { path, target } => {
            let mut session = open_session(args, path)?;
            let interaction = target.interaction()?;
            let pushed = session.apply(&interaction);
            write_toggle(args.format, out, path, pushed.as_deref())
        }
        Command::Report { path, prefs } => {
            let engine = engine(args, prefs.clone());
            let session = engine
                .open_session(path)
                .with_context(|| catalog_context(args))?;
            let preferences = engine.preferences().context("failed to read preferences")?;
            let summary = SelectionSummary::new(session.catalog(), session.selection());
            let report = session.report();
            write_report(args.format, out, &summary, &report, &preferences)
        }
        Command::Prefs { prefs, action } => {
            let engine = engine(args, Some(prefs.clone()));
            let updated = apply_prefs_action(&engine, action)?;
            write_prefs(args.format, out, &updated)
        }
        Command::Catalog => {
            let session = open_session(args, "/b/")?;
            let summary = CatalogSummary::new(session.catalog());
            match args.format {
                OutputFormat::Json => reports::write_json(out, &summary),
                OutputFormat::Markdown => reports::markdown_catalog(out, &summary),
                OutputFormat::Console => reports::console_catalog(out, &summary),
            }
        }
    }
}

/// Parse `STYLE=LEVEL`, e.g. `melee=4`.
fn parse_mastery(raw: &str) -> Result<(CombatStyle, u8)> {
    let Some((style, level)) = raw.split_once('=') else {
        bail!("mastery `{raw}` must look like STYLE=LEVEL");
    };
    let style: CombatStyle = style
        .parse()
        .with_context(|| format!("invalid mastery `{raw}`"))?;
    let level: u8 = level
        .trim()
        .parse()
        .with_context(|| format!("invalid mastery level in `{raw}`"))?;
    Ok((style, level))
}

fn build_selection(
    catalog: &Catalog,
    regions: &[String],
    masteries: &[String],
    relics: &[String],
) -> Result<Selection> {
    let mut selection = Selection::new(catalog);
    for code in regions {
        selection = toggle_region(catalog, &selection, code);
    }
    for raw in masteries {
        let (style, level) = parse_mastery(raw)?;
        selection = toggle_mastery(catalog, &selection, style, level);
    }
    for code in relics {
        selection = toggle_relic(catalog, &selection, code);
    }
    log::debug!("built selection {}", canonical_path(&selection));
    Ok(selection)
}

impl ToggleTarget {
    fn interaction(&self) -> Result<Interaction> {
        if let Some(code) = &self.region {
            return Ok(Interaction::ToggleRegion(code.clone()));
        }
        if let Some(raw) = &self.mastery {
            let (style, level) = parse_mastery(raw)?;
            return Ok(Interaction::ToggleMastery { style, level });
        }
        if let Some(code) = &self.relic {
            return Ok(Interaction::ToggleRelic(code.clone()));
        }
        bail!("one of --region, --mastery or --relic is required")
    }
}

fn apply_prefs_action(engine: &FileEngine, action: &PrefsAction) -> Result<Preferences> {
    if matches!(action, PrefsAction::Reset) {
        return engine
            .reset_preferences()
            .context("failed to reset preferences");
    }

    let mut prefs = engine.preferences().context("failed to read preferences")?;
    match action {
        PrefsAction::List | PrefsAction::Reset => return Ok(prefs),
        PrefsAction::Show { section } => prefs.display.set(*section, true),
        PrefsAction::Hide { section } => prefs.display.set(*section, false),
        PrefsAction::ShowAll => {
            for section in Section::ALL {
                prefs.display.set(section, true);
            }
        }
        PrefsAction::Lock => prefs.locked = true,
        PrefsAction::Unlock => prefs.locked = false,
    }
    engine
        .save_preferences(&prefs)
        .context("failed to save preferences")?;
    log::info!("preferences updated");
    Ok(prefs)
}

fn write_selection(
    format: OutputFormat,
    out: &mut dyn Write,
    summary: &SelectionSummary,
) -> Result<()> {
    match format {
        OutputFormat::Json => reports::write_json(out, summary),
        OutputFormat::Markdown => reports::markdown_selection(out, summary),
        OutputFormat::Console => reports::console_selection(out, summary),
    }
}

#[derive(Debug, Serialize)]
struct ToggleOutcome<'a> {
    path: &'a str,
    changed: bool,
}

fn write_toggle(
    format: OutputFormat,
    out: &mut dyn Write,
    previous: &str,
    pushed: Option<&str>,
) -> Result<()> {
    let outcome = ToggleOutcome {
        path: pushed.unwrap_or(previous),
        changed: pushed.is_some(),
    };
    match format {
        OutputFormat::Json => reports::write_json(out, &outcome),
        OutputFormat::Markdown => {
            writeln!(out, "`{}`", outcome.path)?;
            Ok(())
        }
        OutputFormat::Console => {
            if outcome.changed {
                writeln!(out, "➡️  {}", outcome.path.green())?;
            } else {
                writeln!(out, "{} {}", "Path unchanged:".yellow(), outcome.path)?;
            }
            Ok(())
        }
    }
}

fn write_report(
    format: OutputFormat,
    out: &mut dyn Write,
    summary: &SelectionSummary,
    report: &PlannerReport,
    preferences: &Preferences,
) -> Result<()> {
    let display = &preferences.display;
    match format {
        OutputFormat::Json => {
            let value = reports::report_value(summary, report, display)?;
            reports::write_json(out, &value)
        }
        OutputFormat::Markdown => reports::markdown_report(out, summary, report, display),
        OutputFormat::Console => reports::console_report(out, summary, report, display),
    }
}

fn write_prefs(format: OutputFormat, out: &mut dyn Write, prefs: &Preferences) -> Result<()> {
    match format {
        OutputFormat::Json => reports::write_json(out, prefs),
        OutputFormat::Markdown => reports::markdown_prefs(out, prefs),
        OutputFormat::Console => reports::console_prefs(out, prefs),
    }
}

fn canonical_path(selection: &Selection) -> String {
    path_from_slug(&encode(selection))
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            catalog: None,
            format: OutputFormat::Json,
            output: None,
            command: Command::Catalog,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "echoes-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    fn run_to_string(args: &Args) -> Result<String> {
        let mut buf: Vec<u8> = Vec::new();
        run(args, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    #[test]
    fn parses_mastery_arguments() {
        assert_eq!(parse_mastery("melee=4").unwrap(), (CombatStyle::Melee, 4));
        assert_eq!(parse_mastery("Mage=2").unwrap(), (CombatStyle::Magic, 2));
        assert!(parse_mastery("melee").is_err());
        assert!(parse_mastery("slash=2").is_err());
        assert!(parse_mastery("ranged=x").is_err());
    }

    #[test]
    fn encode_applies_toggles_in_order() {
        let catalog = Catalog::bundled().unwrap();
        let selection = build_selection(
            &catalog,
            &["MI".to_string(), "KA".to_string()],
            &["melee=4".to_string()],
            &["PM".to_string(), "R".to_string(), "LJ".to_string()],
        )
        .unwrap();
        assert_eq!(canonical_path(&selection), "/b/MI/KA/_/4/0/0/PM/LJ/R");
    }

    #[test]
    fn encode_rejects_bad_mastery_syntax() {
        let args = Args {
            command: Command::Encode {
                regions: Vec::new(),
                masteries: vec!["melee:4".to_string()],
                relics: Vec::new(),
            },
            ..base_args()
        };
        assert!(run_to_string(&args).is_err());
    }

    #[test]
    fn decode_reports_canonical_path() {
        let args = Args {
            command: Command::Decode {
                path: "/b/MI/ZZ/_/0/3/0/nope/PM".to_string(),
            },
            ..base_args()
        };
        let content = run_to_string(&args).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["path"], "/b/MI/_/_/0/3/0/PM");
        assert_eq!(value["masteries_total"], 3);
    }

    #[test]
    fn toggle_reports_unchanged_path() {
        let args = Args {
            command: Command::Toggle {
                path: "/b/MI/KA/AS".to_string(),
                target: ToggleTarget {
                    region: Some("WI".to_string()),
                    mastery: None,
                    relic: None,
                },
            },
            ..base_args()
        };
        let value: serde_json::Value =
            serde_json::from_str(&run_to_string(&args).unwrap()).unwrap();
        assert_eq!(value["changed"], false);
        assert_eq!(value["path"], "/b/MI/KA/AS");
    }

    #[test]
    fn toggle_pushes_new_path() {
        let args = Args {
            format: OutputFormat::Markdown,
            command: Command::Toggle {
                path: "/b/MI".to_string(),
                target: ToggleTarget {
                    region: None,
                    mastery: Some("ranged=2".to_string()),
                    relic: None,
                },
            },
            ..base_args()
        };
        assert_eq!(run_to_string(&args).unwrap().trim(), "`/b/MI/_/_/0/2/0`");
    }

    #[test]
    fn prefs_actions_persist_between_runs() {
        let prefs = temp_path("prefs");
        let hide = Args {
            command: Command::Prefs {
                prefs: prefs.clone(),
                action: PrefsAction::Hide {
                    section: Section::Bosses,
                },
            },
            ..base_args()
        };
        run_to_string(&hide).unwrap();

        let report = Args {
            command: Command::Report {
                path: "/b/MO".to_string(),
                prefs: Some(prefs.clone()),
            },
            ..base_args()
        };
        let value: serde_json::Value =
            serde_json::from_str(&run_to_string(&report).unwrap()).unwrap();
        assert!(value.get("bosses").is_none());
        assert!(value.get("minigames").is_some());

        let reset = Args {
            command: Command::Prefs {
                prefs: prefs.clone(),
                action: PrefsAction::Reset,
            },
            ..base_args()
        };
        run_to_string(&reset).unwrap();
        assert!(!prefs.exists());
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let args = Args {
            catalog: Some(temp_path("missing-catalog")),
            ..base_args()
        };
        let err = run_to_string(&args).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load catalog"));
    }

    #[test]
    fn output_target_writes_to_file() {
        let path = temp_path("output");
        let mut target = OutputTarget::new(Some(path.clone())).unwrap();
        writeln!(target, "hello").unwrap();
        target.flush_inner().unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello\n");
    }
}
