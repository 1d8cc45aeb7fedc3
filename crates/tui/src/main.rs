mod renderer;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use skillspan_core::model::{BlockColor, BlockDraft, BlockId, Section, YearMonth};
use skillspan_core::pagination::PageSize;
use skillspan_core::storage::{FileStore, is_first_run, load_session, save_session};
use skillspan_core::svg::{render_svg, render_svg_pages};
use skillspan_core::{LayoutConfig, Session};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "skillspan", about = "Two-lane timeline of skills and activities")]
struct Cli {
    /// Directory holding the saved timeline.
    #[arg(long, default_value = ".skillspan")]
    data_dir: PathBuf,
    /// TOML file overriding layout constants.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive view: drag blocks with the mouse.
    View,
    /// Print every block with its packed row.
    List,
    Add {
        #[arg(long)]
        name: String,
        /// First month, as YEAR/MONTH.
        #[arg(long, value_parser = parse_year_month)]
        start: YearMonth,
        /// Last month, as YEAR/MONTH.
        #[arg(long, value_parser = parse_year_month)]
        end: YearMonth,
        #[arg(long, value_parser = parse_color, default_value = "blue")]
        color: BlockColor,
        #[arg(long, value_enum, default_value_t = Lane::Top)]
        section: Lane,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_year_month)]
        start: Option<YearMonth>,
        #[arg(long, value_parser = parse_year_month)]
        end: Option<YearMonth>,
        #[arg(long, value_parser = parse_color)]
        color: Option<BlockColor>,
        #[arg(long, value_enum)]
        section: Option<Lane>,
    },
    Delete {
        id: String,
    },
    /// Change the visible year range.
    Years {
        #[arg(long)]
        start: i32,
        #[arg(long)]
        end: i32,
    },
    /// Rename a lane.
    Label {
        #[arg(value_enum)]
        section: Lane,
        text: String,
    },
    /// Remove every block.
    Clear,
    Import {
        file: PathBuf,
    },
    Export {
        #[command(subcommand)]
        format: ExportFormat,
    },
}

#[derive(Debug, Subcommand)]
enum ExportFormat {
    /// Timeline document; stdout when no file is given.
    Json {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Svg {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 1200.0)]
        width: f64,
        #[arg(long)]
        dark: bool,
    },
    /// One SVG per A4 landscape page.
    Pages {
        #[arg(long)]
        out_dir: PathBuf,
        #[arg(long, default_value_t = 1200.0)]
        width: f64,
        #[arg(long)]
        dark: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Lane {
    Top,
    Bottom,
}

impl From<Lane> for Section {
    fn from(lane: Lane) -> Self {
        match lane {
            Lane::Top => Section::Top,
            Lane::Bottom => Section::Bottom,
        }
    }
}

fn parse_year_month(s: &str) -> Result<YearMonth, String> {
    let (year, month) = s
        .split_once('/')
        .ok_or_else(|| format!("expected YEAR/MONTH, got `{s}`"))?;
    let year = year.trim().parse().map_err(|_| format!("bad year in `{s}`"))?;
    let month = month.trim().parse().map_err(|_| format!("bad month in `{s}`"))?;
    let ym = YearMonth::new(year, month);
    if ym.is_valid() {
        Ok(ym)
    } else {
        Err(format!("month must be 1-12, got {month}"))
    }
}

fn parse_color(s: &str) -> Result<BlockColor, String> {
    BlockColor::from_name(s).ok_or_else(|| {
        let names: Vec<&str> = BlockColor::ALL.iter().map(|c| c.name()).collect();
        format!("unknown color `{s}`, expected one of {}", names.join(", "))
    })
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(path: Option<&Path>, fallback: LayoutConfig) -> Result<LayoutConfig> {
    match path {
        Some(path) => LayoutConfig::load(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(fallback),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut store = FileStore::new(&cli.data_dir);
    let first_run = is_first_run(&store)?;
    let command = cli.command.unwrap_or(Command::View);
    let fallback = match command {
        Command::View => LayoutConfig::terminal(),
        _ => LayoutConfig::default(),
    };
    let config = load_config(cli.config.as_deref(), fallback)?;
    let mut session = load_session(&store, config)?;
    let mut out = io::stdout();

    match command {
        Command::View => {
            if first_run {
                tracing::info!("no saved timeline, asking for a year range");
            }
            renderer::run_interactive(&mut session, first_run)?;
        }
        Command::List => {
            print_blocks(&mut out, &session)?;
            return Ok(());
        }
        Command::Add {
            name,
            start,
            end,
            color,
            section,
        } => {
            let id = session.add_block(BlockDraft {
                name,
                color,
                start,
                end,
                section: section.into(),
            })?;
            writeln!(out, "added {id}")?;
        }
        Command::Edit {
            id,
            name,
            start,
            end,
            color,
            section,
        } => {
            let id = BlockId::from(id);
            let block = session
                .block(&id)
                .with_context(|| format!("no block with id {id}"))?;
            let mut draft = BlockDraft::from_block(block);
            if let Some(name) = name {
                draft.name = name;
            }
            draft.start = start.unwrap_or(draft.start);
            draft.end = end.unwrap_or(draft.end);
            draft.color = color.unwrap_or(draft.color);
            if let Some(section) = section {
                draft.section = section.into();
            }
            session.edit_block(&id, draft)?;
            writeln!(out, "updated {id}")?;
        }
        Command::Delete { id } => {
            let removed = session.delete_block(&BlockId::from(id.as_str()));
            writeln!(out, "removed {removed} block(s)")?;
        }
        Command::Years { start, end } => session.set_years(start, end)?,
        Command::Label { section, text } => session.set_section_label(section.into(), text),
        Command::Clear => {
            let mode = session.clear_request();
            session.clear(mode);
        }
        Command::Import { file } => {
            let data = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            session
                .import_json(&data)
                .with_context(|| format!("importing {}", file.display()))?;
            writeln!(out, "imported {} block(s)", session.blocks().len())?;
        }
        Command::Export { format } => {
            export(&mut out, &mut session, format)?;
            return Ok(());
        }
    }

    save_session(&mut store, &session)?;
    Ok(())
}

fn export(out: &mut impl Write, session: &mut Session, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Json { out: None } => {
            writeln!(out, "{}", session.to_document().to_json_pretty()?)?;
        }
        ExportFormat::Json { out: Some(path) } => {
            std::fs::write(&path, session.to_document().to_json_pretty()?)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        ExportFormat::Svg { out: path, width, dark } => {
            let height = fit_surface(session, width);
            let svg = render_svg(&session.render(), width, height, dark);
            std::fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?;
        }
        ExportFormat::Pages { out_dir, width, dark } => {
            let height = fit_surface(session, width);
            let pages = render_svg_pages(&session.render(), width, height, dark, PageSize::A4_LANDSCAPE);
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating {}", out_dir.display()))?;
            for (i, page) in pages.iter().enumerate() {
                let path = out_dir.join(format!("page-{:02}.svg", i + 1));
                std::fs::write(&path, page).with_context(|| format!("writing {}", path.display()))?;
            }
            writeln!(out, "wrote {} page(s) to {}", pages.len(), out_dir.display())?;
        }
    }
    Ok(())
}

/// Size the surface to the content so the export has no empty margin.
fn fit_surface(session: &mut Session, width: f64) -> f64 {
    session.set_surface(width, 0.0);
    let height = session.geometry().total_height();
    session.set_surface(width, height);
    height
}

fn print_blocks(out: &mut impl Write, session: &Session) -> Result<()> {
    let (start, end) = session.years();
    writeln!(out, "{start}-{end}")?;
    for section in Section::BOTH {
        let layout = session.lane_layout(section);
        writeln!(
            out,
            "\n{} ({} row(s))",
            session.section_label(section),
            layout.total_rows()
        )?;
        for block in session.blocks().iter().filter(|b| b.section == section) {
            writeln!(
                out,
                "  {:<8} row {:<3} {:>7} - {:<7} {:<7} {}",
                block.id,
                layout.row(&block.id).unwrap_or(0),
                block.start(),
                block.end(),
                block.color.name(),
                block.name
            )?;
        }
    }
    Ok(())
}
