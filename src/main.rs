mod app;
mod backend;
mod color;
mod config;
mod dialogs;
mod input;
mod palette;
mod storage;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::Path;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "huewave", version, about = "Colour palette generator for the terminal")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive TUI (default).
    Tui,
    /// Print a random palette (headless).
    Generate {
        /// Number of swatches.
        #[arg(long)]
        count: Option<usize>,
        /// Hex colours to keep; they lead the palette.
        #[arg(long = "lock", value_name = "HEX")]
        locked: Vec<String>,
    },
    /// Print the flavour name of a palette.
    Name {
        #[arg(required = true)]
        colors: Vec<String>,
    },
    /// Encode colours as a share link.
    Share {
        #[arg(required = true)]
        colors: Vec<String>,
    },
    /// Open a share link (or bare segment) in the TUI.
    Open {
        link: String,
        /// Print the decoded colours instead of starting the TUI.
        #[arg(long)]
        print: bool,
    },
    /// List saved palettes.
    List,
    /// Print the most recently saved palette.
    Latest,
    /// Save a palette under a name.
    Save {
        name: String,
        #[arg(required = true)]
        colors: Vec<String>,
    },
    /// Delete a saved palette by id.
    Delete { id: i64 },
    /// Sign in (password read from HUEWAVE_PASSWORD).
    Login { email: String },
    /// Create an account and sign in (password read from HUEWAVE_PASSWORD).
    Register { email: String },
    /// Sign out.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Switch where palettes are persisted.
    Backend {
        kind: BackendArg,
        /// Server base URL for the remote backend.
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Local,
    Remote,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let cfg_path = config::resolve_path(cli.config.as_deref()).context("config path")?;

    let command = cli.command.unwrap_or(Command::Tui);
    let interactive = matches!(command, Command::Tui | Command::Open { print: false, .. });
    let level = log_level(cli.verbose, &cfg.log.level);
    init_logging(interactive, level, &cfg.log_path())?;

    match command {
        Command::Tui => run_tui(cfg, cfg_path, None).await?,
        Command::Generate { count, locked } => {
            let size = count.unwrap_or(cfg.palette_size());
            let colors = generate(size, &locked)?;
            let hexes: Vec<String> = colors.iter().map(|c| c.hex.clone()).collect();
            print_palette(&hexes);
            println!("link: {}", palette::share::encode(&hexes));
        }
        Command::Name { colors } => {
            let hexes = parse_hexes(&colors)?;
            println!("{}", color::naming::generate_palette_name(&hexes));
        }
        Command::Share { colors } => {
            let hexes = parse_hexes(&colors)?;
            let colors: Vec<color::Color> = hexes
                .iter()
                .map(|h| color::Color::parse(h))
                .collect::<Result<_, _>>()?;
            println!(
                "{}",
                palette::share::share_url(config::defaults::SHARE_BASE, &colors)
            );
        }
        Command::Open { link, print } => {
            let hexes = palette::share::decode(&link).context("decode share link")?;
            if print {
                print_palette(&hexes);
            } else {
                run_tui(cfg, cfg_path, Some(hexes)).await?;
            }
        }
        Command::List => {
            let backend = backend::Backend::from_config(&cfg)?;
            let palettes = backend.list_palettes().await?;
            if palettes.is_empty() {
                println!("No saved palettes.");
            }
            for p in palettes {
                println!(
                    "{:>4}  {:<28} {}  {}",
                    p.id,
                    p.name,
                    p.colors.join(" "),
                    p.created_at.date()
                );
            }
        }
        Command::Latest => {
            let backend = backend::Backend::from_config(&cfg)?;
            match backend.latest_palette().await? {
                Some(p) => {
                    println!("{} (id={}, {})", p.name, p.id, p.created_at.date());
                    print_palette(&p.colors);
                }
                None => println!("No saved palettes."),
            }
        }
        Command::Save { name, colors } => {
            let backend = backend::Backend::from_config(&cfg)?;
            let hexes = parse_hexes(&colors)?;
            let draft = backend::models::PaletteDraft {
                name,
                colors: hexes,
            };
            let saved = backend.create_palette(&draft).await?;
            println!("Saved \"{}\" (id={}).", saved.name, saved.id);
        }
        Command::Delete { id } => {
            let backend = backend::Backend::from_config(&cfg)?;
            backend.delete_palette(id).await?;
            println!("Deleted palette {id}.");
        }
        Command::Login { email } => {
            let backend = backend::Backend::from_config(&cfg)?;
            let user = backend.login(&email, &password()?).await?;
            println!("Signed in as {}.", user.email);
            adopt_staged(&backend).await;
        }
        Command::Register { email } => {
            let backend = backend::Backend::from_config(&cfg)?;
            let user = backend.register(&email, &password()?).await?;
            println!("Registered and signed in as {}.", user.email);
            adopt_staged(&backend).await;
        }
        Command::Logout => {
            let backend = backend::Backend::from_config(&cfg)?;
            backend.logout().await?;
            println!("Signed out.");
        }
        Command::Whoami => {
            let backend = backend::Backend::from_config(&cfg)?;
            match backend.current_user().await? {
                Some(user) if !user.email.is_empty() => {
                    println!("{} ({} backend)", user.email, backend.kind())
                }
                Some(user) => println!("{} ({} backend)", user.id, backend.kind()),
                None => println!("Not signed in ({} backend).", backend.kind()),
            }
        }
        Command::Backend { kind, url } => {
            let mut cfg = cfg;
            cfg.backend.kind = match kind {
                BackendArg::Local => config::BackendKind::Local,
                BackendArg::Remote => config::BackendKind::Remote,
            };
            if let Some(url) = url {
                cfg.backend.base_url = url;
            }
            config::save(&cfg, cli.config.as_deref()).context("save config")?;
            println!("Using the {:?} backend.", cfg.backend.kind);
        }
    }

    Ok(())
}

async fn run_tui(
    cfg: config::Config,
    cfg_path: std::path::PathBuf,
    shared: Option<Vec<String>>,
) -> anyhow::Result<()> {
    let mut terminal = tui::TerminalGuard::enter(cfg.input.mouse).context("init terminal")?;
    let mut app = app::App::new(cfg, cfg_path)?;
    if let Some(hexes) = shared {
        app.apply_shared(&hexes);
    }
    app.run(terminal.terminal_mut()).await
}

fn log_level(verbose: u8, configured: &str) -> Level {
    match verbose {
        0 => configured.parse().unwrap_or(Level::INFO),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Headless commands log to stderr. The TUI owns the terminal, so it logs to a file.
fn init_logging(interactive: bool, level: Level, log_path: &Path) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level);

    if interactive {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .with_context(|| format!("open {}", log_path.display()))?;
        builder
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

fn password() -> anyhow::Result<String> {
    std::env::var("HUEWAVE_PASSWORD").context("set HUEWAVE_PASSWORD to the account password")
}

fn parse_hexes(inputs: &[String]) -> anyhow::Result<Vec<String>> {
    inputs
        .iter()
        .map(|s| color::normalize_hex(s).with_context(|| format!("invalid hex colour: {s}")))
        .collect()
}

/// Locked colours first, then random swatches up to `size`.
fn generate(size: usize, locked: &[String]) -> anyhow::Result<Vec<color::Color>> {
    let size = size.clamp(1, palette::MAX_COLORS);
    let mut colors = Vec::with_capacity(size);
    for hex in locked.iter().take(size) {
        let mut c = color::Color::parse(hex).with_context(|| format!("invalid hex colour: {hex}"))?;
        c.locked = true;
        colors.push(c);
    }
    let mut rng = rand::rng();
    while colors.len() < size {
        colors.push(color::Color::random(&mut rng));
    }
    Ok(colors)
}

fn print_palette<S: AsRef<str>>(hexes: &[S]) {
    for (i, h) in hexes.iter().enumerate() {
        let h = h.as_ref();
        println!("{:02}. {}  {}", i + 1, h, color::naming::closest_flavor(h));
    }
    println!("name: {}", color::naming::generate_palette_name(hexes));
}

async fn adopt_staged(backend: &backend::Backend) {
    match backend.adopt_staged_palette().await {
        Ok(Some(p)) => println!("Saved pending palette \"{}\" (id={}).", p.name, p.id),
        Ok(None) => {}
        Err(e) => tracing::warn!("could not save pending palette: {e}"),
    }
}
