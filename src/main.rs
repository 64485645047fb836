//! `parivaani` command-line entry point.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use parivaani::auth::SessionHandle;
use parivaani::baas::{BaasClient, Collection, User};
use parivaani::catalog::{find_persona, LanguageCode, DUBBING_PERSONA_IDS};
use parivaani::config::{expand_path, Config};
use parivaani::dashboard::DashboardLoader;
use parivaani::download::{download_with_fallback, filename_from_url, MediaKind, SystemDownloader};
use parivaani::store::open_database;
use parivaani::wizard::VoiceWizard;
use parivaani::workflow::{
    progress_channel, DubbingWorkflow, GenerationSettings, PassthroughMuxer, Progress,
    VoiceWorkflow,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// AI voiceovers and video dubbing in Indian languages
#[derive(Parser, Debug)]
#[command(name = "parivaani")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to ~/.parivaani/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Account email for commands that act on your history
    #[arg(long, env = "PARIVAANI_EMAIL", global = true)]
    email: Option<String>,

    /// Account password
    #[arg(long, env = "PARIVAANI_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web gateway
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate a voiceover
    Generate {
        /// Script text
        #[arg(long, conflicts_with = "script_file", required_unless_present = "script_file")]
        script: Option<String>,
        /// Read the script from a file
        #[arg(long)]
        script_file: Option<PathBuf>,
        /// Target language code (hi, ta, te, ...)
        #[arg(long)]
        language: String,
        /// Persona id (male-1, female-1, ...)
        #[arg(long)]
        voice: String,
        /// Playback speed, 0.5 to 2.0
        #[arg(long)]
        speed: Option<f32>,
        /// Save the audio when done
        #[arg(long)]
        download: bool,
    },
    /// Dub a local video into another language
    Dub {
        #[arg(long)]
        video: PathBuf,
        /// Spoken language of the video
        #[arg(long)]
        from: String,
        /// Language to dub into
        #[arg(long)]
        to: String,
        /// Persona id for the new voice track
        #[arg(long)]
        voice: String,
    },
    /// Show usage stats and recent history
    Dashboard,
    /// Download a media URL, falling back to the browser and then the clipboard
    Download {
        #[arg(long)]
        url: String,
        #[arg(long, value_enum, default_value_t = KindArg::Audio)]
        kind: KindArg,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective config with secrets masked
    Show,
    /// Print the config file location
    Path,
    /// Print the config JSON schema
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Audio,
    Video,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Audio => MediaKind::Audio,
            KindArg::Video => MediaKind::Video,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "parivaani=info",
        1 => "parivaani=debug",
        _ => "parivaani=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            parivaani::gateway::run_gateway(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Generate {
            script,
            script_file,
            language,
            voice,
            speed,
            download,
        } => {
            let script = match (script, script_file) {
                (Some(s), _) => s,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => bail!("Provide --script or --script-file"),
            };
            let (baas, user) = connect(&config, cli.email, cli.password).await?;
            generate(&config, baas, &user, &script, &language, &voice, speed, download).await
        }
        Command::Dub {
            video,
            from,
            to,
            voice,
        } => {
            let (baas, user) = connect(&config, cli.email, cli.password).await?;
            dub(&config, baas, &user, &video, &from, &to, &voice).await
        }
        Command::Dashboard => {
            let (baas, user) = connect(&config, cli.email, cli.password).await?;
            show_dashboard(&config, &baas, &user).await
        }
        Command::Download { url, kind } => {
            let kind = MediaKind::from(kind);
            let file_name = filename_from_url(&url, kind);
            save_media(&config, &url, &file_name, kind).await
        }
        Command::Config { action } => {
            match action {
                ConfigAction::Show => print!("{}", config.redacted().to_toml()?),
                ConfigAction::Path => println!("{}", config.config_path.display()),
                ConfigAction::Schema => println!("{}", Config::json_schema()?),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Build the BaaS client and sign in with the CLI credentials.
async fn connect(
    config: &Config,
    email: Option<String>,
    password: Option<String>,
) -> Result<(Arc<BaasClient>, User)> {
    config.require_baas()?;
    let (Some(email), Some(password)) = (email, password) else {
        bail!("Sign in required: pass --email/--password or set PARIVAANI_EMAIL/PARIVAANI_PASSWORD");
    };

    let baas = Arc::new(BaasClient::new(config.baas.clone())?);
    let session = SessionHandle::new(baas.clone());
    let signed_in = session
        .login(email.trim(), &password)
        .await
        .context("Sign in failed")?;
    tracing::debug!(user_id = %signed_in.user.id, "Signed in");
    Ok((baas, signed_in.user))
}

/// Print progress checkpoints until the run reaches a terminal stage.
fn spawn_progress_printer(mut rx: watch::Receiver<Progress>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let progress = rx.borrow_and_update().clone();
            if !progress.label.is_empty() {
                println!("[{:>3}%] {}", progress.percent, progress.label);
            }
            if progress.stage.is_terminal() {
                break;
            }
        }
    })
}

#[allow(clippy::too_many_arguments)]
async fn generate(
    config: &Config,
    baas: Arc<BaasClient>,
    user: &User,
    script: &str,
    language: &str,
    voice: &str,
    speed: Option<f32>,
    download: bool,
) -> Result<ExitCode> {
    // Walk the same wizard the web page uses so validation stays in one place.
    let mut wizard = VoiceWizard::new();
    wizard.set_script(script);
    if !wizard.advance() {
        bail!("Script must not be empty");
    }
    if !wizard.set_language(language) {
        bail!("Unsupported voice language: {language}");
    }
    wizard.advance();
    if !wizard.set_voice(voice) {
        bail!("Unknown voice persona: {voice}");
    }
    wizard.advance();
    if let Some(speed) = speed {
        wizard.set_speed(speed);
    }
    wizard.advance();

    let Some((input, progress)) = wizard.begin_generation(&user.id) else {
        bail!("Voiceover inputs are incomplete");
    };

    let db = open_database(&config.store, &baas)?;
    let workflow = VoiceWorkflow::new(
        baas,
        Collection::voice_generations(db),
        GenerationSettings::from_config(&config.generation),
    );

    let printer = spawn_progress_printer(progress.subscribe());
    let outcome = workflow.run(&input, &progress).await;
    drop(progress);
    let _ = printer.await;
    wizard.finish_generation(outcome);

    let Some(result) = wizard.result().cloned() else {
        let message = wizard
            .notice()
            .map(|n| n.message.clone())
            .unwrap_or_else(|| "Generation failed".into());
        eprintln!("{message}");
        return Ok(ExitCode::FAILURE);
    };

    println!("Translated: {}", result.translated_text);
    println!("Audio:      {}", result.audio_url);
    println!("Duration:   ~{}s", result.estimated_duration_secs);

    if download {
        return save_media(
            config,
            &result.audio_url,
            &result.download_filename,
            MediaKind::Audio,
        )
        .await;
    }
    Ok(ExitCode::SUCCESS)
}

async fn dub(
    config: &Config,
    baas: Arc<BaasClient>,
    user: &User,
    video: &std::path::Path,
    from: &str,
    to: &str,
    voice: &str,
) -> Result<ExitCode> {
    let dubbing_language = |code: &str| {
        LanguageCode::from_str_code(code).filter(|l| l.is_dubbing_language())
    };
    let Some(original) = dubbing_language(from) else {
        bail!("Unsupported original language: {from}");
    };
    let Some(target) = dubbing_language(to) else {
        bail!("Unsupported target language: {to}");
    };
    if original == target {
        bail!("Target language must differ from the original language ({from})");
    }
    if !DUBBING_PERSONA_IDS.contains(&voice) || find_persona(voice).is_none() {
        bail!("Unknown dubbing voice: {voice}");
    }

    let db = open_database(&config.store, &baas)?;
    let workflow = DubbingWorkflow::new(
        baas.clone(),
        baas,
        Collection::video_dubbings(db),
        Arc::new(PassthroughMuxer),
        GenerationSettings::from_config(&config.generation),
    );

    let (progress, rx) = progress_channel();
    let printer = spawn_progress_printer(rx);
    let outcome = workflow
        .run_from_file(&user.id, video, original, target, voice, &progress)
        .await;
    drop(progress);
    let _ = printer.await;

    match outcome {
        Ok((uploaded, output)) => {
            println!("Uploaded:   {} ({})", uploaded.name, uploaded.size_label());
            println!("Original:   {}", output.original_text);
            println!("Translated: {}", output.translated_text);
            println!("Audio:      {}", output.new_audio_url);
            println!("Video:      {}", output.processed_video_url);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Failed to process video: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn show_dashboard(config: &Config, baas: &BaasClient, user: &User) -> Result<ExitCode> {
    let db = open_database(&config.store, baas)?;
    let loader = DashboardLoader::new(db, config.dashboard.page_size);
    let dashboard = loader.load(&user.id, chrono::Utc::now()).await?;

    let stats = &dashboard.stats;
    println!("Total voiceovers:  {}", stats.total_generations);
    println!("This month:        {}", stats.this_month);
    println!("Characters used:   {}", stats.total_characters);
    println!("Favorite language: {}", stats.favorite_language_label());

    println!();
    if dashboard.generations.is_empty() {
        println!("No voiceovers yet.");
    }
    for g in &dashboard.generations {
        println!(
            "{}  {:<10} {:<8} {:.1}x  {} chars  {}",
            g.created_label, g.language_name, g.voice_name, g.speed, g.characters, g.audio_url
        );
    }

    if !dashboard.dubbings.is_empty() {
        println!();
        for d in &dashboard.dubbings {
            println!(
                "{}  {} -> {}  {:<8} {}",
                d.created_label,
                d.original_language_name,
                d.target_language_name,
                d.voice_name,
                d.processed_video_url
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn save_media(config: &Config, url: &str, file_name: &str, kind: MediaKind) -> Result<ExitCode> {
    let directory = expand_path(&config.download.directory)?;
    let downloader = SystemDownloader::new(directory, config.baas.http_timeout_secs)?;
    let outcome = download_with_fallback(&downloader, Some(url), file_name, kind).await;

    let notice = outcome.notice(kind);
    if outcome.is_failure() {
        eprintln!("{notice}");
        Ok(ExitCode::FAILURE)
    } else {
        println!("{notice}");
        Ok(ExitCode::SUCCESS)
    }
}
