use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use vaultgal::editing::{EditSpec, FilterKind};
use vaultgal::frame::FfmpegFrameSource;
use vaultgal::library::Library;
use vaultgal::session::Session;
use vaultgal::storage::{HttpStore, Storage};
use vaultgal::vault::{self, VaultFlow};
use vaultgal::{config, output, upload};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "vaultgal")]
#[command(about = "Client for a personal photo/video gallery with a PIN-locked vault")]
#[command(long_about = "\
Client for a personal photo/video gallery with a PIN-locked vault

The storage service owns persistence, identity validation, and PIN
verification; vaultgal uploads media, organizes albums, renders photo
edits, and gates vault access on the service's answers.

Uploads classify each file as photo or video, derive a 300px thumbnail
(photos from the decoded frame, videos from the frame at 1 second of
playback via ffmpeg), and persist each file as its own asset — one bad
file never aborts the batch. Edits are always saved as new copies; the
original asset is never overwritten.

Vault access is session-scoped: unlocking lasts for one invocation and
is never written to disk.

Run 'vaultgal gen-config' to generate a documented vaultgal.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Path to the client configuration file
    #[arg(long, default_value = "vaultgal.toml", global = true)]
    config: PathBuf,

    /// Override the storage service URL from the config file
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// Override the identity principal from the config file
    #[arg(long, global = true)]
    identity: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload photos and videos (directories are expanded recursively)
    Upload {
        /// Files or directories to upload
        paths: Vec<PathBuf>,
    },
    /// List media visible to this session
    List {
        /// Show only the first N pages of 50 items
        #[arg(long)]
        pages: Option<usize>,
    },
    /// Album operations
    Album {
        #[command(subcommand)]
        command: AlbumCommand,
    },
    /// Vault operations
    Vault {
        #[command(subcommand)]
        command: VaultCommand,
    },
    /// Render an edited copy of a photo and store it as a new asset
    Edit {
        /// Identifier of the photo to edit
        id: String,
        /// Brightness percentage (0-200, 100 = neutral)
        #[arg(long, default_value_t = 100)]
        brightness: u32,
        /// Contrast percentage (0-200, 100 = neutral)
        #[arg(long, default_value_t = 100)]
        contrast: u32,
        /// Rotation in degrees (0-360)
        #[arg(long, default_value_t = 0.0)]
        rotation: f64,
        /// Filter: none, grayscale, sepia, or vivid
        #[arg(long, default_value = "none")]
        filter: String,
    },
    /// Print a stock vaultgal.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum AlbumCommand {
    /// Create an empty album
    Add { name: String },
    /// List all albums
    List,
    /// Show one album with its member identifiers
    Show { id: String },
    /// Persist a new album order
    Reorder { ids: Vec<String> },
}

#[derive(Subcommand)]
enum VaultCommand {
    /// Show vault status and the next step
    Status,
    /// Set a vault PIN (digits only, minimum 4, confirmed)
    Setup { pin: String, confirm: String },
    /// Attempt to unlock the vault for this invocation
    Unlock { pin: String },
    /// Unlock and list the locked items
    Show { pin: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut config = config::load(&cli.config)?;
    if let Some(url) = cli.service_url {
        config.service_url = url;
    }
    if let Some(identity) = cli.identity {
        config.identity = Some(identity);
    }

    let mut session = match &config.identity {
        Some(principal) => Session::authenticated(principal),
        None => Session::anonymous(),
    };
    let frames = FfmpegFrameSource::new(&config.ffmpeg_bin);
    let mut library = Library::new(HttpStore::new(&config.service_url));

    match cli.command {
        Command::Upload { paths } => {
            let files = upload::expand_paths(&paths)?;
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_upload_event(&event);
                }
            });
            let result =
                upload::upload_batch(&mut library, &frames, &session, &files, Some(&tx)).await;
            drop(tx);
            printer.join().expect("printer thread panicked");
            result?;
        }
        Command::List { pages } => {
            let items = match pages {
                Some(pages) => library.page(&session, pages).await?,
                None => library.visible_media(&session).await?,
            };
            output::print_lines(&output::format_media_list(&items));
        }
        Command::Album { command } => match command {
            AlbumCommand::Add { name } => {
                let album = library.add_album(&session, &name).await?;
                println!("Created album {} ({})", album.name, album.identifier);
            }
            AlbumCommand::List => {
                let albums = library.all_albums(&session).await?;
                output::print_lines(&output::format_album_list(albums));
            }
            AlbumCommand::Show { id } => match library.album(&session, &id).await? {
                Some(album) => output::print_lines(&output::format_album(&album)),
                None => println!("No album with identifier {id}"),
            },
            AlbumCommand::Reorder { ids } => {
                library.reorder_albums(&session, &ids).await?;
                println!("Reordered {} albums", ids.len());
            }
        },
        Command::Vault { command } => match command {
            VaultCommand::Status => {
                let status = library.store().get_vault_status(&session).await?;
                output::print_lines(&output::format_vault_status(&status));
            }
            VaultCommand::Setup { pin, confirm } => {
                vault::set_up_pin(library.store(), &session, &pin, &confirm).await?;
                println!("Vault PIN set");
            }
            VaultCommand::Unlock { pin } => {
                if unlock_with_gate(&library, &mut session, &pin).await? {
                    println!("Vault unlocked for this session");
                }
            }
            VaultCommand::Show { pin } => {
                if unlock_with_gate(&library, &mut session, &pin).await? {
                    let locked = library.locked_media(&session).await?;
                    output::print_lines(&output::format_media_list(&locked));
                }
            }
        },
        Command::Edit {
            id,
            brightness,
            contrast,
            rotation,
            filter,
        } => {
            let filter = FilterKind::from_str(&filter)?;
            let spec = EditSpec::new(brightness, contrast, rotation, filter);
            let copy = library
                .save_edited_copy(&session, &id, &spec, &mut |_| {})
                .await?;
            println!("Saved edited copy {} ({})", copy.title, copy.identifier);
        }
        Command::GenConfig => unreachable!("handled before config load"),
    }

    Ok(())
}

/// Unlock the vault, presenting the setup flow when no PIN exists yet.
///
/// Returns whether the session is now unlocked.
async fn unlock_with_gate<S: Storage>(
    library: &Library<S>,
    session: &mut Session,
    pin: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let status = library.store().get_vault_status(session).await?;
    if vault::required_flow(&status) == VaultFlow::Setup {
        println!("No vault PIN is set yet.");
        println!("Run 'vaultgal vault setup <pin> <confirm>' first.");
        return Ok(false);
    }
    if vault::unlock(library.store(), session, pin).await? {
        Ok(true)
    } else {
        println!("Incorrect PIN");
        Ok(false)
    }
}
