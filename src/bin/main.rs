//! Sprite Unpacker CLI
//!
//! Extract sprites from spritesheets described by plist atlases.

use clap::{Parser, Subcommand};
use image::RgbaImage;
use plist::Value;
use sprite_unpacker::output::{
    alias_file_name, prepare_dir, resolve_output_file, sanitize_path_input, write_sprite,
    write_text,
};
use sprite_unpacker::settings::{settings_file, Settings};
use sprite_unpacker::{
    atlas::loader, load_atlas, load_texture, Atlas, BatchExtractor, ExtractMode, Extractor,
    ProgressStep, SpriteSink,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "sprite-unpacker")]
#[command(author, version, about = "Extract sprites from plist spritesheets", long_about = None)]
struct Cli {
    /// Directory atlases and spritesheets are read from (overrides the settings file)
    #[arg(long, global = true)]
    resource_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the packing info of one sprite
    Info {
        /// Atlas document, relative to the resource path
        plist: String,

        /// Sprite name or alias
        keyword: String,
    },

    /// Save the atlas as indented JSON
    Json {
        /// Atlas document, relative to the resource path
        plist: String,

        /// Output file (ending in .json) or directory
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Save a single sprite
    Save {
        /// Atlas document, relative to the resource path
        plist: String,

        /// Sprite name or alias
        keyword: String,

        /// Output file (ending in .png) or directory
        #[arg(short, long)]
        output: Option<String>,

        /// Skip padding the sprite to its original canvas
        #[arg(long)]
        compressed: bool,
    },

    /// Save every sprite of the spritesheet
    Unpack {
        /// Atlas document, relative to the resource path
        plist: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("ERROR {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let resource_path = match cli.resource_path {
        Some(path) => path,
        None => Settings::load_or_init(settings_file()?)?.resource_path,
    };

    match cli.command {
        Commands::Info { plist, keyword } => {
            let document = loader::load_document(existing_document(&resource_path, &plist)?)?;
            let atlas = loader::from_document(&document)?;
            let (name, _) = atlas.resolve(&keyword)?;
            for line in frame_info_lines(&loader::frame_fields(&document, name)?) {
                println!("{}", line);
            }
        }
        Commands::Json { plist, output } => {
            let atlas = open_atlas(&resource_path, &plist)?;
            let default_name = format!("{}.json", file_stem(&plist));
            let path = resolve_output_file(
                &std::env::current_dir()?,
                output.as_deref(),
                "json",
                &default_name,
            );

            write_text(&path, &loader::to_json(&atlas)?)?;
            println!("JSON file written to {}.", path.display());
        }
        Commands::Save {
            plist,
            keyword,
            output,
            compressed,
        } => {
            let atlas = open_atlas(&resource_path, &plist)?;
            let (name, frame) = atlas.resolve(&keyword)?;
            let path = resolve_output_file(
                &std::env::current_dir()?,
                output.as_deref(),
                "png",
                &keyword,
            );

            let sheet = load_texture(resource_path.join(atlas.texture_file_name()?))?;
            let mode = if compressed {
                ExtractMode::Compressed
            } else {
                ExtractMode::Padded
            };
            let sprite = Extractor::new(&atlas, &sheet).extract_frame(name, frame, mode)?;

            write_sprite(&path, &sprite)?;
            println!("Sprite written to {}.", path.display());
        }
        Commands::Unpack { plist, output } => {
            let atlas = open_atlas(&resource_path, &plist)?;
            let texture_name = atlas.texture_file_name()?;
            let cwd = std::env::current_dir()?;
            let out_dir = match output {
                Some(output) => cwd.join(sanitize_path_input(&output)),
                None => cwd.join(file_stem(texture_name)),
            };

            prepare_dir(&out_dir)?;
            println!("Output directory: {}", out_dir.display());

            let sheet = load_texture(resource_path.join(texture_name))?;
            let mut progress = TerminalProgress::new(&atlas, out_dir.clone());
            let summary = BatchExtractor::new(&atlas, &sheet).run(&mut progress)?;

            progress.finish(summary.extracted);
        }
    }

    Ok(())
}

fn existing_document(
    resource_path: &Path,
    plist: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = resource_path.join(plist);
    if !path.is_file() {
        return Err(format!("Nonexistent PLIST document: {}", path.display()).into());
    }
    Ok(path)
}

fn open_atlas(resource_path: &Path, plist: &str) -> Result<Atlas, Box<dyn std::error::Error>> {
    Ok(load_atlas(existing_document(resource_path, plist)?)?)
}

/// File name without its last extension.
fn file_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

/// Frame fields as `Title Case Label: value` lines, in document order.
fn frame_info_lines(fields: &[(&str, &Value)]) -> Vec<String> {
    fields
        .iter()
        .map(|(key, value)| format!("{}: {}", field_label(key), field_text(value)))
        .collect()
}

/// `spriteSourceSize` -> `Sprite Source Size`
fn field_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
            continue;
        }
        if i > 1 && c.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(c);
    }
    label
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Boolean(true) => "Yes".to_string(),
        Value::Boolean(false) => "No".to_string(),
        Value::String(text) => text.clone(),
        Value::Integer(number) => number.to_string(),
        Value::Real(number) => number.to_string(),
        Value::Date(date) => date.to_xml_format(),
        Value::Uid(uid) => uid.get().to_string(),
        Value::Data(bytes) => format!("<{} bytes>", bytes.len()),
        _ => String::new(),
    }
}

/// Format seconds as `HH:MM:SS`, or as `1h 2m 3s` when `colon` is false.
fn format_seconds(secs: u64, colon: bool) -> String {
    let hours = secs / 3600;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;

    if colon {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        let mut text = String::new();
        if hours != 0 {
            text.push_str(&format!("{}h ", hours));
        }
        if minutes != 0 {
            text.push_str(&format!("{}m ", minutes));
        }
        text.push_str(&format!("{}s", seconds));
        text
    }
}

/// Replace the current terminal line with `text`.
fn log_line(text: &str) {
    let mut stdout = std::io::stdout();
    let _ = write!(stdout, "\u{1b}[2K{}\u{1b}[G", text);
    let _ = stdout.flush();
}

/// Calls `tick` every `period` on a background thread until dropped.
struct Ticker {
    stop: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    fn spawn<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            while let Err(RecvTimeoutError::Timeout) = stopped.recv_timeout(period) {
                tick();
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        let _ = self.stop.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Redraw the progress line with the current elapsed time.
///
/// The lock is held while writing so sprite updates and clock ticks never
/// interleave on the terminal.
fn redraw(line: &Mutex<String>, started: Instant) {
    if let Ok(line) = line.lock() {
        if !line.is_empty() {
            log_line(&format!(
                "{} {}",
                line,
                format_seconds(started.elapsed().as_secs(), true)
            ));
        }
    }
}

/// Writes each sprite (and its aliases) to disk while keeping a single
/// progress line up to date. The elapsed clock ticks once per second even
/// while a sprite is being written.
struct TerminalProgress {
    out_dir: PathBuf,
    longest: usize,
    started: Instant,
    line: Arc<Mutex<String>>,
    ticker: Ticker,
}

impl TerminalProgress {
    fn new(atlas: &Atlas, out_dir: PathBuf) -> Self {
        let started = Instant::now();
        let line = Arc::new(Mutex::new(String::new()));
        let ticker = {
            let line = Arc::clone(&line);
            Ticker::spawn(Duration::from_secs(1), move || redraw(&line, started))
        };

        Self {
            out_dir,
            longest: atlas.longest_name_len(),
            started,
            line,
            ticker,
        }
    }

    fn finish(self, saved: usize) {
        drop(self.ticker);

        let text = format!(
            "Finished saving {} sprites to {} in {}.",
            saved,
            self.out_dir.display(),
            format_seconds(self.started.elapsed().as_secs(), false)
        );
        log_line(&format!("{:<width$}", text, width = 53 + self.longest));
        println!();
    }
}

impl SpriteSink for TerminalProgress {
    fn on_sprite(
        &mut self,
        step: &ProgressStep<'_>,
        sprite: RgbaImage,
    ) -> sprite_unpacker::Result<()> {
        let counter = format!("{}/{}", step.index, step.total);
        let line = format!(
            "{:<longest$} (x: {:>4}, y: {:>4}, w: {:>4}, h: {:>4}) {:>count$}",
            step.frame_name,
            step.rect.x,
            step.rect.y,
            step.rect.w,
            step.rect.h,
            counter,
            longest = self.longest,
            count = step.total.to_string().len() * 2 + 1,
        );
        if let Ok(mut current) = self.line.lock() {
            *current = line;
        }
        redraw(&self.line, self.started);

        for alias in &step.frame.aliases {
            write_sprite(&self.out_dir.join(alias_file_name(alias)), &sprite)?;
        }
        write_sprite(&self.out_dir.join(step.frame_name), &sprite)
    }
}
