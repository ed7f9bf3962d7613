mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use pwsmith::config::{
    DEFAULT_COUNT, DEFAULT_HISTORY_FILE, DEFAULT_LENGTH, GenerationConfig, HistoryConfig,
    MAX_HISTORY,
};
use pwsmith::{Category, ChaChaSource, HistoryEntry, HistoryStore, entropy, generator};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pwsmith",
    version,
    author,
    about = "Generate random passwords and keep a short history of saved ones"
)]
struct Cli {
    /// Password length
    #[arg(short, long, default_value_t = DEFAULT_LENGTH)]
    length: usize,

    /// Don't include uppercase letters
    #[arg(long)]
    no_uppercase: bool,

    /// Don't include lowercase letters
    #[arg(long)]
    no_lowercase: bool,

    /// Don't include digits
    #[arg(long)]
    no_digits: bool,

    /// Don't include symbols
    #[arg(long)]
    no_symbols: bool,

    /// Don't include similar characters (Il1O0o)
    #[arg(long)]
    no_similar: bool,

    /// Characters to exclude from the password
    #[arg(short, long, default_value = "")]
    exclude: String,

    /// Number of passwords to generate
    #[arg(short, long, default_value_t = DEFAULT_COUNT)]
    count: usize,

    /// Save the generated passwords to history
    #[arg(short, long)]
    save: bool,

    /// Description stored with saved passwords
    #[arg(short, long, default_value = "")]
    description: String,

    /// Show password generation history and exit
    #[arg(long)]
    history: bool,

    /// History file
    #[arg(long, env = "PWSMITH_HISTORY_FILE", default_value = DEFAULT_HISTORY_FILE)]
    history_file: PathBuf,

    /// Print only the passwords
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn generation_config(&self) -> GenerationConfig {
        let mut config = GenerationConfig {
            exclude_similar: self.no_similar,
            ..GenerationConfig::default()
        }
        .with_length(self.length)
        .exclude(&self.exclude);

        let disabled = [
            (self.no_uppercase, Category::Upper),
            (self.no_lowercase, Category::Lower),
            (self.no_digits, Category::Digit),
            (self.no_symbols, Category::Symbol),
        ];
        for (off, category) in disabled {
            if off {
                config = config.without(category);
            }
        }

        config
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet,
    };

    let store = HistoryStore::new(HistoryConfig {
        path: cli.history_file.clone(),
        max_entries: MAX_HISTORY,
    });

    if cli.history {
        let snapshot = store.load()?;
        if let Some(corruption) = &snapshot.corruption {
            ui::report_corruption(corruption, &options);
        }
        print!("{}", snapshot.render());
        return Ok(());
    }

    let config = cli.generation_config();
    let description = if cli.save {
        ui::normalize_description(&cli.description)?
    } else {
        String::new()
    };

    let mut rng = ChaChaSource::from_entropy();

    for i in 0..cli.count {
        let password = match generator::generate(&config, &mut rng) {
            Ok(password) => password,
            Err(err) => {
                ui::report_config_error(&err, &options);
                break;
            }
        };

        let assessment = entropy::assess(&password);
        ui::display_password(i + 1, &password, &assessment, &options);

        if i + 1 < cli.count {
            ui::display_separator(&options);
        }

        if cli.save {
            let snapshot = store
                .append(HistoryEntry::new(&password, &description, assessment))
                .with_context(|| format!("Failed to save password #{}", i + 1))?;
            if let Some(corruption) = &snapshot.corruption {
                ui::report_corruption(corruption, &options);
            }
        }
    }

    Ok(())
}
