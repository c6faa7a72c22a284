//! taxbot - terminal tax calculation chatbot

mod config;
mod ui;

use clap::Parser;
use taxbot_chat::{Conversation, Sender};
use taxbot_client::{HttpTransport, TaxTransport};
use taxbot_tui::Theme;

/// taxbot - estimate your tax from your income and country
#[derive(Parser, Debug)]
#[command(name = "taxbot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tax calculation endpoint (overrides TAX_API_URL and the config file)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Color theme (dark, light)
    #[arg(long)]
    theme: Option<String>,

    /// Disable TUI mode (use simple stdin/stdout)
    #[arg(long)]
    no_tui: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("taxbot=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let cfg = config::Config::load();

    // CLI args take precedence over the config file
    let endpoint = cfg.resolve_endpoint(args.endpoint.as_deref());
    let theme = match args.theme.or(cfg.theme.clone()) {
        Some(name) => Theme::from_name(&name)
            .ok_or_else(|| anyhow::anyhow!("Unknown theme '{}' (expected dark or light)", name))?,
        None => Theme::default(),
    };
    let use_tui = !args.no_tui && cfg.tui.unwrap_or(true);

    let transport = HttpTransport::new(&endpoint)?;
    tracing::debug!(endpoint = transport.endpoint(), use_tui, "starting taxbot");

    let mut conversation = Conversation::new();

    if use_tui {
        return ui::run_tui(&mut conversation, &transport, transport.endpoint(), theme).await;
    }

    run_interactive(&mut conversation, &transport).await
}

/// Line-oriented mode: one answer per line on stdin, bot replies on stdout
async fn run_interactive(
    conversation: &mut Conversation,
    transport: &dyn TaxTransport,
) -> anyhow::Result<()> {
    use std::io::{self, Write};

    for message in conversation.messages() {
        println!("{}", message.text());
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            // EOF
            break;
        }
        let input = line.trim_end_matches(['\r', '\n']);

        let before = conversation.messages().len();
        conversation.send(transport, input).await;

        for message in conversation.messages().iter().skip(before) {
            if message.sender() == Sender::Bot {
                println!("{}", message.text());
            }
        }
    }

    Ok(())
}
