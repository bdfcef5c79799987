use clap::Parser;
use miette::Result;
use mcp_risk::cli::helpers::{load_engine, resolve_format};
use mcp_risk::cli::{Cli, Commands, GlobalOpts};
use mcp_risk::core::Config;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(&global);

    let config = Config::load();
    let format = resolve_format(&global, &config);

    match cli.command {
        Commands::Calculate(args) => {
            let engine = load_engine(&global, &config)?;
            mcp_risk::cli::commands::calculate::run(args, &engine, format, &global)
        }
        Commands::Lookup(args) => {
            let engine = load_engine(&global, &config)?;
            mcp_risk::cli::commands::lookup::run(args, &engine, format)
        }
        Commands::Countries(args) => {
            let engine = load_engine(&global, &config)?;
            mcp_risk::cli::commands::countries::run(args, &engine, format)
        }
        Commands::Weights(args) => mcp_risk::cli::commands::weights::run(args, format),
        Commands::Completions(args) => mcp_risk::cli::commands::completions::run(args),
    }
}

/// Log to stderr; RUST_LOG overrides the level picked from -q/-v
fn init_tracing(global: &GlobalOpts) {
    let default_level = if global.verbose {
        "mcp_risk=debug"
    } else if global.quiet {
        "mcp_risk=error"
    } else {
        "mcp_risk=warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
