use clap::Parser;
use miette::Result;
use dxb::cli::{Cli, Commands};
use dxb::core::Config;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for diagnostics
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

    // RUST_LOG wins over -q/-v
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(global.log_level()))
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();

    let config = Config::load();

    match cli.command {
        Commands::Tx(args) => dxb::cli::commands::tx::run(args, &global, &config),
        Commands::Property(args) => dxb::cli::commands::property::run(args, &global, &config),
        Commands::Stats(cmd) => dxb::cli::commands::stats::run(cmd, &global, &config),
        Commands::Search(args) => dxb::cli::commands::search::run(args, &global, &config),
        Commands::Resolve(cmd) => dxb::cli::commands::resolve::run(cmd, &global, &config),
        Commands::Status(args) => dxb::cli::commands::status::run(args, &global, &config),
        Commands::Completions(args) => dxb::cli::commands::completions::run(args),
    }
}
