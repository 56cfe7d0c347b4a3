use clap::{Arg, Command};
use mth::actions;

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() {
    let registry = match actions::registry() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let cmd = registry.to_command(
        Command::new("mth")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Mobile testing helper: automate routine operations on connected Android and iOS devices")
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .global(true)
                    .value_parser(["error", "warn", "info", "debug", "trace"])
                    .default_value("info")
                    .help("Logging verbosity, RUST_LOG takes precedence"),
            ),
    );

    let matches = match cmd.try_get_matches() {
        Ok(matches) => matches,
        Err(err) => {
            use clap::error::ErrorKind;
            // help and version are not failures; everything else is a
            // user-facing error and exits 1
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                err.exit();
            }
            let _ = err.print();
            std::process::exit(1);
        }
    };

    init_logging(
        matches
            .get_one::<String>("log-level")
            .map(String::as_str)
            .unwrap_or("info"),
    );

    let (verb, sub) = matches
        .subcommand()
        .expect("a subcommand is required by the parser");
    if let Err(err) = registry.dispatch(verb, sub).await {
        log::error!("{err}");
        std::process::exit(1);
    }
}
