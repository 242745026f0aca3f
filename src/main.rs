use log::LevelFilter;
use pitwall::build_info;
use pitwall::drivers::DriverRegistry;
use pitwall::logging;
use std::process;

#[derive(Debug, Default, PartialEq)]
struct Options {
    /// `Some(None)` serves on the configured port
    serve_port: Option<Option<u16>>,
    grid_path: Option<String>,
    show_version: bool,
    show_help: bool,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'pitwall --help' for usage.");
            process::exit(1);
        }
    };

    if options.show_version {
        println!("{}", build_info::version_string("pitwall"));
        process::exit(0);
    }
    if options.show_help {
        print_help();
        process::exit(0);
    }

    let Options {
        serve_port,
        grid_path,
        ..
    } = options;

    let Some(port) = serve_port else {
        print_help();
        process::exit(1);
    };

    if let Err(e) = logging::setup_logging(logging::level_from_env(LevelFilter::Info)) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let registry = match grid_path {
        Some(path) => match DriverRegistry::load(&path) {
            Ok(registry) => registry,
            Err(e) => {
                log::error!("{}", e);
                process::exit(1);
            }
        },
        None => DriverRegistry::default_grid(),
    };

    serve(registry, port);
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--serve" => options.serve_port = Some(None),
            arg if arg.starts_with("--serve=") => {
                let value = &arg["--serve=".len()..];
                let port = value
                    .parse()
                    .map_err(|_| format!("Invalid port: {}", value))?;
                options.serve_port = Some(Some(port));
            }
            "--grid" => {
                let path = args
                    .get(i + 1)
                    .filter(|value| !value.starts_with("--"))
                    .ok_or_else(|| "Missing value for --grid".to_string())?;
                options.grid_path = Some(path.clone());
                i += 1;
            }
            "--version" | "-V" => options.show_version = true,
            "--help" | "-h" => options.show_help = true,
            other => return Err(format!("Unknown command: {}", other)),
        }
        i += 1;
    }

    Ok(options)
}

#[cfg(feature = "web")]
fn serve(registry: DriverRegistry, port: Option<u16>) {
    use pitwall::web::{start_web_server, ServerConfig, WebServer};
    use std::sync::Arc;

    let mut config = ServerConfig::from_env();
    if let Some(port) = port {
        config.port = port;
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Failed to start runtime: {}", e);
            process::exit(1);
        }
    };

    let server = Arc::new(WebServer::new(registry, config));
    log::info!(
        "{} serving up to {} simulations per request",
        build_info::version_string("pitwall"),
        server.config().max_simulations
    );
    if let Err(e) = runtime.block_on(start_web_server(server)) {
        log::error!("Web server error: {}", e);
        process::exit(1);
    }
}

#[cfg(not(feature = "web"))]
fn serve(_registry: DriverRegistry, _port: Option<u16>) {
    log::error!("Built without the 'web' feature; rebuild with --features web");
    process::exit(1);
}

fn print_help() {
    println!("Pitwall - Race finishing position simulator\n");
    println!("Usage: pitwall --serve[=PORT] [--grid FILE]\n");
    println!("Options:");
    println!("  --serve[=PORT]  Start the web server (PORT env var, else 5000)");
    println!("  --grid FILE     Load the driver grid from a JSON file");
    println!("  --version       Show version information");
    println!("  --help          Show this help message");
    println!();
    println!("For command-line runs use the 'simulate' binary.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("pitwall")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_serve_and_grid() {
        let options = parse_args(&args(&["--serve=8080", "--grid", "grid.json"])).unwrap();
        assert_eq!(options.serve_port, Some(Some(8080)));
        assert_eq!(options.grid_path.as_deref(), Some("grid.json"));

        let options = parse_args(&args(&["--serve"])).unwrap();
        assert_eq!(options.serve_port, Some(None));
        assert_eq!(options.grid_path, None);
    }

    #[test]
    fn test_grid_without_value_is_an_error() {
        let err = parse_args(&args(&["--serve", "--grid"])).unwrap_err();
        assert_eq!(err, "Missing value for --grid");

        let err = parse_args(&args(&["--grid", "--serve"])).unwrap_err();
        assert_eq!(err, "Missing value for --grid");
    }

    #[test]
    fn test_bad_port_and_unknown_flag() {
        assert!(parse_args(&args(&["--serve=http"])).is_err());
        assert!(parse_args(&args(&["--serve=70000"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }
}
