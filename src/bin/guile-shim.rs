use guile_shim::codegen;
use guile_shim::logging::{self, log_codegen, log_config};
use guile_shim::registry::{self, exported_symbols, PRIMITIVES};
use guile_shim::ShimConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    EmitC,
    EmitHeader,
    Show(String),
    Check,
}

#[derive(Debug)]
struct Args {
    command: Command,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    json: bool,
}

impl Args {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let prog = args.first().map(String::as_str).unwrap_or("guile-shim");

        let mut command = None;
        let mut config = None;
        let mut out = None;
        let mut json = false;

        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" => return Err(Self::usage(prog)),
                "--json" => json = true,
                "--config" => {
                    let path = iter.next().ok_or("--config needs a file")?;
                    config = Some(PathBuf::from(path));
                }
                "--out" | "-o" => {
                    let path = iter.next().ok_or("--out needs a file")?;
                    out = Some(PathBuf::from(path));
                }
                "list" => command = Some(Command::List),
                "emit-c" => command = Some(Command::EmitC),
                "emit-header" => command = Some(Command::EmitHeader),
                "check" => command = Some(Command::Check),
                "show" => {
                    let name = iter.next().ok_or("show needs a primitive name")?;
                    command = Some(Command::Show(name.clone()));
                }
                other => {
                    return Err(format!("Unknown argument: {}\n\n{}", other, Self::usage(prog)))
                }
            }
        }

        let command = command.ok_or_else(|| Self::usage(prog))?;
        Ok(Self { command, config, out, json })
    }

    fn usage(prog: &str) -> String {
        format!(
            "guile-shim - addressable proxies for Guile's macro primitives\n\n\
            USAGE:\n    {} [OPTIONS] <COMMAND>\n\n\
            COMMANDS:\n    \
            list            Print the primitive registry\n    \
            emit-c          Print the C proxy translation unit\n    \
            emit-header     Print the proxy header\n    \
            show NAME       Print one primitive and its C proxy\n    \
            check           Validate the registry and configuration\n\n\
            OPTIONS:\n    \
            -h, --help      Print help information\n    \
            --config FILE   Use FILE instead of discovering guile-shim.toml\n    \
            -o, --out FILE  Write output to FILE instead of stdout\n    \
            --json          Print the registry as JSON (list)",
            prog
        )
    }
}

fn load_config(args: &Args) -> guile_shim::Result<ShimConfig> {
    let mut config = match &args.config {
        Some(path) => ShimConfig::load(path)?,
        None => ShimConfig::discover(&std::env::current_dir()?)?,
    };
    config.apply_env(|key| std::env::var(key).ok());

    let dir = args
        .config
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    log_config(&dir, &config.guile.library());
    Ok(config)
}

fn render_list(json: bool) -> Result<String, serde_json::Error> {
    if json {
        let entries: Vec<serde_json::Value> = PRIMITIVES
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "symbol": p.symbol(),
                    "method": p.method,
                    "arity": p.arity(),
                    "args": p.args.iter().map(|k| k.name()).collect::<Vec<_>>(),
                    "returns": p.ret.name(),
                })
            })
            .collect();
        return serde_json::to_string_pretty(&entries);
    }

    let mut out = String::new();
    for p in PRIMITIVES {
        out.push_str(&format!("{:<24} {}  {}\n", p.name, p.arity(), p.signature()));
    }
    Ok(out)
}

fn render_show(name: &str) -> guile_shim::Result<String> {
    let p = registry::lookup(name)?;
    Ok(format!(
        "name:      {}\nsymbol:    {}\nmethod:    {}\nsignature: {}\n\n{}",
        p.name,
        p.symbol(),
        p.method,
        p.signature(),
        codegen::definition(p)
    ))
}

fn write_output(out: Option<&Path>, text: &str) -> std::io::Result<()> {
    match out {
        Some(path) => {
            fs::write(path, text)?;
            log_codegen(path, PRIMITIVES.len());
            Ok(())
        }
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = logging::init();

    let args = match Args::from_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    debug!(command = ?args.command, "guile-shim starting");

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let text = match &args.command {
        Command::List => render_list(args.json)?,
        Command::EmitC => codegen::emit_source(PRIMITIVES),
        Command::EmitHeader => codegen::emit_header(PRIMITIVES, &config.codegen),
        Command::Show(name) => match render_show(name) {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Lookup failed");
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Command::Check => {
            if let Err(e) = registry::validate(PRIMITIVES) {
                error!(error = %e, "Registry is invalid");
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            info!(symbols = exported_symbols().len(), "Registry is valid");
            format!(
                "ok: {} proxies, {} exported symbols, links {}\n",
                PRIMITIVES.len(),
                exported_symbols().len(),
                config.guile.library()
            )
        }
    };

    write_output(args.out.as_deref(), &text)?;
    Ok(())
}
