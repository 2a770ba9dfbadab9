// Command-line interface for nyaml
//
// This binary converts NeXus definitions between nyaml and NXDL. The direction
// is picked from the input file extension; the output lands next to the input
// unless --output-file says otherwise.
//
// Usage:
//  nyaml <input.yaml>                       - Write <input>.nxdl.xml
//  nyaml <input.nxdl.xml>                   - Write <input>_parsed.yaml
//  nyaml <input> --check-consistency        - Also write the conversion back and report differences
//  nyaml <input.nxdl.xml> --do-not-store-nxdl - Do not append the source NXDL to the nyaml output
//
// Configuration is read from the built-in defaults, then nyaml.toml in the working
// directory, then the file given with --config.

use clap::{Arg, ArgAction, Command, ValueHint};
use log::{debug, info, LevelFilter};
use nyaml_babel::consistency::{check_nxdl, check_nyaml, ConsistencyReport};
use nyaml_babel::transforms::{nxdl_to_nyaml, nyaml_to_nxdl};
use nyaml_babel::{ConversionOptions, FormatRegistry};
use nyaml_config::{Loader, NyamlConfig};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const NYAML_EXTENSIONS: &[&str] = &[".yaml", ".yml"];
const NXDL_EXTENSION: &str = ".nxdl.xml";

fn build_cli() -> Command {
    Command::new("nyaml")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert NeXus definitions between nyaml and NXDL")
        .long_about(
            "nyaml converts NeXus definitions between the nyaml notation and NXDL.\n\n\
            The direction follows the input extension:\n  \
            - .yaml / .yml  -> <stem>.nxdl.xml\n  \
            - .nxdl.xml     -> <stem>_parsed.yaml\n\n\
            Examples:\n  \
            nyaml NXmx.yaml                       # Write NXmx.nxdl.xml\n  \
            nyaml NXmx.nxdl.xml                   # Write NXmx_parsed.yaml\n  \
            nyaml NXmx.yaml --check-consistency   # Also write NXmx_consistency.yaml",
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Definition file to convert (.yaml, .yml or .nxdl.xml)")
                .required(true)
                .index(1)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output-file")
                .long("output-file")
                .short('o')
                .value_name("PATH")
                .help("Path to write the converted output")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("check-consistency")
                .long("check-consistency")
                .help("Convert the output back and report differences to the input")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("do-not-store-nxdl")
                .long("do-not-store-nxdl")
                .help("Do not append the source NXDL to generated nyaml")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every processed key")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a nyaml.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let input = matches
        .get_one::<String>("input")
        .expect("input is required");
    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    let mut options = ConversionOptions::from(&config);
    if matches.get_flag("do-not-store-nxdl") {
        options.store_nxdl = false;
    }

    let registry = FormatRegistry::with_options(&options);
    let from = registry
        .detect_format_from_filename(input)
        .unwrap_or_else(|| {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Expected a .yaml, .yml or .nxdl.xml file");
            std::process::exit(1);
        });

    let output = matches.get_one::<String>("output-file").map(PathBuf::from);
    let check = matches.get_flag("check-consistency");
    match from.as_str() {
        "nyaml" => handle_nyaml_input(Path::new(input), output, check, options),
        "nxdl" => handle_nxdl_input(Path::new(input), output, check, &options),
        other => {
            eprintln!("Error: No conversion from format '{other}'");
            std::process::exit(1);
        }
    }
}

/// nyaml → NXDL, keeping the notice of an existing output file
fn handle_nyaml_input(
    input: &Path,
    output: Option<PathBuf>,
    check: bool,
    options: ConversionOptions,
) {
    let source = read_input(input);
    let output = output.unwrap_or_else(|| sibling(input, NYAML_EXTENSIONS, ".nxdl.xml"));
    let options = match fs::read_to_string(&output) {
        Ok(existing) => {
            debug!("Keeping the copyright notice of {}", output.display());
            options.with_existing_output(&existing)
        }
        Err(_) => options,
    };

    if check {
        let report = check_nyaml(&source, &options).unwrap_or_else(|e| fail(e));
        let consistency = sibling(input, NYAML_EXTENSIONS, "_consistency.yaml");
        write_output(&output, &report.converted);
        write_output(&consistency, &report.round_trip);
        report_differences(&report);
    } else {
        let nxdl = nyaml_to_nxdl(&source, &options).unwrap_or_else(|e| fail(e));
        write_output(&output, &nxdl);
    }
    info!("Wrote {}", output.display());
}

/// NXDL → nyaml
fn handle_nxdl_input(
    input: &Path,
    output: Option<PathBuf>,
    check: bool,
    options: &ConversionOptions,
) {
    let source = read_input(input);
    let output = output.unwrap_or_else(|| sibling(input, &[NXDL_EXTENSION], "_parsed.yaml"));

    if check {
        let report = check_nxdl(&source, options).unwrap_or_else(|e| fail(e));
        let consistency = sibling(input, &[NXDL_EXTENSION], "_consistency.nxdl.xml");
        write_output(&output, &report.converted);
        write_output(&consistency, &report.round_trip);
        report_differences(&report);
    } else {
        let yaml = nxdl_to_nyaml(&source, options).unwrap_or_else(|e| fail(e));
        write_output(&output, &yaml);
    }
    info!("Wrote {}", output.display());
}

fn fail(error: impl std::fmt::Display) -> ! {
    eprintln!("Error: {error}");
    std::process::exit(1);
}

fn read_input(input: &Path) -> String {
    fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {e}", input.display());
        std::process::exit(1);
    })
}

/// `input` with one of `extensions` replaced by `suffix`, in the same directory.
fn sibling(input: &Path, extensions: &[&str], suffix: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let stem = extensions
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .unwrap_or(file_name);
    input.with_file_name(format!("{stem}{suffix}"))
}

/// Write through a temporary file in the target directory so a failed run
/// never leaves a truncated output behind.
fn write_output(path: &Path, contents: &str) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let result = tempfile::NamedTempFile::new_in(dir).and_then(|mut file| {
        file.write_all(contents.as_bytes())?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    });
    if let Err(e) = result {
        eprintln!("Error writing file '{}': {e}", path.display());
        std::process::exit(1);
    }
}

fn report_differences(report: &ConsistencyReport) {
    if report.is_consistent() {
        info!("Round trip is consistent");
        return;
    }
    for difference in &report.differences {
        eprintln!("Warning: {difference}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> NyamlConfig {
    let loader = Loader::new().with_optional_file("nyaml.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}
