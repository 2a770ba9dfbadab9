use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of build_cli() from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
fn build_cli() -> Command {
    Command::new("nyaml")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert NeXus definitions between nyaml and NXDL")
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

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = build_cli();

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "nyaml", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "nyaml", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "nyaml", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
