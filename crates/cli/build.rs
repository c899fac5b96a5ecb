use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("rovat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build a weekly news digest from article URLs")
        .arg(clap::arg!(<INPUT> ... "Article URLs or local HTML files; '-' reads URLs from stdin"))
        .arg(clap::arg!(-r --rovat <ROVAT> "Rovat (section) label shown in the digest header").default_value("Hírek"))
        .arg(clap::arg!(-w --week <WEEK> "Week label shown under the header"))
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (markdown, json, text)")
                .value_name("FORMAT")
                .default_value("markdown")
                .value_parser(["markdown", "json", "text"]),
        )
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--frontmatter "Include TOML frontmatter (Markdown only)"))
        .arg(clap::arg!(--pretty "Pretty-print JSON output"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("25"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(--concurrency <NUM> "Maximum number of articles fetched at once").default_value("8"))
        .arg(
            clap::arg!(--"junk-patterns" <FILE> "Junk pattern file replacing the bundled list")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(--"config-dir" <DIR> "Directory of site rule files")
                .value_name("DIR")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "rovat", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "rovat", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "rovat", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "rovat", &completions_dir).unwrap();

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
