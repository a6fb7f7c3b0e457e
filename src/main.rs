// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Command line frontend. */

use {
    clap::{App, Arg},
    std::path::PathBuf,
    wininstaller::{
        error::{InstallerError, Result},
        info::{pkginfo_pairs, query_field},
        inspect_package,
        install::run_install,
        logging::default_logger,
        options::{InstallOptions, Verbosity},
        plist::{plist_string_array, plist_string_dict},
        volumes::{list_volumes, INSTALL_DOMAINS},
        TOOL_VERSION,
    },
};

const LONG_ABOUT: &str = "\
Install a package archive onto this machine.

The --pkg argument names a .zip (native) or .nupkg (Chocolatey-style)
archive. The archive is extracted to a temporary scratch directory,
optional pre- and post-install scripts run from there, and any payload
is mirrored into the location resolved from --target and the package
metadata.

Each invocation is self-contained: no package database is kept and
nothing is downloaded. The --allowUntrusted flag is accepted for
compatibility and reserved; no signature verification is performed.
";

fn parse_options(matches: &clap::ArgMatches) -> InstallOptions {
    let verbosity = if matches.is_present("dumplog") {
        Verbosity::DumpLog
    } else if matches.is_present("verboseR") {
        Verbosity::VerboseR
    } else if matches.is_present("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Quiet
    };

    InstallOptions {
        package: matches.value_of("pkg").map(PathBuf::from),
        target: matches
            .value_of("target")
            .unwrap_or("/")
            .to_string(),
        pkginfo: matches.is_present("pkginfo"),
        dominfo: matches.is_present("dominfo"),
        volinfo: matches.is_present("volinfo"),
        query: matches.value_of("query").map(|s| s.to_string()),
        plist: matches.is_present("plist"),
        allow_untrusted: matches.is_present("allowUntrusted"),
        verbosity,
    }
}

fn print_config(options: &InstallOptions) {
    println!(
        "pkg = {}",
        options
            .package
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    );
    println!("target = {}", options.target);
    println!("pkginfo = {}", options.pkginfo);
    println!("dominfo = {}", options.dominfo);
    println!("volinfo = {}", options.volinfo);
    println!(
        "query = {}",
        options.query.as_deref().unwrap_or_default()
    );
    println!("plist = {}", options.plist);
    println!("allowUntrusted = {}", options.allow_untrusted);
    println!("verbosity = {}", options.verbosity);
}

fn main_impl(logger: &slog::Logger) -> Result<()> {
    let matches = App::new("installer")
        .version(TOOL_VERSION)
        .about("System software installer for Windows")
        .long_about(LONG_ABOUT)
        .arg(
            Arg::with_name("pkg")
                .long("pkg")
                .takes_value(true)
                .value_name("PATH")
                .help("Path to the package archive (.zip or .nupkg)"),
        )
        .arg(
            Arg::with_name("target")
                .long("target")
                .takes_value(true)
                .value_name("SPEC")
                .default_value("/")
                .help("Install target root (/, a drive letter, /Volumes/<name>, CurrentUserHomeDirectory, or an absolute path)"),
        )
        .arg(
            Arg::with_name("pkginfo")
                .long("pkginfo")
                .help("Print a metadata summary for the archive and exit"),
        )
        .arg(
            Arg::with_name("dominfo")
                .long("dominfo")
                .help("Print the list of installation domains"),
        )
        .arg(
            Arg::with_name("volinfo")
                .long("volinfo")
                .help("Print available filesystem volumes with sizes"),
        )
        .arg(
            Arg::with_name("query")
                .long("query")
                .takes_value(true)
                .value_name("FIELD")
                .help("Print one metadata field: name, version, description, author, license, RestartAction"),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .help("Announce lifecycle steps"),
        )
        .arg(
            Arg::with_name("verboseR")
                .long("verboseR")
                .help("Echo script output as it arrives"),
        )
        .arg(
            Arg::with_name("dumplog")
                .long("dumplog")
                .help("Echo script output and dump the collected log"),
        )
        .arg(
            Arg::with_name("plist")
                .long("plist")
                .help("Frame informational output as an XML property list"),
        )
        .arg(
            Arg::with_name("allowUntrusted")
                .long("allowUntrusted")
                .help("Accepted and ignored; reserved for signature verification"),
        )
        .arg(
            Arg::with_name("vers")
                .long("vers")
                .help("Print the tool version"),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .help("Echo the parsed options"),
        )
        .get_matches();

    if matches.is_present("vers") {
        println!("{}", TOOL_VERSION);
        return Ok(());
    }

    let options = parse_options(&matches);

    if matches.is_present("config") {
        print_config(&options);
        return Ok(());
    }

    if options.dominfo {
        let domains = INSTALL_DOMAINS
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>();

        if options.plist {
            println!("{}", plist_string_array(&domains)?);
        } else {
            for domain in domains {
                println!("{}", domain);
            }
        }

        return Ok(());
    }

    if options.volinfo {
        let volumes = list_volumes()?;
        let lines = volumes.iter().map(|v| v.describe()).collect::<Vec<_>>();

        if options.plist {
            println!("{}", plist_string_array(&lines)?);
        } else {
            for line in lines {
                println!("{}", line);
            }
        }

        return Ok(());
    }

    if options.pkginfo || options.query.is_some() {
        let package = options.package.as_deref().ok_or_else(|| {
            InstallerError::BadInput("no package archive given (--pkg)".into())
        })?;

        let info = inspect_package(logger, package)?;

        if let Some(field) = &options.query {
            println!("{}", query_field(&info, field)?);
            return Ok(());
        }

        let pairs = pkginfo_pairs(&info);
        if options.plist {
            println!("{}", plist_string_dict(&pairs)?);
        } else {
            for (key, value) in pairs {
                println!("{}: {}", key, value);
            }
        }

        return Ok(());
    }

    run_install(logger, &options)?;

    Ok(())
}

fn main() {
    let logger = default_logger();

    let exit_code = match main_impl(&logger) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {}", err);
            err.exit_code()
        }
    };

    std::process::exit(exit_code)
}
