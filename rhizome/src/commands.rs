use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("rhizome")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("rhizome")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("scan")
                .about(
                    "Synchronously map the topology rooted at a domain and print the \
                result tree.",
                )
                .arg(
                    arg!(-d --"domain" <DOMAIN>)
                        .required(true)
                        .help("The root domain to map"),
                )
                .arg(
                    arg!(--"depth" <DEPTH>)
                        .required(false)
                        .help("Maximum traversal depth from the root")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("3"),
                )
                .arg(
                    arg!(--"brute" "Also brute-force common subdomain prefixes and SRV services")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"neighbors" "Probe the numeric neighbors of discovered addresses")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-w --"wordlist" <PATH>)
                        .required(false)
                        .help("Subdomain prefix wordlist, one prefix per line (implies --brute)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-o --"dot" <PATH>)
                        .required(false)
                        .help("Write a Graphviz export of the discovered graph to this path"),
                )
                .arg(
                    arg!(--"json" "Print the final stats as JSON")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("watch")
                .about(
                    "Incrementally map a domain in the background while watching \
                progress in a live monitor.",
                )
                .arg(
                    arg!(-d --"domain" <DOMAIN>)
                        .required(true)
                        .help("The root domain to map"),
                )
                .arg(
                    arg!(--"depth" <DEPTH>)
                        .required(false)
                        .help("Maximum traversal depth from the root")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("3"),
                )
                .arg(
                    arg!(-t --"workers" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async workers in the worker pool")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("20"),
                )
                .arg(
                    arg!(--"brute" "Also brute-force common subdomain prefixes and SRV services")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"neighbors" "Probe the numeric neighbors of discovered addresses")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("lookup")
                .about(
                    "One-shot reconnaissance of a single domain: record summary, RDAP \
                registration data and robots.txt.",
                )
                .arg(
                    arg!(-d --"domain" <DOMAIN>)
                        .required(true)
                        .help("The domain to look up"),
                )
                .arg(
                    arg!(--"json" "Print the report as JSON")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
