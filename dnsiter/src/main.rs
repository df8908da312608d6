//! CLI surface for the iterative resolver: argument parsing, logging
//! configuration, the root-hints list, and TLD validity — the four
//! things `spec.md` section 1 treats as external collaborators, kept
//! out of the `dns-resolver`/`dns-types` core.

mod logging;
mod roots;
mod tld;

use std::path::PathBuf;
use std::process;

use clap::Parser;

use dns_resolver::{RandomId, Resolver, UdpTransport};

// the doc comments for this struct turn into the CLI help text
#[derive(Parser)]
/// An iterative DNS resolver for A and MX queries.
struct Args {
    /// The hostname to resolve.
    name: String,

    /// Perform an MX instead of an A query.
    #[clap(short, long)]
    mx: bool,

    /// Print detailed program output to screen.
    #[clap(short, long)]
    verbose: bool,

    /// Path to a root hints file (one `name address` pair per line),
    /// overriding the built-in IANA root server list.
    #[clap(long, value_parser)]
    root_hints: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    logging::init(args.verbose);

    let roots = match &args.root_hints {
        Some(path) => match roots::from_file(path) {
            Ok(hints) if !hints.is_empty() => hints,
            Ok(_) => {
                tracing::warn!(?path, "root hints file had no usable addresses, using built-ins");
                roots::builtin()
            }
            Err(error) => {
                tracing::error!(?path, ?error, "could not read root hints file, using built-ins");
                roots::builtin()
            }
        },
        None => roots::builtin(),
    };

    tracing::info!(name = %args.name, mx = args.mx, "resolving");

    let transport = UdpTransport;
    let mut ids = RandomId;
    let mut resolver = Resolver {
        transport: &transport,
        ids: &mut ids,
        root_servers: roots.clone(),
        effective_tld: &tld::effective_tld,
    };

    let answer = resolver.resolve(&args.name, &roots, args.mx);

    match answer {
        Some(value) if args.mx => println!("Mail Server for {}: {value}", args.name),
        Some(value) => println!("IP address for {}: {value}", args.name),
        None => println!("ERROR: Could not resolve request."),
    }

    process::exit(0);
}
