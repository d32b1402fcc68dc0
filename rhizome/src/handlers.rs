use anyhow::{Result, anyhow};
use chrono::Local;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rhizome_core::{Engine, export, report};
use rhizome_probe::strategies::{
    NeighborStrategy, ParentStrategy, RecordStrategy, ReverseStrategy, ServiceStrategy,
    SpfStrategy, SubdomainStrategy,
};
use rhizome_probe::{LookupClient, Node, Strategy};
use rhizome_tui::{LogLevel, ScanMessage, create_monitor_channel, run_monitor};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use url::Url;
use uuid::Uuid;

/// Parse a user-supplied domain, accepting bare hostnames and full URLs.
pub fn parse_domain_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line.contains("://") {
        let url = Url::parse(line).ok()?;
        return url
            .host_str()
            .map(|host| host.trim_end_matches('.').to_lowercase());
    }

    let candidate = line.trim_end_matches('.');
    let valid = !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_');
    if valid {
        Some(candidate.to_lowercase())
    } else {
        None
    }
}

/// Load subdomain prefixes from a wordlist file, skipping blanks and
/// `#` comments.
pub fn load_wordlist(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read wordlist {}: {}", path.display(), e))?;

    let prefixes: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if prefixes.is_empty() {
        return Err(format!("No prefixes found in {}", path.display()));
    }

    Ok(prefixes)
}

fn resolve_domain(args: &ArgMatches) -> Result<String> {
    let raw = args.get_one::<String>("domain").unwrap();
    parse_domain_line(raw).ok_or_else(|| anyhow!("'{}' is not a usable domain", raw))
}

/// The default strategy set mirrors a plain scan; brute forcing and
/// neighbor probing are opt-in since they are noisy.
fn build_strategies(
    brute: bool,
    neighbors: bool,
    wordlist: Option<Vec<String>>,
) -> Result<Vec<Arc<dyn Strategy>>> {
    let mut strategies: Vec<Arc<dyn Strategy>> = vec![
        Arc::new(RecordStrategy::new()?),
        Arc::new(SpfStrategy::new()?),
        Arc::new(ReverseStrategy::new()?),
        Arc::new(ParentStrategy::new()),
    ];

    if brute || wordlist.is_some() {
        let mut subdomains = SubdomainStrategy::new()?;
        if let Some(prefixes) = wordlist {
            subdomains = subdomains.with_prefixes(prefixes);
        }
        strategies.push(Arc::new(subdomains));
        strategies.push(Arc::new(ServiceStrategy::new()?));
    }

    if neighbors {
        strategies.push(Arc::new(NeighborStrategy::new()?));
    }

    Ok(strategies)
}

fn scan_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub async fn handle_scan(args: &ArgMatches) -> Result<()> {
    tracing_subscriber::fmt::init();

    let domain = resolve_domain(args)?;
    let depth = *args.get_one::<usize>("depth").unwrap();
    let brute = args.get_flag("brute");
    let neighbors = args.get_flag("neighbors");
    let json = args.get_flag("json");

    let wordlist = match args.get_one::<std::path::PathBuf>("wordlist") {
        Some(path) => Some(load_wordlist(path).map_err(|e| anyhow!(e))?),
        None => None,
    };

    let mut engine = Engine::new(depth);
    for strategy in build_strategies(brute, neighbors, wordlist)? {
        engine.register_strategy(strategy);
    }

    println!("\nMapping {} (depth {})\n", domain.bold().blue(), depth);

    let spinner = scan_spinner();
    spinner.set_message(format!("Scanning {}...", domain));

    let root = Node::domain(domain.clone());
    let started = Instant::now();
    engine.scan(root.clone()).await;
    spinner.finish_and_clear();

    let stats = engine.stats();
    let snapshot = engine.snapshot();

    println!(
        "{} in {:.2}s at {}",
        "Scan complete".bold().green(),
        started.elapsed().as_secs_f64(),
        Local::now().format("%H:%M:%S")
    );
    println!("{}\n", report::render_summary(&stats));
    print!("{}", report::render_tree(&snapshot, &root));

    if json {
        println!("\n{}", serde_json::to_string_pretty(&stats)?);
    }

    if let Some(dot_path) = args.get_one::<String>("dot") {
        let expanded = shellexpand::tilde(dot_path);
        let path = Path::new(expanded.as_ref());
        export::write_dot(&snapshot, path)?;
        println!("\nSaved {}", path.display());
    }

    Ok(())
}

/// Feed the monitor from the engine on a fixed interval, diffing the
/// snapshot to announce newly discovered nodes.
async fn poll_engine(
    engine: Arc<Engine>,
    tx: UnboundedSender<ScanMessage>,
    should_exit: Arc<AtomicBool>,
) {
    let mut seen: HashSet<Node> = HashSet::new();
    let mut announced_complete = false;

    while !should_exit.load(Ordering::Relaxed) {
        let stats = engine.stats();
        let _ = tx.send(ScanMessage::Progress { stats });

        for node in engine.snapshot().nodes {
            if seen.insert(node.clone()) {
                let _ = tx.send(ScanMessage::Discovered { node });
            }
        }

        if !announced_complete && stats.visited > 0 && engine.is_idle() {
            announced_complete = true;
            let _ = tx.send(ScanMessage::Complete {
                nodes: stats.nodes,
                edges: stats.edges,
            });
        }

        tokio::time::sleep(Duration::from_millis(250)).await;
    }
}

pub async fn handle_watch(args: &ArgMatches) -> Result<()> {
    let domain = resolve_domain(args)?;
    let depth = *args.get_one::<usize>("depth").unwrap();
    let workers = *args.get_one::<usize>("workers").unwrap();
    let brute = args.get_flag("brute");
    let neighbors = args.get_flag("neighbors");

    let strategies = build_strategies(brute, neighbors, None)?;
    let strategy_count = strategies.len();

    let mut engine = Engine::new(depth).with_workers(workers);
    for strategy in strategies {
        engine.register_strategy(strategy);
    }
    let engine = Arc::new(engine);

    let session_id = Uuid::new_v4().to_string();
    let (tx, rx) = create_monitor_channel();
    let should_exit = Arc::new(AtomicBool::new(false));

    let _ = tx.send(ScanMessage::SessionStarted {
        session_id: session_id.clone(),
        domain: domain.clone(),
    });
    let _ = tx.send(ScanMessage::Log {
        level: LogLevel::Info,
        message: format!(
            "{} strategies registered, {} workers, depth {}",
            strategy_count, workers, depth
        ),
    });

    engine.add_node(Node::domain(domain.clone()), 0);
    engine.start();

    let poller = tokio::spawn(poll_engine(engine.clone(), tx, should_exit.clone()));

    // The monitor owns the terminal until the user quits.
    let monitor_exit = should_exit.clone();
    let monitor = tokio::task::spawn_blocking(move || run_monitor(rx, monitor_exit));
    monitor.await??;

    should_exit.store(true, Ordering::Relaxed);
    engine.stop();
    engine.join().await;
    let _ = poller.await;

    let stats = engine.stats();
    println!(
        "Session {} finished: {} nodes / {} edges / {} expanded",
        session_id.cyan(),
        stats.nodes,
        stats.edges,
        stats.visited
    );

    Ok(())
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

pub async fn handle_lookup(args: &ArgMatches) -> Result<()> {
    tracing_subscriber::fmt::init();

    let domain = resolve_domain(args)?;
    let json = args.get_flag("json");

    let client = LookupClient::new()?;

    let spinner = scan_spinner();
    spinner.set_message(format!("Looking up {}...", domain));
    let lookup = client.scan_all(&domain).await;
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&lookup)?);
        return Ok(());
    }

    print_divider();
    println!("{} {}", "Target:".bold(), lookup.domain.bold().blue());

    print_divider();
    println!("{}", "DNS records".bold());
    for (record_type, values) in &lookup.records {
        if values.is_empty() {
            println!("  {:<6} {}", record_type, "(none)".dimmed());
        } else {
            for value in values {
                println!("  {:<6} {}", record_type, value);
            }
        }
    }

    print_divider();
    println!("{}", "Registration (RDAP)".bold());
    match &lookup.rdap {
        Some(rdap) => {
            if let Some(ref handle) = rdap.handle {
                println!("  Handle:      {}", handle);
            }
            if !rdap.status.is_empty() {
                println!("  Status:      {}", rdap.status.join(", "));
            }
            if !rdap.nameservers.is_empty() {
                println!("  Nameservers: {}", rdap.nameservers.join(", "));
            }
            for (action, date) in &rdap.events {
                println!("  {:<12} {}", format!("{}:", action), date);
            }
        }
        None => println!("  {}", "no registration data".dimmed()),
    }

    print_divider();
    println!("{}", "robots.txt".bold());
    match &lookup.robots {
        Some(body) => {
            for line in body.lines().take(20) {
                println!("  {}", line);
            }
            if body.lines().count() > 20 {
                println!("  {}", "…".dimmed());
            }
        }
        None => println!("  {}", "not served".dimmed()),
    }
    print_divider();

    Ok(())
}
