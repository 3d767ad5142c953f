// Entry point and console flow.
//
// The console menu stands in for the dashboard widgets:
// - [1] loads (or refreshes) the work-order export,
// - [2] picks the org group and process area filters,
// - [3] prints the counters and series and exports them.
// With `--batch` the dashboard is produced once and the program exits.
use anyhow::{Context, Result};
use maintenance_monitor::config::Args;
use maintenance_monitor::output;
use maintenance_monitor::{FilterSpec, Session};
use std::io::{self, BufRead, Write};
use tracing::error;

/// Read a single line of input after printing `prompt`. `None` once stdin
/// is closed or unreadable.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    read_answer(&mut io::stdin().lock())
}

fn read_answer<R: BufRead>(input: &mut R) -> Option<String> {
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Show `options` numbered from 1 and return the one picked. An empty
/// answer, or closed input, keeps `current`.
fn choose(label: &str, options: &[String], current: &str) -> String {
    println!("{} (current: {})", label, current);
    for (i, opt) in options.iter().enumerate() {
        println!("  [{}] {}", i + 1, opt);
    }
    loop {
        let answer = read_line("Enter choice: ").unwrap_or_default();
        if answer.is_empty() {
            return current.to_string();
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return options[n - 1].clone(),
            _ => println!("Invalid choice. Please enter 1-{}.", options.len()),
        }
    }
}

fn handle_load(session: &mut Session) {
    println!("Loading {} ...", session.source());
    match session.refresh() {
        Ok(dataset) => output::print_load_report(dataset.report()),
        Err(e) => {
            error!(error = %e, "load failed");
            eprintln!("Failed to load work orders: {}\n", e);
        }
    }
}

fn handle_filters(session: &Session, spec: &mut FilterSpec) {
    if session.dataset().is_none() {
        println!("Error: No data loaded. Please load the work orders first (option 1).\n");
        return;
    }
    let org = choose("Org group", &session.org_options(), &spec.org_group.to_string());
    let process = choose(
        "Process area",
        &session.process_options(),
        &spec.process_area.to_string(),
    );
    match FilterSpec::from_pairs([("org_group", org.as_str()), ("process_area", process.as_str())]) {
        Ok(next) => *spec = next,
        Err(e) => println!("{}\n", e),
    }
    println!();
}

fn handle_dashboard(session: &Session, spec: &FilterSpec, args: &Args) {
    if session.dataset().is_none() {
        println!("Error: No data loaded. Please load the work orders first (option 1).\n");
        return;
    }
    let summary = session.dashboard(spec);
    output::print_dashboard(&summary, args.preview_rows);
    match output::export_dashboard(&args.out_dir, &summary) {
        Ok(paths) => println!(
            "({} files exported to {})\n",
            paths.len(),
            args.out_dir.display()
        ),
        Err(e) => eprintln!("Write error: {}", e),
    }
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,reqwest=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run_batch(mut session: Session, args: &Args) -> Result<()> {
    let dataset = session
        .ensure_loaded()
        .with_context(|| format!("loading {}", args.source))?;
    output::print_load_report(dataset.report());
    let summary = session.dashboard(&args.filter());
    output::print_dashboard(&summary, args.preview_rows);
    let paths = output::export_dashboard(&args.out_dir, &summary)
        .with_context(|| format!("exporting to {}", args.out_dir.display()))?;
    println!("({} files exported to {})", paths.len(), args.out_dir.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::load();
    init_tracing();
    tracing::info!("maintenance-monitor v{}", env!("CARGO_PKG_VERSION"));

    let session = Session::new(args.source(), args.fetcher()?, args.org_table(), args.unmapped);
    if args.batch {
        return run_batch(session, &args);
    }

    let mut session = session;
    let mut spec = args.filter();
    loop {
        println!("{}", output::TITLE);
        println!("[1] Load / refresh work orders");
        println!("[2] Choose filters");
        println!("[3] Generate dashboard");
        println!("[0] Exit\n");
        let Some(choice) = read_line("Enter choice: ") else {
            println!();
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&mut session),
            "2" => handle_filters(&session, &mut spec),
            "3" => {
                println!();
                handle_dashboard(&session, &spec, &args);
            }
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-3.\n"),
        }
    }
    Ok(())
}
