//! # whatshappened CLI
//!
//! Command-line interface for the whatshappened library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use whatshappened::WhatsHappenedError;
use whatshappened::cli::Args;
use whatshappened::core::anonymize::anonymize;
use whatshappened::core::{ProcessingStats, Summary, apply_filters, postprocess};
use whatshappened::format::write_to_format;
use whatshappened::parser::{Parser, WhatsAppParser};

fn main() {
    let args = <Args as ClapParser>::parse();
    setup_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(layer).init();
}

fn run(args: &Args) -> Result<(), WhatsHappenedError> {
    let total_start = Instant::now();

    let output_path = args.output_path();
    let parser_config = args.parser_config()?;
    let filter_config = args.filter_config()?;
    let postprocess_config = args.postprocess_config();
    let output_config = args.output_config();
    output_config.validate()?;

    println!("📦 whatshappened v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    println!("💾 Output:  {}", output_path);
    println!("📄 Format:  {}", args.format);
    println!("🙋 You:     {} → {}", parser_config.self_name, parser_config.exporter_name);
    if let Some(ref after) = args.after {
        println!("📅 After:   {}", after);
    }
    if let Some(ref before) = args.before {
        println!("📅 Before:  {}", before);
    }
    if let Some(ref from) = args.from {
        println!("👤 From:    {}", from);
    }
    println!();

    // Step 1: Parse
    let parser = WhatsAppParser::new(parser_config)?;
    println!("⏳ Parsing {}...", parser.name());
    let parse_start = Instant::now();
    let records = parser.parse_file(&args.input)?;
    let original_count = records.len();
    println!(
        "   Found {} records ({:.2}s)",
        original_count,
        parse_start.elapsed().as_secs_f64()
    );

    // Step 2: Filter
    let records = if filter_config.is_active() {
        println!("🔍 Filtering records...");
        let filtered = apply_filters(records, &filter_config);
        println!("   {} records after filtering", filtered.len());
        filtered
    } else {
        records
    };

    // Step 3: Post-process
    let records = if postprocess_config.is_active() {
        println!("🧹 Post-processing...");
        postprocess::apply(records, &postprocess_config)
    } else {
        records
    };

    // Step 4: Anonymize
    let records = if args.anonymize {
        println!("🎭 Anonymizing authors...");
        anonymize(records, args.seed)
    } else {
        records
    };

    // Step 5: Write
    println!("💾 Writing {}...", args.format);
    let write_start = Instant::now();
    write_to_format(&records, &output_path, args.format, &output_config)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Output saved to {}", output_path);

    let stats = ProcessingStats::new(original_count, records.len());
    println!();
    println!("📊 Summary:");
    println!("   Parsed:    {} records", stats.original_count);
    if stats.final_count != stats.original_count {
        println!(
            "   Final:     {} records ({:.1}% removed)",
            stats.final_count,
            stats.removed_ratio()
        );
    }
    println!("   Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    if args.stats {
        println!();
        print!("{}", Summary::from_records(&records));
    }

    Ok(())
}
