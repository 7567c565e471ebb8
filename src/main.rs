use clap::Parser;
use howto_search::{
    ContentDir,
    Corpus,
    DEFAULT_INTENTS,
    IntentDictionary,
    cli::{self, Cli, Command},
    error,
    search::{self, SearchOptions},
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("HOWTO_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    let content_dir = ContentDir::resolve(cli.content_dir.as_deref())?;

    match cli.command {
        Command::Validate(args) => {
            if !cmd_validate(&content_dir, args.json)? {
                std::process::exit(1);
            }
        }
        Command::Search(args) => {
            cmd_search(&content_dir, &args)?;
        }
        Command::Show(args) => {
            cmd_show(&content_dir, &args)?;
        }
        Command::Intents(args) => {
            let dictionary =
                load_dictionary(&content_dir, args.intents.as_deref())?;
            cmd_intents(&dictionary, args.json)?;
        }
        Command::Precache(args) => {
            let corpus = Corpus::load(content_dir.root())?;
            let urls = corpus.precache_urls(args.limit);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&urls)?);
            } else {
                for url in &urls {
                    println!("{url}");
                }
            }
        }
        Command::Completions(_) => {}
    }

    Ok(())
}

/// Returns whether every content file is valid.
fn cmd_validate(content_dir: &ContentDir, json: bool) -> error::Result<bool> {
    let reports = Corpus::check(content_dir.root())?;
    let all_valid = reports.iter().all(|r| r.is_valid());

    if json {
        let items: Vec<_> = reports
            .iter()
            .map(|r| {
                serde_json::json!({
                    "file": r.relative_path.to_string_lossy(),
                    "valid": r.is_valid(),
                    "errors": r.errors,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(all_valid);
    }

    if reports.is_empty() {
        println!("Keine HowTo-Dateien gefunden.");
        return Ok(true);
    }

    let mut failures = Vec::new();
    for report in &reports {
        let file = report.relative_path.display();
        if report.is_valid() {
            println!("✅ {file} gültig.");
        } else {
            failures.push(format!("❌ {file}:"));
            failures
                .extend(report.errors.iter().map(|e| format!("   - {e}")));
        }
    }

    if failures.is_empty() {
        println!("Alle HowTo-Dateien sind gültig.");
    } else {
        eprintln!("Die folgenden Inhalte sind fehlerhaft:");
        for line in &failures {
            eprintln!("{line}");
        }
    }

    Ok(all_valid)
}

fn cmd_search(
    content_dir: &ContentDir,
    args: &cli::SearchArgs,
) -> error::Result<()> {
    let dictionary = load_dictionary(content_dir, args.intents.as_deref())?;
    let corpus = Corpus::load(content_dir.root())?;

    let options = SearchOptions {
        max_distance: args.max_distance,
        limit: args.count,
        dictionary: &dictionary,
    };
    let response = search::search_how_tos(&args.query, corpus.guides(), &options);

    if args.json {
        search::format_json(&response)?;
    } else {
        search::format_human(&response);
    }
    Ok(())
}

fn cmd_show(content_dir: &ContentDir, args: &cli::ShowArgs) -> error::Result<()> {
    let corpus = Corpus::load(content_dir.root())?;
    let guide = corpus.find_by_slug(&args.slug).ok_or_else(|| {
        error::Error::NotFound {
            kind: "guide",
            name: args.slug.clone(),
        }
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(guide)?);
        return Ok(());
    }

    println!("{} ({} ab {})", guide.title, guide.os, guide.os_version.min);
    println!("{}", guide.summary);
    println!("Dauer: etwa {} min", guide.estimated_minutes);
    if let Some(prerequisites) = &guide.prerequisites {
        println!("Voraussetzungen: {}", prerequisites.join(", "));
    }
    println!();
    for step in &guide.steps {
        println!("{}. {}", step.order, step.title);
        println!("   {}", step.description);
        for media in step.media.iter().flatten() {
            println!("   [{}]", media.alt());
        }
        for tip in step.tips.iter().flatten() {
            println!("   Tipp: {tip}");
        }
    }
    for resource in guide.resources.iter().flatten() {
        println!("-> {}: {}", resource.label, resource.href);
    }
    Ok(())
}

fn cmd_intents(dictionary: &IntentDictionary, json: bool) -> error::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(dictionary)?);
    } else if dictionary.is_empty() {
        println!("Keine Absichten definiert.");
    } else {
        for intent in dictionary.intents() {
            println!("{}\t{}", intent.label, intent.synonyms.join(", "));
        }
    }
    Ok(())
}

/// An explicit file wins, then `intents.json` in the content directory,
/// then the built-in dictionary.
fn load_dictionary(
    content_dir: &ContentDir,
    explicit: Option<&std::path::Path>,
) -> error::Result<IntentDictionary> {
    if let Some(path) = explicit {
        return IntentDictionary::load(path);
    }
    let path = content_dir.intents_file();
    if path.is_file() {
        return IntentDictionary::load(&path);
    }
    Ok(DEFAULT_INTENTS.clone())
}
