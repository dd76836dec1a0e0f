use stardict_reader::{LibraryConfig, LibrarySet};
use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "/usr/share/stardict/dic";

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} [--data-dir <DIR>]... [--exact] <query>...", program);
    std::process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("stardict-reader");

    let mut data_dirs: Vec<PathBuf> = Vec::new();
    let mut queries: Vec<&str> = Vec::new();
    let mut config = LibraryConfig::default();

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--data-dir" => match rest.next() {
                Some(dir) => data_dirs.push(PathBuf::from(dir)),
                None => {
                    eprintln!("ERROR: --data-dir flag requires an argument.");
                    std::process::exit(1);
                }
            },
            "--exact" => config.fuzzy_fallback = false,
            "-h" | "--help" => usage(program),
            query => queries.push(query),
        }
    }
    if queries.is_empty() {
        usage(program);
    }

    // Without explicit directories, search the system and per-user locations.
    if data_dirs.is_empty() {
        let system_dir = env::var_os("STARDICT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        data_dirs.push(system_dir);
        if let Some(home) = dirs::home_dir() {
            data_dirs.push(home.join(".stardict").join("dic"));
        }
    }

    let mut library = LibrarySet::new(config);
    library.load(&data_dirs, &[], &[]);
    if library.is_empty() {
        eprintln!("ERROR: No dictionaries found in:");
        for dir in &data_dirs {
            eprintln!("  {}", dir.display());
        }
        std::process::exit(1);
    }

    let mut failed = false;
    for query in queries {
        match library.lookup(query) {
            Ok(results) if results.is_empty() => println!("Nothing similar to {}", query),
            Ok(results) => {
                for hit in results {
                    println!("-->{}", hit.bookname);
                    println!("-->{}", hit.word);
                    println!("{}", hit.article.plain_text());
                    println!();
                }
            }
            Err(e) => {
                eprintln!("ERROR: Lookup of '{}' failed", query);
                eprintln!("  {}", e);
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}
