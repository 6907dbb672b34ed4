use env_logger::Env;
use logstat::error::AnalysisError;
use logstat::file_reader::FileReader;
use logstat::report;
use logstat::settings::CliArgs;
use std::io::Write;
use std::path::Path;
use structopt::StructOpt;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = CliArgs::from_args();

    match args.file.as_deref() {
        Some(path) => {
            if let Some(problem) = check_path(path) {
                anyhow::bail!("{}: {}", path.display(), problem);
            }
            analyze_and_print(path, &args).await;
        }
        None => prompt_loop(&args).await?,
    }

    Ok(())
}

/// Keeps asking for log paths until stdin is closed
async fn prompt_loop(args: &CliArgs) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("Enter the path to the log file:");
        std::io::stdout().flush()?;

        let Some(input) = lines.next_line().await? else {
            break;
        };
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let path = Path::new(input);
        if let Some(problem) = check_path(path) {
            println!("{}", problem);
            continue;
        }

        println!("Path is valid");
        analyze_and_print(path, args).await;
        println!("\n{}\n", "=".repeat(60));
    }

    Ok(())
}

fn check_path(path: &Path) -> Option<&'static str> {
    if !path.exists() {
        Some("File does not exist")
    } else if path.is_dir() {
        Some("This is a directory, not a file")
    } else {
        None
    }
}

async fn analyze_and_print(path: &Path, args: &CliArgs) {
    let reader = FileReader::new(path, args.analyzer_settings());

    match reader.analyze().await {
        Ok(file_report) => print!("{}", report::render(&file_report, args.top)),
        Err(e @ AnalysisError::LineTooLong { .. }) => {
            eprintln!("{}", e);
            eprintln!("File processing stopped");
        }
        Err(e) => {
            eprintln!("Error while reading the file: {}", e);
        }
    }
}
