use anyhow::Result;
use clap::Parser;
use content_studio::cli::{Command, RootArgs, SearchArgs, WriteArgs};
use content_studio::studio::{ArticleRequest, Studio};
use content_studio::{config, demo, search};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = RootArgs::parse();
    match cli.command {
        Command::Write(args) => cmd_write(args),
        Command::Demo(args) => demo::run_demo(&args),
        Command::Search(args) => cmd_search(args),
    }
}

fn cmd_write(args: WriteArgs) -> Result<()> {
    let data_root = config::resolve_data_root(args.data_dir.as_deref());
    let studio = Studio::from_env(&args.model, &data_root)?;
    let request = ArticleRequest {
        session_id: args.session,
        user_id: args.user,
        topic: args.topic,
        audience: args.audience,
        tone: args.tone,
        length: args.length,
        constraints: args.constraints,
    };

    let response = studio.create_article(request)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }
    println!("session: {}", response.session_id);
    demo::print_article(&response.outline, &response.draft, &response.evaluation)
}

fn cmd_search(args: SearchArgs) -> Result<()> {
    let results = search::search_web(&args.query, args.max_results);
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
