use anyhow::{Context, Result, bail};
use lessonmark_config::Config;
use lessonmark_engine::{
    ContentPayload, LogSink, ParseOptions, RenderContext, parse_with, render_blocks,
};
use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};

const DEFAULT_COURSE: &str = "course-1";
const DEFAULT_LESSON: &str = "lesson-1";

enum Command {
    Blocks,
    Html,
    Sections,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "blocks" => Some(Self::Blocks),
            "html" => Some(Self::Html),
            "sections" => Some(Self::Sections),
            _ => None,
        }
    }
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <blocks|html|sections> <file>\n\
         \n  blocks <file.md>      print parsed blocks as JSON\
         \n  html <file.md>        print rendered HTML\
         \n  sections <file.json>  print sections and component ids of a V2 payload"
    )
}

/// Relative paths are taken from `content_dir` when a config file exists.
fn resolve(config: Option<&Config>, arg: &str) -> PathBuf {
    let path = Path::new(arg);
    match config {
        Some(config) if !path.exists() => config.resolve(path),
        _ => path.to_path_buf(),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn blocks(content: &str, options: &ParseOptions) -> Result<String> {
    let blocks = parse_with(content, options, &LogSink);
    log::info!("Parsed {} top-level blocks", blocks.len());
    serde_json::to_string_pretty(&blocks).context("Failed to serialize blocks")
}

fn html(content: &str, options: &ParseOptions, config: Option<&Config>) -> String {
    let blocks = parse_with(content, options, &LogSink);
    let (course, lesson) = config
        .map(|c| (c.course_id.as_str(), c.lesson_id.as_str()))
        .unwrap_or((DEFAULT_COURSE, DEFAULT_LESSON));
    render_blocks(&blocks, &RenderContext::new(course, lesson))
}

fn sections(json: &str) -> Result<String> {
    let payload = ContentPayload::from_json(json).context("Failed to decode content payload")?;
    let mut out = String::new();
    for section in &payload.sections {
        out.push_str(&section.id);
        if let Some(title) = &section.title {
            out.push_str(&format!(" \"{title}\""));
        }
        if section.requires_previous {
            out.push_str(" (requires previous)");
        }
        out.push('\n');
        for component in &section.components {
            let key = section.ids.backend_key(&component.id);
            let input = if component.kind.is_input() { " input" } else { "" };
            out.push_str(&format!(
                "  {} [{}{input}]",
                component.id,
                component.kind.type_name()
            ));
            if key != component.id {
                out.push_str(&format!(" -> {key}"));
            }
            out.push('\n');
        }
    }
    Ok(out)
}

fn run(args: &[String]) -> Result<()> {
    let program = args.first().map_or("lessonmark-cli", String::as_str);
    let (Some(command), Some(file)) = (args.get(1), args.get(2)) else {
        bail!(usage(program));
    };
    let Some(command) = Command::from_arg(command) else {
        bail!("Unknown command '{command}'\n{}", usage(program));
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config file: {e}");
            None
        }
    };
    let options = config
        .as_ref()
        .map(Config::parse_options)
        .unwrap_or_default();

    let path = resolve(config.as_ref(), file);
    let content = read(&path)?;

    let output = match command {
        Command::Blocks => blocks(&content, &options)?,
        Command::Html => html(&content, &options, config.as_ref()),
        Command::Sections => sections(&content)?,
    };
    println!("{output}");
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
