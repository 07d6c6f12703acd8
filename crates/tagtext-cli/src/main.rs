use clap::{Parser, Subcommand};
use std::path::Path;

use tagtext_lexer::{is_valid_tag_name, tokenize, Token};
use tagtext_parser::resolver::{self, Resolvers};
use tagtext_parser::{
    escape_tags, sanitize_name, strip_tags, ParseError, Tag, TagResolver, Tree,
};

#[derive(Parser)]
#[command(name = "tagtext")]
#[command(about = "tagtext: inspect and render tag-based markup")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Tag name to recognize (repeatable). `reset` is always recognized.
    #[arg(long = "tag", value_name = "NAME", global = true)]
    tags: Vec<String>,

    /// Treat unclosed tags, out-of-order closes and <reset> as errors
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token stream
    Tokens {
        /// Input file
        path: String,
    },

    /// Print the parsed node tree
    Tree {
        /// Input file
        path: String,
    },

    /// Parse a file and report errors without output
    Check {
        /// Input file
        path: String,
    },

    /// Remove the recognized tags
    Strip {
        /// Input file
        path: String,
    },

    /// Escape the recognized tags so they read as text
    Escape {
        /// Input file
        path: String,
    },

    /// Render to plain text
    Render {
        /// Input file
        path: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let tags = build_resolver(&cli.tags);

    match &cli.command {
        Command::Tokens { path } => cmd_tokens(path),
        Command::Tree { path } => cmd_tree(path, &tags, cli.strict),
        Command::Check { path } => cmd_check(path, &tags, cli.strict),
        Command::Strip { path } => cmd_strip(path, &tags),
        Command::Escape { path } => cmd_escape(path, &tags),
        Command::Render { path } => cmd_render(path, &tags, cli.strict),
    }
}

fn build_resolver(names: &[String]) -> Resolvers<String> {
    let mut builder = Resolvers::builder().resolver(resolver::reset());
    for name in names {
        if !is_valid_tag_name(name) {
            eprintln!("Error: invalid tag name: {name}");
            std::process::exit(1);
        }
        builder = builder.tag(name, || Tag::inserting(String::new()));
    }
    log::debug!("recognizing {} tag(s) plus reset", names.len());
    builder.build()
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn parse_or_exit(source: &str, tags: &Resolvers<String>, strict: bool) -> Tree<String> {
    match tagtext_parser::Parser::new(tags).strict(strict).parse(source) {
        Ok(tree) => tree,
        Err(e) => report(&e),
    }
}

fn report(e: &ParseError) -> ! {
    eprintln!("Parse error: {e}");
    std::process::exit(1);
}

fn cmd_tokens(path: &str) {
    let source = read_source(path);
    for token in tokenize(&source, false) {
        print_token(&source, &token, 0);
    }
}

fn print_token(source: &str, token: &Token, depth: usize) {
    println!(
        "{}{:?} {}..{} {:?}",
        "  ".repeat(depth),
        token.kind,
        token.span.start,
        token.span.end,
        token.text(source)
    );
    for child in &token.children {
        print_token(source, child, depth + 1);
    }
}

fn cmd_tree(path: &str, tags: &Resolvers<String>, strict: bool) {
    let source = read_source(path);
    print!("{}", parse_or_exit(&source, tags, strict));
}

fn cmd_check(path: &str, tags: &Resolvers<String>, strict: bool) {
    let source = read_source(path);
    parse_or_exit(&source, tags, strict);
    eprintln!("OK: {path}");
}

fn cmd_strip(path: &str, tags: &Resolvers<String>) {
    let source = read_source(path);
    let known = |name: &str| tags.has(&sanitize_name(name));
    print!("{}", strip_tags(&source, &known));
}

fn cmd_escape(path: &str, tags: &Resolvers<String>) {
    let source = read_source(path);
    let known = |name: &str| tags.has(&sanitize_name(name));
    print!("{}", escape_tags(&source, &known));
}

fn cmd_render(path: &str, tags: &Resolvers<String>, strict: bool) {
    let source = read_source(path);
    let tree = parse_or_exit(&source, tags, strict);
    print!("{}", tagtext_render::render(&tree));
}
