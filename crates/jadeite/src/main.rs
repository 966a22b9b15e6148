use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use jadeite_errors::Renderer;
use jadeite_parse::Registry;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
enum Options {
    /// Compile a template and print the HTML to stdout.
    Run {
        path: Utf8PathBuf,
        /// Print the parsed tree to stderr and enable debug logging.
        #[arg(long)]
        debug: bool,
        #[arg(long, default_value = "")]
        left_delim: String,
        #[arg(long, default_value = "")]
        right_delim: String,
    },
}

fn main() -> anyhow::Result<()> {
    match Options::parse() {
        Options::Run { path, debug, left_delim, right_delim } => {
            let default_filter = if debug { "debug" } else { "warn" };
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
                .init();

            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{path}`"))?;
            let name = path.file_stem().unwrap_or(path.as_str());

            let mut registry = Registry::default();
            let tree = match jadeite_parse::parse(name, &text, &left_delim, &right_delim, &mut registry)
            {
                Ok(tree) => tree,
                Err(diagnostic) => {
                    let renderer = Renderer::styled();
                    eprintln!("{}", diagnostic.render(&renderer, path.as_str(), &text));
                    anyhow::bail!("failed to compile `{path}`");
                }
            };

            if debug {
                eprint!("{}", tree.debug_tree());
            }
            log::info!("compiled `{path}` into {} top-level nodes", tree.root.nodes.len());

            println!("{}", tree.render());
            Ok(())
        }
    }
}
