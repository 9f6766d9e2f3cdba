//! List command - prints the named types of a graph.

use typeval_types::TypeHost;

use crate::util::load_graph;

#[derive(clap::Args)]
pub struct Args {
    /// Path to the type graph JSON file (use - for stdin)
    pub graph: String,
    /// Also print each type's structure
    #[arg(short, long)]
    pub long: bool,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let graph = load_graph(&args.graph)?;
    let mut names: Vec<_> = graph.names().collect();
    names.sort_by_key(|(_, ty)| *ty);
    for (name, ty) in names {
        if args.long {
            println!("{name}\t{}", graph.type_to_string(ty));
        } else {
            println!("{name}");
        }
    }
    Ok(())
}
