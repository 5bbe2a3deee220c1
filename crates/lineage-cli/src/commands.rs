//! CLI command implementations.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use lineage_core::{LineageConfig, LineageError, Person, Snapshot};
use lineage_graph::{FamilyGraph, Relation, SearchQuery};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const CONFIG_DIR: &str = ".lineage";
const CONFIG_FILE: &str = "config.json";

/// Options shared by every graph command.
pub struct Context {
    pub snapshot: PathBuf,
    pub config: Option<PathBuf>,
}

impl Context {
    fn load_config(&self) -> Result<LineageConfig> {
        let mut search = vec![Path::new(CONFIG_DIR).join(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            search.push(dir.join("lineage").join(CONFIG_FILE));
        }
        resolve_config(self.config.as_deref(), &search)
    }

    fn load_graph(&self) -> Result<FamilyGraph> {
        let config = self.load_config()?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner.set_message(format!("Loading {}...", self.snapshot.display()));

        let loaded = Snapshot::load(&self.snapshot);
        let graph = loaded.map(|snapshot| FamilyGraph::from_snapshot(&snapshot, config));
        spinner.finish_and_clear();

        graph.map_err(|e| format!("cannot load {}: {}", self.snapshot.display(), e).into())
    }
}

/// Loads the explicit config if given, else the first existing candidate,
/// else the defaults.
fn resolve_config(explicit: Option<&Path>, search: &[PathBuf]) -> Result<LineageConfig> {
    if let Some(path) = explicit {
        return Ok(LineageConfig::load(path)?);
    }
    for path in search {
        if path.is_file() {
            debug!("Using config {}", path.display());
            return Ok(LineageConfig::load(path)?);
        }
    }
    Ok(LineageConfig::default())
}

fn require<'g>(graph: &'g FamilyGraph, id: &str) -> Result<&'g Person> {
    graph
        .person(id)
        .ok_or_else(|| LineageError::UnknownPerson(id.to_string()).into())
}

fn describe(person: &Person) -> String {
    match &person.lifespan {
        Some(span) => format!("{} {}", person.display_name(), format!("({})", span).dimmed()),
        None => person.display_name().to_string(),
    }
}

/// Initialize Lineage in a directory.
pub fn init(path: &Path) -> Result<()> {
    let config_path = path.join(CONFIG_DIR).join(CONFIG_FILE);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    LineageConfig::default().save(&config_path)?;

    println!("{} Initialized Lineage in {}", "✓".green(), path.display());
    println!(
        "  Edit {} to set the family name that seeds the bloodline",
        config_path.display().to_string().cyan()
    );

    Ok(())
}

/// Print graph statistics.
pub fn stats(ctx: &Context) -> Result<()> {
    let graph = ctx.load_graph()?;
    let stats = graph.stats();

    println!("{}", "Family graph".bold());
    println!("  Persons:      {}", stats.persons.to_string().cyan());
    println!("  Members:      {}", stats.members.to_string().cyan());
    println!("  Unions:       {}", stats.unions.to_string().cyan());
    println!("  Parent links: {}", stats.parent_links.to_string().cyan());

    Ok(())
}

/// Print a person with their immediate family.
pub fn person(ctx: &Context, id: &str) -> Result<()> {
    let graph = ctx.load_graph()?;
    let view = graph
        .view(id)
        .ok_or_else(|| LineageError::UnknownPerson(id.to_string()))?;
    let p = view.person;

    println!("{} [{}]", describe(p).bold(), p.id.dimmed());
    println!("  Sex:    {}", p.sex);
    if let Some(age) = p.age {
        println!("  Age:    {}", age);
    }
    if let Some(place) = &p.birth_place {
        match &p.birth_country {
            Some(country) => println!("  Born:   {}, {}", place, country),
            None => println!("  Born:   {}", place),
        }
    }
    let membership = if graph.is_member(id) {
        "member".green()
    } else {
        "married in".yellow()
    };
    println!("  Status: {}", membership);
    println!();

    let parents: Vec<&Person> = view.father.into_iter().chain(view.mother).collect();
    print_group("Parents", &parents);
    print_group("Spouses", &view.spouses);
    print_group("Children", &view.children);

    Ok(())
}

fn print_group(label: &str, people: &[&Person]) {
    if people.is_empty() {
        return;
    }
    println!("  {}", label.cyan());
    for p in people {
        println!("    • {} [{}]", describe(p), p.id.dimmed());
    }
}

/// Print the member-parent ancestor chain.
pub fn ancestors(ctx: &Context, id: &str) -> Result<()> {
    let graph = ctx.load_graph()?;
    require(&graph, id)?;

    let chain = graph.ancestors_of(id);
    println!("{} generations", chain.len().to_string().cyan());
    for (depth, pid) in chain.iter().enumerate() {
        if let Some(p) = graph.person(pid) {
            println!("  {:>3}  {} [{}]", depth, describe(p), pid.dimmed());
        }
    }

    Ok(())
}

/// Print the father line and its rendered name.
pub fn bloodline(ctx: &Context, id: &str, max: usize) -> Result<()> {
    let graph = ctx.load_graph()?;
    require(&graph, id)?;

    if let Some(name) = graph.patriline_name(id, max) {
        println!("{}", name.bold());
    }
    for pid in graph.bloodline_of(id, max) {
        if let Some(p) = graph.person(pid) {
            println!("  • {} [{}]", describe(p), pid.dimmed());
        }
    }

    Ok(())
}

/// Name the relation of `a` to `b`.
pub fn kinship(ctx: &Context, a: &str, b: &str, json_output: bool) -> Result<()> {
    let graph = ctx.load_graph()?;
    let pa = require(&graph, a)?;
    let pb = require(&graph, b)?;

    let relation = graph.relation_of(a, b);
    let kin = graph.kinship_of(a, b);

    if json_output {
        let output = serde_json::json!({
            "a": a,
            "b": b,
            "relation": relation,
            "common": kin.as_ref().map(|k| k.common.id.as_str()),
            "depth_a": kin.as_ref().map(|k| k.depth_a),
            "depth_b": kin.as_ref().map(|k| k.depth_b),
            "path": kin
                .as_ref()
                .map(|k| k.path.iter().map(|p| p.id.as_str()).collect::<Vec<_>>())
                .unwrap_or_default(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match relation {
        Some(rel) => println!("{}", relation_sentence(pa, pb, rel)),
        None => println!(
            "{} No common ancestor between {} and {}",
            "⚠".yellow(),
            pa.display_name(),
            pb.display_name()
        ),
    }

    if let Some(kin) = kin {
        println!();
        println!("  Common ancestor: {}", describe(kin.common));
        println!("  Generations:     {} / {}", kin.depth_a, kin.depth_b);
        if !kin.path.is_empty() {
            let path: Vec<&str> = kin.path.iter().map(|p| p.display_name()).collect();
            println!("  Path:            {}", path.join(" → ").dimmed());
        }
    }

    Ok(())
}

fn relation_sentence(a: &Person, b: &Person, rel: Relation) -> String {
    let (a, b) = (a.display_name().cyan(), b.display_name().cyan());
    match rel {
        Relation::Myself => format!("{} and {} are the same person", a, b),
        Relation::Distant => format!("{} and {} are {}", a, b, "distant relatives".bold()),
        Relation::Unknown => format!(
            "{} and {} share an ancestor, but the relation has no name",
            a, b
        ),
        _ => format!("{} is the {} of {}", a, rel.to_string().bold(), b),
    }
}

/// Search persons.
pub fn search(ctx: &Context, query: &str, limit: usize, json_output: bool) -> Result<()> {
    let graph = ctx.load_graph()?;
    let parsed = SearchQuery::parse(query);
    let hits: Vec<_> = graph.search_scored(&parsed).into_iter().take(limit).collect();

    if json_output {
        let output: Vec<_> = hits
            .iter()
            .filter_map(|hit| {
                let p = graph.person(hit.id)?;
                Some(serde_json::json!({
                    "id": hit.id,
                    "score": hit.score,
                    "fullname": p.fullname,
                    "lifespan": p.lifespan,
                    "member": graph.is_member(hit.id),
                }))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No matches found for \"{}\"", query);
        return Ok(());
    }

    println!("Found {} matches:\n", hits.len());
    for hit in hits {
        let Some(p) = graph.person(hit.id) else {
            continue;
        };
        println!(
            "  {} {} {}",
            format!("{:>3}", hit.score).yellow(),
            describe(p),
            format!("[{}]", hit.id).dimmed()
        );
    }

    Ok(())
}

/// Export search labels.
pub fn labels(ctx: &Context) -> Result<()> {
    let graph = ctx.load_graph()?;
    println!("{}", serde_json::to_string_pretty(&graph.search_labels())?);
    Ok(())
}

/// Export the layout input: member nodes and lineage edges.
pub fn edges(ctx: &Context) -> Result<()> {
    let graph = ctx.load_graph()?;
    let output = serde_json::json!({
        "stats": graph.stats(),
        "nodes": graph.members_keys().collect::<Vec<_>>(),
        "edges": graph.lineage_edges(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
