use anyhow::Result;
use clap::{Parser, Subcommand};
use cityroute_core::{
    format, map_svg, shortest_path, write_route, Graph, MapStore, Route, WeightGenerator,
};
use rustyline::DefaultEditor;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cityroute", version, about = "City route planner", long_about = None)]
struct Cli {
    /// Directory holding the saved map and road conditions
    #[arg(short, long, default_value = "data", env = "CITYROUTE_DATA")]
    data_dir: PathBuf,

    /// Seed for road condition draws (random when omitted)
    #[arg(long, env = "CITYROUTE_SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Cheapest route between two points
    Route {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Also write the route as JSON (route_<FROM>_<TO>.json when no file is given)
        #[arg(long, value_name = "FILE", num_args = 0..=1)]
        json: Option<Option<PathBuf>>,
    },
    /// Draw the map as SVG, highlighting a route when both ends are given
    Map {
        #[arg(short, long, default_value = "map.svg")]
        out: PathBuf,
        #[arg(long, requires = "to")]
        from: Option<String>,
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// Draw new road conditions and save them
    Reset,
    /// List the points on the map
    Points,
    /// List every road with its current condition
    Edges,
    /// Show the possible road conditions
    Conditions {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save map and road conditions
    Save,
    /// Start the interactive menu
    Menu,
}

struct Session {
    graph: Graph,
    store: MapStore,
    weights: WeightGenerator,
}

impl Session {
    fn start(data_dir: &Path, seed: Option<u64>) -> Result<Self> {
        let store = MapStore::open(data_dir)?;
        let mut weights = match seed {
            Some(seed) => WeightGenerator::seeded(seed),
            None => WeightGenerator::from_entropy(),
        };

        let mut graph = match store.load_structure()? {
            Some(graph) => graph,
            None => {
                tracing::info!("no saved map, building the default city");
                let graph = cityroute_core::default_city();
                store.save_structure(&graph)?;
                graph
            }
        };
        if !store.load_weights(&mut graph)? {
            tracing::info!("no saved road conditions, drawing new ones");
            weights.regenerate_all(&mut graph);
            store.save_weights(&graph)?;
        }

        Ok(Self {
            graph,
            store,
            weights,
        })
    }

    fn route(&self, from: &str, to: &str) -> String {
        let route = shortest_path(&self.graph, from, to);
        format::route_report(&self.graph, route.as_ref())
    }

    /// Write the cheapest route to `path`; `false` when there is none.
    fn export_route(&self, from: &str, to: &str, path: &Path) -> Result<bool> {
        let Some(route) = shortest_path(&self.graph, from, to) else {
            return Ok(false);
        };
        write_route(path, &route)?;
        Ok(true)
    }

    fn draw_map(&self, out: &Path, ends: Option<(&str, &str)>) -> Result<Option<Route>> {
        let route = ends.and_then(|(from, to)| shortest_path(&self.graph, from, to));
        std::fs::write(out, map_svg(&self.graph, route.as_ref()))?;
        tracing::info!(path = %out.display(), highlighted = route.is_some(), "map written");
        Ok(route)
    }

    fn reset(&mut self) -> Result<()> {
        self.weights.regenerate_all(&mut self.graph);
        self.store.save_weights(&self.graph)?;
        Ok(())
    }

    fn save(&self) -> Result<()> {
        self.store.save_structure(&self.graph)?;
        self.store.save_weights(&self.graph)?;
        Ok(())
    }

    fn check_point(&self, id: &str) -> Result<()> {
        if !self.graph.contains(id) {
            anyhow::bail!("unknown point '{id}'");
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut session = Session::start(&cli.data_dir, cli.seed)?;

    match cli.command {
        Some(Commands::Route { from, to, json }) => {
            let (from, to) = (from.to_uppercase(), to.to_uppercase());
            session.check_point(&from)?;
            session.check_point(&to)?;
            println!("{}", session.route(&from, &to));
            if let Some(file) = json {
                let file = file.unwrap_or_else(|| route_file_name(&from, &to));
                if session.export_route(&from, &to, &file)? {
                    println!("route written to {}", file.display());
                }
            }
        }
        Some(Commands::Map { out, from, to }) => {
            let ends = match (from, to) {
                (Some(from), Some(to)) => {
                    let (from, to) = (from.to_uppercase(), to.to_uppercase());
                    session.check_point(&from)?;
                    session.check_point(&to)?;
                    Some((from, to))
                }
                _ => None,
            };
            let pair = ends.as_ref().map(|(f, t)| (f.as_str(), t.as_str()));
            let route = session.draw_map(&out, pair)?;
            if ends.is_some() && route.is_none() {
                println!("{}", format::NO_ROUTE_MESSAGE);
            }
            println!("map written to {}", out.display());
        }
        Some(Commands::Reset) => {
            session.reset()?;
            print!("{}", format::edge_table(&session.graph));
        }
        Some(Commands::Points) => print!("{}", format::vertex_table(&session.graph)),
        Some(Commands::Edges) => print!("{}", format::edge_table(&session.graph)),
        Some(Commands::Conditions { json: true }) => {
            println!("{}", serde_json::to_string_pretty(session.weights.conditions())?)
        }
        Some(Commands::Conditions { json: false }) => {
            print!("{}", format::condition_table(session.weights.conditions()))
        }
        Some(Commands::Save) => {
            session.save()?;
            println!("saved to {}", session.store.dir().display());
        }
        Some(Commands::Menu) | None => run_menu(&mut session)?,
    }
    Ok(())
}

const MENU: &str = "\
1. Calculate best route between two points
2. Reset system (draw new road conditions)
3. Show all roads
4. Show available points
5. Show possible road conditions
6. Save current state
7. Quit";

fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("cityroute_history"))
}

fn prompt(rl: &mut Option<DefaultEditor>, text: &str) -> Result<Option<String>> {
    let line = if let Some(ref mut editor) = rl {
        match editor.readline(text) {
            Ok(l) => {
                let _ = editor.add_history_entry(l.as_str());
                l
            }
            Err(_) => return Ok(None),
        }
    } else {
        print!("{text}");
        io::stdout().flush()?;
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        buf
    };
    Ok(Some(line.trim().to_string()))
}

fn run_menu(session: &mut Session) -> Result<()> {
    let mut rl = DefaultEditor::new().ok();
    let history = history_path();
    if let (Some(editor), Some(path)) = (rl.as_mut(), history.as_ref()) {
        let _ = editor.load_history(path);
    }

    println!("City route planner. Cheapest route by Dijkstra over live road conditions.");
    loop {
        println!("\n{MENU}");
        let Some(choice) = prompt(&mut rl, "choose> ")? else {
            break;
        };
        if choice == "1" {
            print!("{}", format::vertex_table(&session.graph));
        }
        match session.menu_step(&choice, |text| prompt(&mut rl, text))? {
            Step::Continue(out) if out.is_empty() => {}
            Step::Continue(out) => println!("{}", out.trim_end()),
            Step::Quit => break,
        }
    }

    if let (Some(editor), Some(path)) = (rl.as_mut(), history.as_ref()) {
        let _ = editor.save_history(path);
    }
    Ok(())
}

fn route_file_name(from: &str, to: &str) -> PathBuf {
    PathBuf::from(format!("route_{from}_{to}.json"))
}

/// Outcome of one menu choice.
#[derive(Debug, PartialEq)]
enum Step {
    Continue(String),
    Quit,
}

impl Session {
    /// Run menu option `choice`. Follow-up questions go through `ask`, which
    /// returns `None` once input is exhausted.
    fn menu_step<F>(&mut self, choice: &str, mut ask: F) -> Result<Step>
    where
        F: FnMut(&str) -> Result<Option<String>>,
    {
        let out = match choice {
            "1" => {
                let Some(from) = self.ask_point(&mut ask, "from")? else {
                    return Ok(Step::Quit);
                };
                let Some(to) = self.ask_point(&mut ask, "to")? else {
                    return Ok(Step::Quit);
                };
                if from == to {
                    "Origin and destination must differ.".to_string()
                } else {
                    self.route(&from, &to)
                }
            }
            "2" => {
                self.reset()?;
                "Road conditions redrawn and saved.".to_string()
            }
            "3" => format::edge_table(&self.graph),
            "4" => format::vertex_table(&self.graph),
            "5" => format::condition_table(self.weights.conditions()),
            "6" => match self.save() {
                Ok(()) => format!("State saved to {}.", self.store.dir().display()),
                Err(e) => format!("error: {e}"),
            },
            "7" | "quit" | "exit" => return Ok(Step::Quit),
            "" => String::new(),
            other => format!("Invalid option '{other}'."),
        };
        Ok(Step::Continue(out))
    }

    /// Ask for a point id until a known one is given.
    fn ask_point<F>(&self, ask: &mut F, label: &str) -> Result<Option<String>>
    where
        F: FnMut(&str) -> Result<Option<String>>,
    {
        let mut text = format!("{label}> ");
        loop {
            let Some(id) = ask(&text)? else {
                return Ok(None);
            };
            let id = id.to_uppercase();
            if self.graph.contains(&id) {
                return Ok(Some(id));
            }
            text = format!("Unknown point '{id}', try again. {label}> ");
        }
    }
}
