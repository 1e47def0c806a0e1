use std::io::Write;
use std::time::Instant;
use std::{env, process};

use gbz_unfold::{formats, utils};
use gbz_unfold::{Graph, PathIndex, PhaseUnfolder};

use gbwt::{GBWT, GBZ};
use getopts::Options;
use simple_sds::serialize;

//-----------------------------------------------------------------------------

fn main() -> Result<(), String> {
    let start_time = Instant::now();

    // Parse arguments.
    let config = Config::new();

    // Load the full graph.
    if config.verbose {
        eprintln!(
            "Loading GBZ graph {} ({})",
            config.gbz_file, utils::file_size(&config.gbz_file).unwrap_or(String::from("unknown size"))
        );
    }
    let gbz: GBZ = serialize::load_from(&config.gbz_file).map_err(|x| x.to_string())?;
    let path_index = PathIndex::from_gbz(&gbz)?;
    let index: &GBWT = gbz.as_ref();
    if config.verbose {
        eprintln!(
            "The graph contains {} nodes, {} reference paths, and {} haplotype sequences",
            path_index.node_count(), path_index.path_count(), index.sequences()
        );
    }

    // Load the pruned graph.
    if config.verbose {
        eprintln!(
            "Loading pruned graph {} ({})",
            config.gfa_file, utils::file_size(&config.gfa_file).unwrap_or(String::from("unknown size"))
        );
    }
    let mut reader = utils::open_file(&config.gfa_file)?;
    let gfa = formats::read_gfa(&mut reader)?;
    let mut graph: Graph = gfa.graph;
    if config.verbose {
        eprintln!("The pruned graph contains {} nodes and {} edges", graph.node_count(), graph.edge_count());
    }

    // Unfold or restore the paths.
    let next_node = path_index.max_node().max(graph.max_node().unwrap_or(0)) + 1;
    let mut unfolder = PhaseUnfolder::new(&path_index, index, next_node)?;
    if let Some(filename) = config.read_mapping.as_ref() {
        unfolder.read_mapping(filename)?;
        if config.verbose {
            eprintln!("Read {} duplicates from {}", unfolder.mapping().len(), filename);
        }
    }
    unfolder.check_graph(&graph)?;
    if config.restore_paths {
        unfolder.restore_paths(&mut graph, config.verbose)?;
    } else {
        let paths = unfolder.unfold(&mut graph, config.verbose)?;
        if config.verbose {
            eprintln!("Unfolded {} paths with {} duplicate nodes", paths, unfolder.mapping().len());
        }
    }

    // Verify the result.
    if config.verify {
        let failures = unfolder.verify_paths(&graph, config.threads, config.verbose)?;
        if failures > 0 {
            eprintln!("Verification failed for {} paths", failures);
        } else if config.verbose {
            eprintln!("Verification successful");
        }
    }

    // Write the output.
    let mut output = utils::create_output(config.output.as_ref())?;
    graph.write_gfa(&gfa.paths, &mut output).map_err(|x| x.to_string())?;
    output.flush().map_err(|x| x.to_string())?;
    drop(output);
    if let Some(filename) = config.write_mapping.as_ref() {
        unfolder.write_mapping(filename)?;
        if config.verbose {
            eprintln!("Wrote {} duplicates to {}", unfolder.mapping().len(), filename);
        }
    }

    let end_time = Instant::now();
    let seconds = end_time.duration_since(start_time).as_secs_f64();
    eprintln!("Used {:.3} seconds", seconds);

    Ok(())
}

//-----------------------------------------------------------------------------

struct Config {
    pub gbz_file: String,
    pub gfa_file: String,
    pub output: Option<String>,
    pub read_mapping: Option<String>,
    pub write_mapping: Option<String>,
    pub restore_paths: bool,
    pub verify: bool,
    pub threads: usize,
    pub verbose: bool,
}

impl Config {
    const DEFAULT_THREADS: usize = 1;

    pub fn new() -> Config {
        let args: Vec<String> = env::args().collect();
        let program = args[0].clone();
        let header = format!("Usage: {} [options] -g graph.gbz pruned.gfa > unfolded.gfa", program);

        let mut opts = Options::new();
        opts.optflag("h", "help", "print this help");
        opts.optopt("g", "gbz", "full graph with reference paths and haplotypes (required)", "FILE");
        opts.optopt("o", "output", "output GFA file (default: stdout)", "FILE");
        opts.optopt("r", "read-mapping", "read the node mapping from FILE and extend it", "FILE");
        opts.optopt("m", "write-mapping", "write the node mapping to FILE", "FILE");
        opts.optflag("R", "restore-paths", "restore the reference paths instead of unfolding");
        opts.optflag("v", "verify", "verify that all paths are present in the output graph");
        opts.optopt(
            "t",
            "threads",
            &format!("number of verification threads (default: {})", Self::DEFAULT_THREADS),
            "INT",
        );
        opts.optflag("p", "progress", "print progress information to stderr");
        let matches = match opts.parse(&args[1..]) {
            Ok(m) => m,
            Err(f) => {
                eprintln!("{}", f);
                process::exit(1);
            }
        };

        if matches.opt_present("h") {
            eprint!("{}", opts.usage(&header));
            process::exit(0);
        }

        let gbz_file = if let Some(s) = matches.opt_str("g") {
            s
        } else {
            eprintln!("Error: Option --gbz is required\n");
            eprint!("{}", opts.usage(&header));
            process::exit(1);
        };
        let gfa_file = if let Some(s) = matches.free.first() {
            s.clone()
        } else {
            eprint!("{}", opts.usage(&header));
            process::exit(1);
        };

        let threads = if let Some(s) = matches.opt_str("t") {
            match s.parse::<usize>() {
                Ok(x) if x > 0 => x,
                Ok(_) => {
                    eprintln!("Error: --threads must be positive");
                    process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: Failed to parse --threads: {}", e);
                    process::exit(1);
                }
            }
        } else {
            Self::DEFAULT_THREADS
        };

        Config {
            gbz_file,
            gfa_file,
            output: matches.opt_str("o"),
            read_mapping: matches.opt_str("r"),
            write_mapping: matches.opt_str("m"),
            restore_paths: matches.opt_present("R"),
            verify: matches.opt_present("v"),
            threads,
            verbose: matches.opt_present("p"),
        }
    }
}

//-----------------------------------------------------------------------------
