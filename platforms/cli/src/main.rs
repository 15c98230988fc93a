use clap::{Parser, ValueEnum};
use std::error::Error;
use std::io::{self, Read};
use std::path::Path;
use tmviz::{
    project, Halt, MachineLoader, ProgramManager, Status, Step, TuringMachine,
    TuringMachineError, MAX_EXECUTION_STEPS,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GraphFormat {
    /// Graphviz DOT text
    Dot,
    /// Cytoscape element list
    Json,
}

/// Runs a Turing machine definition against an input tape.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tmviz-cli --machine machines/palindrome.json --input abba
  tmviz-cli --sample binary-increment --input 1011 --graph dot
  cat machines/unary-increment.json | tmviz-cli --input 111")]
struct Cli {
    /// The machine definition file (.json). Read from stdin when piped.
    #[clap(short, long, conflicts_with = "sample")]
    machine: Option<String>,

    /// Use a built-in sample machine instead of a file
    #[clap(short, long)]
    sample: Option<String>,

    /// List the built-in sample machines and exit
    #[clap(long)]
    list: bool,

    /// The input written on the tape
    #[clap(short, long, default_value = "")]
    input: String,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Give up after this many steps
    #[clap(long, default_value_t = MAX_EXECUTION_STEPS)]
    max_steps: usize,

    /// Print the transition graph after the run
    #[clap(short, long, value_enum)]
    graph: Option<GraphFormat>,

    /// Write the machine definition to this path
    #[clap(long)]
    save: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if cli.list {
        for name in ProgramManager::list_program_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut machine = match load_machine(&cli) {
        Ok(machine) => machine,
        Err(TuringMachineError::FormatError(e)) => {
            eprintln!("Malformed machine definition: {}", e);
            std::process::exit(1);
        }
        Err(TuringMachineError::ValidationError(e)) => {
            eprintln!("Invalid machine definition: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let input = machine.filter_input(&cli.input);
    if input != cli.input {
        log::warn!(
            "Dropped symbols outside the input alphabet: {:?} -> {:?}",
            cli.input,
            input
        );
    }
    machine.reset(&input)?;

    let halt = if cli.debug {
        run_verbose(&mut machine, cli.max_steps)
    } else {
        machine.run_limit(cli.max_steps)
    };

    println!("{}", machine.tape());
    println!(
        "{} in state {} after {} steps",
        describe(&machine, &halt),
        machine.state(),
        machine.step_count()
    );

    match cli.graph {
        Some(GraphFormat::Dot) => print!("{}", project(&machine).to_dot()),
        Some(GraphFormat::Json) => println!("{}", project(&machine).to_elements_json()),
        None => {}
    }

    if let Some(path) = &cli.save {
        MachineLoader::save(&machine, Path::new(path))?;
    }

    Ok(())
}

/// Loads a machine from a file, a built-in sample, or stdin, in that order.
fn load_machine(cli: &Cli) -> Result<TuringMachine, TuringMachineError> {
    if let Some(path) = &cli.machine {
        MachineLoader::load(Path::new(path))
    } else if let Some(name) = &cli.sample {
        let definition = ProgramManager::get_program_by_name(name)?;
        Ok(TuringMachine::new(definition, "")?)
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| TuringMachineError::FileError(format!("Failed to read from stdin: {}", e)))?;
        MachineLoader::load_from_str(&buffer)
    } else {
        Err(TuringMachineError::FileError(
            "No machine given; use --machine, --sample or pipe a definition".to_string(),
        ))
    }
}

fn run_verbose(machine: &mut TuringMachine, max_steps: usize) -> Halt {
    let print_state = |machine: &TuringMachine| {
        println!(
            "Step: {}, State: {}, Tape: {}",
            machine.step_count(),
            machine.state(),
            machine.tape()
        );
    };

    print_state(machine);

    for _ in 0..max_steps {
        match machine.step() {
            Step::Continue => print_state(machine),
            Step::Halt(halt) => return halt,
        }
    }

    if machine.is_final() {
        Halt::Final
    } else {
        Halt::Interrupted
    }
}

fn describe(machine: &TuringMachine, halt: &Halt) -> &'static str {
    match (halt, machine.status()) {
        (Halt::Interrupted, _) => "Step limit reached",
        (_, Status::Accepted) => "Accepted",
        (_, Status::Rejected) => "Rejected",
        (_, Status::Halted) => "Halted",
        (_, Status::Running) => "Rejected",
    }
}
