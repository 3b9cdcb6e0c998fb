use bintur::types::{CUSTOM_SEPARATOR, DEFAULT_SEPARATOR};
use bintur::{
    LogEntry, Machine, MachineError, Program, ProgramLoader, ProgramManager, StateId, Step,
    MAX_EXECUTION_STEPS,
};
use clap::Parser;
use std::io::{self, Read};
use std::path::Path;
use std::process;

/// Runs a binary single-tape Turing machine and prints its execution history.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  bintur-cli --tape 1 --instructions '1,1,R,1;1,0,1,1' --separator ';' --initial 1 --max-steps 6
  bintur-cli --program programs/unary-addition.json --debug
  cat programs/unary-successor.json | bintur-cli --stdin")]
struct Cli {
    /// A program file (.json) to execute
    #[clap(short, long, conflicts_with_all = ["builtin", "instructions"])]
    program: Option<String>,

    /// Read the program JSON from stdin
    #[clap(long, conflicts_with_all = ["program", "builtin", "instructions"])]
    stdin: bool,

    /// Run one of the built-in programs by name
    #[clap(short, long, conflicts_with = "instructions")]
    builtin: Option<String>,

    /// List the built-in programs and exit
    #[clap(short, long)]
    list: bool,

    /// Initial tape content, a string of 0 and 1
    #[clap(short, long, default_value = "")]
    tape: String,

    /// Instructions in the form id,condition,action,next_id
    #[clap(short, long, requires = "initial")]
    instructions: Option<String>,

    /// Id of the first instruction
    #[clap(long)]
    initial: Option<StateId>,

    /// Separator between instructions (newline by default)
    #[clap(short, long)]
    separator: Option<String>,

    /// Maximum number of steps to execute
    #[clap(short, long, default_value_t = MAX_EXECUTION_STEPS)]
    max_steps: usize,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the execution history as JSON
    #[clap(long, conflicts_with = "debug")]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = if cli.list {
        list_programs()
    } else {
        run(&cli)
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn list_programs() -> Result<(), MachineError> {
    for (index, name) in ProgramManager::list_program_names()?.iter().enumerate() {
        println!("{index}: {name}");
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), MachineError> {
    let program = load_program(cli)?;
    let mut machine = Machine::from_program(&program)?;

    let outcome = machine.run_to_completion(cli.max_steps);

    if cli.json {
        let history = serde_json::to_string_pretty(machine.logger())
            .map_err(|e| MachineError::ValidationError(e.to_string()))?;
        println!("{history}");
        return Ok(());
    }

    if cli.debug {
        for (i, entry) in machine.logger().iter().enumerate() {
            print_entry(i, entry);
        }
        match outcome {
            Step::Halt => println!("\nMachine halted after {} steps.", machine.step_count()),
            Step::Continue => println!(
                "\nMachine still running after {} steps.",
                machine.step_count()
            ),
        }
        println!("\nFinal tape:");
    }

    println!("{}", machine.current_tape_text());

    Ok(())
}

/// Builds the program to run from a file, stdin, a built-in, or the inline arguments.
fn load_program(cli: &Cli) -> Result<Program, MachineError> {
    if let Some(path) = &cli.program {
        return ProgramLoader::load_program(Path::new(path));
    }

    let piped = cli.builtin.is_none()
        && cli.instructions.is_none()
        && atty::isnt(atty::Stream::Stdin);

    if cli.stdin || piped {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| MachineError::FileError(format!("Failed to read from stdin: {}", e)))?;
        return ProgramLoader::load_program_from_string(&buffer);
    }

    if let Some(name) = &cli.builtin {
        return ProgramManager::get_program_by_name(name);
    }

    let instructions = cli.instructions.clone().ok_or_else(|| {
        MachineError::ValidationError(
            "One of --program, --stdin, --builtin or --instructions is required".to_string(),
        )
    })?;
    let initial_id = cli
        .initial
        .clone()
        .ok_or_else(|| MachineError::ValidationError("--initial is required".to_string()))?;

    let separator = match &cli.separator {
        Some(separator) => separator.clone(),
        // Instructions passed on one line most likely use the single-line encoding.
        None if !instructions.contains('\n') && instructions.contains(CUSTOM_SEPARATOR) => {
            CUSTOM_SEPARATOR.to_string()
        }
        None => DEFAULT_SEPARATOR.to_string(),
    };

    Ok(Program {
        name: "command line".to_string(),
        tape: cli.tape.clone(),
        instructions,
        initial_id,
        separator,
    })
}

fn print_entry(index: usize, entry: &LogEntry) {
    let marker: String = (0..entry.tape().len())
        .map(|i| if i == entry.head_index() { '^' } else { ' ' })
        .collect();

    println!(
        "{:>4}. {}  {}",
        index,
        entry.tape(),
        entry.instruction_text().unwrap_or_default()
    );
    println!("      {}", marker.trim_end());
}
