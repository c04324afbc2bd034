//! kvm - CLI
//!
//! Runs an array-instruction listing and prints the final register frame.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use kvm_core::config::KvmConfig;
use kvm_core::loader::ProgramLoader;
use kvm_core::vm::VirtualMachine;
use kvm_core::{BoxedValue, Heap};

#[derive(Parser)]
#[command(name = "kvm", version, about = "Run kvm array-instruction listings")]
struct Cli {
    /// Listing to execute
    file: PathBuf,

    /// Registers in the frame
    #[arg(long, default_value_t = KvmConfig::default().register_count)]
    registers: usize,

    /// Largest array new-array may allocate
    #[arg(long, default_value_t = KvmConfig::default().max_array_length)]
    max_array_length: usize,

    /// Maximum number of live heap objects
    #[arg(long, default_value_t = KvmConfig::default().max_heap_objects)]
    max_heap_objects: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> KvmConfig {
        KvmConfig {
            register_count: self.registers,
            max_array_length: self.max_array_length,
            max_heap_objects: self.max_heap_objects,
        }
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let program = ProgramLoader::load_file(&cli.file)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;

    let mut vm = VirtualMachine::new(cli.config(), program);
    let outcome = vm.execute();

    for (reg, value) in vm.registers().values() {
        println!("v{} = {}", reg, describe(vm.heap(), value));
    }

    outcome.context("runtime error")
}

/// Render a register value, expanding arrays it references
fn describe(heap: &Heap, value: BoxedValue) -> String {
    let handle = match value {
        BoxedValue::Reference(Some(handle)) => handle,
        other => return other.to_string(),
    };
    match heap.array(Some(handle)) {
        Ok(array) => {
            let elements: Vec<String> = array.to_boxed_vec().iter().map(|e| e.to_string()).collect();
            format!(
                "{} [{}; {}] = [{}]",
                value,
                array.kind().descriptor(),
                array.len(),
                elements.join(", ")
            )
        }
        Err(_) => value.to_string(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = simple_logger::SimpleLogger::new()
        .with_level(cli.log_level())
        .init()
    {
        eprintln!("Error: failed to initialise logging: {}", e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use kvm_core::ElementKind;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::parse_from(["kvm", "prog.kvm", "--registers", "8", "--max-array-length", "32", "-vv"]);
        let config = cli.config();
        assert_eq!(config.register_count, 8);
        assert_eq!(config.max_array_length, 32);
        assert_eq!(config.max_heap_objects, KvmConfig::default().max_heap_objects);
        assert_eq!(cli.log_level(), LevelFilter::Trace);
    }

    #[test]
    fn arrays_are_expanded() {
        let mut heap = Heap::new(&KvmConfig::new());
        let array = heap.alloc_array(ElementKind::Int, 2).unwrap();
        heap.array_set(Some(array), 1, BoxedValue::Int(5)).unwrap();
        assert_eq!(describe(&heap, array.into()), "ref:@1 [I; 2] = [int:0, int:5]");
        assert_eq!(describe(&heap, BoxedValue::NULL), "null");
        assert_eq!(describe(&heap, BoxedValue::Long(3)), "long:3");
    }
}
