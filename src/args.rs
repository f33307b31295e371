use clap::{Parser, Subcommand};

const CMD_NAME: &str = "mechsplit";
const DEFAULT_JOB_DIR: &str = ".";
const DEFAULT_ADHOC_SCRIPT: &str = "run_adhoc.sh";

/// Stores our command-line args format.
#[derive(Parser)]
#[command(name = CMD_NAME, version, about = None, long_about = None)]
pub struct Args {
    /// Print additional debugging info (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Split a run into subtask directories that can be run in parallel
    Setup(SetupArgs),
    /// Run the subtasks of a previous setup on an ad hoc SSH cluster
    RunAdhoc(RunAdhocArgs),
}

#[derive(clap::Args)]
pub struct SetupArgs {
    /// Job directory, containing the inp/ directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_JOB_DIR)]
    pub path: String,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = workflow::DEFAULT_OUT_DIR)]
    #[arg(env = "MECHSPLIT_OUTPUT")]
    pub output: String,

    /// Save filesystem (defaults to save_prefix in run.dat)
    #[arg(short, long, value_name = "DIR")]
    pub save_path: Option<String>,

    /// Run filesystem (defaults to run_prefix in run.dat)
    #[arg(short, long, value_name = "DIR")]
    pub run_path: Option<String>,

    /// Subtask group to set up, in order (defaults to els.spc, els.pes, thermo.spc, kin)
    #[arg(short, long = "group", value_name = "TASK[.SUBTASK]")]
    pub groups: Vec<String>,
}

#[derive(clap::Args)]
pub struct RunAdhocArgs {
    /// Output directory of a previous setup
    #[arg(short, long, value_name = "DIR", default_value = workflow::DEFAULT_OUT_DIR)]
    #[arg(env = "MECHSPLIT_OUTPUT")]
    pub path: String,

    /// Comma-separated list of nodes to run on
    #[arg(short, long, value_name = "NODE[,NODE]")]
    pub nodes: Option<String>,

    /// Shell commands for activating the environment on each node
    #[arg(short, long, value_name = "HOOK")]
    pub activation_hook: Option<String>,

    /// Script that runs one task's subtasks across the nodes
    #[arg(long, value_name = "FILE", default_value = DEFAULT_ADHOC_SCRIPT)]
    #[arg(env = "MECHSPLIT_ADHOC_SCRIPT")]
    pub script: String,
}
