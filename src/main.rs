use std::io;
use std::process::ExitCode;

use workload_gen::{parse_args, run, Invocation};

fn main() -> ExitCode {
    env_logger::init();

    let invocation = match parse_args(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(e) => e.exit(),
    };

    match invocation {
        Invocation::Usage(text) => {
            eprint!("{}", text);
            ExitCode::SUCCESS
        }
        // The outcome owns the touched memory; keep it until we exit
        Invocation::Run(request) => match run(&request, &mut io::stdout()) {
            Ok(_outcome) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}
