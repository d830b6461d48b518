use std::process::ExitCode;

fn main() -> ExitCode {
    match knockout_bracket_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("knockout-bracket: {e}");
            ExitCode::FAILURE
        }
    }
}
