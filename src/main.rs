use std::process::ExitCode;

fn main() -> ExitCode {
    match shotpath::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            shotpath::ui::output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
