use argot::parser::report_error;
use std::process;

fn main() {
    argot::cli::init_logging();

    match argot::cli::run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            report_error(&e);
            process::exit(e.exit_code());
        }
    }
}
