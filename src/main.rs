use std::process::ExitCode;

fn main() -> ExitCode {
    xmldoc2md::cli::run()
}
