use std::process::ExitCode;

fn main() -> ExitCode {
    quoteforge_cli::run()
}
