use std::process::ExitCode;

fn main() -> ExitCode {
    rill_drv::run()
}
