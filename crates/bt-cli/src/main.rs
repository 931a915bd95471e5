use bt_cli::cli::{build_cli, run};
use std::io::Write;

fn main() {
    let matches = build_cli().get_matches();

    match run(&matches) {
        Ok(stdout) => {
            if !stdout.is_empty() {
                let mut out = std::io::stdout().lock();
                if let Err(err) = out.write_all(stdout.as_bytes()).and_then(|()| out.flush()) {
                    eprintln!("error: failed to write output: {err}");
                    std::process::exit(1);
                }
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
