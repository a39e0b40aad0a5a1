use env_logger::Env;
use ode_compare::cli::{parse_cli, run};

fn main() {
    let invocation = parse_cli();
    let level = if invocation.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let report = match run(&invocation) {
        Ok(report) => report,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    println!(
        "{} figure(s) rendered, {} skipped",
        report.rendered.len(),
        report.skipped.len()
    );
    for fout in report.rendered.iter() {
        println!("  {}", fout.display());
    }
    for skipped in report.skipped.iter() {
        println!("  skipped '{}': {}", skipped.title, skipped.error);
    }
    if !report.is_complete() {
        std::process::exit(2);
    }
}
