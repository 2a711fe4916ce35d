use colored::Colorize;

fn main() {
    if let Err(err) = obras::run() {
        eprintln!("{} {}", "error:".bright_red().bold(), err);
        std::process::exit(1);
    }
}
