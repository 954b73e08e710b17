use colored::Colorize;

fn main() {
    match contract_guard::run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{} contract-guard: {}", "❌".bright_red(), err);
            std::process::exit(1);
        }
    }
}
