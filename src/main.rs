// Tue Jan 13 2026 - Alex

use colored::Colorize;

fn main() {
    match cxx_abi_diff::cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    }
}
