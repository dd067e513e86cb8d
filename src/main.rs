//! doccheck CLI binary
//!
//! Minimal entrypoint: all logic is in the library; main.rs only maps
//! cli::run() to the process exit code.

fn main() {
    // cli::run() handles ALL output including errors
    if let Err(code) = doccheck::cli::run() {
        std::process::exit(code);
    }
}
