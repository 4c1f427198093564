//! fieldops main entrypoint.

use fieldops::run;
use fieldops::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
